//! `docgate check` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use docgate_core::config::DocgateConfig;
use docgate_core::metrics::{RESULT_ALLOWED, RESULT_DENIED, RESULT_UNDECIDED};
use docgate_retrieval::PolicyDecisionPoint;

use super::{load_catalog, resolve_catalog_path, resolve_subject};
use crate::cli::CheckArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `check` command.
pub async fn execute(
    args: CheckArgs,
    config: &DocgateConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let report = run_check(&args, config).await?;
    writer.render(&report)
}

/// Ask the catalog's decision point for a single decision.
pub async fn run_check(args: &CheckArgs, config: &DocgateConfig) -> Result<CheckReport, CliError> {
    let subject = resolve_subject(args.user.as_deref(), config)?;
    let catalog_path = resolve_catalog_path(args.catalog.as_deref(), config);
    let catalog = load_catalog(&catalog_path).await?;

    let decision = catalog.check(&subject, &args.action, &args.resource).await?;
    let decision = match decision {
        Some(d) if d.allowed => RESULT_ALLOWED,
        Some(_) => RESULT_DENIED,
        None => RESULT_UNDECIDED,
    };

    info!(
        subject = %subject,
        action = %args.action,
        resource = %args.resource,
        decision,
        "policy check"
    );

    Ok(CheckReport {
        subject: subject.to_string(),
        action: args.action.clone(),
        resource: args.resource.clone(),
        decision: decision.to_owned(),
    })
}

/// Decision payload.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub subject: String,
    pub action: String,
    pub resource: String,
    /// `allowed`, `denied` or `undecided`.
    pub decision: String,
}

impl Render for CheckReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "{}", self.decision)
    }
}
