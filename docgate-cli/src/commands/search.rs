//! `docgate search` command handler

use std::io::Write;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use docgate_core::config::DocgateConfig;
use docgate_retrieval::{CatalogSource, RetrieverBuilder, RetrieverConfig};

use super::{load_catalog, resolve_catalog_path, resolve_subject};
use crate::cli::SearchArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `search` command.
pub async fn execute(
    args: SearchArgs,
    config: &DocgateConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let report = run_search(&args, config).await?;
    writer.render(&report)
}

/// Run the search pipeline against the local catalog.
///
/// Command-line flags override the matching `[retrieval]` and `[catalog]`
/// settings for this run only.
///
/// # Errors
///
/// Returns `CliError::Config` for a missing subject. Pipeline failures come
/// back as `CliError::Core`: an unreadable catalog or an unknown render mode
/// is a configuration error, a backend failure is an access error.
pub async fn run_search(args: &SearchArgs, config: &DocgateConfig) -> Result<SearchReport, CliError> {
    let subject = resolve_subject(args.user.as_deref(), config)?;

    let mut retrieval = config.retrieval.clone();
    if let Some(mode) = &args.mode {
        retrieval.mode = mode.clone();
    }
    if let Some(num_results) = args.num_results {
        retrieval.num_results = num_results;
    }

    let catalog_path = resolve_catalog_path(args.catalog.as_deref(), config);
    let catalog = load_catalog(&catalog_path).await?;

    let mut source = CatalogSource::new(Arc::clone(&catalog));
    if let Some(folder) = &args.folder {
        source = source.within(folder.clone());
    }

    info!(
        query = %args.query,
        subject = %subject,
        mode = %retrieval.mode,
        catalog = %catalog_path.display(),
        "running search"
    );

    let retriever = RetrieverBuilder::new()
        .config(RetrieverConfig::from_core(&retrieval))
        .source(Arc::new(source))
        .resolver(Arc::clone(&catalog))
        .decision_point(Arc::clone(&catalog))
        .subject(subject)
        .build()?;

    let outcome = retriever.run_with_stats(&args.query).await?;

    Ok(SearchReport {
        query: args.query.clone(),
        subject: retriever.subject().to_string(),
        report: outcome.report.render(),
        retrieved: outcome.stats.retrieved,
        permitted: outcome.stats.permitted,
        excluded: outcome.stats.excluded,
    })
}

/// Search result payload.
#[derive(Debug, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub subject: String,
    /// Rendered report, or "No document found".
    pub report: String,
    pub retrieved: u64,
    pub permitted: u64,
    pub excluded: u64,
}

impl Render for SearchReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "{}", self.report)
    }
}
