//! Command handlers -- one module per subcommand

pub mod check;
pub mod config;
pub mod search;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use docgate_core::config::DocgateConfig;
use docgate_core::types::Subject;
use docgate_retrieval::Catalog;

use crate::error::CliError;

/// Picks the subject from `--user` or falls back to `retrieval.subject_id`.
fn resolve_subject(user: Option<&str>, config: &DocgateConfig) -> Result<Subject, CliError> {
    match user {
        Some(id) if !id.trim().is_empty() => {
            Ok(Subject::new(&config.retrieval.subject_type, id))
        }
        Some(_) => Err(CliError::Config("--user must not be empty".to_owned())),
        None => config.retrieval.subject().ok_or_else(|| {
            CliError::Config(
                "no subject: pass --user or set retrieval.subject_id".to_owned(),
            )
        }),
    }
}

fn resolve_catalog_path(catalog: Option<&Path>, config: &DocgateConfig) -> PathBuf {
    catalog.map_or_else(|| PathBuf::from(&config.catalog.path), Path::to_path_buf)
}

async fn load_catalog(path: &Path) -> Result<Arc<Catalog>, CliError> {
    Ok(Arc::new(Catalog::load(path).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_flag_wins_over_config() {
        let mut config = DocgateConfig::default();
        config.retrieval.subject_id = "bob".to_owned();

        let subject = resolve_subject(Some("alice"), &config).unwrap();
        assert_eq!(subject, Subject::user("alice"));
    }

    #[test]
    fn config_subject_used_without_flag() {
        let mut config = DocgateConfig::default();
        config.retrieval.subject_type = "group".to_owned();
        config.retrieval.subject_id = "ops".to_owned();

        let subject = resolve_subject(None, &config).unwrap();
        assert_eq!(subject, Subject::new("group", "ops"));
    }

    #[test]
    fn missing_subject_is_config_error() {
        let err = resolve_subject(None, &DocgateConfig::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(resolve_subject(Some(" "), &DocgateConfig::default()).is_err());
    }

    #[test]
    fn catalog_flag_wins_over_config() {
        let config = DocgateConfig::default();
        assert_eq!(
            resolve_catalog_path(Some(Path::new("/tmp/c.toml")), &config),
            PathBuf::from("/tmp/c.toml")
        );
        assert_eq!(
            resolve_catalog_path(None, &config),
            PathBuf::from("catalog.toml")
        );
    }
}
