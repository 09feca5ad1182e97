//! 설정 관리 - docgate.toml 파싱 및 런타임 설정
//!
//! [`DocgateConfig`]는 모든 크레이트의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`DOCGATE_RETRIEVAL_MODE=snippets` 형식)
//! 3. 설정 파일 (`docgate.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! 렌더링 모드는 로딩 시점에 검증하지 않습니다. 알 수 없는 모드는
//! 첫 문서를 렌더링할 때 에러가 됩니다.
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), docgate_core::error::DocgateError> {
//! use docgate_core::config::DocgateConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = DocgateConfig::load("docgate.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = DocgateConfig::parse("[retrieval]\nmode = \"snippets\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, DocgateError};
use crate::types::{RenderMode, ResultLimit, Subject};

/// 발췌 길이 하한 (앞/뒤 절반 + "..."를 표현할 수 있는 최소 크기)
pub const MIN_SNIPPET_SIZE: usize = 6;

/// docgate 통합 설정
///
/// `docgate.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocgateConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 검색 파이프라인 설정
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// 로컬 카탈로그 설정
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl DocgateConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DocgateError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, DocgateError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DocgateError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                DocgateError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, DocgateError> {
        toml::from_str(toml_str).map_err(|e| {
            DocgateError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `DOCGATE_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "DOCGATE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "DOCGATE_GENERAL_LOG_FORMAT");

        // Retrieval
        override_string(&mut self.retrieval.mode, "DOCGATE_RETRIEVAL_MODE");
        override_i64(
            &mut self.retrieval.num_results,
            "DOCGATE_RETRIEVAL_NUM_RESULTS",
        );
        override_string(
            &mut self.retrieval.subject_type,
            "DOCGATE_RETRIEVAL_SUBJECT_TYPE",
        );
        override_string(
            &mut self.retrieval.subject_id,
            "DOCGATE_RETRIEVAL_SUBJECT_ID",
        );
        override_usize(
            &mut self.retrieval.snippet_max_size,
            "DOCGATE_RETRIEVAL_SNIPPET_MAX_SIZE",
        );
        override_bool(
            &mut self.retrieval.cache_lookups,
            "DOCGATE_RETRIEVAL_CACHE_LOOKUPS",
        );

        // Catalog
        override_string(&mut self.catalog.path, "DOCGATE_CATALOG_PATH");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), DocgateError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.retrieval.snippet_max_size < MIN_SNIPPET_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "retrieval.snippet_max_size".to_owned(),
                reason: format!("must be >= {MIN_SNIPPET_SIZE}"),
            }
            .into());
        }

        if self.retrieval.subject_type.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "retrieval.subject_type".to_owned(),
                reason: "subject_type must not be empty".to_owned(),
            }
            .into());
        }

        if self.catalog.path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "catalog.path".to_owned(),
                reason: "catalog path must not be empty".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 검색 파이프라인 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// 렌더링 모드 (snippets, snippets-markdown, documents, documents-markdown)
    pub mode: String,
    /// 결과 수 상한 (0 이하면 무제한)
    pub num_results: i64,
    /// 주체 유형
    pub subject_type: String,
    /// 주체 ID (CLI `--user`로 덮어쓸 수 있음)
    pub subject_id: String,
    /// 본문 발췌 최대 길이 (문자 수)
    pub snippet_max_size: usize,
    /// 실행 단위 컨테이너 이름/판정 캐시 사용 여부
    pub cache_lookups: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            mode: "documents-markdown".to_owned(),
            num_results: -1,
            subject_type: "user".to_owned(),
            subject_id: String::new(),
            snippet_max_size: 50,
            cache_lookups: true,
        }
    }
}

impl RetrievalConfig {
    /// 설정된 렌더링 모드 (알 수 없는 값도 그대로 보존)
    pub fn render_mode(&self) -> RenderMode {
        RenderMode::parse(&self.mode)
    }

    /// 결과 수 상한
    pub fn result_limit(&self) -> ResultLimit {
        ResultLimit::from_count(self.num_results)
    }

    /// 설정된 주체 (ID가 비어있으면 `None`)
    pub fn subject(&self) -> Option<Subject> {
        if self.subject_id.trim().is_empty() {
            return None;
        }
        Some(Subject::new(&self.subject_type, &self.subject_id))
    }
}

/// 로컬 카탈로그 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// 카탈로그 TOML 파일 경로
    pub path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: "catalog.toml".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_i64(target: &mut i64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<i64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse i64 from env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let config = DocgateConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.retrieval.mode, "documents-markdown");
        assert_eq!(config.retrieval.num_results, -1);
        assert_eq!(config.retrieval.subject_type, "user");
        assert_eq!(config.retrieval.snippet_max_size, 50);
        assert!(config.retrieval.cache_lookups);
        assert_eq!(config.catalog.path, "catalog.toml");
    }

    #[test]
    fn default_config_passes_validation() {
        DocgateConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let config = DocgateConfig::parse("").unwrap();
        assert_eq!(config.retrieval.mode, "documents-markdown");
        assert_eq!(config.retrieval.result_limit(), ResultLimit::Unbounded);
    }

    #[test]
    fn parse_partial_toml_merges_with_defaults() {
        let toml = r#"
[retrieval]
mode = "snippets"
num_results = 5
subject_id = "alice"
"#;
        let config = DocgateConfig::parse(toml).unwrap();
        assert_eq!(config.retrieval.render_mode(), RenderMode::Snippets);
        assert_eq!(config.retrieval.result_limit(), ResultLimit::AtMost(5));
        assert_eq!(config.retrieval.subject(), Some(Subject::user("alice")));
        // general은 기본값 유지
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let err = DocgateConfig::parse("invalid = [[[toml").unwrap_err();
        assert!(matches!(
            err,
            DocgateError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn unknown_mode_is_not_rejected_at_load() {
        let config = DocgateConfig::parse("[retrieval]\nmode = \"bogus\"").unwrap();
        config.validate().unwrap();
        assert_eq!(
            config.retrieval.render_mode(),
            RenderMode::Unrecognized("bogus".to_owned())
        );
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = DocgateConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = DocgateConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_small_snippet_size() {
        let mut config = DocgateConfig::default();
        config.retrieval.snippet_max_size = 5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("snippet_max_size"));

        config.retrieval.snippet_max_size = MIN_SNIPPET_SIZE;
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_empty_subject_type() {
        let mut config = DocgateConfig::default();
        config.retrieval.subject_type = "  ".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("subject_type"));
    }

    #[test]
    fn subject_requires_non_blank_id() {
        let mut config = RetrievalConfig::default();
        assert!(config.subject().is_none());
        config.subject_id = "   ".to_owned();
        assert!(config.subject().is_none());
        config.subject_type = "service".to_owned();
        config.subject_id = "indexer".to_owned();
        assert_eq!(config.subject(), Some(Subject::new("service", "indexer")));
    }

    #[test]
    #[serial]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: #[serial]로 환경변수를 만지는 테스트를 직렬화합니다.
        unsafe { std::env::set_var("TEST_DOCGATE_STR", "overridden") };
        override_string(&mut val, "TEST_DOCGATE_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_DOCGATE_STR") };
    }

    #[test]
    #[serial]
    fn env_override_i64_negative() {
        let mut val = 10;
        // SAFETY: #[serial]로 환경변수를 만지는 테스트를 직렬화합니다.
        unsafe { std::env::set_var("TEST_DOCGATE_I64", "-1") };
        override_i64(&mut val, "TEST_DOCGATE_I64");
        assert_eq!(val, -1);
        unsafe { std::env::remove_var("TEST_DOCGATE_I64") };
    }

    #[test]
    #[serial]
    fn env_override_bool_invalid_keeps_original() {
        let mut val = true;
        // SAFETY: #[serial]로 환경변수를 만지는 테스트를 직렬화합니다.
        unsafe { std::env::set_var("TEST_DOCGATE_BOOL_BAD", "maybe") };
        override_bool(&mut val, "TEST_DOCGATE_BOOL_BAD");
        assert!(val);
        unsafe { std::env::remove_var("TEST_DOCGATE_BOOL_BAD") };
    }

    #[test]
    #[serial]
    fn env_override_usize_invalid_keeps_original() {
        let mut val = 50;
        // SAFETY: #[serial]로 환경변수를 만지는 테스트를 직렬화합니다.
        unsafe { std::env::set_var("TEST_DOCGATE_USIZE_BAD", "-3") };
        override_usize(&mut val, "TEST_DOCGATE_USIZE_BAD");
        assert_eq!(val, 50);
        unsafe { std::env::remove_var("TEST_DOCGATE_USIZE_BAD") };
    }

    #[test]
    #[serial]
    fn apply_env_overrides_updates_retrieval_section() {
        let mut config = DocgateConfig::default();
        // SAFETY: #[serial]로 환경변수를 만지는 테스트를 직렬화합니다.
        unsafe {
            std::env::set_var("DOCGATE_RETRIEVAL_MODE", "snippets-markdown");
            std::env::set_var("DOCGATE_RETRIEVAL_SUBJECT_ID", "bob");
            std::env::set_var("DOCGATE_RETRIEVAL_CACHE_LOOKUPS", "false");
        }
        config.apply_env_overrides();
        unsafe {
            std::env::remove_var("DOCGATE_RETRIEVAL_MODE");
            std::env::remove_var("DOCGATE_RETRIEVAL_SUBJECT_ID");
            std::env::remove_var("DOCGATE_RETRIEVAL_CACHE_LOOKUPS");
        }
        assert_eq!(config.retrieval.render_mode(), RenderMode::SnippetsMarkdown);
        assert_eq!(config.retrieval.subject_id, "bob");
        assert!(!config.retrieval.cache_lookups);
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = DocgateConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = DocgateConfig::parse(&toml_str).unwrap();
        assert_eq!(config.retrieval.mode, parsed.retrieval.mode);
        assert_eq!(config.retrieval.num_results, parsed.retrieval.num_results);
        assert_eq!(config.catalog.path, parsed.catalog.path);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let err = DocgateConfig::from_file("/nonexistent/path/docgate.toml")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DocgateError::Config(ConfigError::FileNotFound { .. })
        ));
    }
}
