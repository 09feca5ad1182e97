//! 에러 타입 - 도메인별 에러 정의

/// docgate 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum DocgateError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 검색/인가 파이프라인 에러
    #[error("access error: {0}")]
    Access(#[from] AccessError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// 카탈로그 파일을 읽거나 검증할 수 없음
    #[error("catalog error: {path}: {reason}")]
    Catalog { path: String, reason: String },
}

/// 검색/인가 파이프라인 에러
///
/// 실행을 중단시키는 예외 상황만 표현합니다.
/// 인가 거부는 에러가 아니라 조용한 제외입니다.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// 문서 소스 호출 실패
    #[error("document source failed: {0}")]
    Source(String),

    /// 컨테이너 조회 실패
    #[error("container resolution failed: {0}")]
    Resolution(String),

    /// 정책 결정 지점 호출 실패
    #[error("policy decision failed: {0}")]
    Decision(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_to_top_level() {
        let err: DocgateError = ConfigError::InvalidValue {
            field: "retrieval.snippet_max_size".to_owned(),
            reason: "must be >= 6".to_owned(),
        }
        .into();
        assert!(matches!(err, DocgateError::Config(_)));
        assert!(err.to_string().contains("retrieval.snippet_max_size"));
    }

    #[test]
    fn access_error_display() {
        let err = AccessError::Resolution("connection reset".to_owned());
        assert_eq!(
            err.to_string(),
            "container resolution failed: connection reset"
        );
    }

    #[test]
    fn io_error_converts_to_top_level() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DocgateError = io.into();
        assert!(matches!(err, DocgateError::Io(_)));
    }
}
