//! 검색 파이프라인 에러 타입
//!
//! [`RetrievalError`]는 검색 파이프라인 내부에서 발생하는 모든 에러를 표현합니다.
//! `From<RetrievalError> for DocgateError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.
//!
//! 인가 거부는 여기에 없습니다. 거부된 문서는 에러 없이 제외됩니다.

use docgate_core::error::{AccessError, ConfigError, DocgateError};

/// 검색 파이프라인 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    /// 문서 소스 호출 실패
    #[error("document source error: {0}")]
    Source(String),

    /// 컨테이너 조회 실패 (부모 ID 또는 이름)
    #[error("container resolution failed for '{id}': {reason}")]
    Resolution {
        /// 조회 대상 문서 또는 컨테이너 ID
        id: String,
        /// 실패 사유
        reason: String,
    },

    /// 정책 결정 지점 호출 실패
    #[error("policy decision failed for resource '{resource}': {reason}")]
    Decision {
        /// 정책 리소스 (컨테이너 이름)
        resource: String,
        /// 실패 사유
        reason: String,
    },

    /// 알 수 없는 렌더링 모드 (첫 렌더링 시점에 발생)
    #[error("invalid mode `{0}`")]
    InvalidMode(String),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 카탈로그 파일 로딩 실패
    #[error("catalog load error: {path}: {reason}")]
    CatalogLoad {
        /// 카탈로그 파일 경로
        path: String,
        /// 로딩 실패 사유
        reason: String,
    },

    /// 카탈로그 내용 검증 실패
    #[error("catalog validation error: {0}")]
    CatalogValidation(String),
}

impl From<RetrievalError> for DocgateError {
    fn from(err: RetrievalError) -> Self {
        match &err {
            RetrievalError::Source(msg) => DocgateError::Access(AccessError::Source(msg.clone())),
            RetrievalError::Resolution { .. } => {
                DocgateError::Access(AccessError::Resolution(err.to_string()))
            }
            RetrievalError::Decision { .. } => {
                DocgateError::Access(AccessError::Decision(err.to_string()))
            }
            RetrievalError::InvalidMode(_) => DocgateError::Config(ConfigError::InvalidValue {
                field: "retrieval.mode".to_owned(),
                reason: err.to_string(),
            }),
            RetrievalError::Config { field, reason } => {
                DocgateError::Config(ConfigError::InvalidValue {
                    field: field.clone(),
                    reason: reason.clone(),
                })
            }
            // 카탈로그는 실행 입력이므로 설정 에러로 분류
            RetrievalError::CatalogLoad { path, reason } => {
                DocgateError::Config(ConfigError::Catalog {
                    path: path.clone(),
                    reason: reason.clone(),
                })
            }
            RetrievalError::CatalogValidation(reason) => {
                DocgateError::Config(ConfigError::Catalog {
                    path: "<catalog>".to_owned(),
                    reason: reason.clone(),
                })
            }
        }
    }
}
