//! docgate 공통 크레이트
//!
//! 인가 필터링 문서 검색 파이프라인의 모든 크레이트가 공유하는
//! 도메인 타입, 에러, 설정, 메트릭 이름을 정의합니다.

pub mod config;
pub mod error;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{AccessError, ConfigError, DocgateError};

// 설정
pub use config::DocgateConfig;

// 도메인 타입
pub use types::{Container, Decision, Document, READ_ACTION, RenderMode, ResultLimit, Subject};
