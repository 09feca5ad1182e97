//! 검색기 설정
//!
//! [`RetrieverConfig`]는 core의 [`RetrievalConfig`](docgate_core::config::RetrievalConfig)를
//! 기반으로 검색기 실행에 필요한 값만 타입이 있는 형태로 담습니다.
//!
//! # 사용 예시
//! ```ignore
//! use docgate_core::config::DocgateConfig;
//! use docgate_retrieval::config::RetrieverConfig;
//!
//! let core_config = DocgateConfig::default();
//! let config = RetrieverConfig::from_core(&core_config.retrieval);
//! ```

use docgate_core::config::RetrievalConfig;
use docgate_core::types::{RenderMode, ResultLimit};

use crate::error::RetrievalError;
use crate::excerpt::{DEFAULT_EXCERPT_SIZE, MIN_EXCERPT_SIZE};

/// 검색기 설정
///
/// 렌더링 모드는 검증하지 않습니다. 알 수 없는 모드는 첫 렌더링에서 실패합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrieverConfig {
    /// 출력 렌더링 모드
    pub mode: RenderMode,
    /// 검색 결과 수 상한 (필터링 전 후보 기준)
    pub limit: ResultLimit,
    /// 발췌 최대 길이 (문자 수)
    pub snippet_max_size: usize,
    /// 실행 단위 조회 캐시 사용 여부
    pub cache_lookups: bool,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::default(),
            limit: ResultLimit::Unbounded,
            snippet_max_size: DEFAULT_EXCERPT_SIZE,
            cache_lookups: true,
        }
    }
}

impl RetrieverConfig {
    /// core의 `RetrievalConfig`에서 검색기 설정을 생성합니다.
    pub fn from_core(core: &RetrievalConfig) -> Self {
        Self {
            mode: core.render_mode(),
            limit: core.result_limit(),
            snippet_max_size: core.snippet_max_size,
            cache_lookups: core.cache_lookups,
        }
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// `DocgateConfig::validate`와 같은 규칙을 적용합니다.
    pub fn validate(&self) -> Result<(), RetrievalError> {
        if self.snippet_max_size < MIN_EXCERPT_SIZE {
            return Err(RetrievalError::Config {
                field: "snippet_max_size".to_owned(),
                reason: format!("must be >= {MIN_EXCERPT_SIZE}"),
            });
        }
        Ok(())
    }
}
