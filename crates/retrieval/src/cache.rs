//! 실행 단위 조회 캐시
//!
//! 한 번의 검색 실행 동안 컨테이너 식별자와 이름은 바뀌지 않으므로,
//! [`LookupCache`]는 컨테이너 ID → 이름, 리소스 이름 → 판정을 기억합니다.
//! 캐시는 실행마다 새로 만들어지고 실행이 끝나면 버려집니다.
//!
//! 에러는 캐시하지 않습니다. `None` 결과(이름 없음, 판정 없음)는 정상 응답이므로
//! 캐시합니다.

use std::collections::HashMap;

use tracing::warn;

use docgate_core::types::Decision;

/// Maximum number of entries per map to prevent unbounded memory growth
const MAX_CACHED_ENTRIES: usize = 10_000;

/// 컨테이너 이름과 정책 판정 캐시
#[derive(Debug, Default)]
pub struct LookupCache {
    /// 컨테이너 ID → 이름
    names: HashMap<String, Option<String>>,
    /// 리소스 이름 → 판정
    decisions: HashMap<String, Option<Decision>>,
}

impl LookupCache {
    /// 빈 캐시를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 캐시된 컨테이너 이름을 조회합니다.
    ///
    /// 바깥 `Option`은 캐시 적중 여부, 안쪽 `Option`은 조회 결과입니다.
    pub fn name(&self, container_id: &str) -> Option<Option<String>> {
        self.names.get(container_id).cloned()
    }

    /// 컨테이너 이름 조회 결과를 저장합니다.
    pub fn store_name(&mut self, container_id: &str, name: Option<String>) {
        if self.names.len() >= MAX_CACHED_ENTRIES {
            warn!(
                cache_size = self.names.len(),
                "container name cache full, not caching"
            );
            return;
        }
        self.names.insert(container_id.to_owned(), name);
    }

    /// 캐시된 판정을 조회합니다.
    pub fn decision(&self, resource: &str) -> Option<Option<Decision>> {
        self.decisions.get(resource).copied()
    }

    /// 판정 결과를 저장합니다.
    pub fn store_decision(&mut self, resource: &str, decision: Option<Decision>) {
        if self.decisions.len() >= MAX_CACHED_ENTRIES {
            warn!(
                cache_size = self.decisions.len(),
                "decision cache full, not caching"
            );
            return;
        }
        self.decisions.insert(resource.to_owned(), decision);
    }
}
