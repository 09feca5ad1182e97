//! Container resolution abstraction.
//!
//! A [`ContainerResolver`] answers two questions about the content backend's
//! hierarchy: which container holds a document, and what that container is
//! called. The access filter needs both, because policy resources are keyed by
//! the container's display *name*, not by its ID.
//!
//! # Name-Keyed Resources
//!
//! Two containers that share a name are indistinguishable to the policy
//! decision point. This is a known limitation of the resource model and is kept
//! as-is; a grant on "Finance" covers every container named "Finance".

use std::future::Future;

use crate::error::RetrievalError;

/// Trait abstracting container lookups on the content backend.
///
/// Both lookups may legitimately return `None`. Transport failures are errors
/// and abort the run; the filter never masks them.
pub trait ContainerResolver: Send + Sync + 'static {
    /// Returns the immediate parent container ID of a document.
    ///
    /// Documents with several parents report the first one. `None` means the
    /// document is not inside any container.
    ///
    /// # Errors
    ///
    /// Returns `RetrievalError::Resolution` if the backend call fails.
    fn get_parent(
        &self,
        document_id: &str,
    ) -> impl Future<Output = Result<Option<String>, RetrievalError>> + Send;

    /// Returns the display name of a container.
    ///
    /// # Errors
    ///
    /// Returns `RetrievalError::Resolution` if the backend call fails.
    fn get_name(
        &self,
        container_id: &str,
    ) -> impl Future<Output = Result<Option<String>, RetrievalError>> + Send;
}

/// 테스트용 Mock 컨테이너 리졸버
///
/// 문서 → 부모, 컨테이너 → 이름 매핑을 고정값으로 반환하고 호출 횟수를 기록합니다.
#[cfg(test)]
#[derive(Default)]
pub struct MockResolver {
    /// 문서 ID → 부모 컨테이너 ID
    pub parents: std::collections::HashMap<String, String>,
    /// 컨테이너 ID → 이름
    pub names: std::collections::HashMap<String, String>,
    /// true면 모든 조회가 실패
    pub fail: bool,
    /// get_name 호출 횟수
    pub name_calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 문서를 컨테이너에 배치합니다.
    pub fn with_parent(mut self, document_id: &str, container_id: &str) -> Self {
        self.parents
            .insert(document_id.to_owned(), container_id.to_owned());
        self
    }

    /// 컨테이너 이름을 지정합니다.
    pub fn with_name(mut self, container_id: &str, name: &str) -> Self {
        self.names.insert(container_id.to_owned(), name.to_owned());
        self
    }

    pub fn name_calls(&self) -> usize {
        self.name_calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl ContainerResolver for MockResolver {
    async fn get_parent(&self, document_id: &str) -> Result<Option<String>, RetrievalError> {
        if self.fail {
            return Err(RetrievalError::Resolution {
                id: document_id.to_owned(),
                reason: "mock resolver failure".to_owned(),
            });
        }
        Ok(self.parents.get(document_id).cloned())
    }

    async fn get_name(&self, container_id: &str) -> Result<Option<String>, RetrievalError> {
        self.name_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(self.names.get(container_id).cloned())
    }
}
