//! Policy decision point abstraction.
//!
//! The [`PolicyDecisionPoint`] is the external authority that decides whether a
//! subject may perform an action on a resource. The access filter always asks
//! with action [`READ_ACTION`](docgate_core::types::READ_ACTION) and the
//! container's display name as resource.
//!
//! # Missing Decisions
//!
//! A decision point may return no decision at all (no matching grant, empty
//! response body). That is a valid answer, not an error, and callers must treat
//! it exactly like an explicit deny.

use std::future::Future;

use docgate_core::types::{Decision, Subject};

use crate::error::RetrievalError;

/// Trait abstracting the policy decision service.
pub trait PolicyDecisionPoint: Send + Sync + 'static {
    /// Checks whether `subject` may perform `action` on `resource`.
    ///
    /// # Errors
    ///
    /// Returns `RetrievalError::Decision` if the service cannot be reached.
    /// An unanswered check is `Ok(None)`, never an error.
    fn check(
        &self,
        subject: &Subject,
        action: &str,
        resource: &str,
    ) -> impl Future<Output = Result<Option<Decision>, RetrievalError>> + Send;
}

/// 테스트용 Mock 정책 결정 지점
///
/// 리소스 이름별 판정을 고정값으로 반환하고, 받은 질의를 기록합니다.
/// 등록되지 않은 리소스는 판정 없음(`None`)을 반환합니다.
#[cfg(test)]
#[derive(Default)]
pub struct MockDecisionPoint {
    /// 리소스 이름 → 허용 여부
    pub decisions: std::collections::HashMap<String, bool>,
    /// true면 모든 질의가 실패
    pub fail: bool,
    /// 받은 질의 (subject, action, resource)
    pub queries: std::sync::Mutex<Vec<(String, String, String)>>,
}

#[cfg(test)]
impl MockDecisionPoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(mut self, resource: &str) -> Self {
        self.decisions.insert(resource.to_owned(), true);
        self
    }

    pub fn deny(mut self, resource: &str) -> Self {
        self.decisions.insert(resource.to_owned(), false);
        self
    }

    pub fn queries(&self) -> Vec<(String, String, String)> {
        self.queries.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl PolicyDecisionPoint for MockDecisionPoint {
    async fn check(
        &self,
        subject: &Subject,
        action: &str,
        resource: &str,
    ) -> Result<Option<Decision>, RetrievalError> {
        self.queries.lock().unwrap().push((
            subject.to_string(),
            action.to_owned(),
            resource.to_owned(),
        ));
        if self.fail {
            return Err(RetrievalError::Decision {
                resource: resource.to_owned(),
                reason: "mock decision point failure".to_owned(),
            });
        }
        Ok(self
            .decisions
            .get(resource)
            .map(|allowed| Decision { allowed: *allowed }))
    }
}
