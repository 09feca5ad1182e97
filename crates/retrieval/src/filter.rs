//! 인가 필터 -- 문서별 컨테이너 조회와 정책 확인
//!
//! [`AccessFilter`]는 문서 커서를 감싸 허용된 문서만 순서대로 내보냅니다.
//! 거부된 문서는 에러나 표식 없이 건너뛰고, 진단 싱크에 한 건을 기록합니다.
//!
//! # 문서별 판정 순서
//! ```text
//! Document ──> get_parent(doc.id)
//!                 │ None ─────────────────────────────> 통과 (게이트 없음)
//!                 ▼ Some(container_id)
//!              get_name(container_id)
//!                 │ None ─────────────────────────────> 제외 (이름 없음)
//!                 ▼ Some(name)
//!              check(subject, "read", name)
//!                 │ None / allowed=false ─────────────> 제외 + 진단 기록
//!                 ▼ allowed=true
//!               통과
//! ```
//!
//! 판정 없음과 명시적 거부는 똑같이 제외됩니다. 리졸버와 정책 결정 지점의
//! 호출 실패는 그대로 전파되어 실행을 중단합니다.

use std::sync::Arc;

use metrics::counter;
use tracing::debug;

use docgate_core::metrics as m;
use docgate_core::types::{Container, Decision, Document, READ_ACTION, Subject};

use crate::cache::LookupCache;
use crate::decision::PolicyDecisionPoint;
use crate::diagnostics::{DiagnosticSink, Exclusion, ExclusionReason};
use crate::error::RetrievalError;
use crate::resolver::ContainerResolver;
use crate::source::DocumentCursor;

/// 필터 처리 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// 커서에서 받은 문서 수
    pub retrieved: u64,
    /// 통과한 문서 수
    pub permitted: u64,
    /// 제외된 문서 수
    pub excluded: u64,
}

/// 인가 필터
///
/// 실행 한 번에 하나씩 생성합니다. 캐시를 켜면 같은 실행 안에서
/// 컨테이너 이름과 판정을 재사용합니다.
pub struct AccessFilter<R: ContainerResolver, P: PolicyDecisionPoint> {
    /// 컨테이너 리졸버 (공유)
    resolver: Arc<R>,
    /// 정책 결정 지점 (공유)
    decision_point: Arc<P>,
    /// 요청 주체 (실행 동안 불변)
    subject: Subject,
    /// 제외 진단 싱크
    sink: Arc<dyn DiagnosticSink>,
    /// 실행 단위 캐시 (비활성화 시 None)
    cache: Option<LookupCache>,
    stats: FilterStats,
}

impl<R: ContainerResolver, P: PolicyDecisionPoint> AccessFilter<R, P> {
    /// 캐시 없이 필터를 생성합니다.
    pub fn new(
        resolver: Arc<R>,
        decision_point: Arc<P>,
        subject: Subject,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            resolver,
            decision_point,
            subject,
            sink,
            cache: None,
            stats: FilterStats::default(),
        }
    }

    /// 실행 단위 조회 캐시를 켭니다.
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(LookupCache::new());
        self
    }

    /// 지금까지의 처리 통계
    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    /// 커서를 감싸 허용된 문서만 내보내는 스트림을 만듭니다.
    pub fn permitted<C: DocumentCursor>(&mut self, cursor: C) -> PermittedDocuments<'_, C, R, P> {
        PermittedDocuments {
            cursor,
            filter: self,
        }
    }

    /// 문서 하나를 판정합니다.
    ///
    /// 허용되면 `true`, 제외되면 `false`를 반환합니다. 제외 시 진단을 기록합니다.
    ///
    /// # Errors
    /// - `RetrievalError::Resolution`: 리졸버 호출 실패
    /// - `RetrievalError::Decision`: 정책 결정 지점 호출 실패
    pub async fn admit(&mut self, document: &Document) -> Result<bool, RetrievalError> {
        self.stats.retrieved += 1;
        counter!(m::DOCUMENTS_RETRIEVED_TOTAL).increment(1);

        let Some(container_id) = self.resolver.get_parent(&document.id).await? else {
            debug!(document = %document.name, "document has no parent container, passing through");
            self.mark_permitted();
            return Ok(true);
        };

        let name = self.container_name(&container_id).await?;
        let container = Container::new(container_id, name);
        let Some(resource) = container.name.clone() else {
            self.exclude(document, container, ExclusionReason::UnnamedContainer);
            return Ok(false);
        };

        match self.decide(&resource).await? {
            Some(Decision { allowed: true }) => {
                debug!(
                    document = %document.name,
                    container = %container,
                    "access granted"
                );
                self.mark_permitted();
                Ok(true)
            }
            Some(Decision { allowed: false }) => {
                self.exclude(document, container, ExclusionReason::Denied);
                Ok(false)
            }
            None => {
                self.exclude(document, container, ExclusionReason::Undecided);
                Ok(false)
            }
        }
    }

    async fn container_name(&mut self, container_id: &str) -> Result<Option<String>, RetrievalError> {
        if let Some(cached) = self.cache.as_ref().and_then(|c| c.name(container_id)) {
            return Ok(cached);
        }

        let name = self.resolver.get_name(container_id).await?;
        if let Some(cache) = self.cache.as_mut() {
            cache.store_name(container_id, name.clone());
        }
        Ok(name)
    }

    async fn decide(&mut self, resource: &str) -> Result<Option<Decision>, RetrievalError> {
        if let Some(cached) = self.cache.as_ref().and_then(|c| c.decision(resource)) {
            return Ok(cached);
        }

        let decision = self
            .decision_point
            .check(&self.subject, READ_ACTION, resource)
            .await?;

        let result = match decision {
            Some(Decision { allowed: true }) => m::RESULT_ALLOWED,
            Some(Decision { allowed: false }) => m::RESULT_DENIED,
            None => m::RESULT_UNDECIDED,
        };
        counter!(m::POLICY_CHECKS_TOTAL, m::LABEL_RESULT => result).increment(1);

        if let Some(cache) = self.cache.as_mut() {
            cache.store_decision(resource, decision);
        }
        Ok(decision)
    }

    fn mark_permitted(&mut self) {
        self.stats.permitted += 1;
        counter!(m::DOCUMENTS_PERMITTED_TOTAL).increment(1);
    }

    fn exclude(
        &mut self,
        document: &Document,
        container: Container,
        reason: ExclusionReason,
    ) {
        self.stats.excluded += 1;
        counter!(m::DOCUMENTS_EXCLUDED_TOTAL).increment(1);

        self.sink.record_exclusion(&Exclusion {
            subject_id: self.subject.id.clone(),
            container,
            document_id: document.id.clone(),
            document_name: document.name.clone(),
            reason,
        });
    }
}

/// 허용된 문서만 내보내는 지연 스트림
///
/// 원본 커서의 순서를 그대로 유지합니다. 다음 허용 문서를 찾을 때까지만
/// 커서를 당기며, 문서 목록을 미리 모으지 않습니다.
pub struct PermittedDocuments<'a, C, R, P>
where
    C: DocumentCursor,
    R: ContainerResolver,
    P: PolicyDecisionPoint,
{
    cursor: C,
    filter: &'a mut AccessFilter<R, P>,
}

impl<C, R, P> PermittedDocuments<'_, C, R, P>
where
    C: DocumentCursor,
    R: ContainerResolver,
    P: PolicyDecisionPoint,
{
    /// 다음 허용 문서를 반환합니다. 커서가 끝나면 `None`.
    pub async fn next(&mut self) -> Result<Option<Document>, RetrievalError> {
        while let Some(document) = self.cursor.next_document().await? {
            if self.filter.admit(&document).await? {
                return Ok(Some(document));
            }
        }
        Ok(None)
    }

    /// 필터 통계
    pub fn stats(&self) -> FilterStats {
        self.filter.stats()
    }
}
