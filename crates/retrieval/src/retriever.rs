//! 검색기 -- 문서 소스, 인가 필터, 렌더러를 하나의 실행으로 묶습니다.
//!
//! ```text
//! query ──> DocumentSource::search ──> AccessFilter ──> Formatter ──> Report
//!                                          │
//!                                          └──> DiagnosticSink (제외 기록)
//! ```
//!
//! 한 번의 [`Retriever::run`]은 순차적으로 진행됩니다. 문서 하나를 조회, 판정,
//! 렌더링까지 끝낸 뒤에 다음 문서를 소스에서 꺼냅니다.

use std::sync::Arc;

use metrics::counter;
use serde::Serialize;
use tracing::{debug, info};

use docgate_core::metrics as m;
use docgate_core::types::Subject;

use crate::config::RetrieverConfig;
use crate::decision::PolicyDecisionPoint;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::RetrievalError;
use crate::excerpt::{Excerpter, TruncatingExcerpter};
use crate::filter::{AccessFilter, FilterStats};
use crate::formatter::{Formatter, Report};
use crate::resolver::ContainerResolver;
use crate::source::DocumentSource;

/// 실행 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// 소스에서 꺼낸 문서 수
    pub retrieved: u64,
    /// 리포트에 포함된 문서 수
    pub permitted: u64,
    /// 인가로 제외된 문서 수
    pub excluded: u64,
}

impl From<FilterStats> for RunStats {
    fn from(stats: FilterStats) -> Self {
        Self {
            retrieved: stats.retrieved,
            permitted: stats.permitted,
            excluded: stats.excluded,
        }
    }
}

/// 실행 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// 최종 리포트
    pub report: Report,
    /// 실행 통계
    pub stats: RunStats,
}

/// 인가 필터링 문서 검색기
///
/// # 사용 예시
/// ```ignore
/// use docgate_retrieval::{RetrieverBuilder, RetrieverConfig};
/// use docgate_core::types::Subject;
///
/// let retriever = RetrieverBuilder::new()
///     .config(RetrieverConfig::default())
///     .source(Arc::clone(&source))
///     .resolver(Arc::clone(&catalog))
///     .decision_point(Arc::clone(&catalog))
///     .subject(Subject::user("alice"))
///     .build()?;
///
/// let report = retriever.run("budget").await?;
/// ```
pub struct Retriever<S: DocumentSource, R: ContainerResolver, P: PolicyDecisionPoint> {
    config: RetrieverConfig,
    source: Arc<S>,
    resolver: Arc<R>,
    decision_point: Arc<P>,
    subject: Subject,
    formatter: Formatter,
    sink: Arc<dyn DiagnosticSink>,
}

impl<S: DocumentSource, R: ContainerResolver, P: PolicyDecisionPoint> Retriever<S, R, P> {
    /// 요청 주체
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// 질의를 실행하고 리포트 문자열을 반환합니다.
    ///
    /// 허용된 문서가 없으면 `"No document found"`를 반환하며, 결과는 비어있지 않습니다.
    ///
    /// # Errors
    /// 소스, 리졸버, 정책 결정 지점의 실패와 알 수 없는 렌더링 모드
    pub async fn run(&self, query: &str) -> Result<String, RetrievalError> {
        Ok(self.run_with_stats(query).await?.report.render())
    }

    /// 질의를 실행하고 리포트와 통계를 함께 반환합니다.
    pub async fn run_with_stats(&self, query: &str) -> Result<RunOutcome, RetrievalError> {
        debug!(query, subject = %self.subject, limit = %self.config.limit, "starting run");

        let cursor = self.source.search(query, self.config.limit).await?;

        let mut filter = AccessFilter::new(
            Arc::clone(&self.resolver),
            Arc::clone(&self.decision_point),
            self.subject.clone(),
            Arc::clone(&self.sink),
        );
        if self.config.cache_lookups {
            filter = filter.with_cache();
        }

        let mut report = Report::new();
        let stats = {
            let mut permitted = filter.permitted(cursor);
            while let Some(document) = permitted.next().await? {
                report.push(self.formatter.render_entry(&document)?);
            }
            RunStats::from(permitted.stats())
        };

        counter!(
            m::REPORTS_RENDERED_TOTAL,
            m::LABEL_MODE => self.formatter.mode().as_str().to_owned()
        )
        .increment(1);

        info!(
            subject = %self.subject,
            mode = %self.formatter.mode(),
            retrieved = stats.retrieved,
            permitted = stats.permitted,
            excluded = stats.excluded,
            "run completed"
        );

        Ok(RunOutcome { report, stats })
    }
}

/// 검색기 빌더
pub struct RetrieverBuilder<S: DocumentSource, R: ContainerResolver, P: PolicyDecisionPoint> {
    config: RetrieverConfig,
    source: Option<Arc<S>>,
    resolver: Option<Arc<R>>,
    decision_point: Option<Arc<P>>,
    subject: Option<Subject>,
    sink: Option<Arc<dyn DiagnosticSink>>,
    excerpter: Option<Arc<dyn Excerpter>>,
}

impl<S: DocumentSource, R: ContainerResolver, P: PolicyDecisionPoint> RetrieverBuilder<S, R, P> {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: RetrieverConfig::default(),
            source: None,
            resolver: None,
            decision_point: None,
            subject: None,
            sink: None,
            excerpter: None,
        }
    }

    /// 검색기 설정을 지정합니다.
    pub fn config(mut self, config: RetrieverConfig) -> Self {
        self.config = config;
        self
    }

    /// 문서 소스를 설정합니다.
    pub fn source(mut self, source: Arc<S>) -> Self {
        self.source = Some(source);
        self
    }

    /// 컨테이너 리졸버를 설정합니다.
    pub fn resolver(mut self, resolver: Arc<R>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// 정책 결정 지점을 설정합니다.
    pub fn decision_point(mut self, decision_point: Arc<P>) -> Self {
        self.decision_point = Some(decision_point);
        self
    }

    /// 요청 주체를 설정합니다.
    pub fn subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    /// 제외 진단 싱크를 설정합니다. 기본값은 [`TracingSink`].
    pub fn sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// 발췌기를 교체합니다. 기본값은 설정의 길이를 쓰는 [`TruncatingExcerpter`].
    pub fn excerpter(mut self, excerpter: Arc<dyn Excerpter>) -> Self {
        self.excerpter = Some(excerpter);
        self
    }

    /// 검색기를 빌드합니다.
    ///
    /// # Errors
    /// 필수 구성 요소가 없거나 설정이 유효하지 않으면 `RetrievalError::Config`
    pub fn build(self) -> Result<Retriever<S, R, P>, RetrievalError> {
        self.config.validate()?;

        let source = self.source.ok_or_else(|| missing("source"))?;
        let resolver = self.resolver.ok_or_else(|| missing("resolver"))?;
        let decision_point = self.decision_point.ok_or_else(|| missing("decision_point"))?;
        let subject = self.subject.ok_or_else(|| missing("subject"))?;

        if subject.id.trim().is_empty() {
            return Err(RetrievalError::Config {
                field: "subject_id".to_owned(),
                reason: "subject id must not be empty".to_owned(),
            });
        }
        if subject.kind.trim().is_empty() {
            return Err(RetrievalError::Config {
                field: "subject_type".to_owned(),
                reason: "subject type must not be empty".to_owned(),
            });
        }

        let excerpter = match self.excerpter {
            Some(excerpter) => excerpter,
            None => Arc::new(TruncatingExcerpter::new(self.config.snippet_max_size)?),
        };
        let formatter = Formatter::new(self.config.mode.clone(), excerpter);
        let sink = self.sink.unwrap_or_else(|| Arc::new(TracingSink));

        Ok(Retriever {
            config: self.config,
            source,
            resolver,
            decision_point,
            subject,
            formatter,
            sink,
        })
    }
}

impl<S: DocumentSource, R: ContainerResolver, P: PolicyDecisionPoint> Default
    for RetrieverBuilder<S, R, P>
{
    fn default() -> Self {
        Self::new()
    }
}

fn missing(field: &str) -> RetrievalError {
    RetrievalError::Config {
        field: field.to_owned(),
        reason: format!("{field} must be provided"),
    }
}
