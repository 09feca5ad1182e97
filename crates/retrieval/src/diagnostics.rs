//! 제외 진단 기록
//!
//! 인가 필터가 문서를 제외할 때마다 [`DiagnosticSink`]에 한 건의 [`Exclusion`]을
//! 남깁니다. 기본 구현 [`TracingSink`]는 `tracing` 이벤트로 내보내고,
//! [`RecordingSink`]는 메모리에 쌓아 호출자가 나중에 확인할 수 있게 합니다.
//!
//! 싱크는 여러 태스크에서 공유될 수 있으므로 `Send + Sync`이며,
//! 기록은 append-only입니다.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

use docgate_core::types::Container;

/// 문서가 제외된 이유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    /// 정책 결정 지점이 명시적으로 거부
    Denied,
    /// 정책 결정 지점이 판정을 반환하지 않음
    Undecided,
    /// 부모 컨테이너의 이름을 확인할 수 없음
    UnnamedContainer,
}

impl ExclusionReason {
    /// 로그/메트릭용 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Denied => "denied",
            Self::Undecided => "undecided",
            Self::UnnamedContainer => "unnamed_container",
        }
    }
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 제외된 문서 한 건에 대한 진단 기록
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    /// 요청 주체 ID
    pub subject_id: String,
    /// 부모 컨테이너 (이름은 확인된 경우에만)
    pub container: Container,
    /// 제외된 문서 ID
    pub document_id: String,
    /// 제외된 문서 이름
    pub document_name: String,
    /// 제외 사유
    pub reason: ExclusionReason,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User {} is not authorized to read from {}, and thus cannot access document {}.",
            self.subject_id, self.container, self.document_name,
        )
    }
}

/// 제외 진단을 받는 싱크
pub trait DiagnosticSink: Send + Sync {
    /// 제외 한 건을 기록합니다.
    fn record_exclusion(&self, exclusion: &Exclusion);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for Arc<T> {
    fn record_exclusion(&self, exclusion: &Exclusion) {
        (**self).record_exclusion(exclusion);
    }
}

/// `tracing` info 이벤트로 제외를 기록하는 기본 싱크
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record_exclusion(&self, exclusion: &Exclusion) {
        info!(
            subject = %exclusion.subject_id,
            container_id = %exclusion.container.id,
            container_name = exclusion.container.display_name(),
            document = %exclusion.document_name,
            reason = %exclusion.reason,
            "{exclusion}"
        );
    }
}

/// 제외 기록을 메모리에 보관하는 싱크
///
/// 실행 후 어떤 문서가 왜 빠졌는지 확인하거나 테스트에서 검증할 때 사용합니다.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<Exclusion>>,
}

impl RecordingSink {
    /// 빈 싱크를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지 기록된 제외 목록 (기록 순서)
    pub fn exclusions(&self) -> Vec<Exclusion> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 기록된 제외 수
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// 기록이 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for RecordingSink {
    fn record_exclusion(&self, exclusion: &Exclusion) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(exclusion.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_exclusion(name: Option<&str>) -> Exclusion {
        Exclusion {
            subject_id: "alice".to_owned(),
            container: Container::new("f1", name.map(str::to_owned)),
            document_id: "1".to_owned(),
            document_name: "Budget".to_owned(),
            reason: ExclusionReason::Denied,
        }
    }

    #[test]
    fn exclusion_display_names_subject_container_and_document() {
        let msg = sample_exclusion(Some("Finance")).to_string();
        assert_eq!(
            msg,
            "User alice is not authorized to read from Finance (f1), and thus cannot access document Budget."
        );
    }

    #[test]
    fn exclusion_display_unnamed_container() {
        let msg = sample_exclusion(None).to_string();
        assert!(msg.contains("(unnamed) (f1)"));
    }

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        assert!(sink.is_empty());

        let mut second = sample_exclusion(Some("HR"));
        second.document_name = "Salaries".to_owned();
        sink.record_exclusion(&sample_exclusion(Some("Finance")));
        sink.record_exclusion(&second);

        let recorded = sink.exclusions();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].document_name, "Budget");
        assert_eq!(recorded[1].document_name, "Salaries");
    }

    #[test]
    fn arc_sink_forwards() {
        let sink = Arc::new(RecordingSink::new());
        let shared: Arc<dyn DiagnosticSink> = Arc::clone(&sink) as Arc<dyn DiagnosticSink>;
        shared.record_exclusion(&sample_exclusion(Some("Finance")));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn tracing_sink_does_not_panic_without_subscriber() {
        TracingSink.record_exclusion(&sample_exclusion(Some("Finance")));
    }

    #[test]
    fn reason_strings() {
        assert_eq!(ExclusionReason::Denied.as_str(), "denied");
        assert_eq!(ExclusionReason::Undecided.as_str(), "undecided");
        assert_eq!(
            ExclusionReason::UnnamedContainer.as_str(),
            "unnamed_container"
        );
    }
}
