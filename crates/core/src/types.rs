//! 도메인 타입 - 검색 파이프라인 전역에서 사용되는 공통 타입
//!
//! 문서 소스, 컨테이너 리졸버, 정책 결정 지점, 포매터가 모두 이 타입들로
//! 데이터를 주고받습니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 검색된 문서
///
/// 문서 소스가 생성하며, 생성 이후 변경되지 않습니다. 식별자는 `id`입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// 문서 ID
    pub id: String,
    /// 문서 이름
    pub name: String,
    /// 원본 위치 (URI)
    pub source_uri: String,
    /// 본문 텍스트
    pub content: String,
    /// 요약 (있을 경우)
    #[serde(default)]
    pub summary: Option<String>,
}

impl Document {
    /// 요약이 존재하고 비어있지 않으면 반환합니다.
    pub fn non_empty_summary(&self) -> Option<&str> {
        self.summary.as_deref().filter(|s| !s.is_empty())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// 문서를 담고 있는 상위 컨테이너 (폴더)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// 컨테이너 ID
    pub id: String,
    /// 표시 이름 (정책 리소스 키로 사용)
    pub name: Option<String>,
}

impl Container {
    /// 이름을 확인할 수 없을 때 표시하는 값
    pub const UNNAMED: &'static str = "(unnamed)";

    /// 새 컨테이너를 생성합니다.
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: id.into(),
            name,
        }
    }

    /// 표시 이름, 없으면 `(unnamed)`
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(Self::UNNAMED)
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.id)
    }
}

/// 접근을 요청하는 주체
///
/// 실행마다 한 번 설정에서 만들어지고 이후 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    /// 주체 유형 (예: "user")
    #[serde(rename = "type")]
    pub kind: String,
    /// 주체 ID
    pub id: String,
}

impl Subject {
    /// 새 주체를 생성합니다.
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// `user` 유형의 주체를 생성합니다.
    pub fn user(id: impl Into<String>) -> Self {
        Self::new("user", id)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// 정책 결정 지점의 판정 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// 허용 여부
    pub allowed: bool,
}

impl Decision {
    /// 허용 판정
    pub const fn allow() -> Self {
        Self { allowed: true }
    }

    /// 거부 판정
    pub const fn deny() -> Self {
        Self { allowed: false }
    }
}

/// 컨테이너 읽기 권한 확인에 사용하는 액션
pub const READ_ACTION: &str = "read";

/// 출력 렌더링 모드
///
/// 설정 문자열은 [`RenderMode::parse`]로 변환되며 실패하지 않습니다.
/// 알 수 없는 문자열은 `Unrecognized`로 보존되고, 첫 렌더링 시점에
/// 설정 에러가 됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RenderMode {
    /// `Name/Source/Summary` 평문, 요약 우선
    Snippets,
    /// 마크다운 링크 + 줄바꿈 + 본문, 요약 우선
    SnippetsMarkdown,
    /// `Name/Source/Summary` 평문, 본문 발췌
    Documents,
    /// 마크다운 링크 + 본문 발췌
    #[default]
    DocumentsMarkdown,
    /// 알 수 없는 모드 (원본 문자열 보존)
    Unrecognized(String),
}

impl RenderMode {
    /// 설정 문자열을 렌더링 모드로 변환합니다.
    pub fn parse(value: &str) -> Self {
        match value {
            "snippets" => Self::Snippets,
            "snippets-markdown" => Self::SnippetsMarkdown,
            "documents" => Self::Documents,
            "documents-markdown" => Self::DocumentsMarkdown,
            other => Self::Unrecognized(other.to_owned()),
        }
    }

    /// 설정 문자열 표현을 반환합니다.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Snippets => "snippets",
            Self::SnippetsMarkdown => "snippets-markdown",
            Self::Documents => "documents",
            Self::DocumentsMarkdown => "documents-markdown",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// 본문 대신 요약을 우선 사용하는 모드인지 확인합니다.
    pub fn prefers_summary(&self) -> bool {
        matches!(self, Self::Snippets | Self::SnippetsMarkdown)
    }

    /// 알려진 모드 이름 목록
    pub const KNOWN: [&'static str; 4] = [
        "snippets",
        "snippets-markdown",
        "documents",
        "documents-markdown",
    ];
}

impl From<String> for RenderMode {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<RenderMode> for String {
    fn from(mode: RenderMode) -> Self {
        mode.as_str().to_owned()
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 검색 결과 수 상한
///
/// 0 이하의 개수는 관례적으로 무제한을 의미합니다.
/// 상한은 문서 소스가 적용합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultLimit {
    /// 무제한
    #[default]
    Unbounded,
    /// 최대 N개
    AtMost(usize),
}

impl ResultLimit {
    /// 부호 있는 개수에서 상한을 생성합니다 (`<= 0`은 무제한).
    pub fn from_count(count: i64) -> Self {
        match usize::try_from(count) {
            Ok(0) | Err(_) => Self::Unbounded,
            Ok(n) => Self::AtMost(n),
        }
    }

    /// 이미 `yielded`개를 내보낸 후 하나 더 내보낼 수 있는지 확인합니다.
    pub fn allows(&self, yielded: usize) -> bool {
        match self {
            Self::Unbounded => true,
            Self::AtMost(max) => yielded < *max,
        }
    }
}

impl fmt::Display for ResultLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => f.write_str("unbounded"),
            Self::AtMost(n) => write!(f, "{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document(summary: Option<&str>) -> Document {
        Document {
            id: "doc-1".to_owned(),
            name: "Budget".to_owned(),
            source_uri: "https://example.com/doc-1".to_owned(),
            content: "full content".to_owned(),
            summary: summary.map(str::to_owned),
        }
    }

    #[test]
    fn non_empty_summary_filters_empty_string() {
        assert_eq!(sample_document(Some("sum")).non_empty_summary(), Some("sum"));
        assert_eq!(sample_document(Some("")).non_empty_summary(), None);
        assert_eq!(sample_document(None).non_empty_summary(), None);
    }

    #[test]
    fn container_display_falls_back_to_unnamed() {
        let named = Container::new("f1", Some("Finance".to_owned()));
        assert_eq!(named.to_string(), "Finance (f1)");

        let unnamed = Container::new("f4", None);
        assert_eq!(unnamed.display_name(), "(unnamed)");
        assert_eq!(unnamed.to_string(), "(unnamed) (f4)");
    }

    #[test]
    fn subject_display() {
        assert_eq!(Subject::user("alice").to_string(), "user:alice");
        assert_eq!(Subject::new("group", "ops").to_string(), "group:ops");
    }

    #[test]
    fn render_mode_parse_known_modes() {
        assert_eq!(RenderMode::parse("snippets"), RenderMode::Snippets);
        assert_eq!(
            RenderMode::parse("snippets-markdown"),
            RenderMode::SnippetsMarkdown
        );
        assert_eq!(RenderMode::parse("documents"), RenderMode::Documents);
        assert_eq!(
            RenderMode::parse("documents-markdown"),
            RenderMode::DocumentsMarkdown
        );
    }

    #[test]
    fn render_mode_parse_keeps_unknown_value() {
        let mode = RenderMode::parse("bogus");
        assert_eq!(mode, RenderMode::Unrecognized("bogus".to_owned()));
        assert_eq!(mode.as_str(), "bogus");
    }

    #[test]
    fn render_mode_as_str_matches_known_list() {
        for name in RenderMode::KNOWN {
            assert_eq!(RenderMode::parse(name).as_str(), name);
        }
    }

    #[test]
    fn render_mode_prefers_summary_only_for_snippets() {
        assert!(RenderMode::Snippets.prefers_summary());
        assert!(RenderMode::SnippetsMarkdown.prefers_summary());
        assert!(!RenderMode::Documents.prefers_summary());
        assert!(!RenderMode::DocumentsMarkdown.prefers_summary());
        assert!(!RenderMode::Unrecognized("x".to_owned()).prefers_summary());
    }

    #[test]
    fn result_limit_non_positive_is_unbounded() {
        assert_eq!(ResultLimit::from_count(-1), ResultLimit::Unbounded);
        assert_eq!(ResultLimit::from_count(0), ResultLimit::Unbounded);
        assert_eq!(ResultLimit::from_count(3), ResultLimit::AtMost(3));
    }

    #[test]
    fn result_limit_allows() {
        let limit = ResultLimit::AtMost(2);
        assert!(limit.allows(0));
        assert!(limit.allows(1));
        assert!(!limit.allows(2));
        assert!(ResultLimit::Unbounded.allows(usize::MAX - 1));
    }

    #[test]
    fn subject_serializes_kind_as_type() {
        let encoded = toml::to_string(&Subject::user("alice")).unwrap();
        assert!(encoded.contains("type = \"user\""));
    }
}
