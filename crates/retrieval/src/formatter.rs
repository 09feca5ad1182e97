//! 출력 렌더링
//!
//! [`Formatter`]는 허용된 문서 하나를 렌더링 모드에 맞는 텍스트 항목으로 바꾸고,
//! [`Report`]는 항목들을 빈 줄 하나로 이어 붙입니다.
//!
//! | 모드 | 형식 |
//! |---|---|
//! | `snippets` | `Name: {name}\nSource: {uri}\nSummary: {content}` |
//! | `snippets-markdown` | `[{name}]({uri})<br/>\n{content}` |
//! | `documents` | `Name: {name}\nSource: {uri}\nSummary: {excerpt}` |
//! | `documents-markdown` | `[{name}]({uri})<br/>{excerpt}` |
//!
//! `snippets` 계열은 요약이 있으면 본문 대신 요약을 사용합니다.

use std::fmt;
use std::sync::Arc;

use docgate_core::types::{Document, RenderMode};

use crate::error::RetrievalError;
use crate::excerpt::Excerpter;

/// 허용된 문서가 하나도 없을 때의 출력
pub const NO_DOCUMENT_FOUND: &str = "No document found";

/// 항목 구분자
pub const ENTRY_SEPARATOR: &str = "\n\n";

/// 문서 렌더러
///
/// 생성은 항상 성공합니다. 알 수 없는 모드는 첫 [`render_entry`](Self::render_entry)
/// 호출에서 `RetrievalError::InvalidMode`가 됩니다.
#[derive(Clone)]
pub struct Formatter {
    mode: RenderMode,
    excerpter: Arc<dyn Excerpter>,
}

impl Formatter {
    /// 새 렌더러를 생성합니다.
    pub fn new(mode: RenderMode, excerpter: Arc<dyn Excerpter>) -> Self {
        Self { mode, excerpter }
    }

    /// 렌더링 모드
    pub fn mode(&self) -> &RenderMode {
        &self.mode
    }

    /// 출력에 사용할 본문을 고릅니다.
    pub fn select_content<'a>(&self, document: &'a Document) -> &'a str {
        if self.mode.prefers_summary() {
            if let Some(summary) = document.non_empty_summary() {
                return summary;
            }
        }
        &document.content
    }

    /// 문서 하나를 항목으로 렌더링합니다.
    ///
    /// # Errors
    /// 모드가 `RenderMode::Unrecognized`이면 `RetrievalError::InvalidMode`
    pub fn render_entry(&self, document: &Document) -> Result<String, RetrievalError> {
        let content = self.select_content(document);
        let entry = match &self.mode {
            RenderMode::Snippets => format!(
                "Name: {}\nSource: {}\nSummary: {content}",
                document.name, document.source_uri
            ),
            RenderMode::SnippetsMarkdown => format!(
                "[{}]({})<br/>\n{content}",
                document.name, document.source_uri
            ),
            RenderMode::Documents => format!(
                "Name: {}\nSource: {}\nSummary: {}",
                document.name,
                document.source_uri,
                self.excerpter.excerpt(content)
            ),
            RenderMode::DocumentsMarkdown => format!(
                "[{}]({})<br/>{}",
                document.name,
                document.source_uri,
                self.excerpter.excerpt(content)
            ),
            RenderMode::Unrecognized(raw) => {
                return Err(RetrievalError::InvalidMode(raw.clone()));
            }
        };
        Ok(entry)
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// 렌더링된 항목의 순서 있는 모음
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    entries: Vec<String>,
}

impl Report {
    /// 빈 리포트를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 항목을 끝에 추가합니다.
    pub fn push(&mut self, entry: String) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// 최종 출력 문자열을 만듭니다. 비어있으면 [`NO_DOCUMENT_FOUND`].
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return NO_DOCUMENT_FOUND.to_owned();
        }
        self.entries.join(ENTRY_SEPARATOR)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
