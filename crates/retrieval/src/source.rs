//! Document source abstraction.
//!
//! The [`DocumentSource`] trait hides the content backend (a drive API, a search
//! index, the local [`Catalog`](crate::catalog::Catalog)) behind a pull cursor,
//! so the access filter never sees vendor types.
//!
//! # Laziness
//!
//! A search returns a [`DocumentCursor`], not a list. Documents are requested
//! one at a time, and the pipeline fully processes each document before asking
//! for the next. Cursors are single-pass and cannot be restarted; a cursor may
//! be unbounded unless the caller passes a [`ResultLimit`].
//!
//! ```text
//! query ──> DocumentSource::search() ──> DocumentCursor
//!                                           │ next_document()
//!                                           ▼
//!                                      AccessFilter
//! ```

use std::future::Future;

use docgate_core::types::{Document, ResultLimit};

use crate::error::RetrievalError;

/// Single-pass pull cursor over search results.
///
/// `Ok(None)` marks the end of the sequence. Once it has been returned the
/// cursor stays exhausted.
pub trait DocumentCursor: Send {
    /// Pulls the next document.
    ///
    /// # Errors
    ///
    /// Returns `RetrievalError::Source` if the backend fails mid-stream.
    fn next_document(
        &mut self,
    ) -> impl Future<Output = Result<Option<Document>, RetrievalError>> + Send;
}

/// Trait abstracting the content backend.
///
/// The trait is `Send + Sync + 'static`, so one instance can be shared through
/// an `Arc` by every run.
///
/// # Result Limit
///
/// The limit is enforced by the source, not by the filter. A cursor created with
/// `ResultLimit::AtMost(n)` yields at most `n` candidates, counted before access
/// filtering.
pub trait DocumentSource: Send + Sync + 'static {
    /// Cursor type returned by [`search`](Self::search).
    type Cursor: DocumentCursor;

    /// Starts a search for `query`.
    ///
    /// # Errors
    ///
    /// Returns `RetrievalError::Source` if the search cannot be started.
    fn search(
        &self,
        query: &str,
        limit: ResultLimit,
    ) -> impl Future<Output = Result<Self::Cursor, RetrievalError>> + Send;
}

/// 테스트용 Mock 문서 소스
///
/// 고정된 문서 목록을 순서대로 내보내며, 커서가 문서를 몇 번 꺼냈는지 기록합니다.
#[cfg(test)]
#[derive(Default)]
pub struct MockDocumentSource {
    /// 검색 결과로 내보낼 문서
    pub documents: Vec<Document>,
    /// 이 위치에서 소스 에러를 반환 (None이면 실패하지 않음)
    pub fail_at: Option<usize>,
    /// 모든 커서가 꺼낸 문서 수
    pub pulls: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

#[cfg(test)]
impl MockDocumentSource {
    /// 문서 목록으로 mock 소스를 생성합니다.
    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents,
            ..Self::default()
        }
    }

    /// 지금까지 꺼낸 문서 수를 반환합니다.
    pub fn pulled(&self) -> usize {
        self.pulls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
pub struct MockCursor {
    documents: std::collections::VecDeque<Document>,
    fail_at: Option<usize>,
    position: usize,
    limit: ResultLimit,
    pulls: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

#[cfg(test)]
impl DocumentCursor for MockCursor {
    async fn next_document(&mut self) -> Result<Option<Document>, RetrievalError> {
        if !self.limit.allows(self.position) {
            return Ok(None);
        }
        if self.fail_at == Some(self.position) {
            return Err(RetrievalError::Source("mock source failure".to_owned()));
        }
        let next = self.documents.pop_front();
        if next.is_some() {
            self.position += 1;
            self.pulls
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }
        Ok(next)
    }
}

#[cfg(test)]
impl DocumentSource for MockDocumentSource {
    type Cursor = MockCursor;

    async fn search(&self, _query: &str, limit: ResultLimit) -> Result<MockCursor, RetrievalError> {
        Ok(MockCursor {
            documents: self.documents.iter().cloned().collect(),
            fail_at: self.fail_at,
            position: 0,
            limit,
            pulls: std::sync::Arc::clone(&self.pulls),
        })
    }
}

#[cfg(test)]
pub fn sample_document(id: &str, name: &str) -> Document {
    Document {
        id: id.to_owned(),
        name: name.to_owned(),
        source_uri: format!("https://drive.example.com/{id}"),
        content: format!("content of {name}"),
        summary: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_cursor_yields_in_order_then_ends() {
        let source = MockDocumentSource::with_documents(vec![
            sample_document("1", "A"),
            sample_document("2", "B"),
        ]);
        let mut cursor = source.search("q", ResultLimit::Unbounded).await.unwrap();

        assert_eq!(cursor.next_document().await.unwrap().unwrap().id, "1");
        assert_eq!(cursor.next_document().await.unwrap().unwrap().id, "2");
        assert!(cursor.next_document().await.unwrap().is_none());
        assert!(cursor.next_document().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn mock_cursor_honours_limit() {
        let source = MockDocumentSource::with_documents(vec![
            sample_document("1", "A"),
            sample_document("2", "B"),
            sample_document("3", "C"),
        ]);
        let mut cursor = source.search("q", ResultLimit::AtMost(2)).await.unwrap();

        assert!(cursor.next_document().await.unwrap().is_some());
        assert!(cursor.next_document().await.unwrap().is_some());
        assert!(cursor.next_document().await.unwrap().is_none());
        assert_eq!(source.pulled(), 2);
    }
}
