//! docgate 인가 필터링 문서 검색 파이프라인
//!
//! 질의로 문서를 검색한 뒤, 각 문서의 부모 컨테이너에 대해 요청 주체의 읽기 권한을
//! 확인하고, 허용된 문서만 텍스트 리포트로 렌더링합니다.
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`RetrievalError`)
//! - [`config`]: Retriever configuration (`RetrieverConfig`)
//! - [`source`]: Document search abstraction (`DocumentSource`, `DocumentCursor`)
//! - [`resolver`]: Container lookups (`ContainerResolver`)
//! - [`decision`]: Policy decision point (`PolicyDecisionPoint`)
//! - [`filter`]: Per-document authorization (`AccessFilter`)
//! - [`cache`]: Per-run lookup memoization (`LookupCache`)
//! - [`diagnostics`]: Exclusion records (`DiagnosticSink`, `TracingSink`, `RecordingSink`)
//! - [`excerpt`]: Content excerpts (`Excerpter`, `snippet_of`)
//! - [`formatter`]: Entry rendering and aggregation (`Formatter`, `Report`)
//! - [`catalog`]: Local TOML backend (`Catalog`, `CatalogSource`)
//! - [`retriever`]: Main orchestrator (`Retriever`, `RetrieverBuilder`)
//!
//! # Architecture
//!
//! ```text
//! query --> DocumentSource.search() --> cursor
//!                                          |
//!                                     AccessFilter (get_parent, get_name, check)
//!                                          |
//!                                     Formatter.render_entry()
//!                                          |
//!                                     Report ("\n\n" joined | "No document found")
//! ```

pub mod cache;
pub mod catalog;
pub mod config;
pub mod decision;
pub mod diagnostics;
pub mod error;
pub mod excerpt;
pub mod filter;
pub mod formatter;
pub mod resolver;
pub mod retriever;
pub mod source;

// --- Public API Re-exports ---

// Retriever (main orchestrator)
pub use retriever::{Retriever, RetrieverBuilder, RunOutcome, RunStats};

// Configuration
pub use config::RetrieverConfig;

// Error
pub use error::RetrievalError;

// Collaborators
pub use decision::PolicyDecisionPoint;
pub use resolver::ContainerResolver;
pub use source::{DocumentCursor, DocumentSource};

// Filtering
pub use cache::LookupCache;
pub use diagnostics::{DiagnosticSink, Exclusion, ExclusionReason, RecordingSink, TracingSink};
pub use filter::{AccessFilter, FilterStats, PermittedDocuments};

// Rendering
pub use excerpt::{Excerpter, TruncatingExcerpter, snippet_of};
pub use formatter::{Formatter, NO_DOCUMENT_FOUND, Report};

// Local catalog backend
pub use catalog::{Catalog, CatalogCursor, CatalogSource, ContainerEntry, DocumentEntry, GrantEntry};
