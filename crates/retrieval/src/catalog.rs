//! 로컬 TOML 카탈로그
//!
//! 외부 드라이브나 정책 서비스 없이 파이프라인을 실행할 수 있도록,
//! 파일 하나로 세 협력자(문서 소스, 컨테이너 리졸버, 정책 결정 지점)를 모두 제공합니다.
//!
//! # 파일 형식
//! ```toml
//! [[containers]]
//! id = "f1"
//! name = "Finance"
//! parent = "root"          # 선택
//!
//! [[documents]]
//! id = "1"
//! name = "Budget"
//! source = "https://example.com/1"
//! content = "..."
//! summary = "..."          # 선택
//! parent = "f1"            # 선택
//!
//! [[grants]]
//! subject = "user:alice"
//! action = "read"
//! resource = "Public"
//! allowed = true           # 기본값 true
//! ```
//!
//! 로딩 시 파일 크기, 중복 ID, 존재하지 않는 부모 참조, 컨테이너 순환을 검사합니다.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use docgate_core::types::{Decision, Document, ResultLimit, Subject};

use crate::decision::PolicyDecisionPoint;
use crate::error::RetrievalError;
use crate::resolver::ContainerResolver;
use crate::source::{DocumentCursor, DocumentSource};

/// 카탈로그 파일 최대 크기 (10MB)
const MAX_CATALOG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// 카탈로그의 컨테이너 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerEntry {
    /// 컨테이너 ID
    pub id: String,
    /// 표시 이름 (없으면 이름 조회가 `None`)
    #[serde(default)]
    pub name: Option<String>,
    /// 상위 컨테이너 ID
    #[serde(default)]
    pub parent: Option<String>,
}

/// 카탈로그의 문서 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub id: String,
    pub name: String,
    /// 원본 위치 URI
    pub source: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub summary: Option<String>,
    /// 부모 컨테이너 ID
    #[serde(default)]
    pub parent: Option<String>,
}

impl DocumentEntry {
    fn to_document(&self) -> Document {
        Document {
            id: self.id.clone(),
            name: self.name.clone(),
            source_uri: self.source.clone(),
            content: self.content.clone(),
            summary: self.summary.clone(),
        }
    }

    fn matches(&self, terms: &[String]) -> bool {
        if terms.is_empty() {
            return true;
        }
        let haystack = format!(
            "{} {} {}",
            self.name,
            self.content,
            self.summary.as_deref().unwrap_or_default()
        )
        .to_lowercase();
        terms.iter().all(|term| haystack.contains(term.as_str()))
    }
}

/// 권한 부여 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantEntry {
    /// `type:id` 형식의 주체
    pub subject: String,
    #[serde(default = "default_action")]
    pub action: String,
    /// 리소스 (컨테이너 이름)
    pub resource: String,
    /// false면 명시적 거부
    #[serde(default = "default_allowed")]
    pub allowed: bool,
}

fn default_action() -> String {
    docgate_core::types::READ_ACTION.to_owned()
}

fn default_allowed() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    containers: Vec<ContainerEntry>,
    #[serde(default)]
    documents: Vec<DocumentEntry>,
    #[serde(default)]
    grants: Vec<GrantEntry>,
}

/// 로드 및 검증이 끝난 카탈로그
#[derive(Debug, Default)]
pub struct Catalog {
    containers: HashMap<String, ContainerEntry>,
    documents: Vec<DocumentEntry>,
    document_index: HashMap<String, usize>,
    grants: Vec<GrantEntry>,
}

impl Catalog {
    /// TOML 문자열에서 카탈로그를 파싱하고 검증합니다.
    ///
    /// # Errors
    /// - `RetrievalError::CatalogLoad`: TOML 파싱 실패
    /// - `RetrievalError::CatalogValidation`: 내용 검증 실패
    pub fn parse(toml_str: &str) -> Result<Self, RetrievalError> {
        let file: CatalogFile =
            toml::from_str(toml_str).map_err(|e| RetrievalError::CatalogLoad {
                path: "<string>".to_owned(),
                reason: format!("failed to parse TOML: {e}"),
            })?;
        Self::from_entries(file.containers, file.documents, file.grants)
    }

    /// 파일에서 카탈로그를 로드합니다.
    ///
    /// # Errors
    /// - `RetrievalError::CatalogLoad`: 파일이 없거나 너무 크거나 파싱 실패
    /// - `RetrievalError::CatalogValidation`: 내용 검증 실패
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RetrievalError> {
        let path = path.as_ref();
        let load_err = |reason: String| RetrievalError::CatalogLoad {
            path: path.display().to_string(),
            reason,
        };

        // Check file size before reading to prevent OOM
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| load_err(format!("failed to read metadata: {e}")))?;
        if metadata.len() > MAX_CATALOG_FILE_SIZE {
            return Err(load_err(format!(
                "file too large: {} bytes (max: {MAX_CATALOG_FILE_SIZE})",
                metadata.len()
            )));
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| load_err(format!("failed to read file: {e}")))?;
        let file: CatalogFile = toml::from_str(&content)
            .map_err(|e| load_err(format!("failed to parse TOML: {e}")))?;

        let catalog = Self::from_entries(file.containers, file.documents, file.grants)?;
        info!(
            path = %path.display(),
            containers = catalog.containers.len(),
            documents = catalog.documents.len(),
            grants = catalog.grants.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// 항목 목록에서 카탈로그를 만들고 검증합니다.
    pub fn from_entries(
        containers: Vec<ContainerEntry>,
        documents: Vec<DocumentEntry>,
        grants: Vec<GrantEntry>,
    ) -> Result<Self, RetrievalError> {
        let mut container_map = HashMap::with_capacity(containers.len());
        for container in containers {
            if container.id.trim().is_empty() {
                return Err(RetrievalError::CatalogValidation(
                    "container id must not be empty".to_owned(),
                ));
            }
            if container_map.contains_key(&container.id) {
                return Err(RetrievalError::CatalogValidation(format!(
                    "duplicate container id '{}'",
                    container.id
                )));
            }
            container_map.insert(container.id.clone(), container);
        }

        for container in container_map.values() {
            if let Some(parent) = &container.parent {
                if !container_map.contains_key(parent) {
                    return Err(RetrievalError::CatalogValidation(format!(
                        "container '{}' references unknown parent '{parent}'",
                        container.id
                    )));
                }
            }
        }
        check_acyclic(&container_map)?;

        let mut document_index = HashMap::with_capacity(documents.len());
        for (position, document) in documents.iter().enumerate() {
            if document.id.trim().is_empty() {
                return Err(RetrievalError::CatalogValidation(
                    "document id must not be empty".to_owned(),
                ));
            }
            if document_index.insert(document.id.clone(), position).is_some() {
                return Err(RetrievalError::CatalogValidation(format!(
                    "duplicate document id '{}'",
                    document.id
                )));
            }
            if let Some(parent) = &document.parent {
                if !container_map.contains_key(parent) {
                    return Err(RetrievalError::CatalogValidation(format!(
                        "document '{}' references unknown parent '{parent}'",
                        document.id
                    )));
                }
            }
        }

        for grant in &grants {
            match grant.subject.split_once(':') {
                Some((kind, id)) if !kind.is_empty() && !id.is_empty() => {}
                _ => {
                    return Err(RetrievalError::CatalogValidation(format!(
                        "grant subject '{}' must have the form 'type:id'",
                        grant.subject
                    )));
                }
            }
            if grant.resource.is_empty() {
                return Err(RetrievalError::CatalogValidation(format!(
                    "grant for '{}' has an empty resource",
                    grant.subject
                )));
            }
        }

        Ok(Self {
            containers: container_map,
            documents,
            document_index,
            grants,
        })
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    pub fn grant_count(&self) -> usize {
        self.grants.len()
    }

    /// 컨테이너가 카탈로그에 있는지 확인합니다.
    pub fn has_container(&self, container_id: &str) -> bool {
        self.containers.contains_key(container_id)
    }

    /// 문서가 `folder_id` 하위 트리(하위 폴더 포함)에 있는지 확인합니다.
    fn is_within(&self, document: &DocumentEntry, folder_id: &str) -> bool {
        let mut current = document.parent.as_deref();
        // 순환은 로딩 시 거부되므로 컨테이너 수만큼만 올라감
        for _ in 0..=self.containers.len() {
            match current {
                Some(id) if id == folder_id => return true,
                Some(id) => {
                    current = self.containers.get(id).and_then(|c| c.parent.as_deref());
                }
                None => return false,
            }
        }
        false
    }

    /// 첫 번째로 일치하는 권한 부여 항목의 판정을 반환합니다.
    pub fn decide(&self, subject: &Subject, action: &str, resource: &str) -> Option<Decision> {
        let subject_key = subject.to_string();
        self.grants
            .iter()
            .find(|g| g.subject == subject_key && g.action == action && g.resource == resource)
            .map(|g| Decision { allowed: g.allowed })
    }
}

fn check_acyclic(containers: &HashMap<String, ContainerEntry>) -> Result<(), RetrievalError> {
    let mut cleared: HashSet<&str> = HashSet::new();
    for start in containers.keys() {
        let mut path: HashSet<&str> = HashSet::new();
        let mut current = Some(start.as_str());
        while let Some(id) = current {
            if cleared.contains(id) {
                break;
            }
            if !path.insert(id) {
                return Err(RetrievalError::CatalogValidation(format!(
                    "container hierarchy contains a cycle through '{id}'"
                )));
            }
            current = containers.get(id).and_then(|c| c.parent.as_deref());
        }
        cleared.extend(path);
    }
    Ok(())
}

impl ContainerResolver for Catalog {
    async fn get_parent(&self, document_id: &str) -> Result<Option<String>, RetrievalError> {
        Ok(self
            .document_index
            .get(document_id)
            .and_then(|&i| self.documents.get(i))
            .and_then(|d| d.parent.clone()))
    }

    async fn get_name(&self, container_id: &str) -> Result<Option<String>, RetrievalError> {
        Ok(self
            .containers
            .get(container_id)
            .and_then(|c| c.name.clone()))
    }
}

impl PolicyDecisionPoint for Catalog {
    async fn check(
        &self,
        subject: &Subject,
        action: &str,
        resource: &str,
    ) -> Result<Option<Decision>, RetrievalError> {
        let decision = self.decide(subject, action, resource);
        debug!(subject = %subject, action, resource, ?decision, "catalog policy check");
        Ok(decision)
    }
}

/// 카탈로그 기반 문서 소스
///
/// [`within`](Self::within)으로 특정 폴더 하위 트리로 검색 범위를 좁힐 수 있습니다.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    catalog: Arc<Catalog>,
    folder: Option<String>,
}

impl CatalogSource {
    /// 카탈로그 전체를 검색하는 소스를 생성합니다.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            folder: None,
        }
    }

    /// 검색 범위를 `folder_id` 하위 트리로 제한합니다.
    pub fn within(mut self, folder_id: impl Into<String>) -> Self {
        self.folder = Some(folder_id.into());
        self
    }
}

impl DocumentSource for CatalogSource {
    type Cursor = CatalogCursor;

    async fn search(&self, query: &str, limit: ResultLimit) -> Result<CatalogCursor, RetrievalError> {
        if let Some(folder) = &self.folder {
            if !self.catalog.has_container(folder) {
                return Err(RetrievalError::Source(format!(
                    "unknown folder '{folder}'"
                )));
            }
        }

        let terms = query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        Ok(CatalogCursor {
            catalog: Arc::clone(&self.catalog),
            folder: self.folder.clone(),
            terms,
            position: 0,
            yielded: 0,
            limit,
        })
    }
}

/// 카탈로그 검색 커서
///
/// 요청될 때마다 다음 일치 문서까지만 스캔합니다.
#[derive(Debug)]
pub struct CatalogCursor {
    catalog: Arc<Catalog>,
    folder: Option<String>,
    terms: Vec<String>,
    position: usize,
    yielded: usize,
    limit: ResultLimit,
}

impl DocumentCursor for CatalogCursor {
    async fn next_document(&mut self) -> Result<Option<Document>, RetrievalError> {
        if !self.limit.allows(self.yielded) {
            return Ok(None);
        }

        while let Some(entry) = self.catalog.documents.get(self.position) {
            self.position += 1;
            let in_scope = self
                .folder
                .as_deref()
                .is_none_or(|folder| self.catalog.is_within(entry, folder));
            if in_scope && entry.matches(&self.terms) {
                self.yielded += 1;
                return Ok(Some(entry.to_document()));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[[containers]]
id = "root"
name = "Shared Drive"

[[containers]]
id = "f1"
name = "Finance"
parent = "root"

[[containers]]
id = "f2"
name = "Public"
parent = "root"

[[containers]]
id = "f3"
parent = "f2"

[[documents]]
id = "1"
name = "Quarterly budget"
source = "https://drive.example.com/1"
content = "Budget figures for Q3"
parent = "f1"

[[documents]]
id = "2"
name = "Holiday calendar"
source = "https://drive.example.com/2"
content = "Public holidays and office closures"
summary = "Company holiday calendar"
parent = "f2"

[[documents]]
id = "3"
name = "Onboarding checklist"
source = "https://drive.example.com/3"
content = "Steps for new hires"

[[documents]]
id = "4"
name = "Archived budget"
source = "https://drive.example.com/4"
content = "Old budget"
parent = "f3"

[[grants]]
subject = "user:alice"
resource = "Public"

[[grants]]
subject = "user:alice"
action = "read"
resource = "Finance"
allowed = false

[[grants]]
subject = "user:alice"
action = "read"
resource = "Finance"
allowed = true
"#;

    fn sample() -> Arc<Catalog> {
        Arc::new(Catalog::parse(SAMPLE).unwrap())
    }

    async fn collect(source: &CatalogSource, query: &str, limit: ResultLimit) -> Vec<String> {
        let mut cursor = source.search(query, limit).await.unwrap();
        let mut ids = Vec::new();
        while let Some(doc) = cursor.next_document().await.unwrap() {
            ids.push(doc.id);
        }
        ids
    }

    #[test]
    fn parse_counts_entries() {
        let catalog = sample();
        assert_eq!(catalog.container_count(), 4);
        assert_eq!(catalog.document_count(), 4);
        assert_eq!(catalog.grant_count(), 3);
    }

    #[test]
    fn parse_empty_catalog() {
        let catalog = Catalog::parse("").unwrap();
        assert_eq!(catalog.document_count(), 0);
    }

    #[test]
    fn parse_invalid_toml_is_load_error() {
        let err = Catalog::parse("[[documents]\nid = ").unwrap_err();
        assert!(matches!(err, RetrievalError::CatalogLoad { .. }));
    }

    #[test]
    fn duplicate_document_id_rejected() {
        let toml = r#"
[[documents]]
id = "1"
name = "A"
source = "s"

[[documents]]
id = "1"
name = "B"
source = "s"
"#;
        let err = Catalog::parse(toml).unwrap_err();
        assert!(err.to_string().contains("duplicate document id '1'"));
    }

    #[test]
    fn duplicate_container_id_rejected() {
        let toml = r#"
[[containers]]
id = "f1"

[[containers]]
id = "f1"
"#;
        assert!(Catalog::parse(toml).is_err());
    }

    #[test]
    fn dangling_document_parent_rejected() {
        let toml = r#"
[[documents]]
id = "1"
name = "A"
source = "s"
parent = "missing"
"#;
        let err = Catalog::parse(toml).unwrap_err();
        assert!(matches!(err, RetrievalError::CatalogValidation(_)));
    }

    #[test]
    fn dangling_container_parent_rejected() {
        let toml = r#"
[[containers]]
id = "f1"
parent = "missing"
"#;
        assert!(Catalog::parse(toml).is_err());
    }

    #[test]
    fn container_cycle_rejected() {
        let toml = r#"
[[containers]]
id = "a"
parent = "b"

[[containers]]
id = "b"
parent = "a"
"#;
        let err = Catalog::parse(toml).unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn malformed_grant_subject_rejected() {
        let toml = r#"
[[grants]]
subject = "alice"
resource = "Public"
"#;
        assert!(Catalog::parse(toml).is_err());
    }

    #[tokio::test]
    async fn resolver_lookups() {
        let catalog = sample();
        assert_eq!(catalog.get_parent("1").await.unwrap().as_deref(), Some("f1"));
        assert_eq!(catalog.get_parent("3").await.unwrap(), None);
        assert_eq!(catalog.get_parent("nope").await.unwrap(), None);
        assert_eq!(catalog.get_name("f1").await.unwrap().as_deref(), Some("Finance"));
        assert_eq!(catalog.get_name("f3").await.unwrap(), None);
        assert_eq!(catalog.get_name("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn stale_document_index_yields_no_parent() {
        let mut catalog = Catalog::parse(SAMPLE).unwrap();
        catalog.documents.clear();

        assert_eq!(catalog.get_parent("1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn first_matching_grant_decides() {
        let catalog = sample();
        let alice = Subject::user("alice");

        assert_eq!(
            catalog.check(&alice, "read", "Public").await.unwrap(),
            Some(Decision::allow())
        );
        assert_eq!(
            catalog.check(&alice, "read", "Finance").await.unwrap(),
            Some(Decision::deny())
        );
        assert_eq!(catalog.check(&alice, "write", "Public").await.unwrap(), None);
        assert_eq!(
            catalog
                .check(&Subject::user("bob"), "read", "Public")
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn empty_query_matches_everything_in_order() {
        let source = CatalogSource::new(sample());
        assert_eq!(
            collect(&source, "", ResultLimit::Unbounded).await,
            vec!["1", "2", "3", "4"]
        );
    }

    #[tokio::test]
    async fn query_terms_are_case_insensitive_and_all_required() {
        let source = CatalogSource::new(sample());
        assert_eq!(
            collect(&source, "BUDGET", ResultLimit::Unbounded).await,
            vec!["1", "4"]
        );
        assert_eq!(
            collect(&source, "budget q3", ResultLimit::Unbounded).await,
            vec!["1"]
        );
        // 요약도 검색 대상
        assert_eq!(
            collect(&source, "company", ResultLimit::Unbounded).await,
            vec!["2"]
        );
        assert!(collect(&source, "nothing-matches", ResultLimit::Unbounded)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn limit_caps_candidates() {
        let source = CatalogSource::new(sample());
        assert_eq!(
            collect(&source, "", ResultLimit::AtMost(2)).await,
            vec!["1", "2"]
        );
    }

    #[tokio::test]
    async fn within_restricts_to_subtree() {
        let catalog = sample();
        let public = CatalogSource::new(Arc::clone(&catalog)).within("f2");
        assert_eq!(
            collect(&public, "", ResultLimit::Unbounded).await,
            vec!["2", "4"]
        );

        let root = CatalogSource::new(catalog).within("root");
        assert_eq!(
            collect(&root, "", ResultLimit::Unbounded).await,
            vec!["1", "2", "4"]
        );
    }

    #[tokio::test]
    async fn within_unknown_folder_is_source_error() {
        let source = CatalogSource::new(sample()).within("nope");
        let err = source.search("", ResultLimit::Unbounded).await.unwrap_err();
        assert!(matches!(err, RetrievalError::Source(_)));
    }

    #[tokio::test]
    async fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let catalog = Catalog::load(&path).await.unwrap();
        assert_eq!(catalog.document_count(), 4);
    }

    #[tokio::test]
    async fn load_missing_file_is_load_error() {
        let err = Catalog::load("/nonexistent/catalog.toml").await.unwrap_err();
        assert!(matches!(err, RetrievalError::CatalogLoad { .. }));
    }
}
