//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 검색 파이프라인은 이 상수로 `metrics::counter!()`를 호출합니다.
//! 레코더가 설치되지 않으면 매크로 호출은 아무 일도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `docgate_`
//! - 접미어: `_total` (counter)

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 결과 레이블 키 (allowed, denied, undecided)
pub const LABEL_RESULT: &str = "result";

/// 렌더링 모드 레이블 키
pub const LABEL_MODE: &str = "mode";

// ─── 레이블 값 상수 ────────────────────────────────────────────────

/// 정책 판정: 허용
pub const RESULT_ALLOWED: &str = "allowed";

/// 정책 판정: 명시적 거부
pub const RESULT_DENIED: &str = "denied";

/// 정책 판정: 판정 없음 (거부로 처리)
pub const RESULT_UNDECIDED: &str = "undecided";

// ─── 검색 파이프라인 메트릭 ────────────────────────────────────────

/// 문서 소스에서 가져온 문서 수 (counter)
pub const DOCUMENTS_RETRIEVED_TOTAL: &str = "docgate_documents_retrieved_total";

/// 인가를 통과한 문서 수 (counter)
pub const DOCUMENTS_PERMITTED_TOTAL: &str = "docgate_documents_permitted_total";

/// 인가 실패로 제외된 문서 수 (counter)
pub const DOCUMENTS_EXCLUDED_TOTAL: &str = "docgate_documents_excluded_total";

/// 정책 결정 지점 조회 수 (counter, label: result)
pub const POLICY_CHECKS_TOTAL: &str = "docgate_policy_checks_total";

/// 생성된 리포트 수 (counter, label: mode)
pub const REPORTS_RENDERED_TOTAL: &str = "docgate_reports_rendered_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        DOCUMENTS_RETRIEVED_TOTAL,
        "Total number of candidate documents pulled from the document source"
    );
    describe_counter!(
        DOCUMENTS_PERMITTED_TOTAL,
        "Total number of documents that passed the access filter"
    );
    describe_counter!(
        DOCUMENTS_EXCLUDED_TOTAL,
        "Total number of documents excluded by the access filter"
    );
    describe_counter!(
        POLICY_CHECKS_TOTAL,
        "Policy decision point lookups by result (allowed, denied, undecided)"
    );
    describe_counter!(
        REPORTS_RENDERED_TOTAL,
        "Total number of reports rendered, by render mode"
    );
}
