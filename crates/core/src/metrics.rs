//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 분석기는 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않은 경우 모든 호출은 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `logsift_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(logsift_core::metrics::LINES_READ_TOTAL).increment(1);
//! ```

use metrics::{Unit, describe_counter};

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 이벤트 패밀리 레이블 키 (acl_denied, login_failed, ..., unclassified)
pub const LABEL_EVENT_TYPE: &str = "event_type";

// ─── 분석기 메트릭 ─────────────────────────────────────────────────

/// 읽은 전체 라인 수 (counter)
pub const LINES_READ_TOTAL: &str = "logsift_lines_read_total";

/// 접두부 문법 불일치로 드롭된 라인 수 (counter)
pub const LINES_DROPPED_TOTAL: &str = "logsift_lines_dropped_total";

/// 설정된 최대 길이를 넘어 건너뛴 라인 수 (counter)
pub const LINES_OVERSIZED_TOTAL: &str = "logsift_lines_oversized_total";

/// 접두부 파싱에 성공한 행 수 (counter)
pub const ROWS_PARSED_TOTAL: &str = "logsift_rows_parsed_total";

/// 이벤트 패밀리별 분류된 행 수 (counter, label: event_type)
pub const ROWS_CLASSIFIED_TOTAL: &str = "logsift_rows_classified_total";

/// 필터를 통과한 행 수 (counter)
pub const ROWS_FILTERED_TOTAL: &str = "logsift_rows_filtered_total";

/// 모든 메트릭의 설명을 등록합니다.
///
/// 레코더 설치 직후 한 번 호출합니다.
pub fn describe_metrics() {
    describe_counter!(LINES_READ_TOTAL, Unit::Count, "Total input lines read");
    describe_counter!(
        LINES_DROPPED_TOTAL,
        Unit::Count,
        "Lines that did not match the prefix grammar"
    );
    describe_counter!(
        LINES_OVERSIZED_TOTAL,
        Unit::Count,
        "Lines skipped for exceeding parser.max_line_length"
    );
    describe_counter!(
        ROWS_PARSED_TOTAL,
        Unit::Count,
        "Lines that produced a parsed envelope"
    );
    describe_counter!(
        ROWS_CLASSIFIED_TOTAL,
        Unit::Count,
        "Parsed rows by event family"
    );
    describe_counter!(
        ROWS_FILTERED_TOTAL,
        Unit::Count,
        "Rows that passed the filter specification"
    );
}
