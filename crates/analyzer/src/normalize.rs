//! 정규화 -- 심각도 이름 부여 및 전체 시각 재구성
//!
//! 접두부에는 연도가 없으므로 호출자가 연도를 제공한 경우에만
//! 전체 시각을 만들 수 있습니다. 재구성 실패는 에러가 아니라 `None`입니다.

use chrono::NaiveDateTime;

use logsift_core::types::{self, Month, ParsedEnvelope};

const FORMAT_SECONDS: &str = "%Y-%m-%d %H:%M:%S";
const FORMAT_FRACTION: &str = "%Y-%m-%d %H:%M:%S%.f";

/// 숫자 심각도를 이름으로 변환합니다.
///
/// 값이 없거나 0-7 범위를 벗어나면 `None`입니다.
pub fn severity_name(severity: Option<u32>) -> Option<&'static str> {
    severity.and_then(|s| types::severity_name(i64::from(s)))
}

/// 연도와 접두부 시각 필드로 전체 시각을 재구성합니다.
///
/// 실제로 존재하지 않는 날짜(예: 2월 30일, 평년의 2월 29일)나
/// 범위를 벗어난 시각은 `None`을 반환합니다. 서기 1년 미만도 `None`입니다.
pub fn reconstruct_datetime(
    year: i32,
    month: Month,
    day: u8,
    time: &str,
) -> Option<NaiveDateTime> {
    if year < 1 {
        return None;
    }
    let text = format!("{year:04}-{:02}-{day:02} {time}", month.number());
    let format = if time.contains('.') {
        FORMAT_FRACTION
    } else {
        FORMAT_SECONDS
    };
    NaiveDateTime::parse_from_str(&text, format).ok()
}

/// 봉투의 시각 필드로 전체 시각을 재구성합니다. 연도가 없으면 `None`입니다.
pub fn envelope_datetime(year: Option<i32>, env: &ParsedEnvelope) -> Option<NaiveDateTime> {
    reconstruct_datetime(year?, env.month, env.day, &env.time)
}
