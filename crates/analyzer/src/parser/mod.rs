//! 라인 파싱 모듈 -- 접두부 문법 매칭과 라인 분할
//!
//! 입력 바이트를 라인 단위로 나누고, 각 라인을 [`PrefixParser`]로 파싱합니다.
//! 문법에 맞지 않는 라인은 에러 없이 드롭됩니다.
//!
//! # 사용 예시
//! ```ignore
//! use logsift_analyzer::parser::{PrefixParser, split_lines};
//!
//! let parser = PrefixParser::new()?;
//! for (line_no, line) in split_lines(input) {
//!     if let Some(env) = parser.parse(&line) { /* ... */ }
//! }
//! ```

pub mod prefix;

pub use prefix::PrefixParser;

use std::borrow::Cow;

/// 입력 바이트를 (라인 번호, 라인) 쌍으로 분할합니다.
///
/// - 구분자는 `\n`이며 각 라인 끝의 `\r` 하나를 제거합니다.
/// - 유효하지 않은 UTF-8 바이트는 U+FFFD로 대체됩니다.
/// - 라인 번호는 1부터 시작합니다.
/// - 입력이 `\n`으로 끝나면 마지막 빈 조각은 라인으로 세지 않습니다.
pub fn split_lines(input: &[u8]) -> impl Iterator<Item = (usize, Cow<'_, str>)> {
    let body = input.strip_suffix(b"\n").unwrap_or(input);
    let empty = input.is_empty();

    body.split(|b| *b == b'\n')
        .filter(move |_| !empty)
        .enumerate()
        .map(|(idx, raw)| {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            (idx + 1, String::from_utf8_lossy(raw))
        })
}
