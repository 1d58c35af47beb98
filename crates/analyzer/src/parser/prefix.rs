//! 접두부 문법 파서
//!
//! 벤더 syslog 내보내기의 반고정 텍스트 접두부를 인식합니다.
//!
//! # 접두부 형식
//! ```text
//! <seq>: <Mon> <D> <HH:MM:SS[.ffffff]> <TZ>: %<FACILITY>-<SEVERITY>-<MNEMONIC>: <message>
//! ```
//!
//! # 사용 예시
//! ```ignore
//! use logsift_analyzer::parser::PrefixParser;
//!
//! let parser = PrefixParser::new()?;
//! let env = parser
//!     .parse("1: Sep 18 08:00:01.001 CDT: %LINK-3-UPDOWN: Interface Gi0/1, changed state to down")
//!     .unwrap();
//! assert_eq!(env.mnemonic, "UPDOWN");
//! ```

use regex::Regex;

use logsift_core::types::{Month, ParsedEnvelope};

use crate::error::AnalyzerError;

/// 접두부 정규식
///
/// 라인 시작에 고정되며, 메시지 이후의 내용은 제약하지 않습니다.
/// 숫자 토큰은 ASCII 숫자만 받습니다 (`\d`는 유니코드 숫자까지 매칭).
const PREFIX_PATTERN: &str = concat!(
    r"^\s*(?P<seq>[0-9]+):\s+",
    r"(?P<month>Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+",
    r"(?P<day>[0-9]{1,2})\s+",
    r"(?P<time>[0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]{1,6})?)\s+",
    r"(?P<tz>[A-Z]{2,5})\s*:\s*",
    r"%(?P<facility>[A-Z0-9_]+)-(?P<severity>[0-9]+)-(?P<mnemonic>[A-Z0-9_]+):\s*",
    r"(?P<message>.*)$",
);

/// 접두부 문법 파서
///
/// 한 줄을 [`ParsedEnvelope`]로 변환하거나, 문법에 맞지 않으면 거부합니다.
/// 거부된 라인은 에러가 아니라 `None`으로 표현됩니다.
pub struct PrefixParser {
    /// 컴파일된 접두부 정규식
    pattern: Regex,
}

impl PrefixParser {
    /// 접두부 정규식을 컴파일하여 파서를 생성합니다.
    pub fn new() -> Result<Self, AnalyzerError> {
        Ok(Self {
            pattern: Regex::new(PREFIX_PATTERN)?,
        })
    }

    /// 한 줄을 파싱합니다.
    ///
    /// 줄바꿈 문자는 호출자가 미리 제거해야 합니다.
    /// `seq`나 `severity`가 정수 범위를 넘는 경우 해당 필드만 `None`이 되고
    /// 라인 자체는 받아들여집니다.
    pub fn parse(&self, line: &str) -> Option<ParsedEnvelope> {
        let caps = self.pattern.captures(line)?;

        // 정규식이 월 토큰을 12개 약어로 제한하므로 항상 Some
        let month = Month::from_abbrev(&caps["month"])?;
        // ASCII 1-2자리이므로 u8 범위를 넘지 않음
        let day = caps["day"].parse::<u8>().ok()?;

        Some(ParsedEnvelope {
            sequence: caps["seq"].parse::<u64>().ok(),
            month,
            day,
            time: caps["time"].to_owned(),
            timezone: caps["tz"].to_owned(),
            facility: caps["facility"].to_owned(),
            severity: caps["severity"].parse::<u32>().ok(),
            mnemonic: caps["mnemonic"].to_owned(),
            message: caps["message"].to_owned(),
        })
    }
}
