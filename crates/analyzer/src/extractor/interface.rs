//! 인터페이스 상태 추출기 -- 링크 상태와 라인 프로토콜 상태
//!
//! 두 패턴 모두 메시지 시작에 고정됩니다. 라인 프로토콜 메시지 안에도
//! `Interface X, changed state to Y` 문구가 들어 있으므로, 고정하지 않으면
//! 링크 상태 추출기가 라인 프로토콜 이벤트를 가로챕니다.

use regex::Regex;

use logsift_core::pipeline::{EventExtractor, Extraction};
use logsift_core::types::EventType;

use super::named_fields;
use crate::error::AnalyzerError;

/// 링크 상태 변경 (`%LINK-3-UPDOWN`)
pub struct LinkStateExtractor {
    pattern: Regex,
}

impl LinkStateExtractor {
    pub fn new() -> Result<Self, AnalyzerError> {
        Ok(Self {
            pattern: Regex::new(
                r"^\s*Interface\s+(?P<interface>\S+),\s+changed state to\s+(?P<state>\w+)",
            )?,
        })
    }
}

impl EventExtractor for LinkStateExtractor {
    fn name(&self) -> &str {
        "link_state"
    }

    fn extract(&self, message: &str) -> Option<Extraction> {
        let caps = self.pattern.captures(message)?;
        Some(Extraction::new(
            EventType::LinkState,
            named_fields(&self.pattern, &caps),
        ))
    }
}

/// 라인 프로토콜 상태 변경 (`%LINEPROTO-5-UPDOWN`)
pub struct LineProtocolExtractor {
    pattern: Regex,
}

impl LineProtocolExtractor {
    pub fn new() -> Result<Self, AnalyzerError> {
        Ok(Self {
            pattern: Regex::new(
                r"^\s*Line protocol on Interface\s+(?P<interface>\S+),\s+changed state to\s+(?P<state>\w+)",
            )?,
        })
    }
}

impl EventExtractor for LineProtocolExtractor {
    fn name(&self) -> &str {
        "lineproto_state"
    }

    fn extract(&self, message: &str) -> Option<Extraction> {
        let caps = self.pattern.captures(message)?;
        Some(Extraction::new(
            EventType::LineprotoState,
            named_fields(&self.pattern, &caps),
        ))
    }
}
