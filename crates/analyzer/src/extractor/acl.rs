//! ACL 로그 추출기 -- 소프트웨어 경로(허용/거부)와 하드웨어 경로 거부

use regex::Regex;

use logsift_core::pipeline::{EventExtractor, Extraction};
use logsift_core::types::EventType;

use super::named_fields;
use crate::error::AnalyzerError;

/// 소프트웨어 경로 ACL 로그 (`IPACCESSLOGP` 계열)
///
/// ```text
/// list acl-vty-in permitted tcp 32.245.68.191(47424) -> 230.0.0.185(22), 8 packets
/// ```
pub struct AclLogExtractor {
    pattern: Regex,
}

impl AclLogExtractor {
    pub fn new() -> Result<Self, AnalyzerError> {
        Ok(Self {
            pattern: Regex::new(concat!(
                r"list\s+(?P<acl>\S+)\s+(?P<action>permitted|denied)\s+",
                r"(?P<proto>\S+)\s+",
                r"(?P<src_ip>\d+\.\d+\.\d+\.\d+)\((?P<src_port>\d+)\)\s*->\s*",
                r"(?P<dst_ip>\d+\.\d+\.\d+\.\d+)\((?P<dst_port>\d+)\),\s+",
                r"(?P<packets>\d+)\s+packets?",
            ))?,
        })
    }
}

impl EventExtractor for AclLogExtractor {
    fn name(&self) -> &str {
        "acl_log"
    }

    fn extract(&self, message: &str) -> Option<Extraction> {
        let caps = self.pattern.captures(message)?;
        let event_type = match &caps["action"] {
            "permitted" => EventType::AclPermitted,
            _ => EventType::AclDenied,
        };
        Some(Extraction::new(
            event_type,
            named_fields(&self.pattern, &caps),
        ))
    }
}

/// 하드웨어 경로 ACL 거부 (`FMANFP` 계열)
///
/// 포트 번호 대신 프로토콜 코드, 출발지 MAC, 유입 인터페이스를 기록합니다.
/// MAC 토큰만 대소문자를 구분하지 않습니다.
///
/// ```text
/// list acl-core denied 27 6c:b7:cd:85:0c:e0 186.235.35.107 GigabitEthernet3/1-> 237.0.0.189, 2 packets
/// ```
pub struct AclHardwareDenyExtractor {
    pattern: Regex,
}

impl AclHardwareDenyExtractor {
    pub fn new() -> Result<Self, AnalyzerError> {
        Ok(Self {
            pattern: Regex::new(concat!(
                r"list\s+(?P<acl>\S+)\s+denied\s+(?P<proto_code>\d+)\s+",
                r"(?P<src_mac>(?i:[0-9a-f]{2}(?::[0-9a-f]{2}){5}))\s+",
                r"(?P<src_ip>\d+\.\d+\.\d+\.\d+)\s+",
                r"(?P<ingress_if>\S+)->\s+",
                r"(?P<dst_ip>\d+\.\d+\.\d+\.\d+),\s+",
                r"(?P<packets>\d+)\s+packets",
            ))?,
        })
    }
}

impl EventExtractor for AclHardwareDenyExtractor {
    fn name(&self) -> &str {
        "acl_hw_deny"
    }

    fn extract(&self, message: &str) -> Option<Extraction> {
        let caps = self.pattern.captures(message)?;
        Some(Extraction::new(
            EventType::AclDeniedHw,
            named_fields(&self.pattern, &caps),
        ))
    }
}
