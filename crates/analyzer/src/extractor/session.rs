//! 세션/운영자 활동 추출기 -- 로그인, 로그아웃, 설정 변경, 명령 기록

use regex::Regex;

use logsift_core::pipeline::{EventExtractor, Extraction};
use logsift_core::types::EventType;

use super::named_fields;
use crate::error::AnalyzerError;

/// 로그인 성공 (`%SEC_LOGIN-5-LOGIN_SUCCESS`)
pub struct LoginSuccessExtractor {
    pattern: Regex,
}

impl LoginSuccessExtractor {
    pub fn new() -> Result<Self, AnalyzerError> {
        Ok(Self {
            pattern: Regex::new(
                r"Login Success \[user:\s*(?P<user>.+?)\]\s*\[Source:\s*(?P<src_ip>\d+\.\d+\.\d+\.\d+)\]",
            )?,
        })
    }
}

impl EventExtractor for LoginSuccessExtractor {
    fn name(&self) -> &str {
        "login_success"
    }

    fn extract(&self, message: &str) -> Option<Extraction> {
        let caps = self.pattern.captures(message)?;
        Some(Extraction::new(
            EventType::LoginSuccess,
            named_fields(&self.pattern, &caps),
        ))
    }
}

/// 로그인 실패 (`%SEC_LOGIN-4-LOGIN_FAILED`)
pub struct LoginFailedExtractor {
    pattern: Regex,
}

impl LoginFailedExtractor {
    pub fn new() -> Result<Self, AnalyzerError> {
        Ok(Self {
            pattern: Regex::new(concat!(
                r"Login failed \[user:\s*(?P<user>.+?)\]\s*",
                r"\[Source:\s*(?P<src_ip>\d+\.\d+\.\d+\.\d+)\]\s*",
                r"(?:\[localport:\s*\d+\]\s*)?",
                r"\[Reason:\s*(?P<reason>.+?)\]",
            ))?,
        })
    }
}

impl EventExtractor for LoginFailedExtractor {
    fn name(&self) -> &str {
        "login_failed"
    }

    fn extract(&self, message: &str) -> Option<Extraction> {
        let caps = self.pattern.captures(message)?;
        Some(Extraction::new(
            EventType::LoginFailed,
            named_fields(&self.pattern, &caps),
        ))
    }
}

/// tty 세션 종료
pub struct LogoutExtractor {
    pattern: Regex,
}

impl LogoutExtractor {
    pub fn new() -> Result<Self, AnalyzerError> {
        Ok(Self {
            pattern: Regex::new(
                r"User\s+(?P<user>\S+)\s+has exited tty session\s+\d+\((?P<src_ip>\d+\.\d+\.\d+\.\d+)\)",
            )?,
        })
    }
}

impl EventExtractor for LogoutExtractor {
    fn name(&self) -> &str {
        "logout"
    }

    fn extract(&self, message: &str) -> Option<Extraction> {
        let caps = self.pattern.captures(message)?;
        Some(Extraction::new(
            EventType::Logout,
            named_fields(&self.pattern, &caps),
        ))
    }
}

/// 콘솔 설정 변경 (`%SYS-5-CONFIG_I`)
pub struct ConsoleConfigExtractor {
    pattern: Regex,
}

impl ConsoleConfigExtractor {
    pub fn new() -> Result<Self, AnalyzerError> {
        Ok(Self {
            pattern: Regex::new(
                r"Configured from console by\s+(?P<user>\S+)\s+on\s+(?P<line>\S+)\s+\((?P<src_ip>\d+\.\d+\.\d+\.\d+)\)",
            )?,
        })
    }
}

impl EventExtractor for ConsoleConfigExtractor {
    fn name(&self) -> &str {
        "config_from_console"
    }

    fn extract(&self, message: &str) -> Option<Extraction> {
        let caps = self.pattern.captures(message)?;
        Some(Extraction::new(
            EventType::ConfigFromConsole,
            named_fields(&self.pattern, &caps),
        ))
    }
}

/// 명령 기록 (`%PARSER-5-CFGLOG_LOGGEDCMD`)
///
/// 명령 값은 앞뒤 공백을 제거하고, 앞쪽의 `!` 표식도 제거합니다.
pub struct LoggedCommandExtractor {
    pattern: Regex,
}

impl LoggedCommandExtractor {
    pub fn new() -> Result<Self, AnalyzerError> {
        Ok(Self {
            pattern: Regex::new(r"User:(?P<user>\S+)\s+logged command:(?P<command>.+)$")?,
        })
    }
}

/// 명령 텍스트 정규화
fn normalize_command(raw: &str) -> String {
    raw.trim().trim_start_matches('!').trim().to_owned()
}

impl EventExtractor for LoggedCommandExtractor {
    fn name(&self) -> &str {
        "logged_command"
    }

    fn extract(&self, message: &str) -> Option<Extraction> {
        let caps = self.pattern.captures(message)?;
        let fields = named_fields(&self.pattern, &caps)
            .into_iter()
            .map(|(name, value)| {
                if name == "command" {
                    let command = normalize_command(&value);
                    (name, command)
                } else {
                    (name, value)
                }
            })
            .collect();
        Some(Extraction::new(EventType::LoggedCommand, fields))
    }
}
