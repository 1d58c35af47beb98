//! 도메인 타입 -- 시스템 전역에서 사용되는 공통 타입
//!
//! 원시 라인 → [`ParsedEnvelope`] → [`ClassifiedRow`] 순서로 데이터가 흐릅니다.
//! 각 단계는 새로운 구조체를 만들며 이전 단계의 값을 변경하지 않습니다.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 동적 필드가 테이블 모델에 병합될 때 붙는 접두어
pub const FIELD_PREFIX: &str = "f_";

/// 항상 존재하는 핵심 컬럼 (내보내기 순서)
pub const CORE_COLUMNS: [&str; 12] = [
    "seq",
    "month",
    "day",
    "time",
    "tz",
    "facility",
    "severity",
    "severity_name",
    "mnemonic",
    "event_type",
    "message",
    "dt",
];

/// 심각도 이름 테이블 (인덱스 = syslog severity)
const SEVERITY_NAMES: [&str; 8] = [
    "EMERGENCY",
    "ALERT",
    "CRITICAL",
    "ERROR",
    "WARNING",
    "NOTICE",
    "INFO",
    "DEBUG",
];

/// 숫자 심각도를 정식 이름으로 변환합니다.
///
/// 0-7 범위 밖의 값(음수 포함)은 `None`을 반환합니다.
pub fn severity_name(severity: i64) -> Option<&'static str> {
    usize::try_from(severity)
        .ok()
        .and_then(|idx| SEVERITY_NAMES.get(idx).copied())
}

/// 3글자 영문 월 약어
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// 약어에서 월을 파싱합니다. 대소문자를 구분합니다 (`Sep`만 허용, `SEP`/`sep` 거부).
    pub fn from_abbrev(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }

    /// 1부터 시작하는 월 번호
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    /// 약어 문자열
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jan => "Jan",
            Self::Feb => "Feb",
            Self::Mar => "Mar",
            Self::Apr => "Apr",
            Self::May => "May",
            Self::Jun => "Jun",
            Self::Jul => "Jul",
            Self::Aug => "Aug",
            Self::Sep => "Sep",
            Self::Oct => "Oct",
            Self::Nov => "Nov",
            Self::Dec => "Dec",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 이벤트 패밀리 태그
///
/// 추출기 체인이 메시지 본문을 분류한 결과입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// 소프트웨어 경로 ACL 허용
    AclPermitted,
    /// 소프트웨어 경로 ACL 거부
    AclDenied,
    /// 하드웨어 경로 ACL 거부 (MAC, 유입 인터페이스 포함)
    AclDeniedHw,
    /// 인터페이스 링크 상태 변경
    LinkState,
    /// 라인 프로토콜 상태 변경
    LineprotoState,
    /// 로그인 성공
    LoginSuccess,
    /// 로그인 실패
    LoginFailed,
    /// tty 세션 종료
    Logout,
    /// 콘솔 설정 변경
    ConfigFromConsole,
    /// 실행된 명령 기록
    LoggedCommand,
}

impl EventType {
    /// snake_case 태그 문자열
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AclPermitted => "acl_permitted",
            Self::AclDenied => "acl_denied",
            Self::AclDeniedHw => "acl_denied_hw",
            Self::LinkState => "link_state",
            Self::LineprotoState => "lineproto_state",
            Self::LoginSuccess => "login_success",
            Self::LoginFailed => "login_failed",
            Self::Logout => "logout",
            Self::ConfigFromConsole => "config_from_console",
            Self::LoggedCommand => "logged_command",
        }
    }

    /// ACL 거부 이벤트인지 (소프트웨어/하드웨어 경로 모두)
    pub fn is_acl_deny(self) -> bool {
        matches!(self, Self::AclDenied | Self::AclDeniedHw)
    }

    /// 인터페이스 플랩 집계 대상인지
    pub fn is_interface_flap(self) -> bool {
        matches!(self, Self::LinkState | Self::LineprotoState)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "acl_permitted" => Ok(Self::AclPermitted),
            "acl_denied" => Ok(Self::AclDenied),
            "acl_denied_hw" => Ok(Self::AclDeniedHw),
            "link_state" => Ok(Self::LinkState),
            "lineproto_state" => Ok(Self::LineprotoState),
            "login_success" => Ok(Self::LoginSuccess),
            "login_failed" => Ok(Self::LoginFailed),
            "logout" => Ok(Self::Logout),
            "config_from_console" => Ok(Self::ConfigFromConsole),
            "logged_command" => Ok(Self::LoggedCommand),
            other => Err(format!("unknown event type: {other}")),
        }
    }
}

/// 접두부 문법 매칭 결과
///
/// 전체 접두부 문법에 매칭된 라인에만 존재합니다.
/// 숫자 필드가 정수 범위를 넘으면 해당 필드만 `None`이 됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEnvelope {
    /// 시퀀스 번호 (장치별 단조 증가, 파일 간 유일성 보장 없음)
    pub sequence: Option<u64>,
    /// 월
    pub month: Month,
    /// 일 (범위 검증 없음, 0이나 35도 허용)
    pub day: u8,
    /// `HH:MM:SS[.ffffff]`
    pub time: String,
    /// 시간대 약어 (변환에 사용하지 않음)
    pub timezone: String,
    /// facility 토큰
    pub facility: String,
    /// 숫자 심각도 (0-7 검증은 호출자 책임)
    pub severity: Option<u32>,
    /// mnemonic 토큰
    pub mnemonic: String,
    /// 접두부 이후의 메시지 본문
    pub message: String,
}

/// 분류까지 끝난 행
///
/// 생성 이후 변경되지 않으며, 실행이 끝날 때까지 행 저장소가 소유합니다.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRow {
    /// 입력 파일 내 라인 번호 (1부터)
    pub line_number: usize,
    /// 접두부 필드
    pub envelope: ParsedEnvelope,
    /// 심각도 이름
    pub severity_name: Option<&'static str>,
    /// 이벤트 패밀리 (추출기 미매칭 시 `None`)
    pub event_type: Option<EventType>,
    /// 추출기가 캡처한 필드 (접두어 없는 이름, 캡처 순서 유지)
    pub fields: Vec<(String, String)>,
    /// 연도가 주어지고 재구성에 성공한 경우의 전체 시각
    pub datetime: Option<NaiveDateTime>,
}

impl ClassifiedRow {
    /// 접두어 없는 이름으로 동적 필드를 조회합니다.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// 테이블 모델의 컬럼 이름으로 값을 조회합니다.
    ///
    /// 핵심 컬럼 이름 또는 `f_` 접두어가 붙은 동적 컬럼 이름을 받습니다.
    /// 값이 없는 경우(희소 컬럼 포함) `None`을 반환합니다.
    pub fn column(&self, name: &str) -> Option<Cow<'_, str>> {
        let env = &self.envelope;
        match name {
            "seq" => env.sequence.map(|s| Cow::Owned(s.to_string())),
            "month" => Some(Cow::Borrowed(env.month.as_str())),
            "day" => Some(Cow::Owned(env.day.to_string())),
            "time" => Some(Cow::Borrowed(env.time.as_str())),
            "tz" => Some(Cow::Borrowed(env.timezone.as_str())),
            "facility" => Some(Cow::Borrowed(env.facility.as_str())),
            "severity" => env.severity.map(|s| Cow::Owned(s.to_string())),
            "severity_name" => self.severity_name.map(Cow::Borrowed),
            "mnemonic" => Some(Cow::Borrowed(env.mnemonic.as_str())),
            "event_type" => self.event_type.map(|e| Cow::Borrowed(e.as_str())),
            "message" => Some(Cow::Borrowed(env.message.as_str())),
            "dt" => self.datetime.map(|dt| Cow::Owned(dt.to_string())),
            other => other
                .strip_prefix(FIELD_PREFIX)
                .and_then(|key| self.field(key))
                .map(Cow::Borrowed),
        }
    }
}

impl fmt::Display for ClassifiedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] %{}-{}: {}",
            self.severity_name.unwrap_or("-"),
            self.envelope.facility,
            self.envelope.mnemonic,
            self.envelope.message,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> ClassifiedRow {
        ClassifiedRow {
            line_number: 1,
            envelope: ParsedEnvelope {
                sequence: Some(12),
                month: Month::Sep,
                day: 18,
                time: "08:00:01.001".to_owned(),
                timezone: "CDT".to_owned(),
                facility: "LINK".to_owned(),
                severity: Some(3),
                mnemonic: "UPDOWN".to_owned(),
                message: "Interface Gi0/1, changed state to down".to_owned(),
            },
            severity_name: severity_name(3),
            event_type: Some(EventType::LinkState),
            fields: vec![
                ("interface".to_owned(), "Gi0/1".to_owned()),
                ("state".to_owned(), "down".to_owned()),
            ],
            datetime: None,
        }
    }

    #[test]
    fn severity_table_is_total_on_syslog_range() {
        let names: Vec<_> = (0..8).map(|s| severity_name(s).unwrap()).collect();
        assert_eq!(
            names,
            vec![
                "EMERGENCY",
                "ALERT",
                "CRITICAL",
                "ERROR",
                "WARNING",
                "NOTICE",
                "INFO",
                "DEBUG"
            ]
        );
    }

    #[test]
    fn severity_outside_range_has_no_name() {
        assert_eq!(severity_name(-1), None);
        assert_eq!(severity_name(8), None);
        assert_eq!(severity_name(i64::MIN), None);
        assert_eq!(severity_name(i64::MAX), None);
    }

    #[test]
    fn month_abbrev_is_case_sensitive() {
        assert_eq!(Month::from_abbrev("Sep"), Some(Month::Sep));
        assert_eq!(Month::from_abbrev("SEP"), None);
        assert_eq!(Month::from_abbrev("sep"), None);
        assert_eq!(Month::from_abbrev("Sept"), None);
    }

    #[test]
    fn month_numbers_start_at_one() {
        assert_eq!(Month::Jan.number(), 1);
        assert_eq!(Month::Dec.number(), 12);
    }

    #[test]
    fn event_type_tag_roundtrips_through_from_str() {
        for tag in ["acl_denied_hw", "lineproto_state", "config_from_console"] {
            let parsed: EventType = tag.parse().unwrap();
            assert_eq!(parsed.as_str(), tag);
        }
        assert!("acl_denied_sw".parse::<EventType>().is_err());
    }

    #[test]
    fn event_type_serializes_as_tag() {
        let json = serde_json::to_string(&EventType::LoginFailed).unwrap();
        assert_eq!(json, "\"login_failed\"");
    }

    #[test]
    fn column_lookup_covers_core_and_dynamic() {
        let row = sample_row();
        assert_eq!(row.column("seq").as_deref(), Some("12"));
        assert_eq!(row.column("severity_name").as_deref(), Some("ERROR"));
        assert_eq!(row.column("event_type").as_deref(), Some("link_state"));
        assert_eq!(row.column("f_interface").as_deref(), Some("Gi0/1"));
        assert_eq!(row.column("dt"), None);
        assert_eq!(row.column("f_user"), None);
        assert_eq!(row.column("interface"), None);
    }
}
