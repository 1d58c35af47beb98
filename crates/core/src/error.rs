//! 에러 타입 -- 도메인별 에러 정의
//!
//! 라인 단위 이상(접두부 불일치, 분류 실패, 달력 재구성 실패)은 에러가 아닙니다.
//! 여기에 정의된 에러는 설정 또는 파일 수준의 치명적 실패만 표현합니다.

/// logsift 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogsiftError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파서 구성 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// 내보내기 에러
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파서 구성 에러
///
/// 개별 라인의 파싱 실패는 조용히 드롭되므로 여기에 포함되지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 내장 패턴 또는 사용자 정규식 컴파일 실패
    #[error("invalid pattern '{name}': {reason}")]
    InvalidPattern { name: String, reason: String },

    /// 입력 데이터 초과
    #[error("input too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },
}

/// 내보내기 에러
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// 지원하지 않는 출력 형식
    #[error("unsupported output format: '{0}' (expected: csv, json)")]
    UnsupportedFormat(String),

    /// 직렬화 실패
    #[error("serialization failed: {0}")]
    Serialize(String),
}
