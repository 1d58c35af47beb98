//! 분석기 에러 타입
//!
//! [`AnalyzerError`]는 분석 파이프라인에서 발생하는 치명적 에러를 표현합니다.
//! 라인 단위 이상(접두부 불일치, 분류 실패, 달력 재구성 실패)은 에러가 아니며
//! 여기에 포함되지 않습니다.
//! `From<AnalyzerError> for LogsiftError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use logsift_core::error::{ConfigError, ExportError, LogsiftError, ParseError};

/// 분석기 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// 입력 파일을 읽을 수 없음
    #[error("input error: {path}: {source}")]
    Input {
        /// 입력 파일 경로
        path: String,
        /// 원인 I/O 에러
        #[source]
        source: std::io::Error,
    },

    /// 필터 프리셋 로딩 실패
    #[error("filter load error: {path}: {reason}")]
    FilterLoad {
        /// 프리셋 파일 경로
        path: String,
        /// 로딩 실패 사유
        reason: String,
    },

    /// 설정 에러 (잘못된 정규식, 지원하지 않는 형식 등)
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 지원하지 않는 내보내기 형식
    #[error("unsupported output format: '{0}' (expected: csv, json)")]
    UnsupportedFormat(String),

    /// 내보내기 직렬화 실패
    #[error("export error: {0}")]
    Export(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<csv::Error> for AnalyzerError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<serde_json::Error> for AnalyzerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<ExportError> for AnalyzerError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::UnsupportedFormat(format) => Self::UnsupportedFormat(format),
            ExportError::Serialize(reason) => Self::Export(reason),
        }
    }
}

impl From<AnalyzerError> for LogsiftError {
    fn from(err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::Input { source, .. } => LogsiftError::Io(source),
            AnalyzerError::Io(e) => LogsiftError::Io(e),
            AnalyzerError::UnsupportedFormat(format) => {
                LogsiftError::Export(ExportError::UnsupportedFormat(format))
            }
            AnalyzerError::Export(reason) => LogsiftError::Export(ExportError::Serialize(reason)),
            AnalyzerError::Regex(e) => LogsiftError::Parse(ParseError::InvalidPattern {
                name: "regex".to_owned(),
                reason: e.to_string(),
            }),
            AnalyzerError::Config { field, reason } => {
                LogsiftError::Config(ConfigError::InvalidValue { field, reason })
            }
            AnalyzerError::FilterLoad { path, reason } => {
                LogsiftError::Config(ConfigError::ParseFailed {
                    reason: format!("{path}: {reason}"),
                })
            }
        }
    }
}
