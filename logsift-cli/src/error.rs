//! CLI-specific error types and exit code mapping

use logsift_analyzer::AnalyzerError;
use logsift_core::error::LogsiftError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A command-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The input produced no rows at all.
    #[error("no lines parsed from {input}; check input format/path")]
    NoRowsParsed { input: String },

    /// Rows were parsed but every one was filtered out.
    #[error("{parsed} rows parsed but none matched the filters")]
    NoRowsAfterFilter { parsed: usize },

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from logsift-core.
    #[error("{0}")]
    Core(#[from] LogsiftError),

    /// Wrapped domain error from logsift-analyzer.
    #[error("{0}")]
    Analyzer(#[from] AnalyzerError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                  |
    /// |------|------------------------------------------|
    /// | 0    | Success                                  |
    /// | 1    | General / command error                  |
    /// | 2    | Configuration error                      |
    /// | 3    | Zero rows parsed from the input          |
    /// | 4    | Rows parsed, but none after filtering    |
    /// | 10   | IO error                                 |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::NoRowsParsed { .. } => 3,
            Self::NoRowsAfterFilter { .. } => 4,
            Self::Io(_) => 10,
            Self::Core(e) => match e {
                LogsiftError::Config(_) => 2,
                LogsiftError::Io(_) => 10,
                LogsiftError::Parse(_) | LogsiftError::Export(_) => 1,
            },
            Self::Analyzer(e) => match e {
                AnalyzerError::Config { .. }
                | AnalyzerError::FilterLoad { .. }
                | AnalyzerError::UnsupportedFormat(_)
                | AnalyzerError::Regex(_) => 2,
                AnalyzerError::Input { .. } | AnalyzerError::Io(_) => 10,
                AnalyzerError::Export(_) => 1,
            },
            Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}
