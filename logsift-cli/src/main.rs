//! logsift -- batch analyzer for vendor-formatted syslog exports.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::path::Path;

use clap::Parser;

use logsift_core::config::LogsiftConfig;
use logsift_core::error::{ConfigError, LogsiftError};

use crate::cli::{Cli, DEFAULT_CONFIG_PATH};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli).await?;
    logging::init_tracing(&config.general)?;
    logsift_core::metrics::describe_metrics();

    let writer = OutputWriter::new(cli.output_format);
    commands::analyze::execute(&cli.analyze, &config, &writer)
}

/// Load configuration with precedence: CLI flag > environment > file > defaults.
///
/// A missing file at the default path falls back to defaults; a missing
/// file passed with `--config` is an error.
async fn load_config(cli: &Cli) -> Result<LogsiftConfig, CliError> {
    let path = cli
        .config
        .as_deref()
        .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));

    let mut config = match LogsiftConfig::from_file(path).await {
        Ok(config) => config,
        Err(LogsiftError::Config(ConfigError::FileNotFound { .. })) if cli.config.is_none() => {
            LogsiftConfig::default()
        }
        Err(e) => return Err(e.into()),
    };

    config.apply_env_overrides();
    apply_cli_overrides(&mut config, cli);
    config.validate()?;
    Ok(config)
}

fn apply_cli_overrides(config: &mut LogsiftConfig, cli: &Cli) {
    let args = &cli.analyze;

    if let Some(level) = &cli.log_level {
        config.general.log_level = level.clone();
    }
    if let Some(year) = args.year {
        config.parser.year = Some(year);
    }
    if args.report_dropped {
        config.parser.report_dropped = true;
    }
    if let Some(path) = &args.output {
        config.output.path = Some(path.display().to_string());
    }
    if let Some(format) = &args.format {
        config.output.format = format.clone();
    }
    if args.summary {
        config.output.summary = true;
    }
    if let Some(rows) = args.sample_rows {
        config.output.sample_rows = rows;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Cli {
        Cli::try_parse_from(argv).expect("should parse")
    }

    #[test]
    fn cli_flags_override_config() {
        let mut config = LogsiftConfig::default();
        let cli = parse(&[
            "logsift",
            "-i",
            "router.log",
            "-y",
            "2023",
            "-o",
            "out.json",
            "--format",
            "json",
            "--summary",
            "--sample-rows",
            "3",
            "--log-level",
            "debug",
        ]);

        apply_cli_overrides(&mut config, &cli);

        assert_eq!(config.parser.year, Some(2023));
        assert_eq!(config.output.path.as_deref(), Some("out.json"));
        assert_eq!(config.output.format, "json");
        assert!(config.output.summary);
        assert_eq!(config.output.sample_rows, 3);
        assert_eq!(config.general.log_level, "debug");
    }

    #[test]
    fn absent_flags_keep_config_values() {
        let mut config = LogsiftConfig::parse(
            "[parser]\nyear = 2022\n[output]\nformat = \"json\"\nsummary = true\n",
        )
        .expect("valid config");
        let cli = parse(&["logsift", "-i", "router.log"]);

        apply_cli_overrides(&mut config, &cli);

        assert_eq!(config.parser.year, Some(2022));
        assert_eq!(config.output.format, "json");
        assert!(config.output.summary);
    }

    #[tokio::test]
    async fn explicit_missing_config_is_error() {
        let cli = parse(&["logsift", "-i", "router.log", "-c", "/nonexistent/logsift.toml"]);
        let err = load_config(&cli).await.expect_err("explicit path must exist");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn unsupported_format_flag_is_config_error() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("logsift.toml");
        std::fs::write(&path, "").expect("write config");
        let path_arg = path.display().to_string();

        let cli = parse(&["logsift", "-i", "router.log", "-c", &path_arg, "--format", "xml"]);
        let err = load_config(&cli).await.expect_err("xml is not an export format");
        assert_eq!(err.exit_code(), 2);
    }
}
