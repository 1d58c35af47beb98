//! `logsift` analysis command handler
//!
//! Runs the batch pipeline over one input file, applies the filters,
//! optionally writes the export artifact, and renders the console report.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use logsift_analyzer::export::write_to_path;
use logsift_analyzer::{
    AnalysisReport, AnalyzerError, ExportFormat, FilterEngine, FilterSpec, LogAnalyzerBuilder,
    ParseStats, RegexPredicate, RunOutcome, Schema, Summary,
};
use logsift_core::config::LogsiftConfig;

use crate::cli::AnalyzeArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render, write_table};

/// Execute the analysis.
///
/// `config` already carries the command-line overrides for the parser
/// and output sections; `args` supplies the input path and filters.
pub fn execute(
    args: &AnalyzeArgs,
    config: &LogsiftConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let format: ExportFormat = config
        .output
        .format
        .parse()
        .map_err(AnalyzerError::from)?;
    let filter = FilterEngine::new(build_filter_spec(args)?)?;
    let analyzer = LogAnalyzerBuilder::from_config(&config.parser).build()?;

    info!(input = %args.input.display(), "starting analysis");
    let report = analyzer.run_file(&args.input, &filter)?;

    let export = match (&config.output.path, report.outcome) {
        (Some(path), RunOutcome::Rows | RunOutcome::NoRowsAfterFilter) => {
            Some(export_rows(&report, format, Path::new(path))?)
        }
        _ => None,
    };

    let payload = build_payload(
        &args.input.display().to_string(),
        &report,
        config.output.sample_rows,
        config.output.summary,
        export,
    );
    writer.render(&payload)?;

    match report.outcome {
        RunOutcome::Rows => Ok(()),
        RunOutcome::NoRowsParsed => Err(CliError::NoRowsParsed {
            input: args.input.display().to_string(),
        }),
        RunOutcome::NoRowsAfterFilter => Err(CliError::NoRowsAfterFilter {
            parsed: report.parsed_count(),
        }),
    }
}

/// Combine the optional YAML preset with the command-line filters.
///
/// Command-line predicates replace the preset's predicate of the same kind.
pub fn build_filter_spec(args: &AnalyzeArgs) -> Result<FilterSpec, CliError> {
    let preset = match &args.filter_file {
        Some(path) => FilterSpec::load(path)?,
        None => FilterSpec::default(),
    };

    let regex = match (&args.regex, &args.regex_field) {
        (Some(pattern), Some(field)) => Some(RegexPredicate {
            field: field.clone(),
            pattern: pattern.clone(),
        }),
        (None, None) => None,
        _ => {
            return Err(CliError::Config(
                "--regex and --regex-field must be given together".to_owned(),
            ));
        }
    };

    let overrides = FilterSpec {
        facilities: args.filter_facility.clone(),
        mnemonics: args.filter_mnemonic.clone(),
        event_types: args.filter_event_type.clone(),
        severities: args.filter_severity.clone(),
        interfaces: args.filter_interface.clone(),
        users: args.filter_user.clone(),
        regex,
    };

    Ok(preset.merge(overrides))
}

fn export_rows(
    report: &AnalysisReport,
    format: ExportFormat,
    path: &Path,
) -> Result<ExportInfo, CliError> {
    let rows = report.filtered_rows();
    let bytes = write_to_path(&rows, format, path)?;
    Ok(ExportInfo {
        path: path.display().to_string(),
        format: format.as_str(),
        rows: rows.len(),
        bytes,
    })
}

/// Build the console payload from a finished run.
pub fn build_payload(
    input: &str,
    report: &AnalysisReport,
    sample_rows: usize,
    with_summary: bool,
    export: Option<ExportInfo>,
) -> AnalyzePayload {
    let filtered = report.filtered_rows();
    let columns: Vec<String> = Schema::from_rows(filtered.iter().copied())
        .columns()
        .map(str::to_owned)
        .collect();

    let sample: Vec<Vec<Option<String>>> = filtered
        .iter()
        .take(sample_rows)
        .map(|row| {
            columns
                .iter()
                .map(|c| row.column(c).map(|v| v.into_owned()))
                .collect()
        })
        .collect();

    AnalyzePayload {
        input: input.to_owned(),
        outcome: report.outcome,
        parsed: report.parsed_count(),
        after_filters: report.filtered_count(),
        stats: report.stats,
        columns,
        sample,
        summary: with_summary.then(|| Summary::compute(filtered.iter().copied())),
        export,
    }
}

/// Export artifact written during the run.
#[derive(Debug, Serialize)]
pub struct ExportInfo {
    pub path: String,
    pub format: &'static str,
    pub rows: usize,
    pub bytes: usize,
}

/// Console report for one run.
#[derive(Debug, Serialize)]
pub struct AnalyzePayload {
    pub input: String,
    pub outcome: RunOutcome,
    pub parsed: usize,
    pub after_filters: usize,
    pub stats: ParseStats,
    /// Columns of the filtered row set, core columns first.
    pub columns: Vec<String>,
    /// First filtered rows, one cell per column.
    pub sample: Vec<Vec<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportInfo>,
}

impl Render for AnalyzePayload {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Parsed {} rows. After filters: {} rows.",
            self.parsed, self.after_filters
        )?;

        if self.outcome == RunOutcome::NoRowsParsed {
            writeln!(
                w,
                "{}",
                "No lines parsed. Check input format/path.".yellow()
            )?;
            return Ok(());
        }

        writeln!(w)?;
        writeln!(w, "{}", "Sample parsed rows:".bold())?;
        if self.sample.is_empty() {
            writeln!(w, "  (no rows)")?;
        } else {
            let headers: Vec<&str> = self.columns.iter().map(String::as_str).collect();
            write_table(w, &headers, &self.sample)?;
        }

        if let Some(summary) = &self.summary {
            for table in summary.tables() {
                writeln!(w)?;
                writeln!(w, "{}", format!("Summary: {}", table.name).bold())?;

                let mut headers: Vec<&str> =
                    table.key_columns.iter().map(String::as_str).collect();
                headers.push(&table.count_column);

                let rows: Vec<Vec<Option<String>>> = table
                    .rows
                    .iter()
                    .map(|r| {
                        let mut cells = r.keys.clone();
                        cells.push(Some(r.count.to_string()));
                        cells
                    })
                    .collect();
                write_table(w, &headers, &rows)?;
            }
        }

        if let Some(export) = &self.export {
            writeln!(w)?;
            writeln!(
                w,
                "{}",
                format!(
                    "Wrote {} rows to {} ({}).",
                    export.rows, export.path, export.format
                )
                .green()
            )?;
        }

        Ok(())
    }
}
