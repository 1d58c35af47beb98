//! 배치 파이프라인 -- 읽기/파싱/분류/저장/필터의 전체 흐름
//!
//! [`LogAnalyzer`]는 입력 전체를 한 번에 처리하는 동기 배치 파이프라인입니다.
//! 라인 단위 이상은 실행을 멈추지 않으며, 파일을 읽을 수 없는 경우만 치명적입니다.
//!
//! # 내부 흐름
//! ```text
//! bytes -> split_lines -> PrefixParser -> normalize -> ExtractorChain -> RowStore -> FilterEngine
//! ```
//!
//! # 사용 예시
//! ```ignore
//! use logsift_analyzer::{FilterEngine, FilterSpec, LogAnalyzerBuilder};
//!
//! let analyzer = LogAnalyzerBuilder::new().year(2023).build()?;
//! let filter = FilterEngine::new(FilterSpec::default())?;
//! let report = analyzer.run_file("router.log", &filter)?;
//! println!("Parsed {} rows. After filters: {} rows.", report.parsed_count(), report.filtered_count());
//! ```

use std::path::Path;

use logsift_core::config::ParserConfig;
use logsift_core::metrics as m;
use logsift_core::pipeline::EventExtractor;
use logsift_core::types::ClassifiedRow;

use crate::error::AnalyzerError;
use crate::extractor::ExtractorChain;
use crate::filter::FilterEngine;
use crate::normalize;
use crate::parser::{PrefixParser, split_lines};
use crate::store::RowStore;
use crate::summary::Summary;

/// 분류되지 않은 행의 메트릭 레이블 값
const UNCLASSIFIED: &str = "unclassified";

/// 라인 처리 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ParseStats {
    /// 읽은 전체 라인 수
    pub lines_read: usize,
    /// 접두부 파싱에 성공한 행 수
    pub rows_parsed: usize,
    /// 접두부 문법에 맞지 않아 드롭된 라인 수
    pub dropped: usize,
    /// `max_line_length`를 넘어 건너뛴 라인 수 (제한을 설정한 경우만)
    pub oversized: usize,
    /// 이벤트 패밀리로 분류된 행 수
    pub classified: usize,
}

/// 실행 결과 구분
///
/// "파싱된 행 없음"과 "필터 후 행 없음"을 호출자가 구별할 수 있어야 합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// 필터를 통과한 행이 있음
    Rows,
    /// 입력에서 파싱된 행이 하나도 없음 (입력 형식 또는 경로 의심)
    NoRowsParsed,
    /// 행은 파싱되었지만 필터를 통과한 행이 없음
    NoRowsAfterFilter,
}

/// 한 번의 실행 결과
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub stats: ParseStats,
    /// 파싱된 전체 행
    pub rows: RowStore,
    /// 필터를 통과한 행의 인덱스 (오름차순)
    pub filtered: Vec<usize>,
    pub outcome: RunOutcome,
}

impl AnalysisReport {
    /// 필터를 통과한 행 (입력 순서)
    pub fn filtered_rows(&self) -> Vec<&ClassifiedRow> {
        self.filtered
            .iter()
            .filter_map(|&idx| self.rows.rows().get(idx))
            .collect()
    }

    pub fn parsed_count(&self) -> usize {
        self.rows.len()
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    /// 필터를 통과한 행의 요약
    pub fn summary(&self) -> Summary {
        Summary::compute(self.filtered_rows())
    }
}

/// 로그 분석기
pub struct LogAnalyzer {
    parser: PrefixParser,
    chain: ExtractorChain,
    year: Option<i32>,
    report_dropped: bool,
    max_line_length: Option<usize>,
}

impl LogAnalyzer {
    /// 기본 설정의 분석기를 생성합니다.
    pub fn new() -> Result<Self, AnalyzerError> {
        LogAnalyzerBuilder::new().build()
    }

    /// 등록된 추출기 이름 (우선순위 순)
    pub fn extractor_names(&self) -> Vec<&str> {
        self.chain.names()
    }

    /// 한 줄을 분류합니다. 접두부 문법에 맞지 않으면 `None`입니다.
    pub fn classify_line(&self, line_number: usize, line: &str) -> Option<ClassifiedRow> {
        let envelope = self.parser.parse(line)?;
        let severity_name = normalize::severity_name(envelope.severity);
        let datetime = normalize::envelope_datetime(self.year, &envelope);
        let (event_type, fields) = match self.chain.classify(&envelope.message) {
            Some(ex) => (Some(ex.event_type), ex.fields),
            None => (None, Vec::new()),
        };

        Some(ClassifiedRow {
            line_number,
            envelope,
            severity_name,
            event_type,
            fields,
            datetime,
        })
    }

    /// 입력 바이트 전체를 처리합니다.
    pub fn analyze_bytes(&self, input: &[u8]) -> (RowStore, ParseStats) {
        let mut store = RowStore::new();
        let mut stats = ParseStats::default();

        for (line_number, line) in split_lines(input) {
            stats.lines_read += 1;

            if let Some(max) = self.max_line_length.filter(|&max| line.len() > max) {
                stats.oversized += 1;
                if self.report_dropped {
                    tracing::warn!(
                        line = line_number,
                        length = line.len(),
                        max,
                        "skipped line exceeding maximum length"
                    );
                }
                continue;
            }

            match self.classify_line(line_number, &line) {
                Some(row) => {
                    let label = row.event_type.map_or(UNCLASSIFIED, |e| e.as_str());
                    metrics::counter!(m::ROWS_CLASSIFIED_TOTAL, m::LABEL_EVENT_TYPE => label)
                        .increment(1);
                    if row.event_type.is_some() {
                        stats.classified += 1;
                    }
                    stats.rows_parsed += 1;
                    store.push(row);
                }
                None => {
                    stats.dropped += 1;
                    if self.report_dropped {
                        tracing::warn!(
                            line = line_number,
                            "dropped line not matching prefix grammar"
                        );
                    }
                }
            }
        }

        metrics::counter!(m::LINES_READ_TOTAL).increment(stats.lines_read as u64);
        metrics::counter!(m::LINES_DROPPED_TOTAL).increment(stats.dropped as u64);
        metrics::counter!(m::LINES_OVERSIZED_TOTAL).increment(stats.oversized as u64);
        metrics::counter!(m::ROWS_PARSED_TOTAL).increment(stats.rows_parsed as u64);

        tracing::debug!(
            lines = stats.lines_read,
            rows = stats.rows_parsed,
            dropped = stats.dropped,
            oversized = stats.oversized,
            classified = stats.classified,
            "analyzed input"
        );

        (store, stats)
    }

    /// 문자열 입력을 처리합니다.
    pub fn analyze_str(&self, input: &str) -> (RowStore, ParseStats) {
        self.analyze_bytes(input.as_bytes())
    }

    /// 파일을 읽어 처리합니다.
    ///
    /// # Errors
    /// 파일을 읽을 수 없으면 원인 I/O 에러와 함께 반환합니다.
    pub fn analyze_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(RowStore, ParseStats), AnalyzerError> {
        let bytes = read_input(path.as_ref())?;
        Ok(self.analyze_bytes(&bytes))
    }

    /// 입력을 처리하고 필터를 적용합니다.
    pub fn run(&self, input: &[u8], filter: &FilterEngine) -> AnalysisReport {
        let (rows, stats) = self.analyze_bytes(input);
        let filtered = filter.select(rows.rows());
        metrics::counter!(m::ROWS_FILTERED_TOTAL).increment(filtered.len() as u64);

        let outcome = if rows.is_empty() {
            RunOutcome::NoRowsParsed
        } else if filtered.is_empty() {
            RunOutcome::NoRowsAfterFilter
        } else {
            RunOutcome::Rows
        };

        tracing::info!(
            parsed = rows.len(),
            filtered = filtered.len(),
            outcome = ?outcome,
            "analysis complete"
        );

        AnalysisReport {
            stats,
            rows,
            filtered,
            outcome,
        }
    }

    /// 파일을 읽어 처리하고 필터를 적용합니다.
    pub fn run_file(
        &self,
        path: impl AsRef<Path>,
        filter: &FilterEngine,
    ) -> Result<AnalysisReport, AnalyzerError> {
        let bytes = read_input(path.as_ref())?;
        Ok(self.run(&bytes, filter))
    }
}

/// 입력 파일 전체를 읽습니다.
fn read_input(path: &Path) -> Result<Vec<u8>, AnalyzerError> {
    let bytes = std::fs::read(path).map_err(|source| AnalyzerError::Input {
        path: path.display().to_string(),
        source,
    })?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "reading input");
    Ok(bytes)
}

/// 로그 분석기 빌더
pub struct LogAnalyzerBuilder {
    year: Option<i32>,
    report_dropped: bool,
    max_line_length: Option<usize>,
    extractors: Vec<Box<dyn EventExtractor>>,
}

impl LogAnalyzerBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            year: None,
            report_dropped: false,
            max_line_length: None,
            extractors: Vec::new(),
        }
    }

    /// `[parser]` 설정 섹션에서 빌더를 생성합니다.
    pub fn from_config(config: &ParserConfig) -> Self {
        Self {
            year: config.year,
            report_dropped: config.report_dropped,
            max_line_length: config.max_line_length,
            ..Self::new()
        }
    }

    /// 타임스탬프 재구성에 사용할 연도를 지정합니다.
    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// 드롭된 라인을 경고 로그로 보고할지 지정합니다.
    pub fn report_dropped(mut self, report: bool) -> Self {
        self.report_dropped = report;
        self
    }

    /// 최대 라인 길이를 지정합니다. 초과하는 라인은 드롭됩니다.
    pub fn max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = Some(max);
        self
    }

    /// 기본 추출기 뒤에 실행될 추출기를 추가합니다.
    pub fn extractor(mut self, extractor: Box<dyn EventExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    /// 분석기를 빌드합니다.
    ///
    /// # Errors
    /// - `max_line_length`가 0인 경우
    /// - 내장 패턴 컴파일에 실패한 경우
    pub fn build(self) -> Result<LogAnalyzer, AnalyzerError> {
        if self.max_line_length == Some(0) {
            return Err(AnalyzerError::Config {
                field: "max_line_length".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        let chain = self
            .extractors
            .into_iter()
            .fold(ExtractorChain::with_defaults()?, ExtractorChain::register);

        Ok(LogAnalyzer {
            parser: PrefixParser::new()?,
            chain,
            year: self.year,
            report_dropped: self.report_dropped,
            max_line_length: self.max_line_length,
        })
    }
}

impl Default for LogAnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
