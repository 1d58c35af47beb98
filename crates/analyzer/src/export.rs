//! 내보내기 -- 행 집합을 CSV 또는 JSON 배열로 직렬화
//!
//! 컬럼 순서는 핵심 컬럼 다음 동적 컬럼이며, 내보내는 행들로부터 계산됩니다.
//! 전체 결과를 메모리에서 만든 뒤 파일을 쓰므로 직렬화가 실패하면
//! 파일이 생성되지 않습니다.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use serde::ser::SerializeMap;
use serde_json::Value;

use logsift_core::error::ExportError;
use logsift_core::types::ClassifiedRow;

use crate::error::AnalyzerError;
use crate::store::Schema;

/// 숫자로 내보내는 핵심 컬럼
const NUMERIC_COLUMNS: [&str; 3] = ["seq", "day", "severity"];

/// 출력 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(ExportError::UnsupportedFormat(s.to_owned())),
        }
    }
}

/// 행 집합을 메모리에서 직렬화합니다.
pub fn render(rows: &[&ClassifiedRow], format: ExportFormat) -> Result<Vec<u8>, AnalyzerError> {
    let schema = Schema::from_rows(rows.iter().copied());
    let columns: Vec<&str> = schema.columns().collect();

    match format {
        ExportFormat::Csv => render_csv(rows, &columns),
        ExportFormat::Json => render_json(rows, &columns),
    }
}

/// 직렬화 후 파일로 씁니다. 쓴 바이트 수를 반환합니다.
pub fn write_to_path(
    rows: &[&ClassifiedRow],
    format: ExportFormat,
    path: impl AsRef<Path>,
) -> Result<usize, AnalyzerError> {
    let path = path.as_ref();
    let bytes = render(rows, format)?;
    std::fs::write(path, &bytes)?;

    tracing::info!(
        path = %path.display(),
        format = %format,
        rows = rows.len(),
        bytes = bytes.len(),
        "wrote export"
    );
    Ok(bytes.len())
}

fn render_csv(rows: &[&ClassifiedRow], columns: &[&str]) -> Result<Vec<u8>, AnalyzerError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(columns)?;

    for row in rows {
        let record: Vec<String> = columns
            .iter()
            .map(|c| row.column(c).map(|v| v.into_owned()).unwrap_or_default())
            .collect();
        wtr.write_record(&record)?;
    }

    wtr.into_inner()
        .map_err(|e| AnalyzerError::Export(e.to_string()))
}

fn render_json(rows: &[&ClassifiedRow], columns: &[&str]) -> Result<Vec<u8>, AnalyzerError> {
    let records: Vec<JsonRecord<'_>> = rows
        .iter()
        .map(|row| JsonRecord { row: *row, columns })
        .collect();
    Ok(serde_json::to_vec(&records)?)
}

/// 스키마 순서로 직렬화되는 JSON 객체
struct JsonRecord<'a> {
    row: &'a ClassifiedRow,
    columns: &'a [&'a str],
}

impl Serialize for JsonRecord<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in self.columns {
            map.serialize_entry(column, &json_value(self.row, column))?;
        }
        map.end()
    }
}

/// 컬럼 값을 JSON 값으로 변환합니다. 값이 없으면 `null`입니다.
fn json_value(row: &ClassifiedRow, column: &str) -> Value {
    if NUMERIC_COLUMNS.contains(&column) {
        let env = &row.envelope;
        return match column {
            "seq" => env.sequence.map_or(Value::Null, Value::from),
            "day" => Value::from(env.day),
            _ => env.severity.map_or(Value::Null, Value::from),
        };
    }

    row.column(column)
        .map_or(Value::Null, |v| Value::String(v.into_owned()))
}
