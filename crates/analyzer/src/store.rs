//! 행 저장소 -- 분류된 행의 추가 전용 컬렉션과 테이블 스키마
//!
//! 행은 입력 라인 순서대로 추가되며 이후 변경되지 않습니다.
//! 동적 컬럼(`f_<name>`)은 저장 시점이 아니라 [`Schema::from_rows`] 호출 시
//! 행들의 필드 이름 합집합으로 계산됩니다.

use logsift_core::types::{CORE_COLUMNS, ClassifiedRow, FIELD_PREFIX};

/// 테이블 모델 스키마
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// 동적 컬럼 (`f_` 접두어 포함, 최초 등장 순서)
    dynamic: Vec<String>,
}

impl Schema {
    /// 주어진 행들의 스키마를 계산합니다.
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a ClassifiedRow>,
    {
        let mut dynamic: Vec<String> = Vec::new();
        for row in rows {
            for (name, _) in &row.fields {
                let column = format!("{FIELD_PREFIX}{name}");
                if !dynamic.contains(&column) {
                    dynamic.push(column);
                }
            }
        }
        Self { dynamic }
    }

    /// 핵심 컬럼
    pub fn core(&self) -> &'static [&'static str] {
        &CORE_COLUMNS
    }

    /// 동적 컬럼
    pub fn dynamic(&self) -> &[String] {
        &self.dynamic
    }

    /// 전체 컬럼 (핵심 컬럼 다음 동적 컬럼)
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        CORE_COLUMNS
            .iter()
            .copied()
            .chain(self.dynamic.iter().map(String::as_str))
    }

    /// 컬럼이 스키마에 존재하는지 확인합니다.
    pub fn has_column(&self, name: &str) -> bool {
        CORE_COLUMNS.contains(&name) || self.dynamic.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        CORE_COLUMNS.len() + self.dynamic.len()
    }

    /// 핵심 컬럼이 항상 있으므로 비어 있는 경우는 없습니다.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// 분류된 행의 추가 전용 저장소
#[derive(Debug, Clone, Default)]
pub struct RowStore {
    rows: Vec<ClassifiedRow>,
}

impl RowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 예상 행 수만큼 미리 할당합니다.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
        }
    }

    /// 행을 끝에 추가합니다.
    pub fn push(&mut self, row: ClassifiedRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClassifiedRow> {
        self.rows.iter()
    }

    /// 저장된 행 슬라이스 (입력 순서)
    pub fn rows(&self) -> &[ClassifiedRow] {
        &self.rows
    }

    /// 저장소 전체의 스키마
    pub fn schema(&self) -> Schema {
        Schema::from_rows(&self.rows)
    }

    /// 저장소를 소비하여 행 벡터를 반환합니다.
    pub fn into_rows(self) -> Vec<ClassifiedRow> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a RowStore {
    type Item = &'a ClassifiedRow;
    type IntoIter = std::slice::Iter<'a, ClassifiedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
