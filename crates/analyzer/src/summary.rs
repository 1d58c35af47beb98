//! 집계 -- 행 집합에 대한 요약 테이블 계산
//!
//! 모든 행이 만들어진 뒤 한 번에 계산하는 순수 함수입니다.
//! 각 테이블은 독립적으로 계산되며 실패하지 않습니다. 선행 컬럼이
//! 데이터에 전혀 없거나 대상 행이 없으면 해당 테이블은 생략됩니다.
//!
//! | 테이블 | 키 | 개수 컬럼 | 정렬 |
//! |---|---|---|---|
//! | `by_event_type` | event_type | count | 개수 내림차순 |
//! | `by_mnemonic` | mnemonic | count | 개수 내림차순 |
//! | `by_severity_name` | severity_name | count | 개수 내림차순 |
//! | `top_failed_sources` | src_ip | failed_logins | 개수 내림차순 |
//! | `interface_flaps` | event_type, f_interface, f_state | count | 키 오름차순 |
//! | `acl_denies` | event_type, f_acl | count | 키 오름차순 |

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use logsift_core::types::{ClassifiedRow, EventType};

/// 기본 개수 컬럼 이름
const COUNT_COLUMN: &str = "count";

/// 요약 테이블의 한 행
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    /// 키 값 (값이 없는 그룹은 `None`)
    pub keys: Vec<Option<String>>,
    pub count: usize,
}

/// 이름이 붙은 요약 테이블
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryTable {
    pub name: String,
    pub key_columns: Vec<String>,
    pub count_column: String,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    /// 모든 행의 개수 합
    pub fn total(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }

    /// 첫 번째 키 값으로 개수를 조회합니다.
    pub fn count_of(&self, key: Option<&str>) -> Option<usize> {
        self.rows
            .iter()
            .find(|r| r.keys.first().map(Option::as_deref) == Some(key))
            .map(|r| r.count)
    }
}

/// 요약 테이블 모음 (계산 순서 유지)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    tables: Vec<SummaryTable>,
}

impl Summary {
    /// 행 집합의 요약을 계산합니다.
    pub fn compute<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a ClassifiedRow>,
    {
        let rows: Vec<&ClassifiedRow> = rows.into_iter().collect();
        let mut tables = Vec::new();

        if rows.is_empty() {
            return Self { tables };
        }

        tables.push(frequency("by_event_type", "event_type", &rows, |r| {
            r.event_type.map(|e| e.as_str().to_owned())
        }));
        tables.push(frequency("by_mnemonic", "mnemonic", &rows, |r| {
            Some(r.envelope.mnemonic.clone())
        }));
        tables.push(frequency("by_severity_name", "severity_name", &rows, |r| {
            r.severity_name.map(str::to_owned)
        }));

        tables.extend(top_failed_sources(&rows));
        tables.extend(interface_flaps(&rows));
        tables.extend(acl_denies(&rows));

        tracing::debug!(tables = tables.len(), rows = rows.len(), "computed summary");

        Self { tables }
    }

    /// 이름으로 테이블을 조회합니다.
    pub fn get(&self, name: &str) -> Option<&SummaryTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn tables(&self) -> &[SummaryTable] {
        &self.tables
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// 값 빈도 테이블. 개수 내림차순, 동률은 최초 등장 순서.
fn frequency<F>(name: &str, column: &str, rows: &[&ClassifiedRow], key: F) -> SummaryTable
where
    F: Fn(&ClassifiedRow) -> Option<String>,
{
    counted_table(
        name,
        vec![column.to_owned()],
        COUNT_COLUMN,
        rows.iter().map(|r| vec![key(*r)]),
    )
}

/// 키 목록을 세고 개수 내림차순(동률은 최초 등장 순서)으로 정렬합니다.
fn counted_table<I>(
    name: &str,
    key_columns: Vec<String>,
    count_column: &str,
    keys: I,
) -> SummaryTable
where
    I: Iterator<Item = Vec<Option<String>>>,
{
    let mut index: HashMap<Vec<Option<String>>, usize> = HashMap::new();
    let mut rows: Vec<SummaryRow> = Vec::new();

    for key in keys {
        match index.get(&key) {
            Some(&idx) => rows[idx].count += 1,
            None => {
                index.insert(key.clone(), rows.len());
                rows.push(SummaryRow {
                    keys: key,
                    count: 1,
                });
            }
        }
    }

    // 안정 정렬이므로 동률은 최초 등장 순서 유지
    rows.sort_by(|a, b| b.count.cmp(&a.count));

    SummaryTable {
        name: name.to_owned(),
        key_columns,
        count_column: count_column.to_owned(),
        rows,
    }
}

/// 키가 모두 있는 행만 그룹화하고 키 오름차순으로 정렬합니다.
fn grouped_table(name: &str, key_columns: &[&str], groups: Vec<Vec<String>>) -> Option<SummaryTable> {
    if groups.is_empty() {
        return None;
    }

    let mut counts: BTreeMap<Vec<String>, usize> = BTreeMap::new();
    for key in groups {
        *counts.entry(key).or_default() += 1;
    }

    Some(SummaryTable {
        name: name.to_owned(),
        key_columns: key_columns.iter().map(|c| (*c).to_owned()).collect(),
        count_column: COUNT_COLUMN.to_owned(),
        rows: counts
            .into_iter()
            .map(|(keys, count)| SummaryRow {
                keys: keys.into_iter().map(Some).collect(),
                count,
            })
            .collect(),
    })
}

/// 실패 로그인 출발지 순위
fn top_failed_sources(rows: &[&ClassifiedRow]) -> Option<SummaryTable> {
    let sources: Vec<_> = rows
        .iter()
        .filter(|r| r.event_type == Some(EventType::LoginFailed))
        .filter_map(|r| r.field("src_ip"))
        .map(|ip| vec![Some(ip.to_owned())])
        .collect();

    if sources.is_empty() {
        return None;
    }

    Some(counted_table(
        "top_failed_sources",
        vec!["src_ip".to_owned()],
        "failed_logins",
        sources.into_iter(),
    ))
}

/// 인터페이스 상태 변경 집계
fn interface_flaps(rows: &[&ClassifiedRow]) -> Option<SummaryTable> {
    let groups = rows
        .iter()
        .filter_map(|r| {
            let event_type = r.event_type.filter(|e| e.is_interface_flap())?;
            Some(vec![
                event_type.as_str().to_owned(),
                r.field("interface")?.to_owned(),
                r.field("state")?.to_owned(),
            ])
        })
        .collect();

    grouped_table(
        "interface_flaps",
        &["event_type", "f_interface", "f_state"],
        groups,
    )
}

/// ACL 거부 집계 (소프트웨어/하드웨어 경로)
fn acl_denies(rows: &[&ClassifiedRow]) -> Option<SummaryTable> {
    let groups = rows
        .iter()
        .filter_map(|r| {
            let event_type = r.event_type.filter(|e| e.is_acl_deny())?;
            Some(vec![
                event_type.as_str().to_owned(),
                r.field("acl")?.to_owned(),
            ])
        })
        .collect();

    grouped_table("acl_denies", &["event_type", "f_acl"], groups)
}
