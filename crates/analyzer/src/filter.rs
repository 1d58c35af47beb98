//! 필터 엔진 -- 행 집합에 대한 순수 부분집합 연산
//!
//! [`FilterSpec`]의 각 조건은 독립적으로 선택 사항이며 AND로 결합됩니다.
//! 평가 순서: facility → mnemonic → event_type → severity → interface → user → regex.
//!
//! # 조건 의미
//! - 집합 조건이 `None`이거나 빈 목록이면 no-op입니다.
//! - 집합 조건은 행에 값이 없으면 실패합니다. 따라서 데이터 어디에도 없는
//!   컬럼(예: 인터페이스 이벤트가 없는데 `interfaces` 지정)은 빈 결과를 만듭니다.
//! - 정규식 조건은 스키마에 없는 컬럼을 대상으로 하면 건너뜁니다.
//!   컬럼이 존재하지만 해당 행에 값이 없으면 실패합니다.
//! - 정규식은 대상 값의 어느 위치에서든 매칭되면 통과합니다 (검색 의미).
//!
//! # YAML 프리셋
//! ```yaml
//! event_types: [login_failed, login_success]
//! users: [admin]
//! regex:
//!   field: message
//!   pattern: "Source: 10\\."
//! ```

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use logsift_core::types::ClassifiedRow;

use crate::error::AnalyzerError;
use crate::store::Schema;

/// 프리셋 파일 최대 크기
const MAX_FILTER_FILE_SIZE: u64 = 1024 * 1024; // 1MB

/// 명명된 컬럼에 대한 정규식 조건
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegexPredicate {
    /// 대상 컬럼 이름 (핵심 컬럼 또는 `f_` 동적 컬럼)
    pub field: String,
    /// 정규식 패턴
    pub pattern: String,
}

/// 필터 조건 모음
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSpec {
    pub facilities: Option<Vec<String>>,
    pub mnemonics: Option<Vec<String>>,
    /// 이벤트 패밀리 태그 (알 수 없는 태그는 어떤 행과도 일치하지 않음)
    pub event_types: Option<Vec<String>>,
    /// 숫자 심각도
    pub severities: Option<Vec<u32>>,
    /// `f_interface` 값
    pub interfaces: Option<Vec<String>>,
    /// `f_user` 값
    pub users: Option<Vec<String>>,
    pub regex: Option<RegexPredicate>,
}

impl FilterSpec {
    /// 활성화된 조건이 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        fn inactive<T>(set: &Option<Vec<T>>) -> bool {
            set.as_ref().is_none_or(Vec::is_empty)
        }

        inactive(&self.facilities)
            && inactive(&self.mnemonics)
            && inactive(&self.event_types)
            && inactive(&self.severities)
            && inactive(&self.interfaces)
            && inactive(&self.users)
            && self.regex.is_none()
    }

    /// YAML 문자열에서 필터를 파싱합니다.
    pub fn from_yaml(yaml: &str, source: &str) -> Result<Self, AnalyzerError> {
        serde_yaml::from_str(yaml).map_err(|e| AnalyzerError::FilterLoad {
            path: source.to_owned(),
            reason: e.to_string(),
        })
    }

    /// YAML 프리셋 파일에서 필터를 로드합니다.
    ///
    /// # Errors
    /// - 파일을 읽을 수 없거나 크기 제한을 넘는 경우
    /// - YAML 형식이 잘못된 경우
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnalyzerError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let metadata = std::fs::metadata(path).map_err(|e| AnalyzerError::FilterLoad {
            path: display.clone(),
            reason: format!("failed to read file metadata: {e}"),
        })?;

        if metadata.len() > MAX_FILTER_FILE_SIZE {
            return Err(AnalyzerError::FilterLoad {
                path: display,
                reason: format!(
                    "file too large: {} bytes (max: {MAX_FILTER_FILE_SIZE})",
                    metadata.len()
                ),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| AnalyzerError::FilterLoad {
            path: display.clone(),
            reason: format!("failed to read file: {e}"),
        })?;

        let spec = Self::from_yaml(&content, &display)?;
        let preset_path = &display;
        tracing::debug!(path = %preset_path, "loaded filter preset");
        Ok(spec)
    }

    /// 다른 필터의 조건으로 덮어씁니다. `other`에 지정된 조건만 교체됩니다.
    pub fn merge(mut self, other: FilterSpec) -> Self {
        if other.facilities.is_some() {
            self.facilities = other.facilities;
        }
        if other.mnemonics.is_some() {
            self.mnemonics = other.mnemonics;
        }
        if other.event_types.is_some() {
            self.event_types = other.event_types;
        }
        if other.severities.is_some() {
            self.severities = other.severities;
        }
        if other.interfaces.is_some() {
            self.interfaces = other.interfaces;
        }
        if other.users.is_some() {
            self.users = other.users;
        }
        if other.regex.is_some() {
            self.regex = other.regex;
        }
        self
    }
}

/// 컴파일된 필터
///
/// 정규식은 생성 시 한 번만 컴파일됩니다.
pub struct FilterEngine {
    spec: FilterSpec,
    regex: Option<(String, Regex)>,
}

impl FilterEngine {
    /// 필터를 컴파일합니다.
    ///
    /// # Errors
    /// 정규식이 잘못된 경우 설정 에러를 반환합니다.
    pub fn new(spec: FilterSpec) -> Result<Self, AnalyzerError> {
        let regex = match &spec.regex {
            Some(pred) => {
                let compiled = Regex::new(&pred.pattern).map_err(|e| AnalyzerError::Config {
                    field: "regex".to_owned(),
                    reason: format!("invalid pattern for field '{}': {e}", pred.field),
                })?;
                Some((pred.field.clone(), compiled))
            }
            None => None,
        };
        Ok(Self { spec, regex })
    }

    /// 컴파일에 사용된 조건
    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    /// 조건을 만족하는 행만 입력 순서대로 반환합니다. 입력은 변경하지 않습니다.
    pub fn apply<'a>(&self, rows: &'a [ClassifiedRow]) -> Vec<&'a ClassifiedRow> {
        self.select(rows)
            .into_iter()
            .filter_map(|idx| rows.get(idx))
            .collect()
    }

    /// 조건을 만족하는 행의 인덱스를 오름차순으로 반환합니다.
    pub fn select(&self, rows: &[ClassifiedRow]) -> Vec<usize> {
        if self.spec.is_empty() {
            return (0..rows.len()).collect();
        }

        // 스키마에 없는 컬럼에 대한 정규식은 건너뜀
        let regex = self
            .regex
            .as_ref()
            .filter(|(field, _)| Schema::from_rows(rows).has_column(field));

        rows.iter()
            .enumerate()
            .filter(|(_, row)| self.matches_sets(row))
            .filter(|(_, row)| match regex {
                Some((field, re)) => row.column(field).is_some_and(|v| re.is_match(&v)),
                None => true,
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    /// 집합 조건을 순서대로 평가합니다.
    fn matches_sets(&self, row: &ClassifiedRow) -> bool {
        let spec = &self.spec;
        let env = &row.envelope;

        member(&spec.facilities, Some(env.facility.as_str()))
            && member(&spec.mnemonics, Some(env.mnemonic.as_str()))
            && member(&spec.event_types, row.event_type.map(|e| e.as_str()))
            && spec
                .severities
                .as_ref()
                .filter(|set| !set.is_empty())
                .is_none_or(|set| env.severity.is_some_and(|s| set.contains(&s)))
            && member(&spec.interfaces, row.field("interface"))
            && member(&spec.users, row.field("user"))
    }
}

/// 문자열 집합 조건. 비활성 조건은 통과, 값이 없는 행은 실패합니다.
fn member(set: &Option<Vec<String>>, value: Option<&str>) -> bool {
    match set {
        Some(allowed) if !allowed.is_empty() => {
            value.is_some_and(|v| allowed.iter().any(|a| a == v))
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsift_core::types::{EventType, Month, ParsedEnvelope};

    fn row(
        line: usize,
        facility: &str,
        severity: u32,
        event_type: Option<EventType>,
        fields: &[(&str, &str)],
    ) -> ClassifiedRow {
        ClassifiedRow {
            line_number: line,
            envelope: ParsedEnvelope {
                sequence: Some(line as u64),
                month: Month::Sep,
                day: 18,
                time: "08:00:01".to_owned(),
                timezone: "CDT".to_owned(),
                facility: facility.to_owned(),
                severity: Some(severity),
                mnemonic: "UPDOWN".to_owned(),
                message: format!("message {line}"),
            },
            severity_name: logsift_core::types::severity_name(i64::from(severity)),
            event_type,
            fields: fields
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
            datetime: None,
        }
    }

    fn dataset() -> Vec<ClassifiedRow> {
        vec![
            row(
                1,
                "LINK",
                3,
                Some(EventType::LinkState),
                &[("interface", "Gi0/1"), ("state", "down")],
            ),
            row(
                2,
                "SEC_LOGIN",
                4,
                Some(EventType::LoginFailed),
                &[("user", "admin"), ("src_ip", "10.0.0.1"), ("reason", "bad")],
            ),
            row(3, "SYS", 5, None, &[]),
            row(
                4,
                "SEC_LOGIN",
                5,
                Some(EventType::LoginSuccess),
                &[("user", "netops"), ("src_ip", "10.0.0.2")],
            ),
        ]
    }

    fn lines(rows: &[&ClassifiedRow]) -> Vec<usize> {
        rows.iter().map(|r| r.line_number).collect()
    }

    fn apply(spec: FilterSpec, rows: &[ClassifiedRow]) -> Vec<usize> {
        lines(&FilterEngine::new(spec).unwrap().apply(rows))
    }

    #[test]
    fn empty_spec_returns_everything_in_order() {
        let rows = dataset();
        assert!(FilterSpec::default().is_empty());
        assert_eq!(apply(FilterSpec::default(), &rows), vec![1, 2, 3, 4]);
    }

    #[test]
    fn empty_lists_are_no_ops() {
        let spec = FilterSpec {
            facilities: Some(vec![]),
            users: Some(vec![]),
            ..Default::default()
        };
        assert!(spec.is_empty());
        assert_eq!(apply(spec, &dataset()), vec![1, 2, 3, 4]);
    }

    #[test]
    fn facility_membership() {
        let spec = FilterSpec {
            facilities: Some(vec!["SEC_LOGIN".to_owned()]),
            ..Default::default()
        };
        assert_eq!(apply(spec, &dataset()), vec![2, 4]);
    }

    #[test]
    fn event_type_membership_skips_unclassified() {
        let spec = FilterSpec {
            event_types: Some(vec!["login_failed".to_owned(), "link_state".to_owned()]),
            ..Default::default()
        };
        assert_eq!(apply(spec, &dataset()), vec![1, 2]);
    }

    #[test]
    fn severity_is_numeric() {
        let spec = FilterSpec {
            severities: Some(vec![5]),
            ..Default::default()
        };
        assert_eq!(apply(spec, &dataset()), vec![3, 4]);
    }

    #[test]
    fn predicates_compose_by_and() {
        let spec = FilterSpec {
            facilities: Some(vec!["SEC_LOGIN".to_owned()]),
            severities: Some(vec![5]),
            ..Default::default()
        };
        assert_eq!(apply(spec, &dataset()), vec![4]);
    }

    #[test]
    fn user_filter_reads_dynamic_field() {
        let spec = FilterSpec {
            users: Some(vec!["admin".to_owned()]),
            ..Default::default()
        };
        assert_eq!(apply(spec, &dataset()), vec![2]);
    }

    #[test]
    fn membership_on_column_absent_from_data_is_empty() {
        let rows: Vec<_> = dataset().into_iter().skip(1).collect();
        let spec = FilterSpec {
            interfaces: Some(vec!["Gi0/1".to_owned()]),
            ..Default::default()
        };
        assert!(apply(spec, &rows).is_empty());
    }

    #[test]
    fn regex_on_core_column() {
        let spec = FilterSpec {
            regex: Some(RegexPredicate {
                field: "message".to_owned(),
                pattern: r"message [13]$".to_owned(),
            }),
            ..Default::default()
        };
        assert_eq!(apply(spec, &dataset()), vec![1, 3]);
    }

    #[test]
    fn regex_is_a_search_not_a_full_match() {
        let spec = FilterSpec {
            regex: Some(RegexPredicate {
                field: "f_src_ip".to_owned(),
                pattern: r"0\.2".to_owned(),
            }),
            ..Default::default()
        };
        assert_eq!(apply(spec, &dataset()), vec![4]);
    }

    #[test]
    fn regex_on_absent_column_is_skipped() {
        let spec = FilterSpec {
            facilities: Some(vec!["SEC_LOGIN".to_owned()]),
            regex: Some(RegexPredicate {
                field: "f_command".to_owned(),
                pattern: "anything".to_owned(),
            }),
            ..Default::default()
        };
        assert_eq!(apply(spec, &dataset()), vec![2, 4]);
    }

    #[test]
    fn regex_row_without_value_fails() {
        let spec = FilterSpec {
            regex: Some(RegexPredicate {
                field: "f_user".to_owned(),
                pattern: ".*".to_owned(),
            }),
            ..Default::default()
        };
        assert_eq!(apply(spec, &dataset()), vec![2, 4]);
    }

    #[test]
    fn invalid_regex_is_config_error() {
        let spec = FilterSpec {
            regex: Some(RegexPredicate {
                field: "message".to_owned(),
                pattern: "(unclosed".to_owned(),
            }),
            ..Default::default()
        };
        let err = FilterEngine::new(spec).err().unwrap();
        assert!(matches!(err, AnalyzerError::Config { .. }));
    }

    #[test]
    fn yaml_preset_parses() {
        let yaml = r#"
event_types: [login_failed]
severities: [4, 5]
regex:
  field: f_src_ip
  pattern: "^10\\."
"#;
        let spec = FilterSpec::from_yaml(yaml, "inline").unwrap();
        assert_eq!(spec.event_types, Some(vec!["login_failed".to_owned()]));
        assert_eq!(spec.severities, Some(vec![4, 5]));
        assert_eq!(spec.regex.unwrap().field, "f_src_ip");
        assert!(spec.facilities.is_none());
    }

    #[test]
    fn yaml_unknown_key_is_rejected() {
        let err = FilterSpec::from_yaml("hosts: [a]", "inline").unwrap_err();
        assert!(matches!(err, AnalyzerError::FilterLoad { .. }));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preset.yaml");
        std::fs::write(&path, "facilities: [LINK]\n").unwrap();
        let spec = FilterSpec::load(&path).unwrap();
        assert_eq!(apply(spec, &dataset()), vec![1]);
    }

    #[test]
    fn load_missing_file_fails() {
        let err = FilterSpec::load("/nonexistent/preset.yaml").unwrap_err();
        assert!(err.to_string().contains("preset.yaml"));
    }

    #[test]
    fn merge_overrides_only_set_predicates() {
        let base = FilterSpec {
            facilities: Some(vec!["LINK".to_owned()]),
            users: Some(vec!["admin".to_owned()]),
            ..Default::default()
        };
        let merged = base.merge(FilterSpec {
            users: Some(vec!["netops".to_owned()]),
            ..Default::default()
        });
        assert_eq!(merged.facilities, Some(vec!["LINK".to_owned()]));
        assert_eq!(merged.users, Some(vec!["netops".to_owned()]));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn output_is_ordered_subset(
                facilities in proptest::option::of(proptest::collection::vec(
                    prop_oneof![Just("LINK"), Just("SYS"), Just("SEC_LOGIN"), Just("NONE")],
                    0..3,
                )),
                severities in proptest::option::of(proptest::collection::vec(0u32..8, 0..3)),
            ) {
                let rows = dataset();
                let spec = FilterSpec {
                    facilities: facilities.map(|v| v.into_iter().map(str::to_owned).collect()),
                    severities,
                    ..Default::default()
                };
                let out = apply(spec, &rows);
                prop_assert!(out.windows(2).all(|w| w[0] < w[1]));
                prop_assert!(out.iter().all(|l| rows.iter().any(|r| r.line_number == *l)));
            }
        }
    }
}
