//! 통합 테스트 -- 파일 입력부터 내보내기까지 전체 흐름 검증

use std::io::Write;

use logsift_analyzer::export::write_to_path;
use logsift_analyzer::{
    AnalyzerError, ExportFormat, FilterEngine, FilterSpec, LogAnalyzer, LogAnalyzerBuilder,
    RegexPredicate, RunOutcome, Summary,
};
use logsift_core::types::{EventType, severity_name};
use proptest::prelude::*;

/// 실제 장비 내보내기에서 볼 수 있는 형태의 혼합 입력
const ROUTER_LOG: &str = "\
1: Sep 18 08:00:01.001 CDT: %SEC-6-IPACCESSLOGP: list acl-vty-in permitted tcp 32.245.68.191(47424) -> 230.0.0.185(22), 8 packets
2: Sep 18 08:00:02.114 CDT: %FMANFP-6-IPACCESSLOGNP: list acl-core denied 27 6c:b7:cd:85:0c:e0 186.235.35.107 GigabitEthernet3/1-> 237.0.0.189, 2 packets
3: Sep 18 08:00:03 CDT: %LINK-3-UPDOWN: Interface GigabitEthernet0/1, changed state to down
4: Sep 18 08:00:04 CDT: %LINEPROTO-5-UPDOWN: Line protocol on Interface GigabitEthernet0/1, changed state to down
%LINK-3-UPDOWN: Interface GigabitEthernet0/1, changed state to down
5: Sep 18 08:01:00 CDT: %SEC_LOGIN-4-LOGIN_FAILED: Login failed [user: admin] [Source: 203.0.113.7] [localport: 22] [Reason: Login Authentication Failed] at 08:01:00 CDT Mon Sep 18 2023
6: Sep 18 08:01:05 CDT: %SEC_LOGIN-4-LOGIN_FAILED: Login failed [user: root] [Source: 203.0.113.7] [localport: 22] [Reason: Login Authentication Failed] at 08:01:05 CDT Mon Sep 18 2023
7: Sep 18 08:01:09 CDT: %SEC_LOGIN-4-LOGIN_FAILED: Login failed [user: admin] [Source: 198.51.100.4] [localport: 22] [Reason: Login Authentication Failed] at 08:01:09 CDT Mon Sep 18 2023
8: Sep 18 08:02:00 CDT: %SEC_LOGIN-5-LOGIN_SUCCESS: Login Success [user: netops] [Source: 10.0.0.5] [localport: 22] at 08:02:00 CDT Mon Sep 18 2023
9: Sep 18 08:02:30 CDT: %SYS-5-CONFIG_I: Configured from console by netops on vty0 (10.0.0.5)
10: Sep 18 08:02:31 CDT: %PARSER-5-CFGLOG_LOGGEDCMD: User:netops  logged command:!exec: enable
11: Sep 18 08:03:00 CDT: %SYS-6-TTY_EXPIRE_TIMER: User netops has exited tty session 2(10.0.0.5)
12: Sep 18 08:04:00 CDT: %SYS-6-CLOCKUPDATE: System clock has been updated
";

fn write_input(content: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

fn all_rows() -> FilterEngine {
    FilterEngine::new(FilterSpec::default()).unwrap()
}

#[test]
fn file_to_rows_end_to_end() {
    let input = write_input(ROUTER_LOG.as_bytes());
    let analyzer = LogAnalyzerBuilder::new().year(2023).build().unwrap();
    let report = analyzer.run_file(input.path(), &all_rows()).unwrap();

    assert_eq!(report.outcome, RunOutcome::Rows);
    assert_eq!(report.stats.lines_read, 13);
    assert_eq!(report.stats.rows_parsed, 12);
    assert_eq!(report.stats.dropped, 1);
    assert_eq!(report.stats.classified, 11);

    let kinds: Vec<_> = report.rows.iter().map(|r| r.event_type).collect();
    assert_eq!(
        kinds,
        vec![
            Some(EventType::AclPermitted),
            Some(EventType::AclDeniedHw),
            Some(EventType::LinkState),
            Some(EventType::LineprotoState),
            Some(EventType::LoginFailed),
            Some(EventType::LoginFailed),
            Some(EventType::LoginFailed),
            Some(EventType::LoginSuccess),
            Some(EventType::ConfigFromConsole),
            Some(EventType::LoggedCommand),
            Some(EventType::Logout),
            None,
        ]
    );
}

#[test]
fn acl_permitted_line_is_fully_extracted() {
    let (store, _) = LogAnalyzer::new().unwrap().analyze_str(
        "1: Sep 18 08:00:01.001 CDT: %SEC-6-IPACCESSLOGP: list acl-vty-in permitted tcp 32.245.68.191(47424) -> 230.0.0.185(22), 8 packets",
    );
    let row = &store.rows()[0];
    assert_eq!(row.event_type, Some(EventType::AclPermitted));
    for (name, value) in [
        ("acl", "acl-vty-in"),
        ("proto", "tcp"),
        ("src_ip", "32.245.68.191"),
        ("src_port", "47424"),
        ("dst_ip", "230.0.0.185"),
        ("dst_port", "22"),
        ("packets", "8"),
    ] {
        assert_eq!(row.field(name), Some(value), "{name}");
    }
}

#[test]
fn line_without_numbered_header_is_dropped() {
    let (store, stats) = LogAnalyzer::new()
        .unwrap()
        .analyze_str("%LINK-3-UPDOWN: Interface GigabitEthernet0/1, changed state to down\n");
    assert!(store.is_empty());
    assert_eq!(stats.dropped, 1);
}

#[test]
fn repeated_failed_source_ranks_first() {
    let report = LogAnalyzer::new()
        .unwrap()
        .run(ROUTER_LOG.as_bytes(), &all_rows());
    let summary = report.summary();
    let table = summary.get("top_failed_sources").unwrap();
    assert_eq!(table.rows[0].keys, vec![Some("203.0.113.7".to_owned())]);
    assert_eq!(table.rows[0].count, 2);
    assert_eq!(table.rows[1].keys, vec![Some("198.51.100.4".to_owned())]);
    assert_eq!(table.rows[1].count, 1);
}

#[test]
fn summary_reconciles_with_filtered_rows() {
    let filter = FilterEngine::new(FilterSpec {
        facilities: Some(vec!["SEC_LOGIN".to_owned(), "LINK".to_owned()]),
        ..Default::default()
    })
    .unwrap();
    let report = LogAnalyzer::new().unwrap().run(ROUTER_LOG.as_bytes(), &filter);
    assert_eq!(report.filtered_count(), 5);
    let summary = report.summary();
    assert_eq!(
        summary.get("by_event_type").unwrap().total(),
        report.filtered_count()
    );
    assert!(summary.get("acl_denies").is_none());
}

#[test]
fn filter_preset_and_regex_on_dynamic_field() {
    let preset = write_input(
        b"event_types: [login_failed, login_success]\nregex:\n  field: f_user\n  pattern: \"^adm\"\n",
    );
    let spec = FilterSpec::load(preset.path()).unwrap();
    let report = LogAnalyzer::new()
        .unwrap()
        .run(ROUTER_LOG.as_bytes(), &FilterEngine::new(spec).unwrap());
    let lines: Vec<_> = report
        .filtered_rows()
        .iter()
        .map(|r| r.envelope.sequence)
        .collect();
    assert_eq!(lines, vec![Some(5), Some(7)]);
}

#[test]
fn interface_filter_without_interface_events_is_empty() {
    let input = ROUTER_LOG
        .lines()
        .filter(|l| !l.contains("UPDOWN"))
        .collect::<Vec<_>>()
        .join("\n");
    let filter = FilterEngine::new(FilterSpec {
        interfaces: Some(vec!["GigabitEthernet0/1".to_owned()]),
        ..Default::default()
    })
    .unwrap();
    let report = LogAnalyzer::new().unwrap().run(input.as_bytes(), &filter);
    assert_eq!(report.outcome, RunOutcome::NoRowsAfterFilter);
}

#[test]
fn regex_on_missing_column_keeps_rows() {
    let filter = FilterEngine::new(FilterSpec {
        regex: Some(RegexPredicate {
            field: "f_does_not_exist".to_owned(),
            pattern: "x".to_owned(),
        }),
        ..Default::default()
    })
    .unwrap();
    let report = LogAnalyzer::new().unwrap().run(ROUTER_LOG.as_bytes(), &filter);
    assert_eq!(report.filtered_count(), report.parsed_count());
}

#[test]
fn outcomes_distinguish_empty_parse_from_empty_filter() {
    let analyzer = LogAnalyzer::new().unwrap();
    let report = analyzer.run(b"not a syslog line\nneither is this\n", &all_rows());
    assert_eq!(report.outcome, RunOutcome::NoRowsParsed);
    assert_eq!(report.stats.lines_read, 2);

    let strict = FilterEngine::new(FilterSpec {
        severities: Some(vec![0]),
        ..Default::default()
    })
    .unwrap();
    let report = analyzer.run(ROUTER_LOG.as_bytes(), &strict);
    assert_eq!(report.outcome, RunOutcome::NoRowsAfterFilter);
}

#[test]
fn unreadable_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let result = LogAnalyzer::new()
        .unwrap()
        .run_file(dir.path().join("missing.log"), &all_rows());
    assert!(matches!(result, Err(AnalyzerError::Input { .. })));
}

#[test]
fn malformed_utf8_does_not_abort_the_run() {
    let mut bytes = ROUTER_LOG.as_bytes().to_vec();
    bytes.extend_from_slice(b"13: Sep 18 08:05:00 CDT: %SYS-5-X: caf\xe9 \xff\r\n");
    let input = write_input(&bytes);
    let (store, _) = LogAnalyzer::new().unwrap().analyze_file(input.path()).unwrap();
    let last = store.rows().last().unwrap();
    assert_eq!(last.envelope.sequence, Some(13));
    assert!(last.envelope.message.starts_with("caf"));
    assert!(!last.envelope.message.ends_with('\r'));
}

#[test]
fn export_csv_and_json_from_filtered_rows() {
    let dir = tempfile::tempdir().unwrap();
    let filter = FilterEngine::new(FilterSpec {
        event_types: Some(vec!["logged_command".to_owned()]),
        ..Default::default()
    })
    .unwrap();
    let report = LogAnalyzerBuilder::new()
        .year(2023)
        .build()
        .unwrap()
        .run(ROUTER_LOG.as_bytes(), &filter);
    let rows = report.filtered_rows();

    let csv_path = dir.path().join("out.csv");
    write_to_path(&rows, ExportFormat::Csv, &csv_path).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "seq,month,day,time,tz,facility,severity,severity_name,mnemonic,event_type,message,dt,f_user,f_command"
    );
    let record = lines.next().unwrap();
    assert!(record.contains("2023-09-18 08:02:31"));
    assert!(record.ends_with(",netops,exec: enable"));
    assert!(lines.next().is_none());

    let json_path = dir.path().join("out.json");
    write_to_path(&rows, ExportFormat::Json, &json_path).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value[0]["seq"], 10);
    assert_eq!(value[0]["f_command"], "exec: enable");
    assert_eq!(value[0]["dt"], "2023-09-18 08:02:31");
}

#[test]
fn unsupported_format_is_rejected_before_writing() {
    let err = "parquet".parse::<ExportFormat>().unwrap_err();
    let err: AnalyzerError = err.into();
    assert!(matches!(err, AnalyzerError::UnsupportedFormat(_)));
}

// --- 속성 테스트 ---

proptest! {
    #[test]
    fn severity_name_defined_exactly_on_syslog_range(sev in any::<i64>()) {
        prop_assert_eq!(severity_name(sev).is_some(), (0..=7).contains(&sev));
    }

    #[test]
    fn row_store_grows_only_for_grammar_matches(lines in proptest::collection::vec("\\PC{0,60}", 0..20)) {
        let analyzer = LogAnalyzer::new().unwrap();
        let input = lines.join("\n");
        let (store, stats) = analyzer.analyze_str(&input);
        prop_assert_eq!(stats.rows_parsed + stats.dropped + stats.oversized, stats.lines_read);
        prop_assert_eq!(store.len(), stats.rows_parsed);
    }

    #[test]
    fn event_type_totals_reconcile(count in 1usize..40, seed in 0usize..6) {
        let templates = [
            "Interface Gi0/1, changed state to down",
            "Login failed [user: a] [Source: 1.1.1.1] [Reason: x]",
            "list a denied tcp 1.1.1.1(1) -> 2.2.2.2(2), 1 packet",
            "System clock has been updated",
            "User:a logged command:show run",
            "User a has exited tty session 1(1.1.1.1)",
        ];
        let input: String = (0..count)
            .map(|n| format!(
                "{n}: Sep 18 08:00:01 CDT: %SYS-5-X: {}\n",
                templates[(n + seed) % templates.len()]
            ))
            .collect();
        let (store, _) = LogAnalyzer::new().unwrap().analyze_str(&input);
        let summary = Summary::compute(&store);
        prop_assert_eq!(summary.get("by_event_type").unwrap().total(), count);
    }
}
