#![no_main]

use libfuzzer_sys::fuzz_target;
use logsift_analyzer::LogAnalyzerBuilder;

fuzz_target!(|data: &[u8]| {
    let Ok(analyzer) = LogAnalyzerBuilder::new().year(2023).build() else {
        return;
    };

    // 임의 바이트에서도 패닉 없이 행 수가 라인 수를 넘지 않아야 한다
    let (rows, stats) = analyzer.analyze_bytes(data);
    assert_eq!(rows.len(), stats.rows_parsed);
    assert_eq!(stats.rows_parsed + stats.dropped + stats.oversized, stats.lines_read);
    assert!(stats.classified <= stats.rows_parsed);
});
