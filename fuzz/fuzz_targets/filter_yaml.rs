#![no_main]

use libfuzzer_sys::fuzz_target;
use logsift_analyzer::{FilterEngine, FilterSpec};

fuzz_target!(|data: &[u8]| {
    // 파일 크기 제한과 비슷하게 입력 크기 제한
    if data.len() > 64 * 1024 {
        return;
    }

    let Ok(yaml) = std::str::from_utf8(data) else {
        return;
    };

    // 잘못된 프리셋과 잘못된 정규식은 Err로 끝나야 한다
    if let Ok(spec) = FilterSpec::from_yaml(yaml, "fuzz") {
        let _ = FilterEngine::new(spec);
    }
});
