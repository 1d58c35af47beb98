#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use logsift_analyzer::{ExtractorChain, PrefixParser};

/// 접두부는 유효하고 메시지만 임의인 입력
#[derive(Arbitrary, Debug)]
struct FuzzLine {
    seq: u32,
    day: u8,
    facility: String,
    severity: u8,
    mnemonic: String,
    message: String,
}

fuzz_target!(|input: FuzzLine| {
    let (Ok(parser), Ok(chain)) = (PrefixParser::new(), ExtractorChain::with_defaults()) else {
        return;
    };

    // 추출기 체인은 임의 메시지에 대해 패닉 없이 결정적이어야 한다
    let first = chain.classify(&input.message);
    let second = chain.classify(&input.message);
    assert_eq!(
        first.as_ref().map(|e| (e.event_type, e.fields.clone())),
        second.as_ref().map(|e| (e.event_type, e.fields.clone()))
    );

    let line = format!(
        "{}: Sep {} 08:00:01 CDT: %{}-{}-{}: {}",
        input.seq,
        input.day % 32,
        input.facility,
        input.severity % 10,
        input.mnemonic,
        input.message
    );
    if let Some(envelope) = parser.parse(&line) {
        let _ = chain.classify(&envelope.message);
    }
});
