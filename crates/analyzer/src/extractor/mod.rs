//! 이벤트 추출기 체인 -- 메시지 본문을 이벤트 패밀리로 분류
//!
//! [`ExtractorChain`]은 등록된 추출기를 순서대로 시도하고,
//! 처음으로 인식한 추출기의 결과를 반환합니다. 등록 순서가 곧 우선순위입니다.
//!
//! # 기본 순서
//! 좁은 패턴이 넓은 패턴보다 먼저 옵니다.
//!
//! 1. [`AclLogExtractor`] -- 소프트웨어 경로 허용/거부
//! 2. [`AclHardwareDenyExtractor`] -- 하드웨어 경로 거부
//! 3. [`LinkStateExtractor`]
//! 4. [`LineProtocolExtractor`]
//! 5. [`LoginSuccessExtractor`]
//! 6. [`LoginFailedExtractor`]
//! 7. [`LogoutExtractor`]
//! 8. [`ConsoleConfigExtractor`]
//! 9. [`LoggedCommandExtractor`]
//!
//! # 사용 예시
//! ```ignore
//! use logsift_analyzer::extractor::ExtractorChain;
//!
//! let chain = ExtractorChain::with_defaults()?;
//! let ex = chain.classify("Interface Gi0/1, changed state to down").unwrap();
//! assert_eq!(ex.event_type.as_str(), "link_state");
//! ```

pub mod acl;
pub mod interface;
pub mod session;

pub use acl::{AclHardwareDenyExtractor, AclLogExtractor};
pub use interface::{LineProtocolExtractor, LinkStateExtractor};
pub use session::{
    ConsoleConfigExtractor, LoggedCommandExtractor, LoginFailedExtractor, LoginSuccessExtractor,
    LogoutExtractor,
};

use regex::{Captures, Regex};

use logsift_core::pipeline::{EventExtractor, Extraction};

use crate::error::AnalyzerError;

/// 캡처된 이름 그룹을 패턴 내 선언 순서대로 (이름, 값) 목록으로 변환합니다.
///
/// 매칭에 참여하지 않은 선택적 그룹은 건너뜁니다.
pub(crate) fn named_fields(pattern: &Regex, caps: &Captures<'_>) -> Vec<(String, String)> {
    pattern
        .capture_names()
        .flatten()
        .filter_map(|name| {
            caps.name(name)
                .map(|m| (name.to_owned(), m.as_str().to_owned()))
        })
        .collect()
}

/// 추출기 체인 -- 첫 번째 매칭이 이깁니다.
pub struct ExtractorChain {
    /// 등록된 추출기 목록 (순서대로 시도)
    extractors: Vec<Box<dyn EventExtractor>>,
}

impl ExtractorChain {
    /// 빈 체인을 생성합니다. 어떤 메시지도 분류하지 않습니다.
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// 기본 추출기 세트로 체인을 생성합니다.
    pub fn with_defaults() -> Result<Self, AnalyzerError> {
        Ok(Self::new()
            .register(Box::new(AclLogExtractor::new()?))
            .register(Box::new(AclHardwareDenyExtractor::new()?))
            .register(Box::new(LinkStateExtractor::new()?))
            .register(Box::new(LineProtocolExtractor::new()?))
            .register(Box::new(LoginSuccessExtractor::new()?))
            .register(Box::new(LoginFailedExtractor::new()?))
            .register(Box::new(LogoutExtractor::new()?))
            .register(Box::new(ConsoleConfigExtractor::new()?))
            .register(Box::new(LoggedCommandExtractor::new()?)))
    }

    /// 추출기를 체인 끝에 등록합니다.
    pub fn register(mut self, extractor: Box<dyn EventExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    /// 메시지를 분류합니다.
    ///
    /// 등록된 추출기를 순서대로 시도하여 첫 번째 결과를 반환합니다.
    /// 어떤 추출기도 인식하지 못하면 `None`입니다.
    pub fn classify(&self, message: &str) -> Option<Extraction> {
        self.extractors.iter().find_map(|e| e.extract(message))
    }

    /// 등록된 추출기 이름 목록 (우선순위 순)
    pub fn names(&self) -> Vec<&str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl Default for ExtractorChain {
    fn default() -> Self {
        Self::new()
    }
}
