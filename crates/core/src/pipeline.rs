//! 파이프라인 trait -- 모듈 확장 포인트 정의

use crate::types::EventType;

/// 추출기 하나가 메시지에서 인식한 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// 이벤트 패밀리
    pub event_type: EventType,
    /// 캡처된 필드 (이름, 값); 값은 항상 원문 그대로의 텍스트
    pub fields: Vec<(String, String)>,
}

impl Extraction {
    /// 새 추출 결과를 생성합니다.
    pub fn new(event_type: EventType, fields: Vec<(String, String)>) -> Self {
        Self { event_type, fields }
    }
}

/// 이벤트 추출기 trait
///
/// 새로운 이벤트 패밀리를 지원하려면 이 trait을 구현합니다.
/// 추출기는 상태를 갖지 않으며, 같은 입력에 항상 같은 결과를 반환해야 합니다.
pub trait EventExtractor: Send + Sync {
    /// 추출기 이름
    fn name(&self) -> &str;

    /// 메시지 본문을 분류합니다. 인식하지 못하면 `None`을 반환합니다.
    fn extract(&self, message: &str) -> Option<Extraction>;
}
