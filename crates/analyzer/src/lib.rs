#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`parser`]: 라인 분할 및 접두부 문법 파서
//! - [`normalize`]: 심각도 이름, 전체 시각 재구성
//! - [`extractor`]: 이벤트 추출기 체인 (첫 번째 매칭 우선)
//! - [`store`]: 추가 전용 행 저장소와 스키마
//! - [`filter`]: AND 결합 필터 엔진, YAML 프리셋
//! - [`summary`]: 요약 테이블 집계
//! - [`export`]: CSV/JSON 내보내기
//! - [`pipeline`]: 배치 파이프라인 오케스트레이션
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! bytes -> PrefixParser -> normalize -> ExtractorChain -> RowStore -> FilterEngine
//!                                                                        |
//!                                                         Summary <------+------> export
//! ```

pub mod error;
pub mod export;
pub mod extractor;
pub mod filter;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod store;
pub mod summary;

// --- 주요 타입 re-export ---

// 파이프라인
pub use pipeline::{AnalysisReport, LogAnalyzer, LogAnalyzerBuilder, ParseStats, RunOutcome};

// 에러
pub use error::AnalyzerError;

// 파서
pub use parser::PrefixParser;

// 추출기
pub use extractor::ExtractorChain;

// 저장소
pub use store::{RowStore, Schema};

// 필터
pub use filter::{FilterEngine, FilterSpec, RegexPredicate};

// 집계
pub use summary::{Summary, SummaryRow, SummaryTable};

// 내보내기
pub use export::ExportFormat;
