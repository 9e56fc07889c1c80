//! Traditional horary astrology.
//!
//! A question asked at a moment and place is cast as a chart, the
//! querent and the quesited are given planetary significators, and a
//! fixed order of traditional rules decides whether the matter perfects.
//! [`HoraryEngine::judge`] is the entry point; the individual stages are
//! public for callers that already hold a chart.

pub mod aspects;
pub mod chart;
pub mod ephemeris;
pub mod error;
pub mod judgment;
pub mod location;
pub mod perfection;
pub mod question;
pub mod radicality;
pub mod solar;
pub mod void;
pub mod western;

pub use chart::{ChartBuilder, HoraryChart};
pub use error::HoraryError;
pub use judgment::{HoraryEngine, JudgeRequest, JudgmentOverrides, JudgmentResult, Verdict};
pub use question::{KeywordClassifier, QuestionAnalysis, QuestionClassifier, QuestionType};
