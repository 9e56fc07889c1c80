use serde::{Deserialize, Serialize};

/// Switches that bypass individual traditional checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgmentOverrides {
    pub ignore_radicality: bool,
    pub ignore_void_moon: bool,
    pub ignore_combustion: bool,
    pub ignore_saturn_7th: bool,
    /// Extra confidence for mutual exaltation; the configured bonus when unset.
    pub exaltation_boost: Option<f64>,
}

/// One horary question with the moment and place it was asked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeRequest {
    pub question: String,
    pub location: String,
    /// DD/MM/YYYY or one of the other accepted layouts
    pub date: Option<String>,
    /// HH:MM
    pub time: Option<String>,
    /// "UTC" or a fixed offset; derived from the location when absent
    pub timezone: Option<String>,
    pub use_current_time: bool,
    /// Replaces the classifier's houses; the second entry is the quesited.
    pub manual_houses: Option<Vec<u8>>,
    #[serde(flatten)]
    pub overrides: JudgmentOverrides,
}

impl JudgeRequest {
    pub fn new(question: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            location: location.into(),
            ..Self::default()
        }
    }

    pub fn at(mut self, date: impl Into<String>, time: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self.time = Some(time.into());
        self.use_current_time = false;
        self
    }

    pub fn now(mut self) -> Self {
        self.use_current_time = true;
        self
    }
}
