//! Judging a question: resolve place and time, cast the chart, classify
//! the question and run the rule pipeline.

pub mod audit;
pub mod benefic;
pub mod denial;
pub mod moon;
pub mod pipeline;
pub mod request;
pub mod result;
pub mod significators;
pub mod solar_factors;
pub mod verdict;

pub use audit::{audit_explanation, ExplanationAudit};
pub use pipeline::JudgmentPipeline;
pub use request::{JudgeRequest, JudgmentOverrides};
pub use result::{ChartData, Considerations, GeneralInfo, JudgmentResult, LunarAspectData, TimezoneInfo};
pub use significators::{SignificatorRole, Significators};
pub use solar_factors::SolarFactors;
pub use verdict::{Judgment, TraditionalFactors, Verdict};

use crate::chart::{ChartBuilder, ChartMoment, HoraryChart};
use crate::ephemeris::{datetime_to_julian_day, Ephemeris, GeoLocation, SwissEphemerisAdapter};
use crate::error::HoraryError;
use crate::location::{choose_offset, current_time, parse_local_datetime, Geocoder, TableGeocoder};
use crate::question::{KeywordClassifier, QuestionAnalysis, QuestionClassifier};
use horary_config::HorarySettings;
use std::path::PathBuf;

pub struct HoraryEngine {
    settings: HorarySettings,
    ephemeris: Box<dyn Ephemeris>,
    geocoder: Box<dyn Geocoder>,
    classifier: Box<dyn QuestionClassifier>,
}

impl HoraryEngine {
    /// Engine over the Swiss Ephemeris, the configured place table and
    /// the keyword classifier.
    pub fn new(settings: HorarySettings, ephemeris_path: Option<PathBuf>) -> Result<Self, HoraryError> {
        let ephemeris = SwissEphemerisAdapter::new(ephemeris_path)?;
        Ok(Self::with_ephemeris(settings, Box::new(ephemeris)))
    }

    pub fn with_ephemeris(settings: HorarySettings, ephemeris: Box<dyn Ephemeris>) -> Self {
        let geocoder = TableGeocoder::new(&settings.locations);
        Self {
            settings,
            ephemeris,
            geocoder: Box::new(geocoder),
            classifier: Box::new(KeywordClassifier::new()),
        }
    }

    pub fn with_geocoder(mut self, geocoder: Box<dyn Geocoder>) -> Self {
        self.geocoder = geocoder;
        self
    }

    pub fn with_classifier(mut self, classifier: Box<dyn QuestionClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn settings(&self) -> &HorarySettings {
        &self.settings
    }

    /// Judge one question. Failures come back as a `LOCATION_ERROR` or
    /// `ERROR` result rather than an `Err`.
    pub fn judge(&self, request: &JudgeRequest) -> JudgmentResult {
        match self.try_judge(request) {
            Ok(result) => {
                log::info!(
                    "judged '{}': {} ({}%)",
                    request.question,
                    result.judgment,
                    result.confidence
                );
                result
            }
            Err(HoraryError::Location(e)) => {
                log::warn!("location error for '{}': {e}", request.location);
                JudgmentResult::failure(
                    &request.question,
                    Verdict::LocationError,
                    format!("Location error: {e}"),
                    e.to_string(),
                    Some("LocationError"),
                )
            }
            Err(e) => {
                log::error!("judgment failed for '{}': {e}", request.question);
                JudgmentResult::failure(
                    &request.question,
                    Verdict::Error,
                    format!("Calculation error: {e}"),
                    e.to_string(),
                    Some(e.kind()),
                )
            }
        }
    }

    pub fn try_judge(&self, request: &JudgeRequest) -> Result<JudgmentResult, HoraryError> {
        let place = self.geocoder.resolve(&request.location)?;
        let offset = choose_offset(request.timezone.as_deref(), &place)?;

        let when = if request.use_current_time {
            current_time(offset)
        } else {
            match (request.date.as_deref(), request.time.as_deref()) {
                (Some(date), Some(time)) => parse_local_datetime(date, time, offset)?,
                _ => {
                    return Err(HoraryError::Calculation(
                        "Date and time must be provided when not using current time".to_string(),
                    ))
                }
            }
        };

        let moment = ChartMoment {
            local: when.local,
            utc: when.utc,
            timezone_info: when.timezone,
            julian_day: datetime_to_julian_day(when.utc),
        };
        let location = GeoLocation {
            lat: place.latitude,
            lon: place.longitude,
        };
        let chart = ChartBuilder::new(&self.settings).build(&*self.ephemeris, moment, location, &place.address)?;

        let mut analysis = self.classifier.classify(&request.question);
        if let Some(houses) = request.manual_houses.as_deref() {
            analysis = analysis.with_manual_houses(houses);
        }

        Ok(self.judge_chart(&request.question, chart, analysis, request.overrides))
    }

    /// Run the rules against an already cast chart.
    pub fn judge_chart(
        &self,
        question: &str,
        chart: HoraryChart,
        analysis: QuestionAnalysis,
        overrides: JudgmentOverrides,
    ) -> JudgmentResult {
        let judgment = JudgmentPipeline::new(&self.settings, &chart, &analysis, overrides).run();
        assemble(question, &self.settings, chart, analysis, judgment)
    }
}

/// Attach the chart and its derived views to a judgment.
pub fn assemble(
    question: &str,
    settings: &HorarySettings,
    chart: HoraryChart,
    analysis: QuestionAnalysis,
    judgment: Judgment,
) -> JudgmentResult {
    let audit = audit_explanation(judgment.verdict, judgment.confidence, &judgment.reasoning, Some(&chart));
    if !audit.is_clean() {
        log::debug!("explanation audit: {:?}", audit.audit_notes);
    }

    JudgmentResult {
        question: question.to_string(),
        judgment: judgment.verdict,
        confidence: judgment.confidence,
        reasoning: judgment.reasoning,
        chart_data: Some(ChartData::from(&chart)),
        question_analysis: Some(analysis),
        timing: judgment.timing,
        moon_aspects: result::moon_story(&chart),
        traditional_factors: judgment.traditional_factors,
        solar_factors: judgment.solar_factors,
        general_info: Some(GeneralInfo::of_chart(&chart, settings)),
        considerations: Some(Considerations::of_chart(&chart, settings)),
        moon_last_aspect: chart.moon_last_aspect.as_ref().map(LunarAspectData::from),
        moon_next_aspect: chart.moon_next_aspect.as_ref().map(LunarAspectData::from),
        timezone_info: Some(TimezoneInfo::from(&chart)),
        explanation_audit: Some(audit),
        error: None,
        error_type: None,
    }
}
