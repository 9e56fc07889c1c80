mod common;

use common::*;
use horary::western::types::Planet;
use horary::{HoraryEngine, JudgeRequest, Verdict};

fn engine() -> HoraryEngine {
    HoraryEngine::with_ephemeris(settings(), Box::new(LinearEphemeris::new(MUTUAL_RULERSHIP, 10.0)))
}

#[test]
fn test_unknown_location_is_location_error() {
    let request = JudgeRequest::new("Will I get the job?", "Atlantis").at("10/05/2024", "12:00");
    let result = engine().judge(&request);

    assert_eq!(result.judgment, Verdict::LocationError);
    assert_eq!(result.confidence, 0);
    assert_eq!(result.error_type, Some("LocationError"));
    assert!(result.reasoning[0].starts_with("Location error: Location not found: 'Atlantis'"));
    assert!(result.chart_data.is_none());
}

#[test]
fn test_missing_date_is_calculation_error() {
    let request = JudgeRequest::new("Will I get the job?", "London");
    let result = engine().judge(&request);

    assert_eq!(result.judgment, Verdict::Error);
    assert!(result.is_error());
    assert_eq!(
        result.reasoning,
        vec!["Calculation error: Date and time must be provided when not using current time".to_string()]
    );
}

#[test]
fn test_unparseable_date_is_reported() {
    let request = JudgeRequest::new("Will I get the job?", "London").at("the tenth of May", "noon");
    let result = engine().judge(&request);

    assert_eq!(result.judgment, Verdict::Error);
    assert!(result.error.unwrap().starts_with("Unable to parse date"));
}

#[test]
fn test_full_judgment_from_request() -> anyhow::Result<()> {
    let mut request = JudgeRequest::new("Will I get the job?", "London").at("10/05/2024", "12:00");
    request.manual_houses = Some(vec![1, 10]);
    let result = engine().judge(&request);

    assert_eq!(result.judgment, Verdict::Yes);
    assert!(result.error.is_none());

    let chart = result.chart_data.as_ref().expect("chart data attached");
    assert_eq!(chart.house_rulers.get("1"), Some(&Planet::Mars));
    assert_eq!(chart.house_rulers.get("10"), Some(&Planet::Saturn));

    let zone = result.timezone_info.as_ref().expect("timezone attached");
    assert_eq!(zone.timezone, "UTC");
    assert!(result.general_info.is_some());
    assert!(result.explanation_audit.is_some());
    assert_eq!(result.question_analysis.as_ref().map(|a| a.significators.quesited_house), Some(10));

    let json: serde_json::Value = serde_json::from_str(&result.to_json(false)?)?;
    assert_eq!(json["judgment"], "YES");
    assert_eq!(json["traditional_factors"]["reception"], "mutual_rulership");
    Ok(())
}

#[test]
fn test_requests_deserialize_with_flattened_overrides() -> anyhow::Result<()> {
    let request: JudgeRequest = serde_json::from_str(
        r#"{"question": "Will I get the job?", "location": "London", "use_current_time": true, "ignore_void_moon": true}"#,
    )?;
    assert!(request.use_current_time);
    assert!(request.overrides.ignore_void_moon);
    assert!(!request.overrides.ignore_radicality);
    assert_eq!(request.overrides.exaltation_boost, None);
    Ok(())
}
