mod common;

use common::*;
use horary::judgment::{JudgmentOverrides, JudgmentPipeline, Verdict};
use horary::question::{KeywordClassifier, QuestionAnalysis, QuestionClassifier};
use horary::void::VoidChecker;
use horary::western::types::Planet;
use horary_config::VoidRule;

fn analysis(question: &str, houses: &[u8]) -> QuestionAnalysis {
    KeywordClassifier::new().classify(question).with_manual_houses(houses)
}

fn mentions(reasoning: &[String], needle: &str) -> bool {
    reasoning.iter().any(|line| line.contains(needle))
}

#[test]
fn test_mutual_rulership_perfection_is_yes() {
    let settings = settings();
    let chart = chart(&settings, &MUTUAL_RULERSHIP, 10.0);
    let analysis = analysis("Will I get the job?", &[1, 10]);

    let judgment = JudgmentPipeline::new(&settings, &chart, &analysis, JudgmentOverrides::default()).run();

    assert_eq!(judgment.verdict, Verdict::Yes);
    assert!(judgment.confidence >= settings.confidence.perfection.direct_with_mutual_rulership);
    assert_eq!(judgment.traditional_factors.perfection_type.as_deref(), Some("direct"));
    assert_eq!(judgment.traditional_factors.reception.as_deref(), Some("mutual_rulership"));
    assert!(mentions(&judgment.reasoning, "Significators: Querent: Mars (ruler of 1), Quesited: Saturn (ruler of 10)"));
    assert!(mentions(&judgment.reasoning, "Perfection found: Direct perfection"));
    assert!(judgment.timing.is_some());
}

#[test]
fn test_combust_conjunction_is_denied() {
    let settings = settings();
    let chart = chart(&settings, &COMBUST_VENUS, 130.0);
    let analysis = analysis("Will I get the promotion?", &[1, 10]);

    let judgment = JudgmentPipeline::new(&settings, &chart, &analysis, JudgmentOverrides::default()).run();

    assert_eq!(judgment.verdict, Verdict::No);
    assert!(judgment.confidence >= 80);
    assert!(judgment
        .reasoning
        .iter()
        .any(|line| line.to_lowercase().contains("combustion")));
    assert_eq!(
        judgment.traditional_factors.perfection_type.as_deref(),
        Some("combustion_denial")
    );
}

#[test]
fn test_combustion_denial_confidence_comes_from_settings() {
    let mut settings = settings();
    settings.confidence.denial.combustion = 72;
    let chart = chart(&settings, &COMBUST_VENUS, 130.0);
    let analysis = analysis("Will I get the promotion?", &[1, 10]);

    let judgment = JudgmentPipeline::new(&settings, &chart, &analysis, JudgmentOverrides::default()).run();

    assert_eq!(judgment.verdict, Verdict::No);
    assert_eq!(judgment.confidence, 72);
    assert!(mentions(&judgment.reasoning, "Denial: Combustion denial"));
}

#[test]
fn test_prohibition_by_third_planet() {
    let settings = settings();
    let chart = chart(&settings, &VENUS_PROHIBITS, 10.0);
    let analysis = analysis("Will the journey go well?", &[1, 9]);

    let judgment = JudgmentPipeline::new(&settings, &chart, &analysis, JudgmentOverrides::default()).run();

    assert_eq!(judgment.verdict, Verdict::No);
    assert!(mentions(&judgment.reasoning, "Prohibition: Prohibition by Venus"));
    assert_eq!(judgment.traditional_factors.prohibiting_planet.as_deref(), Some("Venus"));
    assert!(judgment.confidence <= settings.confidence.denial.prohibition);
}

#[test]
fn test_debilitated_shared_ruler_denies_unity() {
    let settings = settings();
    let chart = chart(&settings, &DEBILITATED_SHARED_RULER, 220.0);
    let analysis = analysis("Will the matter be resolved?", &[1, 6]);

    let judgment = JudgmentPipeline::new(&settings, &chart, &analysis, JudgmentOverrides::default()).run();

    assert!(chart.planet(Planet::Mars).dignity_score <= -10);
    assert_eq!(judgment.verdict, Verdict::No);
    assert!(judgment.confidence >= 65);
    assert!(mentions(&judgment.reasoning, "Same ruler unity denied"));
    assert!(mentions(&judgment.reasoning, "severely debilitated"));
    assert_eq!(
        judgment.traditional_factors.perfection_type.as_deref(),
        Some("same_ruler_unity")
    );
}

#[test]
fn test_early_ascendant_caps_confidence() {
    let settings = settings();
    assert!(!settings.radicality.gating);
    let chart = chart(&settings, &MUTUAL_RULERSHIP, 1.5);
    let analysis = analysis("Will I get the job?", &[1, 10]);

    let judgment = JudgmentPipeline::new(&settings, &chart, &analysis, JudgmentOverrides::default()).run();

    assert!(mentions(&judgment.reasoning, "Ascendant too early"));
    assert!(judgment.confidence <= settings.confidence.lunar_confidence_caps.neutral);
    assert_ne!(judgment.verdict, Verdict::CannotJudge);
}

#[test]
fn test_early_ascendant_with_gating_ends_judgment() {
    let mut settings = settings();
    settings.radicality.gating = true;
    let chart = chart(&settings, &MUTUAL_RULERSHIP, 1.5);
    let analysis = analysis("Will I get the job?", &[1, 10]);

    let judgment = JudgmentPipeline::new(&settings, &chart, &analysis, JudgmentOverrides::default()).run();

    assert_eq!(judgment.verdict, Verdict::No);
    assert_eq!(judgment.reasoning.len(), 1);
    assert_eq!(
        judgment.confidence,
        settings.confidence.base_confidence - settings.radicality.asc_warning_penalty
    );
}

#[test]
fn test_radicality_override_is_noted() {
    let settings = settings();
    let chart = chart(&settings, &MUTUAL_RULERSHIP, 1.5);
    let analysis = analysis("Will I get the job?", &[1, 10]);
    let overrides = JudgmentOverrides {
        ignore_radicality: true,
        ..JudgmentOverrides::default()
    };

    let judgment = JudgmentPipeline::new(&settings, &chart, &analysis, overrides).run();

    assert_eq!(
        judgment.reasoning[0],
        "Radicality: Bypassed by override (chart validity check disabled)"
    );
    assert_eq!(judgment.verdict, Verdict::Yes);
}

#[test]
fn test_void_moon_in_cancer_is_excepted() {
    let mut settings = settings();
    settings.moon.void_gating = true;
    // Moon late in Cancer with no aspect left to perfect in the sign.
    let mut layout = MUTUAL_RULERSHIP;
    layout[1] = (118.0, 13.0);
    let chart = chart(&settings, &layout, 10.0);

    let void = VoidChecker::new(&settings).check(&chart);
    assert!(void.void);
    assert!(void.exception);
    assert!(!void.is_effective());

    let lilly = VoidChecker::new(&settings).check_with(&chart, VoidRule::Lilly);
    assert!(lilly.void && lilly.exception);

    let analysis = analysis("Will I get the job?", &[1, 10]);
    let judgment = JudgmentPipeline::new(&settings, &chart, &analysis, JudgmentOverrides::default()).run();
    assert!(mentions(&judgment.reasoning, "Void Moon noted but excepted"));
    assert!(!judgment.reasoning.iter().any(|line| line.starts_with("Void Moon:")));
    assert!(judgment.reasoning.len() > 2);
}

#[test]
fn test_confidence_stays_in_bounds() {
    let settings = settings();
    let layouts = [
        (MUTUAL_RULERSHIP, 10.0),
        (COMBUST_VENUS, 130.0),
        (VENUS_PROHIBITS, 10.0),
        (DEBILITATED_SHARED_RULER, 220.0),
    ];
    let questions = ["Will I get the job?", "Is she pregnant?", "Where is my lost ring?", "Will I pass the exam?"];

    for (layout, ascendant) in layouts {
        let chart = chart(&settings, &layout, ascendant);
        for question in questions {
            let analysis = KeywordClassifier::new().classify(question);
            let judgment = JudgmentPipeline::new(&settings, &chart, &analysis, JudgmentOverrides::default()).run();
            assert!((0..=100).contains(&judgment.confidence), "{question}: {}", judgment.confidence);
            assert!(!judgment.reasoning.is_empty());
        }
    }
}
