//! The ordered rule pipeline that turns a cast chart into a verdict.
//!
//! Gates run first (radicality, void Moon), then the significators are
//! fixed and the Sun's effect on them is weighed. Perfection outranks a
//! shared ruler, which outranks the Moon's next aspect; the Moon's next
//! aspect only ever adjusts confidence. When nothing perfects, denials
//! and secondary testimonies decide between NO and a qualified verdict.

use super::benefic::benefic_support;
use super::denial::{find_denial, theft_loss_denials};
use super::moon::{houses_ruled, lunar_timing, moon_next, moon_testimony, MoonNext, MoonTestimony, TestimonyKind};
use super::request::JudgmentOverrides;
use super::significators::{identify, SignificatorRole, Significators};
use super::solar_factors::{assess, SolarFactors, SolarImpact};
use super::verdict::{Judgment, TraditionalFactors, Verdict};
use crate::aspects::format_aspect;
use crate::chart::HoraryChart;
use crate::perfection::{PerfectionEngine, PerfectionOutcome, ProhibitionFinder, TransactionPattern, TranslationFinder};
use crate::question::{NaturalItem, QuestionAnalysis, QuestionType};
use crate::radicality::RadicalityChecker;
use crate::void::VoidChecker;
use crate::western::reception::{ReceptionCalculator, ReceptionKind};
use crate::western::types::Planet;
use horary_config::HorarySettings;

/// Houses whose ruler matters when the Moon shares a significator's role.
const MOON_ROLE_HOUSES: [u8; 6] = [1, 2, 7, 8, 10, 11];

/// Reasoning and running confidence carried between stages.
struct Trail {
    reasoning: Vec<String>,
    confidence: i32,
    asc_penalty: i32,
    void_penalty: i32,
}

impl Trail {
    fn new(base: i32) -> Self {
        Self {
            reasoning: Vec::new(),
            confidence: base,
            asc_penalty: 0,
            void_penalty: 0,
        }
    }

    fn note(&mut self, line: impl Into<String>) {
        self.reasoning.push(line.into());
    }

    fn conclude(self, verdict: Verdict, confidence: i32) -> Judgment {
        Judgment::new(verdict, confidence, self.reasoning)
    }
}

pub struct JudgmentPipeline<'a> {
    settings: &'a HorarySettings,
    chart: &'a HoraryChart,
    analysis: &'a QuestionAnalysis,
    overrides: JudgmentOverrides,
    exaltation_boost: f64,
}

impl<'a> JudgmentPipeline<'a> {
    pub fn new(
        settings: &'a HorarySettings,
        chart: &'a HoraryChart,
        analysis: &'a QuestionAnalysis,
        overrides: JudgmentOverrides,
    ) -> Self {
        let exaltation_boost = overrides
            .exaltation_boost
            .unwrap_or(settings.confidence.mutual_exaltation_bonus);
        Self {
            settings,
            chart,
            analysis,
            overrides,
            exaltation_boost,
        }
    }

    pub fn run(&self) -> Judgment {
        let mut trail = Trail::new(self.settings.confidence.base_confidence);

        if let Some(confidence) = self.radicality(&mut trail) {
            return trail.conclude(Verdict::No, confidence);
        }
        if let Some(confidence) = self.void_moon(&mut trail) {
            return trail.conclude(Verdict::No, confidence);
        }

        let significators = match identify(self.chart, self.analysis) {
            Ok(found) => found,
            Err(reason) => {
                trail.note(reason);
                return trail.conclude(Verdict::CannotJudge, 0);
            }
        };
        trail.note(format!("Significators: {}", significators.description));
        log::debug!("significators: {} / {}", significators.querent, significators.quesited);

        if significators.same_ruler() {
            self.unity_bonus(&mut trail, significators.querent);
        }

        let solar = SolarFactors::analyze(self.chart, self.overrides.ignore_combustion);
        let impact = assess(
            &solar,
            self.chart,
            [significators.querent, significators.quesited],
            self.settings,
        );
        let solar = Some(solar);
        match impact {
            SolarImpact::Nothing => {}
            SolarImpact::Cazimi { bonus } => {
                trail.confidence += bonus;
                trail.note("Cazimi planets significantly strengthen the judgment");
            }
            SolarImpact::Denial { reason } => {
                trail.note(reason);
                let mut factors = TraditionalFactors::of_kind("impediment_denial");
                factors.impediment_type = Some("severe_combustion_and_debilitation".to_string());
                return trail.conclude(Verdict::No, 90).with_factors(factors).with_solar(solar);
            }
            SolarImpact::Penalty { amount, reason } => {
                trail.confidence -= amount;
                trail.note(reason);
            }
            SolarImpact::Unaffected { note } => trail.note(note),
        }

        if let Some(item) = significators.transaction_item() {
            if let Some((confidence, factors)) = self.transaction(&mut trail, &significators, item) {
                return trail
                    .conclude(Verdict::Yes, confidence)
                    .with_timing("Timing uncertain")
                    .with_factors(factors)
                    .with_solar(solar);
            }
        }

        self.judge_significators(trail, &significators).with_solar(solar)
    }

    /// `Some(confidence)` when a failed check ends the judgment with NO.
    fn radicality(&self, trail: &mut Trail) -> Option<i32> {
        if self.overrides.ignore_radicality {
            trail.note("Radicality: Bypassed by override (chart validity check disabled)");
            return None;
        }

        let settings = &self.settings.radicality;
        let check = RadicalityChecker::new(settings).check(self.chart, self.overrides.ignore_saturn_7th);
        trail.note(format!("Radicality: {}", check.reason));
        let failure = check.failure?;
        let neutral = self.settings.confidence.lunar_confidence_caps.neutral;

        if failure.is_ascendant_warning() {
            trail.asc_penalty = settings.asc_warning_penalty;
            if settings.gating {
                return Some((trail.confidence - trail.asc_penalty).max(0));
            }
            trail.confidence = trail.confidence.min(neutral);
            return None;
        }

        if settings.gating {
            return Some(trail.confidence.min(neutral));
        }
        trail.confidence = trail.confidence.min(neutral);
        None
    }

    fn void_moon(&self, trail: &mut Trail) -> Option<i32> {
        if self.overrides.ignore_void_moon {
            return None;
        }
        let void = VoidChecker::new(self.settings).check(self.chart);
        if !void.void {
            return None;
        }

        if void.exception {
            trail.note(format!("Void Moon noted but excepted: {}", void.reason));
            return None;
        }
        if let Some(line) = self.void_translation_override() {
            trail.note(line);
            return None;
        }

        trail.note(format!("Void Moon: {}", void.reason));
        trail.void_penalty = self.settings.moon.void_penalty;
        if self.settings.moon.void_gating {
            return Some((trail.confidence - trail.void_penalty).max(0));
        }
        None
    }

    /// A dignified Moon that applies to both significators still carries
    /// the matter.
    fn void_translation_override(&self) -> Option<String> {
        let significators = identify(self.chart, self.analysis).ok()?;
        let moon = self.chart.planet(Planet::Moon);
        if moon.dignity_score < 0 {
            return None;
        }
        let to_querent = self.chart.applying_aspect(Planet::Moon, significators.querent)?;
        let to_quesited = self.chart.applying_aspect(Planet::Moon, significators.quesited)?;

        Some(format!(
            "Void Moon noted but overridden: Moon (dignity {:+}) perfectly translates {} then {}",
            moon.dignity_score,
            format_aspect(Planet::Moon, to_querent.aspect, significators.querent, true),
            format_aspect(Planet::Moon, to_quesited.aspect, significators.quesited, true),
        ))
    }

    fn unity_bonus(&self, trail: &mut Trail, shared: Planet) {
        trail.note("Unity factor: Unity of purpose - same planetary energy governs both querent and matter");
        let dignity = self.chart.planet(shared).dignity_score;
        let mut bonus = 10;
        if dignity > 0 {
            bonus += 5;
            trail.note(format!("Shared significator {shared} is well-dignified (+{dignity})"));
        } else if dignity < -10 {
            bonus -= 10;
            trail.note(format!("Shared significator {shared} is severely debilitated ({dignity})"));
        }
        trail.confidence += bonus;
    }

    /// Sale questions: light passing between a party and the item itself.
    fn transaction(
        &self,
        trail: &mut Trail,
        significators: &Significators,
        item: &NaturalItem,
    ) -> Option<(i32, TraditionalFactors)> {
        let sale = TranslationFinder::new(self.settings).find_transaction(
            self.chart,
            significators.querent,
            significators.quesited,
            item.planet,
        )?;

        let confidence = trail.confidence.min(sale.confidence);
        match sale.pattern {
            TransactionPattern::ItemToParty => {
                trail.note(format!("Favorable Translation Found: {}", sale.reason));
                trail.note(format!(
                    "Success Pattern: Item's energy flows to {} - transaction completes",
                    sale.party_role
                ));
            }
            TransactionPattern::PartyToItem => {
                trail.note(format!("Mixed Translation Found: {}", sale.reason));
                trail.note(format!(
                    "Mixed Pattern: {}'s energy flows to item - potential but uncertain",
                    capitalize(sale.party_role)
                ));
            }
        }

        let mut factors = TraditionalFactors::of_kind("transaction_translation")
            .with_reception("none")
            .with_strengths(self.dignity(significators.querent), self.dignity(significators.quesited));
        factors
            .extra
            .insert(format!("{}_strength", item.name), self.dignity(item.planet));

        Some((confidence, factors))
    }

    fn judge_significators(&self, mut trail: Trail, significators: &Significators) -> Judgment {
        let querent = significators.querent;
        let quesited = significators.quesited;

        let (primary, secondary) = match significators.role {
            SignificatorRole::ThirdPersonEducation { student, success } => {
                trail.note(format!("3rd person analysis: Student ({student}) seeking Success ({success})"));
                (student, success)
            }
            _ => (querent, quesited),
        };

        let engine = PerfectionEngine::new(self.settings, self.exaltation_boost);
        let mut perfection = engine.evaluate(self.chart, primary, secondary);

        if let PerfectionOutcome::CombustionDenial { confidence, reason, .. } = &perfection {
            trail.note(format!("Denial: {reason}"));
            let factors = TraditionalFactors::of_kind(perfection.kind())
                .with_reception(perfection.reception_label())
                .with_strengths(self.dignity(querent), self.dignity(quesited));
            let confidence = *confidence;
            return trail.conclude(Verdict::No, confidence).with_factors(factors);
        }

        if perfection.has_direct_aspect() {
            if let Some(prohibition) = ProhibitionFinder::new(self.settings).find(self.chart, primary, secondary) {
                let confidence = trail.confidence.min(prohibition.confidence);
                trail.note(format!("Prohibition: {}", prohibition.reason));
                let mut factors = TraditionalFactors::of_kind("prohibition")
                    .with_reception(if prohibition.reception {
                        prohibition.kind.clone()
                    } else {
                        "none".to_string()
                    })
                    .with_strengths(self.dignity(querent), self.dignity(quesited));
                factors.prohibiting_planet = Some(prohibition.prohibiting_planet.to_string());
                return trail.conclude(Verdict::No, confidence).with_factors(factors);
            }
        }

        if !perfection.perfects() && self.analysis.question_type == QuestionType::Education {
            if let Some(education) = engine.moon_sun_education(self.chart) {
                trail.note(format!("Moon-Sun education perfection: {}", education.reason()));
                perfection = education;
            }
        }

        let mut next = moon_next(self.chart, self.settings, [querent, quesited], self.overrides.ignore_void_moon);
        if perfection.perfects() {
            if let Some(next) = next.as_mut() {
                next.decisive = false;
            }
            return self.perfected(trail, &perfection, next.as_ref(), querent, quesited);
        }

        if significators.same_ruler() {
            return self.same_ruler_unity(trail, querent, quesited);
        }

        if let Some(next) = &next {
            self.note_moon_next(&mut trail, next);
        }

        let testimony = moon_testimony(self.chart, self.settings, querent, quesited, self.overrides.ignore_void_moon);
        self.without_perfection(trail, querent, quesited, next.as_ref(), &testimony)
    }

    fn note_moon_next(&self, trail: &mut Trail, next: &MoonNext) {
        if next.verdict == Verdict::No {
            trail.note(format!("Moon's next aspect denies perfection: {}", next.reason));
        } else {
            trail.note(format!("Moon's next aspect supports but cannot perfect: {}", next.reason));
        }
        trail.confidence = trail.confidence.min(next.confidence);
        if next.decisive {
            trail.note("FLAG: MOON_NEXT_DECISIVE");
        }
    }

    fn perfected(
        &self,
        mut trail: Trail,
        perfection: &PerfectionOutcome,
        next: Option<&MoonNext>,
        querent: Planet,
        quesited: Planet,
    ) -> Judgment {
        let mut verdict = Verdict::from_favorable(perfection.favorable());
        if let Some(confidence) = perfection.confidence() {
            trail.confidence = trail.confidence.min(confidence);
        }

        if let PerfectionOutcome::CoSignificator { aspect, .. } = perfection {
            if !aspect.applying {
                trail.confidence = (trail.confidence - 30).max(15);
                trail.note("Separating aspect penalty: -30% (past opportunity)");
            }
        }

        if let Some(next) = next {
            self.note_moon_next(&mut trail, next);
        }

        let quesited_position = self.chart.planet(quesited);
        if quesited_position.retrograde {
            let penalty = self.settings.retrograde.quesited_penalty;
            trail.confidence = (trail.confidence - penalty).max(10);
            trail.note(format!("Retrograde quesited: -{penalty}% (turning away from success)"));
        }
        self.dignity_adjustment(&mut trail, querent, quesited);

        if next.is_some_and(|n| n.decisive) && verdict == Verdict::Yes {
            trail.confidence = trail.confidence.max(30);
        }

        match perfection {
            PerfectionOutcome::Direct { penalized: true, .. } => {
                trail.note(format!("Direct aspect penalized: {}", perfection.reason()))
            }
            _ if perfection.favorable() => trail.note(format!("Perfection found: {}", perfection.reason())),
            _ => trail.note(format!("Negative perfection: {}", perfection.reason())),
        }

        trail.confidence = (trail.confidence - trail.asc_penalty - trail.void_penalty).max(0);

        if verdict == Verdict::Yes && trail.confidence < 50 {
            let confidence = trail.confidence;
            if confidence < 30 {
                trail.note(format!(
                    "Very low confidence ({confidence}%) - result inconclusive despite perfection"
                ));
                verdict = Verdict::Inconclusive;
                trail.confidence = confidence.max(20);
            } else {
                trail.note(format!("Low confidence ({confidence}%) - positive indication with caution"));
            }
        }

        let timing = match perfection.aspect() {
            Some(aspect) => lunar_timing(self.chart, aspect.degrees_to_exact),
            None => "Timing uncertain".to_string(),
        };
        let factors = TraditionalFactors::of_kind(perfection.kind())
            .with_reception(perfection.reception_label())
            .with_strengths(self.dignity(querent), self.dignity(quesited));

        let confidence = trail.confidence;
        trail
            .conclude(verdict, confidence)
            .with_timing(timing)
            .with_factors(factors)
    }

    fn dignity_adjustment(&self, trail: &mut Trail, querent: Planet, quesited: Planet) {
        let querent_dignity = self.dignity(querent);
        let quesited_dignity = self.dignity(quesited);

        if quesited_dignity <= -10 {
            trail.confidence = (trail.confidence - 35).max(10);
            trail.note(format!("Severely weak quesited ({quesited_dignity}): -35%"));
        } else if quesited_dignity < -5 {
            trail.confidence = (trail.confidence - 20).max(25);
            trail.note(format!("Weak quesited dignity ({quesited_dignity}): -20%"));
        } else if quesited_dignity >= 10 {
            trail.confidence = (trail.confidence + 15).min(95);
            trail.note(format!("Strong quesited dignity ({quesited_dignity}): +15%"));
        }

        if querent_dignity <= -10 {
            trail.confidence = (trail.confidence - 15).max(5);
            trail.note(format!("Weak querent dignity ({querent_dignity}): -15%"));
        } else if querent_dignity >= 10 {
            trail.confidence = (trail.confidence + 10).min(95);
            trail.note(format!("Strong querent dignity ({querent_dignity}): +10%"));
        }
    }

    /// One planet rules both houses: the matter is joined unless the
    /// shared planet is badly impeded.
    fn same_ruler_unity(&self, mut trail: Trail, querent: Planet, quesited: Planet) -> Judgment {
        let shared = self.chart.planet(querent);
        let dignity = shared.dignity_score;

        let mut prohibitions = Vec::new();
        if dignity <= -10 {
            prohibitions.push("Shared significator severely debilitated");
        }
        if !self.overrides.ignore_combustion && self.chart.solar(querent).condition.is_afflicted() {
            prohibitions.push("Shared significator combust/under beams");
        }
        if shared.retrograde && dignity < -5 {
            prohibitions.push("Shared significator retrograde and weak (refranation)");
        }

        let mut verdict = Verdict::Yes;
        let mut confidence = 75;
        if !prohibitions.is_empty() {
            verdict = Verdict::No;
            confidence = 80;
            trail.note(format!("Same ruler unity denied: {}", prohibitions.join(", ")));
        } else {
            let mut conditions = Vec::new();
            if shared.retrograde {
                conditions.push("with delays/renegotiation (retrograde)");
            }
            if -10 < dignity && dignity < 0 {
                conditions.push("with difficulty");
            }
            if conditions.is_empty() {
                trail.note("Same ruler unity indicates direct perfection");
            } else {
                trail.note(format!("Same ruler unity perfected {}", conditions.join(" ")));
            }
        }

        let testimony = moon_testimony(self.chart, self.settings, querent, quesited, self.overrides.ignore_void_moon);
        let reception = ReceptionCalculator::new(&self.settings.reception)
            .compute(self.chart, querent, quesited)
            .kind;

        let mut positive = vec!["same ruler unity".to_string()];
        if reception != ReceptionKind::None {
            positive.push(format!("reception ({})", reception.as_str()));
        }
        let mut negative = Vec::new();
        for aspect in &testimony.aspects {
            if aspect.favorable {
                positive.push(aspect.description.clone());
            } else {
                negative.push(aspect.description.clone());
            }
        }

        if !negative.is_empty() {
            confidence = (confidence - (5 * negative.len() as i32).min(15)).max(65);
            trail.note(format!(
                "Conflicting testimonies reduce certainty ({} positive, {} negative)",
                positive.len(),
                negative.len()
            ));
        } else if testimony.favorable {
            confidence = (confidence + 5).min(85);
            trail.note(format!("Moon supports unity: {}", testimony.reason));
        } else if testimony.unfavorable {
            confidence = (confidence - 5).max(70);
            trail.note(format!("Moon testimony concerning but unity remains: {}", testimony.reason));
        }

        if reception != ReceptionKind::None {
            confidence = (confidence + 3).min(90);
            trail.note(format!("Reception supports perfection: {}", reception.as_str()));
        }

        let moon_roles: Vec<u8> = houses_ruled(self.chart, Planet::Moon)
            .into_iter()
            .filter(|house| MOON_ROLE_HOUSES.contains(house))
            .collect();
        if !moon_roles.is_empty() {
            let labels = moon_roles
                .iter()
                .map(|house| format!("L{house}"))
                .collect::<Vec<_>>()
                .join(",");
            let moon_dignity = self.dignity(Planet::Moon);
            if moon_dignity >= 0 {
                confidence = (confidence + 3).min(88);
                trail.note(format!("Moon as {labels} well-positioned supports perfection"));
            } else if moon_dignity < -5 {
                confidence = (confidence - 5).max(65);
                trail.note(format!("Moon as {labels} poorly positioned creates uncertainty"));
            }
            if moon_roles.contains(&10) {
                trail.note("Moon as L10 (authority/decision-maker) is key to approval process");
            }
        }

        let mut factors = TraditionalFactors::of_kind("same_ruler_unity")
            .with_reception(reception.as_str())
            .with_strengths(dignity, dignity);
        factors.moon_void = Some(testimony.void_of_course);

        trail
            .conclude(verdict, confidence)
            .with_timing("Timing uncertain")
            .with_factors(factors)
    }

    fn without_perfection(
        &self,
        mut trail: Trail,
        querent: Planet,
        quesited: Planet,
        next: Option<&MoonNext>,
        testimony: &MoonTestimony,
    ) -> Judgment {
        let strengths = (self.dignity(querent), self.dignity(quesited));

        if let Some(denial) = find_denial(self.chart, self.settings, querent, quesited) {
            let confidence = trail.confidence.min(denial.confidence);
            trail.note(format!("Denial: {}", denial.reason));
            let mut factors = TraditionalFactors::of_kind(denial.kind).with_strengths(strengths.0, strengths.1);
            factors.prohibiting_planet = denial.prohibiting_planet.map(|p| p.to_string());
            return trail.conclude(Verdict::No, confidence).with_factors(factors);
        }

        let question_type = self.analysis.question_type;
        let theft = theft_loss_denials(self.chart, self.settings, question_type, querent, quesited);
        if !theft.is_empty() {
            trail.note(format!("Theft/Loss Denial: {}", theft.join("; ")));
            let factors = TraditionalFactors::of_kind("theft_loss_denial").with_strengths(strengths.0, strengths.1);
            return trail.conclude(Verdict::No, 80).with_factors(factors);
        }

        let benefics = benefic_support(self.chart, querent, quesited);
        let mut benefic_overridden = false;
        if benefics.favorable() {
            let quesited_position = self.chart.planet(quesited);
            let mut weaknesses = Vec::new();
            if quesited_position.dignity_score <= -4 {
                weaknesses.push(format!("severely debilitated ({:+})", quesited_position.dignity_score));
            }
            if quesited_position.retrograde {
                weaknesses.push("retrograde".to_string());
            }
            if weaknesses.is_empty() {
                trail.note(format!("Note: {} (secondary testimony)", benefics.reason));
            } else {
                trail.note(format!(
                    "Note: {} (insufficient - quesited {})",
                    benefics.reason,
                    weaknesses.join(", ")
                ));
                benefic_overridden = true;
            }
        }

        let reception = ReceptionCalculator::new(&self.settings.reception).compute(self.chart, querent, quesited);

        if question_type == QuestionType::Pregnancy {
            let has_reception = reception.kind != ReceptionKind::None;
            let moon_benefic = testimony.aspects.iter().any(|a| {
                a.testimony_type == TestimonyKind::MoonToBenefic && a.applying && a.favorable
            });
            if has_reception || moon_benefic {
                let mut parts = Vec::new();
                let mut confidence = 70;
                if has_reception {
                    parts.push(format!("L1↔L5 reception ({})", reception.kind.as_str()));
                    confidence += 5;
                }
                if moon_benefic {
                    parts.push("Moon applying to benefic".to_string());
                    confidence += 5;
                }
                trail.note(format!("Pregnancy: {}", parts.join(" & ")));

                let mut factors = TraditionalFactors::of_kind("pregnancy_sufficiency")
                    .with_reception(reception.kind.as_str())
                    .with_strengths(strengths.0, strengths.1);
                factors.moon_benefic = Some(moon_benefic);
                let timing = testimony.timing.clone().unwrap_or_else(|| "Moderate timeframe".to_string());
                return trail
                    .conclude(Verdict::Yes, confidence)
                    .with_timing(timing)
                    .with_factors(factors);
            }
        }

        let mut denials = Vec::new();
        if reception.kind == ReceptionKind::None {
            denials.push("no reception between significators".to_string());
        } else {
            denials.push(format!("insufficient perfection despite {}", reception.kind.as_str()));
        }
        match testimony.benefic_testimony() {
            Some(benefic) => {
                let shown = format_aspect(Planet::Moon, benefic.aspect, benefic.planet, benefic.applying);
                if benefic.applying && benefic.favorable {
                    denials.push(format!("Moon {shown} noted but insufficient"));
                } else {
                    denials.push(format!("unfavorable Moon {shown}"));
                }
            }
            None => denials.push("no Moon-benefic testimony".to_string()),
        }
        if benefics.total_score > 0 {
            denials.push(format!("weak benefic support (score: {})", benefics.total_score));
        } else {
            denials.push("no benefic aspects to significators".to_string());
        }
        trail.note(format!("Denial: {}", denials.join("; ")));

        let mut confidence = trail.confidence.min(75);
        let moon_supports = next.is_some_and(|n| n.verdict == Verdict::Yes);
        if moon_supports || (benefics.favorable() && !benefic_overridden) {
            confidence = confidence.min(60);
        }

        let mut factors = TraditionalFactors::of_kind("none")
            .with_reception(reception.kind.as_str())
            .with_strengths(strengths.0, strengths.1);
        factors.benefic_noted = Some(benefics.total_score > 0);
        trail.conclude(Verdict::No, confidence).with_factors(factors)
    }

    fn dignity(&self, planet: Planet) -> i32 {
        self.chart.planet(planet).dignity_score
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
