//! Consistency check between a verdict and the reasoning that produced it.

use super::verdict::Verdict;
use crate::chart::HoraryChart;
use crate::western::types::Planet;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplanationAudit {
    pub issues_found: usize,
    pub audit_notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traditional_factors_detected: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
}

impl ExplanationAudit {
    pub fn is_clean(&self) -> bool {
        self.issues_found == 0
    }
}

pub fn audit_explanation(
    verdict: Verdict,
    confidence: i32,
    reasoning: &[String],
    chart: Option<&HoraryChart>,
) -> ExplanationAudit {
    let text = reasoning.join(" ");
    let lower = text.to_lowercase();
    let mut notes = Vec::new();

    match verdict {
        Verdict::Yes if confidence < 50 => {
            notes.push("WARNING: Positive judgment with low confidence - review logic".to_string())
        }
        Verdict::No if confidence < 50 => {
            notes.push("WARNING: Negative judgment with low confidence - may be uncertain".to_string())
        }
        _ => {}
    }

    if text.contains("Significators:") && text.contains("Saturn (ruler of 1)") {
        if let Some(ruler) = chart.map(|c| c.house_ruler(1)).filter(|r| *r != Planet::Saturn) {
            notes.push(format!(
                "INCONSISTENCY: Reasoning claims Saturn ruler of 1st, but actual ruler is {ruler}"
            ));
        }
    }

    if text.contains("Translation of light") && !text.contains("Moon") {
        notes.push("INCONSISTENCY: Translation claimed but Moon not mentioned as translator".to_string());
    }

    if lower.contains("reception") && verdict == Verdict::Yes && confidence < 60 {
        notes.push("WARNING: Reception claimed but confidence seems low for positive perfection".to_string());
    }

    let mentions_denial = text.contains("Denial:") || text.contains("denied");
    if mentions_denial && verdict != Verdict::No {
        notes.push("SEVERE INCONSISTENCY: Denial mentioned but judgment is not NO".to_string());
    }

    let detected: Vec<&'static str> = [
        ("combustion", "combustion"),
        ("retrograde", "retrograde"),
        ("void", "void_moon"),
        ("cadent", "cadent"),
    ]
    .iter()
    .filter(|(needle, _)| lower.contains(needle))
    .map(|(_, label)| *label)
    .collect();

    if verdict == Verdict::No && !(mentions_denial || text.contains("No perfection")) {
        notes.push("WARNING: Negative judgment lacks clear denial explanation".to_string());
    }

    if notes.is_empty() {
        ExplanationAudit {
            issues_found: 0,
            audit_notes: notes,
            traditional_factors_detected: None,
            status: Some("Explanation appears consistent with judgment"),
        }
    } else {
        ExplanationAudit {
            issues_found: notes.len(),
            audit_notes: notes,
            traditional_factors_detected: Some(detected),
            status: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_consistent_yes_is_clean() {
        let audit = audit_explanation(Verdict::Yes, 80, &lines(&["Perfection found: Mars △ Venus"]), None);
        assert!(audit.is_clean());
        assert_eq!(audit.status, Some("Explanation appears consistent with judgment"));
    }

    #[test]
    fn test_denial_with_yes_is_severe() {
        let audit = audit_explanation(Verdict::Yes, 70, &lines(&["Same ruler unity denied: x"]), None);
        assert!(audit
            .audit_notes
            .iter()
            .any(|n| n.starts_with("SEVERE INCONSISTENCY")));
    }

    #[test]
    fn test_unexplained_no_and_factor_detection() {
        let audit = audit_explanation(
            Verdict::No,
            40,
            &lines(&["Void Moon: makes no more aspects", "Retrograde quesited"]),
            None,
        );
        assert_eq!(audit.issues_found, 2);
        assert_eq!(
            audit.traditional_factors_detected,
            Some(vec!["retrograde", "void_moon"])
        );
    }
}
