//! Which planets stand for the querent and the quesited.

use crate::chart::HoraryChart;
use crate::question::{NaturalItem, QuestionAnalysis, ThirdPersonRoles};
use crate::western::types::Planet;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignificatorRole {
    /// Ruler of the 1st against ruler of the quesited house.
    Houses { quesited_house: u8 },
    /// One planet rules both houses.
    SameRuler { quesited_house: u8 },
    /// Sale question with a natural significator for the item.
    Transaction { item: NaturalItem },
    /// Teacher asking about a student: the student and success rulers.
    ThirdPersonEducation { student: Planet, success: Planet },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Significators {
    pub querent: Planet,
    pub quesited: Planet,
    pub role: SignificatorRole,
    pub description: String,
}

impl Significators {
    pub fn same_ruler(&self) -> bool {
        matches!(self.role, SignificatorRole::SameRuler { .. })
    }

    pub fn transaction_item(&self) -> Option<&NaturalItem> {
        match &self.role {
            SignificatorRole::Transaction { item } => Some(item),
            _ => None,
        }
    }

    pub fn is_third_person_education(&self) -> bool {
        matches!(self.role, SignificatorRole::ThirdPersonEducation { .. })
    }
}

/// `Err` carries the reason the chart cannot be judged.
pub fn identify(chart: &HoraryChart, analysis: &QuestionAnalysis) -> Result<Significators, String> {
    let plan = &analysis.significators;
    let querent_house = plan.querent_house.max(1);
    let quesited_house = plan.quesited_house;
    if !(1..=12).contains(&quesited_house) || querent_house > 12 {
        return Err("Cannot determine house rulers".to_string());
    }
    let querent = chart.house_ruler(querent_house);

    if plan.transaction_type {
        if let Some(item) = &plan.transaction_item {
            let buyer = chart.house_ruler(quesited_house);
            return Ok(Significators {
                querent,
                quesited: buyer,
                description: format!(
                    "Transaction Setup: Seller: {querent} (L1), Buyer: {buyer} (L7), {}: {} (natural significator)",
                    title_case(&item.name),
                    item.planet
                ),
                role: SignificatorRole::Transaction { item: item.clone() },
            });
        }
    } else if let Some(ThirdPersonRoles::Education {
        student_house,
        success_house,
        ..
    }) = plan.third_person
    {
        let student = chart.house_ruler(student_house);
        let success = chart.house_ruler(success_house);
        return Ok(Significators {
            querent,
            quesited: success,
            description: format!(
                "Querent: {querent} (ruler of 1), Student: {student} (ruler of {student_house}), Success: {success} (ruler of {success_house})"
            ),
            role: SignificatorRole::ThirdPersonEducation { student, success },
        });
    }

    let quesited = chart.house_ruler(quesited_house);
    if querent == quesited {
        return Ok(Significators {
            querent,
            quesited,
            description: format!(
                "Shared Significator: {querent} rules both houses {querent_house} and {quesited_house}"
            ),
            role: SignificatorRole::SameRuler { quesited_house },
        });
    }

    Ok(Significators {
        querent,
        quesited,
        description: format!(
            "Querent: {querent} (ruler of {querent_house}), Quesited: {quesited} (ruler of {quesited_house})"
        ),
        role: SignificatorRole::Houses { quesited_house },
    })
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("car"), "Car");
        assert_eq!(title_case("real estate"), "Real Estate");
    }
}
