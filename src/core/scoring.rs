use crate::core::questionnaire::{resolve, AnsweredQuestion, MAX_TOTAL};
use crate::domain::model::{AnswerSet, ScoreSummary, Tier};
use crate::utils::error::Result;

/// Upper bound (inclusive) of each tier, checked in ascending order.
const TIER_BREAKPOINTS: [(u8, Tier); 3] = [
    (10, Tier::Invisible),
    (20, Tier::PartiallyVisible),
    (30, Tier::Controlled),
];

pub fn tier_for_total(total: u8) -> Tier {
    TIER_BREAKPOINTS
        .iter()
        .find(|(upper, _)| total <= *upper)
        .map(|(_, tier)| *tier)
        .unwrap_or(Tier::Intelligent)
}

pub fn percentage(total: u8) -> f64 {
    f64::from(total) / f64::from(MAX_TOTAL) * 100.0
}

/// Whole-number percentage as displayed, formatted from the float value
/// (ties to even on the binary value: 2.5 -> "2", 57.49999999999999 -> "57").
pub fn rounded_percentage(total: u8) -> String {
    format!("{:.0}", percentage(total))
}

pub fn summarize(answered: &[AnsweredQuestion]) -> ScoreSummary {
    let total: u8 = answered.iter().map(|a| a.score.value()).sum();

    ScoreSummary {
        total,
        max: MAX_TOTAL,
        percentage: percentage(total),
        tier: tier_for_total(total),
    }
}

pub fn score(answers: &AnswerSet) -> Result<ScoreSummary> {
    let answered = resolve(answers)?;
    Ok(summarize(&answered))
}
