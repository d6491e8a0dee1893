use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Assessment category used to group questions on the radar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "Integração & Dados")]
    IntegrationData,
    #[serde(rename = "Gestão & Indicadores")]
    ManagementIndicators,
    #[serde(rename = "Automação")]
    Automation,
    #[serde(rename = "Pessoas & Cultura")]
    PeopleCulture,
    #[serde(rename = "Sustentabilidade")]
    Sustainability,
    #[serde(rename = "Normas (Guarda-corpo)")]
    GuardrailStandards,
    #[serde(rename = "Normas Técnicas")]
    TechnicalStandards,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::IntegrationData,
        Dimension::ManagementIndicators,
        Dimension::Automation,
        Dimension::PeopleCulture,
        Dimension::Sustainability,
        Dimension::GuardrailStandards,
        Dimension::TechnicalStandards,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::IntegrationData => "Integração & Dados",
            Dimension::ManagementIndicators => "Gestão & Indicadores",
            Dimension::Automation => "Automação",
            Dimension::PeopleCulture => "Pessoas & Cultura",
            Dimension::Sustainability => "Sustentabilidade",
            Dimension::GuardrailStandards => "Normas (Guarda-corpo)",
            Dimension::TechnicalStandards => "Normas Técnicas",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: &'static str,
    pub dimension: Dimension,
    pub prompt: &'static str,
    pub advisory: &'static str,
}

/// A single answer on the 0 (Inexistente) to 4 (Integrado) scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 4;

    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            0 => "Inexistente",
            1 => "Inicial",
            2 => "Parcial",
            3 => "Estruturado",
            _ => "Integrado",
        }
    }
}

impl TryFrom<i64> for Score {
    type Error = String;

    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Score::new)
            .ok_or_else(|| format!("score {} is outside 0..=4", value))
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

/// Answers keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    scores: BTreeMap<String, Score>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, question_id: impl Into<String>, score: Score) {
        self.scores.insert(question_id.into(), score);
    }

    pub fn get(&self, question_id: &str) -> Option<Score> {
        self.scores.get(question_id).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn question_ids(&self) -> impl Iterator<Item = &str> {
        self.scores.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, Score)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (K, Score)>>(iter: I) -> Self {
        let mut answers = AnswerSet::new();
        for (id, score) in iter {
            answers.insert(id, score);
        }
        answers
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "Nível 1 – Operação Invisível")]
    Invisible,
    #[serde(rename = "Nível 2 – Parcialmente Visível")]
    PartiallyVisible,
    #[serde(rename = "Nível 3 – Operação Controlada")]
    Controlled,
    #[serde(rename = "Nível 4 – Operação Inteligente")]
    Intelligent,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Invisible => "Nível 1 – Operação Invisível",
            Tier::PartiallyVisible => "Nível 2 – Parcialmente Visível",
            Tier::Controlled => "Nível 3 – Operação Controlada",
            Tier::Intelligent => "Nível 4 – Operação Inteligente",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub company: String,
    pub responsible: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub profile: CompanyProfile,
    pub answers: AnswerSet,
}

/// One row of the leads ledger. Field names follow the export header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    #[serde(rename = "Data")]
    pub timestamp: String,
    #[serde(rename = "Empresa")]
    pub company: String,
    #[serde(rename = "Responsavel")]
    pub responsible: String,
    #[serde(rename = "Telefone")]
    pub phone: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Pontuacao")]
    pub total_score: u8,
    #[serde(rename = "Nivel")]
    pub tier: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub total: u8,
    pub max: u8,
    pub percentage: f64,
    pub tier: Tier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub question_id: &'static str,
    pub dimension: Dimension,
    pub advisory: &'static str,
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarPoint {
    pub dimension: Dimension,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisReport {
    pub record: DiagnosisRecord,
    pub score: ScoreSummary,
    pub radar: Vec<RadarPoint>,
    pub recommendations: Vec<Recommendation>,
    pub report_file_name: String,
    pub report_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        assert!(Score::new(0).is_some());
        assert!(Score::new(4).is_some());
        assert!(Score::new(5).is_none());
        assert!(Score::try_from(-1).is_err());
        assert_eq!(Score::try_from(3).unwrap().label(), "Estruturado");
    }

    #[test]
    fn test_score_deserialize_rejects_out_of_range() {
        let ok: Score = serde_json::from_str("2").unwrap();
        assert_eq!(ok.value(), 2);
        assert!(serde_json::from_str::<Score>("7").is_err());
    }

    #[test]
    fn test_dimension_serializes_as_label() {
        let json = serde_json::to_string(&Dimension::PeopleCulture).unwrap();
        assert_eq!(json, "\"Pessoas & Cultura\"");
        for dimension in Dimension::ALL {
            let json = serde_json::to_string(&dimension).unwrap();
            assert_eq!(json, format!("\"{}\"", dimension.label()));
        }
    }

    #[test]
    fn test_answer_set_from_iter() {
        let answers: AnswerSet = [("Q1", Score::new(1).unwrap()), ("Q2", Score::new(4).unwrap())]
            .into_iter()
            .collect();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers.get("Q2").map(Score::value), Some(4));
        assert_eq!(answers.get("Q3"), None);
    }
}
