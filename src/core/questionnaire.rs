use crate::domain::model::{AnswerSet, Dimension, Question, Score};
use crate::utils::error::{DiagError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const QUESTION_COUNT: usize = 10;

/// Highest achievable total: every question answered with `Score::MAX`.
pub const MAX_TOTAL: u8 = QUESTION_COUNT as u8 * Score::MAX;

pub const SCALE_LEGEND: &str =
    "0 - Inexistente | 1 - Inicial | 2 - Parcial | 3 - Estruturado | 4 - Integrado";

pub static QUESTIONS: [Question; QUESTION_COUNT] = [
    Question {
        id: "Q1",
        dimension: Dimension::IntegrationData,
        prompt: "Os orçamentos são feitos manualmente ou em software integrado?",
        advisory: "Padronizar o processo de orçamento e integrar com projeto/produção.",
    },
    Question {
        id: "Q2",
        dimension: Dimension::ManagementIndicators,
        prompt: "A empresa coleta e analisa dados de produção e vendas?",
        advisory: "Criar rotina mínima de coleta de dados e transformar em 3 indicadores semanais.",
    },
    Question {
        id: "Q3",
        dimension: Dimension::Automation,
        prompt: "Existem máquinas CNC ou equipamentos automatizados?",
        advisory: "Mapear gargalos e avaliar automação incremental no processo mais crítico.",
    },
    Question {
        id: "Q4",
        dimension: Dimension::IntegrationData,
        prompt: "Os equipamentos estão conectados a softwares de projeto ou ERP?",
        advisory: "Conectar dados de produção ao software/ERP (mesmo que via importação).",
    },
    Question {
        id: "Q5",
        dimension: Dimension::IntegrationData,
        prompt: "Há integração entre orçamento, projeto, produção e logística?",
        advisory: "Definir fluxo ponta a ponta e criar responsáveis e checkpoints.",
    },
    Question {
        id: "Q6",
        dimension: Dimension::PeopleCulture,
        prompt: "Os colaboradores recebem treinamentos em tecnologias digitais?",
        advisory: "Plano de capacitação: 1 treinamento prático por mês.",
    },
    Question {
        id: "Q7",
        dimension: Dimension::PeopleCulture,
        prompt: "A liderança incentiva a inovação e o uso de dados?",
        advisory: "Implantar ritual de gestão: reunião semanal com indicadores (PDCA).",
    },
    Question {
        id: "Q8",
        dimension: Dimension::Sustainability,
        prompt: "Os produtos/processos possuem certificações ambientais ou rastreabilidade digital?",
        advisory: "Mapear requisitos e iniciar registros digitais mínimos por lote/obra.",
    },
    Question {
        id: "Q9",
        dimension: Dimension::GuardrailStandards,
        prompt: "Nos projetos de guarda-corpo, a empresa utiliza sistema construtivo (como os da Q-railing) que possuem cálculos estruturais e ensaios de impacto integrados ao projeto digital, conforme a NBR 14718?",
        advisory: "Adotar sistemas com bibliotecas digitais e laudos de impacto integrados.",
    },
    Question {
        id: "Q10",
        dimension: Dimension::TechnicalStandards,
        prompt: "A empresa utiliza ferramentas digitais para garantir que os projetos e a fabricação estejam em conformidade com as normas ABNT NBR 10821 (Esquadrias) e NBR 7199 (Vidros)?",
        advisory: "Implantar software que automatize o cálculo de pressão de vento e flecha.",
    },
];

pub fn find_question(id: &str) -> Option<&'static Question> {
    QUESTIONS.iter().find(|q| q.id == id)
}

/// A question paired with its answer, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnsweredQuestion {
    pub question: &'static Question,
    pub score: Score,
}

/// Pairs every question of the bank with its answer.
///
/// Fails with `IncompleteAnswers` naming every unanswered id; a partial
/// answer set never produces a partial score.
pub fn resolve(answers: &AnswerSet) -> Result<Vec<AnsweredQuestion>> {
    let mut resolved = Vec::with_capacity(QUESTION_COUNT);
    let mut missing = Vec::new();

    for question in QUESTIONS.iter() {
        match answers.get(question.id) {
            Some(score) => resolved.push(AnsweredQuestion { question, score }),
            None => missing.push(question.id.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(DiagError::IncompleteAnswers { missing });
    }

    for id in answers.question_ids() {
        if find_question(id).is_none() {
            tracing::debug!("Ignoring answer for unknown question id {}", id);
        }
    }

    Ok(resolved)
}

fn parse_score(question_id: &str, raw: i64) -> Result<Score> {
    Score::try_from(raw).map_err(|_| DiagError::InvalidScore {
        question: question_id.to_string(),
        value: raw,
    })
}

/// 解析 "3,2,4,..." 形式的答案，依題目宣告順序對應
pub fn parse_answer_list(input: &str) -> Result<AnswerSet> {
    let values: Vec<&str> = input
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect();

    if values.len() != QUESTION_COUNT {
        return Err(DiagError::validation(format!(
            "Expected {} comma-separated scores, got {}",
            QUESTION_COUNT,
            values.len()
        )));
    }

    let mut answers = AnswerSet::new();
    for (question, raw) in QUESTIONS.iter().zip(values) {
        let value: i64 = raw.parse().map_err(|_| {
            DiagError::validation(format!("{} must be a number, got '{}'", question.id, raw))
        })?;
        answers.insert(question.id, parse_score(question.id, value)?);
    }

    Ok(answers)
}

#[derive(Debug, Deserialize)]
struct AnswersFile {
    answers: BTreeMap<String, i64>,
}

/// Loads an answers file:
///
/// ```toml
/// [answers]
/// Q1 = 3
/// Q2 = 1
/// ```
pub fn parse_answers_toml(content: &str) -> Result<AnswerSet> {
    let file: AnswersFile = toml::from_str(content)?;

    let mut answers = AnswerSet::new();
    for (id, raw) in file.answers {
        if find_question(&id).is_none() {
            return Err(DiagError::validation(format!("Unknown question id '{}'", id)));
        }
        let score = parse_score(&id, raw)?;
        answers.insert(id, score);
    }

    Ok(answers)
}

pub fn load_answers_file<P: AsRef<Path>>(path: P) -> Result<AnswerSet> {
    let content = std::fs::read_to_string(&path)?;
    parse_answers_toml(&content)
}
