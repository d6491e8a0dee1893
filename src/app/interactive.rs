use crate::core::questionnaire::{QUESTIONS, SCALE_LEGEND};
use crate::domain::model::{AnswerSet, CompanyProfile, Score};
use crate::utils::error::{DiagError, Result};
use std::io::{BufRead, Write};

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<String> {
    write!(output, "{}: ", label)?;
    output.flush()?;
    Ok(read_line(input)?.unwrap_or_default())
}

/// Step 1: asks only for the fields that were not given on the command line.
pub fn prompt_profile<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    mut profile: CompanyProfile,
) -> Result<CompanyProfile> {
    let needs_prompt = profile.company.is_empty()
        || profile.responsible.is_empty()
        || profile.phone.is_empty()
        || profile.email.is_empty();
    if !needs_prompt {
        return Ok(profile);
    }

    writeln!(output, "📝 Passo 1: Cadastro da Empresa")?;
    if profile.company.is_empty() {
        profile.company = ask(input, output, "Nome da Empresa")?;
    }
    if profile.responsible.is_empty() {
        profile.responsible = ask(input, output, "Responsável / Cargo")?;
    }
    if profile.phone.is_empty() {
        profile.phone = ask(input, output, "Telefone (WhatsApp)")?;
    }
    if profile.email.is_empty() {
        profile.email = ask(input, output, "E-mail de Contato")?;
    }
    Ok(profile)
}

/// Step 2: one score per question, re-asking until the value is within 0..=4.
pub fn prompt_answers<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<AnswerSet> {
    writeln!(output, "📝 Passo 2: Avaliação de Maturidade")?;
    writeln!(output, "{}", SCALE_LEGEND)?;

    let mut answers = AnswerSet::new();
    for question in QUESTIONS.iter() {
        loop {
            write!(output, "{} - {} [0-4]: ", question.id, question.prompt)?;
            output.flush()?;

            let Some(line) = read_line(input)? else {
                return Err(DiagError::IncompleteAnswers {
                    missing: QUESTIONS
                        .iter()
                        .filter(|q| answers.get(q.id).is_none())
                        .map(|q| q.id.to_string())
                        .collect(),
                });
            };

            match line.parse::<u8>().ok().and_then(Score::new) {
                Some(score) => {
                    answers.insert(question.id, score);
                    break;
                }
                None => writeln!(output, "⚠️ Informe um número entre 0 e 4.")?,
            }
        }
    }
    Ok(answers)
}
