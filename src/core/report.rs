use crate::core::scoring::rounded_percentage;
use crate::domain::model::{DiagnosisRecord, Recommendation, ScoreSummary};

pub const REPORT_TITLE: &str = "DIAGNÓSTICO SMART CAIXILHO - RELATÓRIO";
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

const RULE: &str = "--------------------------------------------------";

/// Plain-text summary offered for download after a diagnosis.
pub fn render_report(
    record: &DiagnosisRecord,
    summary: &ScoreSummary,
    recommendations: &[Recommendation],
) -> String {
    let mut lines = vec![
        REPORT_TITLE.to_string(),
        RULE.to_string(),
        format!("DATA: {}", record.timestamp),
        format!("EMPRESA: {}", record.company),
        format!("RESPONSÁVEL: {}", record.responsible),
        format!("CONTATO: {} | {}", record.phone, record.email),
        RULE.to_string(),
        format!(
            "PONTUAÇÃO: {}/{} ({}%)",
            summary.total,
            summary.max,
            rounded_percentage(summary.total)
        ),
        format!("RESULTADO: {}", summary.tier),
        RULE.to_string(),
        "PRIORIDADES DE CONSULTORIA:".to_string(),
    ];

    for rec in recommendations {
        lines.push(format!("- {}: {}", rec.dimension, rec.advisory));
    }

    lines.join("\n")
}

/// Spaces become underscores; path separators are neutralized.
pub fn report_file_name(company: &str) -> String {
    format!(
        "Relatorio_{}.txt",
        company.replace(' ', "_").replace(['/', '\\'], "-")
    )
}
