use crate::core::questionnaire::{QUESTIONS, SCALE_LEGEND};
use crate::core::radar::render_bars;
use crate::core::scoring::rounded_percentage;
use crate::domain::model::{DiagnosisRecord, DiagnosisReport};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};

const BAR_WIDTH: usize = 20;

pub fn questions_text() -> String {
    let mut lines = vec![SCALE_LEGEND.to_string(), String::new()];
    for q in QUESTIONS.iter() {
        lines.push(format!("{} [{}] {}", q.id, q.dimension, q.prompt));
    }
    lines.join("\n")
}

pub fn summary_text(report: &DiagnosisReport) -> String {
    let score = &report.score;
    let mut lines = vec![
        format!("### Diagnóstico Concluído para {}!", report.record.company),
        format!(
            "Pontos: {}/{}   Maturidade: {}%   {}",
            score.total,
            score.max,
            rounded_percentage(score.total),
            score.tier
        ),
        String::new(),
        "Média por dimensão (0-4):".to_string(),
        render_bars(&report.radar, BAR_WIDTH),
        String::new(),
        "💡 Recomendações Prioritárias".to_string(),
    ];
    for rec in &report.recommendations {
        lines.push(format!("  {}: {}", rec.dimension, rec.advisory));
    }
    lines.push(String::new());
    lines.push(format!("📥 Resumo do relatório salvo em {}", report.report_file_name));
    lines.join("\n")
}

pub fn leads_table(records: &[DiagnosisRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(crate::core::ledger::LEDGER_HEADER);

    for r in records {
        table.add_row(vec![
            Cell::new(&r.timestamp),
            Cell::new(&r.company),
            Cell::new(&r.responsible),
            Cell::new(&r.phone),
            Cell::new(&r.email),
            Cell::new(r.total_score),
            Cell::new(&r.tier),
        ]);
    }
    table
}
