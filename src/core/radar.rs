use crate::core::questionnaire::AnsweredQuestion;
use crate::domain::model::{Dimension, RadarPoint, Score};
use std::collections::HashMap;

pub const AXIS_MAX: f64 = Score::MAX as f64;

/// Mean score per dimension, ordered by dimension label.
pub fn dimension_averages(answered: &[AnsweredQuestion]) -> Vec<RadarPoint> {
    let mut groups: HashMap<Dimension, (u32, u32)> = HashMap::new();
    for a in answered {
        let entry = groups.entry(a.question.dimension).or_insert((0, 0));
        entry.0 += u32::from(a.score.value());
        entry.1 += 1;
    }

    let mut points: Vec<RadarPoint> = groups
        .into_iter()
        .map(|(dimension, (sum, count))| RadarPoint {
            dimension,
            average: f64::from(sum) / f64::from(count),
        })
        .collect();
    points.sort_by(|a, b| a.dimension.label().cmp(b.dimension.label()));
    points
}

/// 終端機用的橫條圖
pub fn render_bars(points: &[RadarPoint], width: usize) -> String {
    let label_width = points
        .iter()
        .map(|p| p.dimension.label().chars().count())
        .max()
        .unwrap_or(0);

    points
        .iter()
        .map(|p| {
            let filled = ((p.average / AXIS_MAX) * width as f64).round() as usize;
            let label = p.dimension.label();
            let padding = label_width - label.chars().count();
            format!(
                "{}{} |{}{}| {:.2}",
                label,
                " ".repeat(padding),
                "█".repeat(filled),
                " ".repeat(width.saturating_sub(filled)),
                p.average
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
