//! Text charts: horizontal bars, a shaded correlation heatmap and sparklines

use super::{format_stat, truncate};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];
const LABEL_WIDTH: usize = 18;

/// Horizontal bar chart scaled to the largest absolute value.
///
/// Negative values are drawn with a lighter shade.
pub fn bar_chart(items: &[(String, f64)], width: usize) -> String {
    let finite: Vec<&(String, f64)> = items.iter().filter(|(_, v)| v.is_finite()).collect();
    if finite.is_empty() {
        return "(no data)".to_string();
    }

    let max = finite.iter().map(|(_, v)| v.abs()).fold(0.0_f64, f64::max);
    let label_width = finite
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0)
        .min(LABEL_WIDTH);

    finite
        .iter()
        .map(|(label, value)| {
            let len = if max > 0.0 {
                ((value.abs() / max) * width as f64).round() as usize
            } else {
                0
            };
            let glyph = if *value < 0.0 { '░' } else { '█' };
            format!(
                "{:<label_width$} │{:<width$} {}",
                truncate(label, label_width),
                glyph.to_string().repeat(len),
                format_stat(*value),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Shade for a correlation coefficient by magnitude
fn shade(r: f64) -> char {
    if !r.is_finite() {
        return '?';
    }
    let idx = (r.abs().min(1.0) * (SHADES.len() - 1) as f64).round() as usize;
    SHADES[idx]
}

/// Correlation heatmap: one shaded cell (two glyphs wide) per variable pair.
///
/// `coefficient` looks up r for a pair; missing pairs render as `·`.
pub fn heatmap<F>(labels: &[String], coefficient: F) -> String
where
    F: Fn(&str, &str) -> Option<f64>,
{
    if labels.is_empty() {
        return "(no data)".to_string();
    }

    let label_width = labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .min(LABEL_WIDTH);

    let mut lines = Vec::with_capacity(labels.len() + 2);
    for row in labels {
        let cells: String = labels
            .iter()
            .map(|col| match coefficient(row, col) {
                Some(r) => shade(r).to_string().repeat(2),
                None => "· ".to_string(),
            })
            .collect();
        lines.push(format!("{:<label_width$} │{}│", truncate(row, label_width), cells));
    }

    // Column index footer: 1-based positions matching row order
    let footer: String = (1..=labels.len()).map(|i| format!("{:<2}", i % 100)).collect();
    lines.push(format!("{:<label_width$}  {}", "", footer));
    lines.push(format!(
        "{:<label_width$}  |r|: 0 '{}' .25 '{}' .5 '{}' .75 '{}' 1",
        "", SHADES[0], SHADES[1], SHADES[2], SHADES[3]
    ));
    lines.join("\n")
}

/// One-line sparkline, min..max mapped onto eight levels
pub fn sparkline(values: &[f64]) -> String {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return String::new();
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    values
        .iter()
        .map(|v| {
            if !v.is_finite() {
                ' '
            } else if span == 0.0 {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            } else {
                let idx = ((v - min) / span * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
                SPARK_LEVELS[idx.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}
