//! Presentational components: comfy-table tables and text charts
//!
//! Every component returns a `String` so pages decide where it goes.

pub mod charts;
pub mod results;
pub mod tables;

use chrono::{DateTime, Utc};
use comfy_table::{Cell, Color, ContentArrangement, Table};

// ============================================================================
// Table helpers
// ============================================================================

/// Table with dynamic width and a (optionally colored) header row
pub fn new_table(headers: &[&str], no_color: bool) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if no_color {
        table.set_header(headers.to_vec());
    } else {
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    }
    table
}

/// Cell colored only when colors are enabled
pub fn colored(text: impl ToString, color: Color, no_color: bool) -> Cell {
    let cell = Cell::new(text);
    if no_color {
        cell
    } else {
        cell.fg(color)
    }
}

pub fn significance_cell(significant: bool, no_color: bool) -> Cell {
    if significant {
        colored("yes", Color::Green, no_color)
    } else {
        colored("no", Color::Yellow, no_color)
    }
}

/// Bold section title for text output
pub fn heading(title: &str) -> String {
    format!("{}\n{}", title, "=".repeat(title.chars().count()))
}

// ============================================================================
// Utilities
// ============================================================================

pub fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Statistic with 3 decimals; NaN and infinities shown as "-"
pub fn format_stat(value: f64) -> String {
    if value.is_finite() {
        format!("{:.3}", value)
    } else {
        "-".to_string()
    }
}

pub fn format_p_value(p: f64) -> String {
    if !p.is_finite() {
        "-".to_string()
    } else if p < 0.001 {
        "< 0.001".to_string()
    } else {
        format!("{:.3}", p)
    }
}

pub fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn truncate(s: &str, max: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max {
        s.to_string()
    } else {
        s.chars().take(max.saturating_sub(1)).collect::<String>() + "…"
    }
}
