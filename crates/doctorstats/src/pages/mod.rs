//! One module per view: each subcommand enters its route through the guard,
//! calls the service facade, and renders with the components.

pub mod analysis;
pub mod auth;
pub mod dashboard;
pub mod datasets;
pub mod landing;
pub mod profile;
pub mod reports;
pub mod visualizations;

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Read one line from stdin after printing `label` on stderr
pub(crate) fn prompt(label: &str) -> Result<String> {
    eprint!("{}: ", label);
    std::io::stderr().flush().ok();
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .with_context(|| format!("Failed to read {}", label.to_lowercase()))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Flag value, or an interactive prompt when the flag was omitted
pub(crate) fn value_or_prompt(value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => prompt(label),
    }
}
