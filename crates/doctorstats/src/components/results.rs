//! Renderers for the five analysis result shapes

use super::charts::{bar_chart, heatmap};
use super::{format_p_value, format_stat, heading, new_table, significance_cell};
use comfy_table::{Cell, Row};
use doctorstats_core::types::models::results::Matrix;
use doctorstats_core::types::{
    AnalysisResults, BasicStatistics, ChiSquareAnalysis, ComparativeStatistics,
    CorrelationAnalysis, RegressionAnalysis,
};

const BAR_WIDTH: usize = 30;

/// Human-readable rendering of completed results, titled by analysis type
pub fn render_results(results: &AnalysisResults, no_color: bool) -> String {
    let body = match results {
        AnalysisResults::Basic(stats) => render_basic(stats, no_color),
        AnalysisResults::Correlation(corr) => render_correlation(corr, no_color),
        AnalysisResults::Comparative(comp) => render_comparative(comp, no_color),
        AnalysisResults::ChiSquare(chi) => render_chi_square(chi, no_color),
        AnalysisResults::Regression(reg) => render_regression(reg, no_color),
    };
    format!("{}\n\n{}", heading(results.kind().label()), body)
}

/// Rows are the outer keys, columns the union of inner keys in first-seen order
fn matrix_table(matrix: &Matrix<f64>, corner: &str, no_color: bool) -> String {
    let mut columns: Vec<&str> = Vec::new();
    for inner in matrix.values() {
        for key in inner.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut headers = vec![corner];
    headers.extend(columns.iter().copied());
    let mut table = new_table(&headers, no_color);
    for (row, inner) in matrix {
        let mut cells = vec![row.clone()];
        cells.extend(columns.iter().map(|c| {
            inner
                .get(*c)
                .map(|v| format_stat(*v))
                .unwrap_or_else(|| "-".to_string())
        }));
        table.add_row(Row::from(cells));
    }
    table.to_string()
}

fn render_basic(stats: &BasicStatistics, no_color: bool) -> String {
    if stats.descriptive_statistics.is_empty() {
        return "No descriptive statistics returned.".to_string();
    }

    let mut out = matrix_table(&stats.descriptive_statistics, "Column", no_color);

    let missing: Vec<(String, f64)> = stats
        .missing_data
        .iter()
        .filter_map(|(col, m)| m.get("percentage").map(|p| (col.clone(), *p)))
        .filter(|(_, p)| *p > 0.0)
        .collect();
    if !missing.is_empty() {
        out.push_str("\n\nMissing values (%)\n");
        out.push_str(&bar_chart(&missing, BAR_WIDTH));
    }
    out
}

fn render_comparative(comp: &ComparativeStatistics, no_color: bool) -> String {
    let mut out = matrix_table(&comp.group_statistics, "Group", no_color);

    let means: Vec<(String, f64)> = comp
        .group_statistics
        .iter()
        .filter_map(|(group, stats)| stats.get("mean").map(|m| (group.clone(), *m)))
        .collect();
    if !means.is_empty() {
        out.push_str("\n\nGroup means\n");
        out.push_str(&bar_chart(&means, BAR_WIDTH));
    }

    let test = &comp.statistical_test;
    out.push_str(&format!(
        "\n\n{}: statistic = {}, p = {}\n",
        test.name,
        format_stat(test.statistic),
        format_p_value(test.p_value)
    ));
    out.push_str(if test.significant {
        "Significant difference between groups (p < 0.05)"
    } else {
        "No significant difference between groups"
    });

    if let Some(pairwise) = comp.pairwise_tests.as_ref().filter(|p| !p.is_empty()) {
        let mut table = new_table(&["Comparison", "Statistic", "p-value", "Significant"], no_color);
        for (pair, t) in pairwise {
            table.add_row(vec![
                Cell::new(pair),
                Cell::new(format_stat(t.statistic)),
                Cell::new(format_p_value(t.pvalue)),
                significance_cell(t.significant, no_color),
            ]);
        }
        out.push_str("\n\nPairwise comparisons\n");
        out.push_str(&table.to_string());
    }
    out
}

fn render_correlation(corr: &CorrelationAnalysis, no_color: bool) -> String {
    let variables = corr.variables();
    if variables.is_empty() {
        return "No correlation matrix returned.".to_string();
    }

    let mut out = matrix_table(&corr.correlation_matrix, "", no_color);
    out.push_str("\n\n");
    out.push_str(&heatmap(&variables, |a, b| corr.coefficient(a, b)));

    out.push_str("\n\nSignificant correlations\n");
    if corr.significant_correlations.is_empty() {
        out.push_str("None at p < 0.05");
        return out;
    }
    let mut table = new_table(&["Variable 1", "Variable 2", "r", "p-value"], no_color);
    for pair in &corr.significant_correlations {
        table.add_row(vec![
            Cell::new(&pair.variable1),
            Cell::new(&pair.variable2),
            Cell::new(format_stat(pair.correlation)),
            Cell::new(format_p_value(pair.p_value)),
        ]);
    }
    out.push_str(&table.to_string());
    out
}

fn render_chi_square(chi: &ChiSquareAnalysis, no_color: bool) -> String {
    let cols = chi.col_labels();
    let mut headers = vec![""];
    headers.extend(cols.iter().map(String::as_str));
    headers.push("Total");

    let mut table = new_table(&headers, no_color);
    for row in chi.row_labels() {
        let counts: Vec<u64> = cols.iter().map(|c| chi.cell(&row, c)).collect();
        let total: u64 = counts.iter().sum();
        let mut cells = vec![row];
        cells.extend(counts.iter().map(u64::to_string));
        cells.push(total.to_string());
        table.add_row(Row::from(cells));
    }

    let mut out = table.to_string();
    out.push_str(&format!(
        "\n\nChi-square = {} (df = {}), p = {}, Cramér's V = {}\n",
        format_stat(chi.chi_square_statistic),
        chi.degrees_of_freedom,
        format_p_value(chi.p_value),
        format_stat(chi.cramers_v)
    ));
    out.push_str(if chi.significant {
        "Variables are associated (p < 0.05)"
    } else {
        "No significant association"
    });
    out
}

fn render_regression(reg: &RegressionAnalysis, no_color: bool) -> String {
    let mut table = new_table(
        &["Term", "Estimate", "Std. error", "t", "p-value"],
        no_color,
    );
    let terms = [
        (
            "Intercept",
            reg.coefficients.intercept,
            reg.standard_errors.intercept,
            reg.t_statistics.intercept,
            reg.p_values.intercept,
        ),
        (
            "Slope",
            reg.coefficients.slope,
            reg.standard_errors.slope,
            reg.t_statistics.slope,
            reg.p_values.slope,
        ),
    ];
    for (term, estimate, se, t, p) in terms {
        table.add_row(vec![
            Cell::new(term),
            Cell::new(format_stat(estimate)),
            Cell::new(format_stat(se)),
            Cell::new(format_stat(t)),
            Cell::new(format_p_value(p)),
        ]);
    }

    let residuals = &reg.residuals_summary;
    let mut out = format!(
        "y = {} + {}·x\n\n{}",
        format_stat(reg.coefficients.intercept),
        format_stat(reg.coefficients.slope),
        table
    );
    out.push_str(&format!(
        "\n\nR² = {}, adjusted R² = {}, n = {}",
        format_stat(reg.r_squared),
        format_stat(reg.adjusted_r_squared),
        reg.sample_size
    ));
    out.push_str(&format!(
        "\nResiduals: mean {}, sd {}, skewness {}, kurtosis {}",
        format_stat(residuals.mean),
        format_stat(residuals.std),
        format_stat(residuals.skewness),
        format_stat(residuals.kurtosis)
    ));
    out
}
