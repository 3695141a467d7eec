//! Terminal and file rendering of pipeline results.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cyto_analysis::{BoxStats, GroupDistribution, ResponseAnalysis};
use cyto_ingest::ImportReport;
use cyto_model::cohort::SIGNIFICANCE_LEVEL;
use cyto_model::{BaselineSummary, FrequencyTable};

/// Message printed when no population reaches significance.
pub const NO_SIGNIFICANT_DIFFERENCES: &str = "No significant differences found.";

pub fn import_table(report: &ImportReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Records imported"), Cell::new(report.records)]);
    table.add_row(vec![Cell::new("Commits"), Cell::new(report.commits)]);
    table.add_row(vec![Cell::new("Projects"), Cell::new(report.projects)]);
    table.add_row(vec![Cell::new("Subjects"), Cell::new(report.people)]);
    table.add_row(vec![Cell::new("Samples"), Cell::new(report.samples)]);
    table.add_row(vec![
        Cell::new("Duration"),
        dim_cell(format!("{} ms", report.duration.as_millis())),
    ]);
    table
}

/// Frequency rows in table order, truncated to `limit` rows when given.
pub fn frequency_table(frequencies: &FrequencyTable, limit: Option<usize>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sample"),
        header_cell("Population"),
        header_cell("Count"),
        header_cell("Total"),
        header_cell("Percentage"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    let shown = limit.unwrap_or(frequencies.len());
    for row in frequencies.iter().take(shown) {
        table.add_row(vec![
            Cell::new(&row.sample),
            Cell::new(row.population),
            Cell::new(row.count),
            Cell::new(row.total_count),
            Cell::new(format!("{:.2}%", row.percentage)),
        ]);
    }
    table
}

/// Write the full frequency table to `path` as CSV.
pub fn write_frequency_csv(frequencies: &FrequencyTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    for row in frequencies {
        writer
            .serialize(row)
            .with_context(|| format!("write {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

/// Box statistics for each population and response group.
pub fn comparison_table(analysis: &ResponseAnalysis) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Population"),
        header_cell("Response"),
        header_cell("n"),
        header_cell("Min"),
        header_cell("Q1"),
        header_cell("Median"),
        header_cell("Q3"),
        header_cell("Max"),
        header_cell("p-value"),
    ]);
    apply_wide_table_style(&mut table);
    for index in 2..=8 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for comparison in &analysis.comparisons {
        let p_cell = match &comparison.test {
            Some(test) if comparison.is_significant() => Cell::new(format!("{:.4}", test.p_value))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
            Some(test) => Cell::new(format!("{:.4}", test.p_value)),
            None => dim_cell("-"),
        };
        let mut first = group_row(comparison.population.as_str(), "yes", &comparison.responders);
        first.push(p_cell);
        table.add_row(first);
        let mut second = group_row("", "no", &comparison.non_responders);
        second.push(dim_cell(""));
        table.add_row(second);
    }
    table
}

fn group_row(population: &str, response: &str, group: &GroupDistribution) -> Vec<Cell> {
    let mut cells = vec![
        Cell::new(population).add_attribute(Attribute::Bold),
        Cell::new(response),
        Cell::new(group.len()),
    ];
    match &group.summary {
        Some(BoxStats {
            min,
            q1,
            median,
            q3,
            max,
            ..
        }) => {
            for value in [min, q1, median, q3, max] {
                cells.push(Cell::new(format!("{value:.2}")));
            }
        }
        None => cells.extend((0..5).map(|_| dim_cell("-"))),
    }
    cells
}

/// Plain-text list of significant populations.
pub fn significance_report(analysis: &ResponseAnalysis) -> String {
    if analysis.significant.is_empty() {
        return format!("{NO_SIGNIFICANT_DIFFERENCES}\n");
    }
    let mut out = format!("Significant populations (p < {SIGNIFICANCE_LEVEL}):\n");
    for entry in &analysis.significant {
        let _ = writeln!(out, "- {}: p = {:.4}", entry.population, entry.p_value);
    }
    out
}

pub fn baseline_tables(summary: &BaselineSummary) -> (Table, Table) {
    let mut projects = Table::new();
    projects.set_header(vec![header_cell("Project"), header_cell("Samples")]);
    apply_table_style(&mut projects);
    align_column(&mut projects, 1, CellAlignment::Right);
    for (project, count) in &summary.samples_per_project {
        projects.add_row(vec![Cell::new(project), Cell::new(count)]);
    }
    projects.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.total_samples()).add_attribute(Attribute::Bold),
    ]);

    let mut subjects = Table::new();
    subjects.set_header(vec![header_cell("Group"), header_cell("Samples")]);
    apply_table_style(&mut subjects);
    align_column(&mut subjects, 1, CellAlignment::Right);
    subjects.add_row(vec![Cell::new("Responders"), Cell::new(summary.responders)]);
    subjects.add_row(vec![
        Cell::new("Non-responders"),
        Cell::new(summary.non_responders),
    ]);
    for (sex, count) in &summary.sex_distribution {
        subjects.add_row(vec![Cell::new(format!("Sex {sex}")), Cell::new(count)]);
    }
    (projects, subjects)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_wide_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
