//! CSV, JSON and console renderings of the output table

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::types::{FixtureReport, OutputRow};
use crate::CSV_HEADERS;

/// Write the header and every row as CSV
pub fn write_csv<W: Write>(writer: W, rows: &[OutputRow]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);

    csv_writer.write_record(CSV_HEADERS).context("Failed to write CSV header")?;
    for row in rows {
        csv_writer.write_record(row.to_record()).context("Failed to write CSV row")?;
    }
    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

pub fn to_csv_string(rows: &[OutputRow]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, rows)?;
    String::from_utf8(buf).context("CSV output is not valid UTF-8")
}

/// Write the CSV file, creating parent directories as needed
pub fn write_csv_file(path: &Path, rows: &[OutputRow]) -> Result<()> {
    create_parent_dir(path)?;
    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(file, rows)?;

    info!("Saved {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Save the full report (rows and per-team summaries) as pretty JSON
pub fn write_json_file(path: &Path, report: &FixtureReport) -> Result<()> {
    create_parent_dir(path)?;
    let json_content = serde_json::to_string_pretty(report)?;
    fs::write(path, json_content).with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Saved report for {} teams to {}", report.teams.len(), path.display());
    Ok(())
}

fn create_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))
        }
        _ => Ok(()),
    }
}

/// Fixed-width table with a header and a separator line
pub fn render_table(rows: &[OutputRow]) -> String {
    let mut widths = CSV_HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.to_record()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render_line = |cells: [&str; 5]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&render_line(CSV_HEADERS));
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));
    out.push('\n');
    for row in rows {
        out.push_str(&render_line(row.to_record()));
        out.push('\n');
    }
    out
}

pub fn print_table(rows: &[OutputRow]) {
    println!();
    print!("{}", render_table(rows));
}
