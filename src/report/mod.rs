pub mod types;

pub use types::Report;

use crate::pr::PullRequestEntry;
use crate::stats::ReviewerTable;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

use types::COLUMNS;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to serialize PR data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Build a Report from the finalized reviewer table.
pub fn build(records_analyzed: usize, reviewers: ReviewerTable) -> Report {
    Report {
        records_analyzed,
        reviewers,
    }
}

/// Render the statistics report as CSV: a header row plus one row per
/// reviewer, in table order.
pub fn render_csv(report: &Report) -> String {
    let mut csv = String::new();
    push_csv_line(&mut csv, COLUMNS.iter().copied());
    for row in report.rows() {
        push_csv_line(&mut csv, row.iter().map(String::as_str));
    }
    csv
}

/// Render the raw PR edges as a pretty-printed JSON array, fields in their
/// original order.
pub fn render_raw_dump(entries: &[PullRequestEntry]) -> Result<String, ReportError> {
    let raw: Vec<&serde_json::Value> = entries.iter().map(|e| &e.raw).collect();
    let mut json = serde_json::to_string_pretty(&raw)?;
    json.push('\n');
    Ok(json)
}

/// Write both output files.
///
/// Everything is rendered before the first byte hits disk. Both files are
/// staged as temporary siblings and only renamed into place once both writes
/// succeeded, so a failed write leaves the previous pair of outputs untouched.
#[instrument(skip_all, fields(analysis = %analysis_path.display(), pr_data = %pr_data_path.display()))]
pub fn write_outputs(
    report: &Report,
    entries: &[PullRequestEntry],
    analysis_path: &Path,
    pr_data_path: &Path,
) -> Result<(), ReportError> {
    let csv = render_csv(report);
    let dump = render_raw_dump(entries)?;

    let dump_tmp = stage(pr_data_path, &dump)?;
    let csv_tmp = match stage(analysis_path, &csv) {
        Ok(tmp) => tmp,
        Err(err) => {
            fs::remove_file(&dump_tmp).ok();
            return Err(err);
        }
    };

    if let Err(err) = fs::rename(&dump_tmp, pr_data_path) {
        fs::remove_file(&dump_tmp).ok();
        fs::remove_file(&csv_tmp).ok();
        return Err(err.into());
    }
    debug!(records = entries.len(), bytes = dump.len(), "wrote PR data dump");

    if let Err(err) = fs::rename(&csv_tmp, analysis_path) {
        fs::remove_file(&csv_tmp).ok();
        return Err(err.into());
    }
    debug!(reviewers = report.reviewers.len(), bytes = csv.len(), "wrote statistics report");
    Ok(())
}

/// Print the report to the terminal as an aligned table.
pub fn print_terminal_report(report: &Report) {
    let rows = report.rows();
    let mut widths = COLUMNS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    println!();
    let header: Vec<String> = COLUMNS
        .iter()
        .zip(widths)
        .map(|(title, width)| format!("{title:<width$}"))
        .collect();
    println!("{}", header.join("  ").bold());

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(column, (cell, width))| match column {
                0 => format!("{cell:<width$}").cyan().to_string(),
                _ => format!("{cell:>width$}"),
            })
            .collect();
        println!("{}", cells.join("  "));
    }
    println!();
}

fn push_csv_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>) {
    let line: Vec<String> = cells.map(escape_csv).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

/// Quote a field when it contains a delimiter, quote or line break.
fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write `contents` next to `path` under a `.tmp` name and return that name.
/// Nothing is left behind when the write fails.
fn stage(path: &Path, contents: &str) -> Result<PathBuf, ReportError> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    if let Err(err) = fs::write(&tmp_path, contents) {
        fs::remove_file(&tmp_path).ok();
        return Err(err.into());
    }
    Ok(tmp_path)
}
