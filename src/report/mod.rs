mod document;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};

use crate::ledger::Ledger;
use crate::models::MonthKey;

pub(crate) use document::{month_document, period_document};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn month_report_path(dir: &Path, key: &MonthKey) -> PathBuf {
    dir.join(format!("report-{key}.txt"))
}

pub(crate) fn period_report_path(dir: &Path, year: i32, from: u32, to: u32) -> PathBuf {
    dir.join(format!("report-{year}-{from:02}_to_{to:02}.txt"))
}

/// Write the report for one recorded month and return its path.
pub(crate) fn render_month(ledger: &Ledger, key: &MonthKey, dir: &Path) -> Result<PathBuf> {
    let summary = ledger.summarize_month(key)?;
    let path = month_report_path(dir, key);
    write_document(&path, &month_document(&summary, generated_at()))?;
    tracing::info!(month = %key, path = %path.display(), "rendered month report");
    Ok(path)
}

/// One report per recorded month, oldest first. An empty ledger renders
/// nothing.
pub(crate) fn render_all(ledger: &Ledger, dir: &Path) -> Result<Vec<PathBuf>> {
    ledger
        .keys()
        .iter()
        .map(|key| render_month(ledger, key, dir))
        .collect()
}

pub(crate) fn render_period(
    ledger: &Ledger,
    year: i32,
    month_from: u32,
    month_to: u32,
    dir: &Path,
) -> Result<PathBuf> {
    let period = ledger.aggregate_period(year, month_from, month_to)?;
    let path = period_report_path(dir, year, month_from, month_to);
    write_document(&path, &period_document(&period, generated_at()))?;
    tracing::info!(
        period = %period.label(),
        months = period.months.len(),
        path = %path.display(),
        "rendered period report"
    );
    Ok(path)
}

/// Export every movement as CSV, month by month, each month in date order.
/// Returns the number of movements written.
pub(crate) fn export_csv(ledger: &Ledger, path: &Path) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    wtr.write_record(["month", "date", "kind", "amount", "description"])?;

    let mut count = 0;
    for summary in ledger.summaries() {
        let month = summary.key.to_string();
        for m in &summary.movements {
            let date = m.date().format(DATE_FORMAT).to_string();
            let amount = m.amount().to_string();
            wtr.write_record([
                month.as_str(),
                date.as_str(),
                m.kind().as_str(),
                amount.as_str(),
                m.description(),
            ])?;
            count += 1;
        }
    }
    wtr.flush()
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    tracing::info!(movements = count, path = %path.display(), "exported movements");
    Ok(count)
}

fn write_document(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory: {}", parent.display()))?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write report: {}", path.display()))
}

fn generated_at() -> NaiveDateTime {
    Local::now().naive_local()
}
