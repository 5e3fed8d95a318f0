//! Plain-text report documents.

use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt::Write;

use crate::ledger::{MonthSummary, PeriodSummary};
use crate::models::Movement;
use crate::ui::util::{format_amount, format_number};

const RULE_WIDTH: usize = 64;
const CHART_WIDTH: usize = 32;
const DISPLAY_DATE: &str = "%d/%m/%Y";

pub(crate) fn month_document(summary: &MonthSummary, generated_at: NaiveDateTime) -> String {
    let mut doc = String::new();
    header(&mut doc, &format!("Financial report - {}", summary.key), generated_at);

    section(&mut doc, "Month summary");
    balances(
        &mut doc,
        summary.opening_balance,
        summary.total_entries,
        summary.total_exits,
        summary.closing_balance,
    );

    section(&mut doc, "Movements");
    movement_table(&mut doc, &summary.movements);
    doc
}

pub(crate) fn period_document(period: &PeriodSummary, generated_at: NaiveDateTime) -> String {
    let mut doc = String::new();
    header(
        &mut doc,
        &format!("Financial report - {}", period.label()),
        generated_at,
    );

    section(&mut doc, "Period summary");
    balances(
        &mut doc,
        period.opening_balance,
        period.total_entries,
        period.total_exits,
        period.closing_balance,
    );
    let _ = writeln!(doc, "  Months included:   {}", period.months.len());

    section(&mut doc, "Entries, exits and closing balance");
    chart(&mut doc, &period.months);

    for month in &period.months {
        section(&mut doc, &month.key.to_string());
        movement_table(&mut doc, &month.movements);
    }
    doc
}

fn header(doc: &mut String, title: &str, generated_at: NaiveDateTime) {
    let _ = writeln!(doc, "{title}");
    let _ = writeln!(doc, "Generated: {}", generated_at.format("%d/%m/%Y %H:%M"));
    let _ = writeln!(doc, "{}", "=".repeat(RULE_WIDTH));
}

fn section(doc: &mut String, title: &str) {
    let _ = writeln!(doc);
    let _ = writeln!(doc, "{title}");
    let _ = writeln!(doc, "{}", "-".repeat(title.chars().count()));
}

fn balances(doc: &mut String, opening: Decimal, entries: Decimal, exits: Decimal, closing: Decimal) {
    let _ = writeln!(doc, "  Opening balance:   {}", format_amount(opening));
    let _ = writeln!(doc, "  Total entries:     {}", format_amount(entries));
    let _ = writeln!(doc, "  Total exits:       {}", format_amount(exits));
    let _ = writeln!(doc, "  Closing balance:   {}", format_amount(closing));
}

fn movement_table(doc: &mut String, movements: &[Movement]) {
    if movements.is_empty() {
        let _ = writeln!(doc, "  (no movements)");
        return;
    }
    let _ = writeln!(
        doc,
        "  {:<10}  {:<5}  {:>14}  Description",
        "Date", "Type", "Amount (R$)"
    );
    let _ = writeln!(doc, "  {}  {}  {}  {}", "-".repeat(10), "-".repeat(5), "-".repeat(14), "-".repeat(11));
    for m in movements {
        let _ = writeln!(
            doc,
            "  {:<10}  {:<5}  {:>14}  {}",
            m.date().format(DISPLAY_DATE).to_string(),
            m.kind().label(),
            format_number(m.amount()),
            m.description()
        );
    }
}

/// Three bars per month, scaled against the largest absolute value in the
/// period.
fn chart(doc: &mut String, months: &[MonthSummary]) {
    let max = months
        .iter()
        .flat_map(|m| [m.total_entries, m.total_exits, m.closing_balance.abs()])
        .max()
        .unwrap_or(Decimal::ZERO);

    let label_width = months
        .iter()
        .map(|m| m.key.to_string().chars().count())
        .max()
        .unwrap_or(0);

    for m in months {
        let label = m.key.to_string();
        let rows = [
            ("entries", m.total_entries, '#'),
            ("exits", m.total_exits, '='),
            ("closing", m.closing_balance, '*'),
        ];
        for (i, (name, value, glyph)) in rows.iter().enumerate() {
            let shown = if i == 0 { label.as_str() } else { "" };
            let _ = writeln!(
                doc,
                "  {shown:<label_width$}  {name:<7} {} {}",
                bar(*value, max, *glyph),
                format_number(*value)
            );
        }
    }
}

pub(crate) fn bar(value: Decimal, max: Decimal, glyph: char) -> String {
    if max <= Decimal::ZERO {
        return String::new();
    }
    let len = (value.abs() / max * Decimal::from(CHART_WIDTH))
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(CHART_WIDTH);
    std::iter::repeat(glyph).take(len).collect()
}
