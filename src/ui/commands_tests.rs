#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::app::{App, Screen};
use super::commands::*;
use crate::db::Database;
use crate::ledger::Ledger;
use crate::models::{MonthKey, MovementKind};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn key(y: i32, m: u32) -> MonthKey {
    MonthKey::new(y, m).unwrap()
}

fn setup(reports: &std::path::Path) -> (App, Database) {
    let mut ledger = Ledger::new();
    ledger
        .record_movement(MovementKind::Entry, dec!(1000), date(2024, 1, 10), "salary")
        .unwrap();
    ledger
        .record_movement(MovementKind::Exit, dec!(200), date(2024, 1, 15), "rent")
        .unwrap();
    let mut app = App::new(ledger, reports.to_path_buf());
    app.today = date(2024, 1, 31);
    (app, Database::open_in_memory().unwrap())
}

#[test]
fn test_quit() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    handle_command("q", &mut app, &mut db);
    assert!(!app.running);
}

#[test]
fn test_help_opens_overlay() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    handle_command("help", &mut app, &mut db);
    assert!(app.show_help);
}

#[test]
fn test_empty_input_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    handle_command("   ", &mut app, &mut db);
    assert!(app.running);
    assert!(app.status_message.is_empty());
}

#[test]
fn test_unknown_command_suggests() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    handle_command("reprot", &mut app, &mut db);
    assert_eq!(
        app.status_message,
        "Unknown command: :reprot. Did you mean :report?"
    );
}

#[test]
fn test_add_records_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    handle_command("add exit 45,90 20/01/2024 pharmacy", &mut app, &mut db);

    let summary = app.selected.as_ref().unwrap();
    assert_eq!(summary.total_exits, dec!(245.90));
    assert_eq!(summary.closing_balance, dec!(754.10));
    assert!(app.status_message.starts_with("Recorded exit of R$ 45.90"));
    assert_eq!(db.load_ledger(), app.ledger);
}

#[test]
fn test_add_without_date_uses_today() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    handle_command("a entry 10 tip", &mut app, &mut db);
    let movements = app.selected_movements();
    let last = movements.last().unwrap();
    assert_eq!(last.date(), date(2024, 1, 31));
    assert_eq!(last.description(), "tip");
}

#[test]
fn test_add_invalid_amount_sets_error() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    let before = app.ledger.clone();
    handle_command("add exit -5 refund", &mut app, &mut db);
    assert!(app.status_message.starts_with("Error:"));
    assert_eq!(app.ledger, before);
}

#[test]
fn test_add_with_month_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    handle_command("add Janeiro-2024 exit 10 20/01/2024 book", &mut app, &mut db);
    assert!(app.status_message.starts_with("Recorded exit of R$ 10.00"));
    assert_eq!(app.selected.as_ref().unwrap().closing_balance, dec!(790));

    let before = app.ledger.clone();
    handle_command("add Fevereiro-2024 exit 10 20/01/2024 book", &mut app, &mut db);
    assert!(app.status_message.starts_with("Error:"));
    assert_eq!(app.ledger, before);
    assert_eq!(db.load_ledger(), before);
}

#[test]
fn test_add_overflow_sets_error() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    let before = app.ledger.clone();
    // January already holds 1000 in entries
    handle_command("add entry 79228162514264337593543950335 10/01/2024 big", &mut app, &mut db);
    assert!(app.status_message.starts_with("Error:"));
    assert!(app.running);
    assert_eq!(app.ledger, before);
}

#[test]
fn test_month_selects_existing() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    app.ledger.ensure_month(2024, 2).unwrap();
    app.refresh();
    handle_command("month Janeiro-2024", &mut app, &mut db);
    assert_eq!(app.selected_key(), Some(key(2024, 1)));
    assert_eq!(app.status_message, "Showing Janeiro-2024");
}

#[test]
fn test_month_missing_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    handle_command("m Julho-2024", &mut app, &mut db);
    assert!(app.status_message.contains("has no record yet"));
    assert_eq!(app.ledger.len(), 1);
}

#[test]
fn test_month_bad_format() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    handle_command("month March-2024", &mut app, &mut db);
    assert!(app.status_message.starts_with("Error:"));
}

#[test]
fn test_open_carries_balance() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    handle_command("open Fevereiro-2024", &mut app, &mut db);
    assert_eq!(app.selected_key(), Some(key(2024, 2)));
    assert_eq!(app.status_message, "Fevereiro-2024 opened at R$ 800.00");
    assert_eq!(db.load_ledger().len(), 2);
}

#[test]
fn test_period_switches_screen() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    handle_command("period 2024 1 3", &mut app, &mut db);
    assert_eq!(app.screen, Screen::Period);
    assert_eq!(app.period.as_ref().unwrap().closing_balance, dec!(800));

    handle_command("months", &mut app, &mut db);
    assert_eq!(app.screen, Screen::Months);
}

#[test]
fn test_period_bad_range() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    handle_command("p 2024 5 2", &mut app, &mut db);
    assert!(app.status_message.starts_with("Error:"));
    assert_eq!(app.screen, Screen::Months);
}

#[test]
fn test_report_selected_month() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    handle_command("report", &mut app, &mut db);
    assert!(dir.path().join("report-Janeiro-2024.txt").exists());
    assert!(app.status_message.starts_with("Report written to"));
}

#[test]
fn test_report_missing_month() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    handle_command("report Maio-2024", &mut app, &mut db);
    assert!(app.status_message.starts_with("Error:"));
    assert!(!dir.path().join("report-Maio-2024.txt").exists());
}

#[test]
fn test_report_all_and_period() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    handle_command("report-all", &mut app, &mut db);
    assert!(app.status_message.starts_with("1 report(s) written"));

    handle_command("report-period 2024 1 2", &mut app, &mut db);
    assert!(dir.path().join("report-2024-01_to_02.txt").exists());
}

#[test]
fn test_export_default_path() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    handle_command("export", &mut app, &mut db);
    assert!(dir.path().join("movements.csv").exists());
    assert!(app.status_message.starts_with("Exported 2 movements"));
}

#[test]
fn test_next_prev_month() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    handle_command("open Fevereiro-2024", &mut app, &mut db);
    handle_command("prev-month", &mut app, &mut db);
    assert_eq!(app.selected_key(), Some(key(2024, 1)));
    handle_command("next-month", &mut app, &mut db);
    assert_eq!(app.selected_key(), Some(key(2024, 2)));
}

#[test]
fn test_every_command_has_description() {
    for (name, cmd) in COMMANDS.iter() {
        assert!(!cmd.description.is_empty(), "{name} has no description");
    }
}

#[test]
fn test_open_without_argument_opens_next_month() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut db) = setup(dir.path());
    handle_command("open", &mut app, &mut db);
    assert_eq!(app.selected_key(), Some(key(2024, 2)));

    app.ledger.ensure_month(2024, 12).unwrap();
    app.refresh();
    handle_command("open", &mut app, &mut db);
    assert_eq!(app.selected_key(), Some(key(2025, 1)));
    assert_eq!(app.selected.as_ref().unwrap().opening_balance, dec!(0));
}
