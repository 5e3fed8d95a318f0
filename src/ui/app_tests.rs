#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::app::*;
use crate::db::Database;
use crate::input::MovementInput;
use crate::ledger::Ledger;
use crate::models::{MonthKey, MovementKind};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn key(y: i32, m: u32) -> MonthKey {
    MonthKey::new(y, m).unwrap()
}

fn input(kind: MovementKind, amount: rust_decimal::Decimal, d: NaiveDate, desc: &str) -> MovementInput {
    MovementInput {
        month: None,
        kind,
        amount,
        date: d,
        description: desc.into(),
    }
}

fn app_with_two_months() -> App {
    let mut ledger = Ledger::new();
    ledger
        .record_movement(MovementKind::Entry, dec!(1000), date(2024, 1, 10), "salary")
        .unwrap();
    ledger
        .record_movement(MovementKind::Exit, dec!(50), date(2024, 2, 3), "gym")
        .unwrap();
    App::new(ledger, std::env::temp_dir())
}

#[test]
fn test_new_selects_latest_month() {
    let app = app_with_two_months();
    assert_eq!(app.month_keys, vec![key(2024, 1), key(2024, 2)]);
    assert_eq!(app.selected_key(), Some(key(2024, 2)));
    assert_eq!(app.selected.as_ref().unwrap().opening_balance, dec!(1000));
}

#[test]
fn test_new_with_empty_ledger() {
    let app = App::new(Ledger::new(), std::env::temp_dir());
    assert!(app.selected.is_none());
    assert!(app.selected_movements().is_empty());
    assert_eq!(app.selected_key(), None);
}

#[test]
fn test_prev_next_month() {
    let mut app = app_with_two_months();
    app.prev_month();
    assert_eq!(app.selected_key(), Some(key(2024, 1)));
    app.prev_month();
    assert_eq!(app.selected_key(), Some(key(2024, 1)));
    app.next_month();
    app.next_month();
    assert_eq!(app.selected_key(), Some(key(2024, 2)));
}

#[test]
fn test_record_saves_and_selects_month() {
    let mut db = Database::open_in_memory().unwrap();
    let mut app = app_with_two_months();
    app.record(input(MovementKind::Exit, dec!(10), date(2024, 1, 20), "book"), &mut db)
        .unwrap();

    assert_eq!(app.selected_key(), Some(key(2024, 1)));
    assert_eq!(app.selected.as_ref().unwrap().closing_balance, dec!(990));
    assert_eq!(db.load_ledger(), app.ledger);
}

#[test]
fn test_record_invalid_amount_changes_nothing() {
    let mut db = Database::open_in_memory().unwrap();
    let mut app = app_with_two_months();
    let before = app.ledger.clone();
    assert!(app
        .record(input(MovementKind::Exit, dec!(-1), date(2024, 1, 20), "bad"), &mut db)
        .is_err());
    assert_eq!(app.ledger, before);
    assert!(db.load_ledger().is_empty());
}

#[test]
fn test_open_month_inherits_balance() {
    let mut db = Database::open_in_memory().unwrap();
    let mut app = app_with_two_months();
    app.open_month(key(2024, 3), &mut db).unwrap();
    assert_eq!(app.selected_key(), Some(key(2024, 3)));
    assert_eq!(app.selected.as_ref().unwrap().opening_balance, dec!(950));
    assert_eq!(db.load_ledger().len(), 3);
}

#[test]
fn test_show_period_and_refresh() {
    let mut db = Database::open_in_memory().unwrap();
    let mut app = app_with_two_months();
    app.show_period(PeriodRequest {
        year: 2024,
        month_from: 1,
        month_to: 2,
    })
    .unwrap();
    assert_eq!(app.screen, Screen::Period);
    assert_eq!(app.period.as_ref().unwrap().total_exits, dec!(50));

    app.record(input(MovementKind::Exit, dec!(25), date(2024, 2, 9), "lunch"), &mut db)
        .unwrap();
    assert_eq!(app.period.as_ref().unwrap().total_exits, dec!(75));
}

#[test]
fn test_show_period_not_found_keeps_screen() {
    let mut app = app_with_two_months();
    assert!(app
        .show_period(PeriodRequest {
            year: 2030,
            month_from: 1,
            month_to: 12,
        })
        .is_err());
    assert_eq!(app.screen, Screen::Months);
    assert!(app.period.is_none());
}
