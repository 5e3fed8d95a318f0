#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{MonthKey, MovementKind};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn key(y: i32, m: u32) -> MonthKey {
    MonthKey::new(y, m).unwrap()
}

/// January 2024 with a salary and the rent paid.
fn january_ledger() -> Ledger {
    let mut ledger = Ledger::new();
    ledger
        .record_movement(MovementKind::Entry, dec!(1000), date(2024, 1, 10), "salary")
        .unwrap();
    ledger
        .record_movement(MovementKind::Exit, dec!(200), date(2024, 1, 15), "rent")
        .unwrap();
    ledger
}

fn assert_invariants(ledger: &Ledger) {
    for (key, r) in ledger.months() {
        assert_eq!(
            r.closing_balance(),
            r.opening_balance() + r.total_entries() - r.total_exits(),
            "closing balance out of sync for {key}"
        );
        let entries: Decimal = r
            .movements()
            .iter()
            .filter(|m| m.kind() == MovementKind::Entry)
            .map(|m| m.amount())
            .sum();
        let exits: Decimal = r
            .movements()
            .iter()
            .filter(|m| m.kind() == MovementKind::Exit)
            .map(|m| m.amount())
            .sum();
        assert_eq!(r.total_entries(), entries);
        assert_eq!(r.total_exits(), exits);
    }
}

// ── ensure_month ──────────────────────────────────────────────

#[test]
fn test_ensure_month_on_empty_ledger_opens_at_zero() {
    let mut ledger = Ledger::new();
    let r = ledger.ensure_month(2024, 5).unwrap().clone();
    assert_eq!(r.opening_balance(), Decimal::ZERO);
    assert_eq!(r.closing_balance(), Decimal::ZERO);
    assert!(r.movements().is_empty());
    assert_eq!(ledger.len(), 1);
}

#[test]
fn test_ensure_month_rejects_bad_month() {
    let mut ledger = Ledger::new();
    assert!(matches!(
        ledger.ensure_month(2024, 13),
        Err(LedgerError::Range(_))
    ));
    assert!(ledger.is_empty());
}

#[test]
fn test_ensure_month_inherits_predecessor_closing() {
    let mut ledger = january_ledger();
    let feb = ledger.ensure_month(2024, 2).unwrap();
    assert_eq!(feb.opening_balance(), dec!(800));
    assert_eq!(feb.closing_balance(), dec!(800));
    assert_eq!(feb.total_entries(), Decimal::ZERO);
    assert_eq!(feb.total_exits(), Decimal::ZERO);
}

#[test]
fn test_ensure_month_across_year_boundary() {
    let mut ledger = Ledger::new();
    ledger
        .record_movement(MovementKind::Entry, dec!(75.25), date(2023, 12, 31), "bonus")
        .unwrap();
    let jan = ledger.ensure_month(2024, 1).unwrap();
    assert_eq!(jan.opening_balance(), dec!(75.25));
}

#[test]
fn test_ensure_month_is_idempotent() {
    let mut ledger = january_ledger();
    let first = ledger.ensure_month(2024, 1).unwrap().clone();
    let second = ledger.ensure_month(2024, 1).unwrap().clone();
    assert_eq!(first, second);
    assert_eq!(ledger.len(), 1);
    assert_eq!(second.movements().len(), 2);
}

#[test]
fn test_ensure_month_does_not_walk_back() {
    let mut ledger = january_ledger();
    // March's direct predecessor (February) is missing
    let mar = ledger.ensure_month(2024, 3).unwrap();
    assert_eq!(mar.opening_balance(), Decimal::ZERO);
    assert!(!ledger.contains(&key(2024, 2)));
    assert_eq!(ledger.len(), 2);
}

#[test]
fn test_opening_is_not_recomputed_when_predecessor_changes() {
    let mut ledger = january_ledger();
    ledger.ensure_month(2024, 2).unwrap();
    ledger
        .record_movement(MovementKind::Entry, dec!(500), date(2024, 1, 28), "late refund")
        .unwrap();
    assert_eq!(ledger.get(&key(2024, 1)).unwrap().closing_balance(), dec!(1300));
    assert_eq!(ledger.get(&key(2024, 2)).unwrap().opening_balance(), dec!(800));
}

#[test]
fn test_chain_propagation() {
    let mut ledger = Ledger::new();
    ledger
        .record_movement(MovementKind::Entry, dec!(300), date(2024, 11, 1), "a")
        .unwrap();
    ledger
        .record_movement(MovementKind::Exit, dec!(120.40), date(2024, 11, 2), "b")
        .unwrap();
    let nov = key(2024, 11);
    let dec_key = nov.successor();
    ledger
        .record_movement(MovementKind::Exit, dec!(10), date(2024, 12, 3), "c")
        .unwrap();
    let nov_closing = ledger.get(&nov).unwrap().closing_balance();
    let december = ledger.get(&dec_key).unwrap();
    assert_eq!(december.opening_balance(), nov_closing);
    assert_eq!(december.closing_balance(), dec!(169.60));
    assert_invariants(&ledger);
}

// ── record_movement ───────────────────────────────────────────

#[test]
fn test_record_movement_scenario() {
    let ledger = january_ledger();
    let jan = ledger.get(&key(2024, 1)).unwrap();
    assert_eq!(jan.total_entries(), dec!(1000));
    assert_eq!(jan.total_exits(), dec!(200));
    assert_eq!(jan.closing_balance(), dec!(800));
    assert_invariants(&ledger);
}

#[test]
fn test_record_movement_returns_movement() {
    let mut ledger = Ledger::new();
    let m = ledger
        .record_movement(MovementKind::Exit, dec!(9.99), date(2024, 4, 1), "coffee")
        .unwrap();
    assert_eq!(m.kind(), MovementKind::Exit);
    assert_eq!(m.amount(), dec!(9.99));
    assert_eq!(m.description(), "coffee");
    assert_eq!(ledger.get(&key(2024, 4)).unwrap().movements()[0], m);
}

#[test]
fn test_record_negative_amount_leaves_ledger_untouched() {
    let mut ledger = january_ledger();
    let before = ledger.clone();
    let err = ledger
        .record_movement(MovementKind::Entry, dec!(-5), date(2024, 1, 20), "oops")
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(ledger, before);
}

#[test]
fn test_record_negative_amount_does_not_create_month() {
    let mut ledger = Ledger::new();
    assert!(ledger
        .record_movement(MovementKind::Exit, dec!(-1), date(2024, 6, 1), "oops")
        .is_err());
    assert!(ledger.is_empty());
}

#[test]
fn test_record_movement_in_checks_month() {
    let mut ledger = Ledger::new();
    let err = ledger
        .record_movement_in(2024, 2, MovementKind::Entry, dec!(1), date(2024, 1, 31), "x")
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert!(ledger.is_empty());

    ledger
        .record_movement_in(2024, 1, MovementKind::Entry, dec!(1), date(2024, 1, 31), "x")
        .unwrap();
    assert!(ledger.contains(&key(2024, 1)));
}

#[test]
fn test_months_iterate_in_calendar_order() {
    let mut ledger = Ledger::new();
    for d in [date(2024, 3, 1), date(2023, 12, 1), date(2024, 1, 1)] {
        ledger
            .record_movement(MovementKind::Entry, dec!(1), d, "")
            .unwrap();
    }
    let keys: Vec<String> = ledger.keys().iter().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["Dezembro-2023", "Janeiro-2024", "Março-2024"]);
}

// ── summarize ─────────────────────────────────────────────────

#[test]
fn test_summarize_sorts_movements_by_date() {
    let mut ledger = Ledger::new();
    ledger
        .record_movement(MovementKind::Exit, dec!(30), date(2024, 1, 25), "late")
        .unwrap();
    ledger
        .record_movement(MovementKind::Entry, dec!(100), date(2024, 1, 2), "early-a")
        .unwrap();
    ledger
        .record_movement(MovementKind::Exit, dec!(10), date(2024, 1, 2), "early-b")
        .unwrap();
    let summary = ledger.summarize_month(&key(2024, 1)).unwrap();
    let order: Vec<&str> = summary.movements.iter().map(|m| m.description()).collect();
    assert_eq!(order, vec!["early-a", "early-b", "late"]);
    assert_eq!(summary.closing_balance, dec!(60));
    assert_eq!(summary.net(), dec!(60));
    // insertion order in the record is untouched
    assert_eq!(
        ledger.get(&key(2024, 1)).unwrap().movements()[0].description(),
        "late"
    );
}

#[test]
fn test_summarize_missing_month() {
    let ledger = january_ledger();
    assert!(matches!(
        ledger.summarize_month(&key(2024, 2)),
        Err(LedgerError::NotFound(_))
    ));
}

// ── aggregate_period ──────────────────────────────────────────

fn q1_without_february() -> Ledger {
    let mut ledger = Ledger::new();
    ledger
        .record_movement(MovementKind::Entry, dec!(50), date(2023, 12, 5), "carry")
        .unwrap();
    ledger
        .record_movement(MovementKind::Entry, dec!(1000), date(2024, 1, 10), "salary")
        .unwrap();
    ledger
        .record_movement(MovementKind::Exit, dec!(200), date(2024, 1, 15), "rent")
        .unwrap();
    ledger
        .record_movement(MovementKind::Entry, dec!(400), date(2024, 3, 10), "freelance")
        .unwrap();
    ledger
        .record_movement(MovementKind::Exit, dec!(150), date(2024, 3, 2), "groceries")
        .unwrap();
    ledger
}

#[test]
fn test_aggregate_period_skips_missing_months() {
    let ledger = q1_without_february();
    let p = ledger.aggregate_period(2024, 1, 3).unwrap();
    let keys: Vec<MonthKey> = p.months.iter().map(|m| m.key).collect();
    assert_eq!(keys, vec![key(2024, 1), key(2024, 3)]);
    assert_eq!(p.opening_balance, dec!(50));
    // March opened at zero because February never existed
    assert_eq!(p.closing_balance, dec!(250));
    assert_eq!(p.total_entries, dec!(1400));
    assert_eq!(p.total_exits, dec!(350));
    assert_eq!(p.movement_count(), 4);
    assert!(!ledger.contains(&key(2024, 2)));
}

#[test]
fn test_aggregate_period_movements_sorted_within_month() {
    let ledger = q1_without_february();
    let p = ledger.aggregate_period(2024, 3, 3).unwrap();
    let order: Vec<&str> = p.months[0].movements.iter().map(|m| m.description()).collect();
    assert_eq!(order, vec!["groceries", "freelance"]);
}

#[test]
fn test_aggregate_period_ignores_other_years() {
    let ledger = q1_without_february();
    let p = ledger.aggregate_period(2024, 1, 12).unwrap();
    assert!(p.months.iter().all(|m| m.key.year() == 2024));
}

#[test]
fn test_aggregate_period_empty_selection() {
    let ledger = q1_without_february();
    assert!(matches!(
        ledger.aggregate_period(2024, 4, 6),
        Err(LedgerError::NotFound(_))
    ));
    assert!(matches!(
        Ledger::new().aggregate_period(2024, 1, 12),
        Err(LedgerError::NotFound(_))
    ));
}

#[test]
fn test_aggregate_period_bad_range() {
    let ledger = q1_without_february();
    assert!(matches!(
        ledger.aggregate_period(2024, 3, 1),
        Err(LedgerError::Range(_))
    ));
    assert!(matches!(
        ledger.aggregate_period(2024, 0, 3),
        Err(LedgerError::Range(_))
    ));
    assert!(matches!(
        ledger.aggregate_period(2024, 1, 13),
        Err(LedgerError::Range(_))
    ));
}

#[test]
fn test_period_label() {
    let p = q1_without_february().aggregate_period(2024, 1, 3).unwrap();
    assert_eq!(p.label(), "2024 (01 to 03)");
    assert_eq!(p.net(), dec!(1050));
}

// ── Overflow ──────────────────────────────────────────────────

#[test]
fn test_record_movement_overflow_is_rejected() {
    let huge = crate::input::parse_amount("79228162514264337593543950335").unwrap();
    let mut ledger = Ledger::new();
    ledger
        .record_movement(MovementKind::Entry, huge, date(2024, 1, 10), "windfall")
        .unwrap();
    let before = ledger.clone();

    let err = ledger
        .record_movement(MovementKind::Entry, huge, date(2024, 1, 11), "again")
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(ledger, before);
    assert_invariants(&ledger);
}

#[test]
fn test_rejected_movement_does_not_open_its_month() {
    let mut ledger = Ledger::new();
    ledger
        .record_movement(MovementKind::Entry, Decimal::MAX, date(2024, 1, 10), "windfall")
        .unwrap();

    // February would open at Decimal::MAX
    let err = ledger
        .record_movement(MovementKind::Entry, dec!(1), date(2024, 2, 1), "tip")
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert!(!ledger.contains(&key(2024, 2)));
    assert_eq!(ledger.len(), 1);

    ledger
        .record_movement(MovementKind::Exit, dec!(1), date(2024, 2, 1), "fee")
        .unwrap();
    assert_eq!(ledger.get(&key(2024, 2)).unwrap().closing_balance(), Decimal::MAX - dec!(1));
}

#[test]
fn test_aggregate_period_overflow_is_an_error() {
    let mut ledger = Ledger::new();
    for (kind, day) in [(MovementKind::Entry, 1), (MovementKind::Exit, 2)] {
        ledger
            .record_movement(kind, Decimal::MAX, date(2024, 1, day), "round trip")
            .unwrap();
    }
    ledger
        .record_movement(MovementKind::Entry, Decimal::MAX, date(2024, 2, 1), "windfall")
        .unwrap();

    let err = ledger.aggregate_period(2024, 1, 2).unwrap_err();
    assert!(matches!(err, LedgerError::Range(_)));
    assert!(ledger.aggregate_period(2024, 2, 2).is_ok());
}

#[test]
fn test_ensure_month_rejects_year_outside_calendar() {
    let mut ledger = Ledger::new();
    assert!(matches!(
        ledger.ensure_month(i32::MIN, 1),
        Err(LedgerError::Range(_))
    ));
    assert!(matches!(
        ledger.ensure_month(i32::MAX, 12),
        Err(LedgerError::Range(_))
    ));
    assert!(ledger.is_empty());
}
