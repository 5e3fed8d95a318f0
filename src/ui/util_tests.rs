#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("salary", 10), "salary");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("monthly rent", 5), "mont…");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("rent", 0), "");
}

#[test]
fn test_truncate_accents() {
    assert_eq!(truncate("farmácia", 5), "farm…");
    assert_eq!(truncate("Março-2024", 10), "Março-2024");
}

// ── format_number / format_amount ─────────────────────────────

#[test]
fn test_format_number_thousands() {
    assert_eq!(format_number(dec!(1234567.89)), "1,234,567.89");
    assert_eq!(format_number(dec!(999)), "999.00");
    assert_eq!(format_number(Decimal::ZERO), "0.00");
}

#[test]
fn test_format_number_negative() {
    assert_eq!(format_number(dec!(-1000.5)), "-1,000.50");
}

#[test]
fn test_format_number_rounds_half_up() {
    assert_eq!(format_number(dec!(0.125)), "0.13");
    assert_eq!(format_number(dec!(-0.125)), "-0.13");
}

#[test]
fn test_format_number_tiny_negative_is_zero() {
    assert_eq!(format_number(dec!(-0.001)), "0.00");
}

#[test]
fn test_format_amount() {
    assert_eq!(format_amount(dec!(800)), "R$ 800.00");
    assert_eq!(format_amount(dec!(-1234.5)), "-R$ 1,234.50");
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_window() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 10, 3);
    assert_eq!((index, scroll), (3, 1));
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (9, 7);
    scroll_down(&mut index, &mut scroll, 10, 3);
    assert_eq!((index, scroll), (9, 7));
}

#[test]
fn test_scroll_up_moves_window() {
    let (mut index, mut scroll) = (3, 3);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (2, 2));
}

#[test]
fn test_scroll_to_bottom() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!((index, scroll), (9, 6));
}
