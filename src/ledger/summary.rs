use rust_decimal::Decimal;

use crate::models::{MonthKey, MonthRecord, Movement};

/// Read-only snapshot of one month: its balances plus the movements in
/// date order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonthSummary {
    pub(crate) key: MonthKey,
    pub(crate) opening_balance: Decimal,
    pub(crate) total_entries: Decimal,
    pub(crate) total_exits: Decimal,
    pub(crate) closing_balance: Decimal,
    pub(crate) movements: Vec<Movement>,
}

impl MonthSummary {
    pub(crate) fn of(key: MonthKey, record: &MonthRecord) -> Self {
        Self {
            key,
            opening_balance: record.opening_balance(),
            total_entries: record.total_entries(),
            total_exits: record.total_exits(),
            closing_balance: record.closing_balance(),
            movements: record.movements_by_date().into_iter().cloned().collect(),
        }
    }

    pub(crate) fn net(&self) -> Decimal {
        self.total_entries - self.total_exits
    }
}
