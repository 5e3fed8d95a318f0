use rust_decimal::Decimal;

use super::{Movement, MovementKind};
use crate::error::{LedgerError, LedgerResult};

/// Balances and movements for one month.
///
/// `closing_balance == opening_balance + total_entries - total_exits` holds
/// after every operation; the only way to change a record after creation is
/// [`MonthRecord::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonthRecord {
    opening_balance: Decimal,
    total_entries: Decimal,
    total_exits: Decimal,
    closing_balance: Decimal,
    movements: Vec<Movement>,
}

impl MonthRecord {
    pub(crate) fn opened_with(opening_balance: Decimal) -> Self {
        Self {
            opening_balance,
            total_entries: Decimal::ZERO,
            total_exits: Decimal::ZERO,
            closing_balance: opening_balance,
            movements: Vec::new(),
        }
    }

    /// Rebuild a stored record by replaying its movements on top of the
    /// opening balance it was created with.
    pub(crate) fn restore(opening_balance: Decimal, movements: Vec<Movement>) -> LedgerResult<Self> {
        let mut record = Self::opened_with(opening_balance);
        for movement in movements {
            record.apply(movement)?;
        }
        Ok(record)
    }

    /// Append a movement and update the aggregates incrementally.
    ///
    /// Fails without touching the record when a total or the closing
    /// balance would leave the range `Decimal` can hold.
    pub(crate) fn apply(&mut self, movement: Movement) -> LedgerResult<()> {
        let amount = movement.amount();
        let overflow = || {
            LedgerError::validation(format!(
                "amount {amount} does not fit in the month's balances"
            ))
        };
        match movement.kind() {
            MovementKind::Entry => {
                let total = self.total_entries.checked_add(amount).ok_or_else(overflow)?;
                let closing = self.closing_balance.checked_add(amount).ok_or_else(overflow)?;
                self.total_entries = total;
                self.closing_balance = closing;
            }
            MovementKind::Exit => {
                let total = self.total_exits.checked_add(amount).ok_or_else(overflow)?;
                let closing = self.closing_balance.checked_sub(amount).ok_or_else(overflow)?;
                self.total_exits = total;
                self.closing_balance = closing;
            }
        }
        self.movements.push(movement);
        Ok(())
    }

    pub(crate) fn opening_balance(&self) -> Decimal {
        self.opening_balance
    }

    pub(crate) fn total_entries(&self) -> Decimal {
        self.total_entries
    }

    pub(crate) fn total_exits(&self) -> Decimal {
        self.total_exits
    }

    pub(crate) fn closing_balance(&self) -> Decimal {
        self.closing_balance
    }

    /// Movements in insertion order.
    pub(crate) fn movements(&self) -> &[Movement] {
        &self.movements
    }

    /// Movements ordered by date; same-day movements keep insertion order.
    pub(crate) fn movements_by_date(&self) -> Vec<&Movement> {
        let mut sorted: Vec<&Movement> = self.movements.iter().collect();
        sorted.sort_by_key(|m| m.date());
        sorted
    }
}
