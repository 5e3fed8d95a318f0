use rust_decimal::Decimal;

use super::{Ledger, MonthSummary};
use crate::error::{LedgerError, LedgerResult};
use crate::models::MonthKey;

/// Consolidated view over the recorded months of `year` between
/// `month_from` and `month_to` inclusive. Months in the range that were
/// never recorded are left out, not filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PeriodSummary {
    pub(crate) year: i32,
    pub(crate) month_from: u32,
    pub(crate) month_to: u32,
    pub(crate) opening_balance: Decimal,
    pub(crate) total_entries: Decimal,
    pub(crate) total_exits: Decimal,
    pub(crate) closing_balance: Decimal,
    pub(crate) months: Vec<MonthSummary>,
}

impl PeriodSummary {
    pub(crate) fn aggregate(
        ledger: &Ledger,
        year: i32,
        month_from: u32,
        month_to: u32,
    ) -> LedgerResult<Self> {
        let from = MonthKey::new(year, month_from)?;
        let to = MonthKey::new(year, month_to)?;
        if from > to {
            return Err(LedgerError::Range(format!(
                "period start {month_from} is after period end {month_to}"
            )));
        }

        let months: Vec<MonthSummary> = ledger
            .months()
            .filter(|(key, _)| (from..=to).contains(*key))
            .map(|(key, record)| MonthSummary::of(*key, record))
            .collect();

        let (opening_balance, closing_balance) = match (months.first(), months.last()) {
            (Some(first), Some(last)) => (first.opening_balance, last.closing_balance),
            _ => {
                return Err(LedgerError::not_found(format!(
                    "no months recorded between {from} and {to}"
                )))
            }
        };

        let total_entries = checked_sum(months.iter().map(|m| m.total_entries))?;
        let total_exits = checked_sum(months.iter().map(|m| m.total_exits))?;

        Ok(Self {
            year,
            month_from,
            month_to,
            opening_balance,
            closing_balance,
            total_entries,
            total_exits,
            months,
        })
    }

    pub(crate) fn net(&self) -> Decimal {
        self.total_entries - self.total_exits
    }

    pub(crate) fn movement_count(&self) -> usize {
        self.months.iter().map(|m| m.movements.len()).sum()
    }

    pub(crate) fn label(&self) -> String {
        format!("{} ({:02} to {:02})", self.year, self.month_from, self.month_to)
    }
}

fn checked_sum(mut values: impl Iterator<Item = Decimal>) -> LedgerResult<Decimal> {
    values.try_fold(Decimal::ZERO, |acc, value| {
        acc.checked_add(value)
            .ok_or_else(|| LedgerError::Range("period totals exceed the supported range".into()))
    })
}
