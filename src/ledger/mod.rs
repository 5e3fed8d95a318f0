mod period;
mod summary;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{MonthKey, MonthRecord, Movement, MovementKind};

pub(crate) use period::PeriodSummary;
pub(crate) use summary::MonthSummary;

/// Every month recorded so far, keyed and iterated in calendar order.
///
/// Records are created lazily by [`Ledger::ensure_month`] and are never
/// removed. A month's opening balance is taken from its immediate
/// predecessor when it is created and is not revisited afterwards, even if
/// movements are later recorded into that predecessor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Ledger {
    months: BTreeMap<MonthKey, MonthRecord>,
}

impl Ledger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.months.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub(crate) fn get(&self, key: &MonthKey) -> Option<&MonthRecord> {
        self.months.get(key)
    }

    pub(crate) fn contains(&self, key: &MonthKey) -> bool {
        self.months.contains_key(key)
    }

    /// Months in ascending (year, month) order.
    pub(crate) fn months(&self) -> impl Iterator<Item = (&MonthKey, &MonthRecord)> {
        self.months.iter()
    }

    pub(crate) fn keys(&self) -> Vec<MonthKey> {
        self.months.keys().copied().collect()
    }

    pub(crate) fn ensure_month(&mut self, year: i32, month: u32) -> LedgerResult<&MonthRecord> {
        let key = MonthKey::new(year, month)?;
        Ok(self.ensure_key(key))
    }

    /// Create the record for `key` if it is missing, inheriting the
    /// predecessor's closing balance (or zero). Existing records are
    /// returned untouched.
    fn ensure_key(&mut self, key: MonthKey) -> &mut MonthRecord {
        let opening = self.opening_for(key);
        self.months.entry(key).or_insert_with(|| {
            tracing::debug!(month = %key, %opening, "creating month record");
            MonthRecord::opened_with(opening)
        })
    }

    fn opening_for(&self, key: MonthKey) -> Decimal {
        self.months
            .get(&key.predecessor())
            .map(MonthRecord::closing_balance)
            .unwrap_or(Decimal::ZERO)
    }

    /// Record a movement into the month its date falls in.
    ///
    /// The movement is validated before anything is touched, so a rejected
    /// movement leaves the ledger exactly as it was.
    pub(crate) fn record_movement(
        &mut self,
        kind: MovementKind,
        amount: Decimal,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> LedgerResult<Movement> {
        let movement = Movement::new(kind, amount, date, description)?;
        let key = MonthKey::from_date(date);
        if let Some(record) = self.months.get_mut(&key) {
            record.apply(movement.clone())?;
        } else {
            // a month is only created once its first movement fits
            let mut record = MonthRecord::opened_with(self.opening_for(key));
            record.apply(movement.clone())?;
            tracing::debug!(month = %key, opening = %record.opening_balance(), "creating month record");
            self.months.insert(key, record);
        }
        tracing::info!(month = %key, kind = kind.as_str(), %amount, "recorded movement");
        Ok(movement)
    }

    /// Like [`Ledger::record_movement`], for callers that address the month
    /// explicitly. The month must be the one `date` falls in.
    pub(crate) fn record_movement_in(
        &mut self,
        year: i32,
        month: u32,
        kind: MovementKind,
        amount: Decimal,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> LedgerResult<Movement> {
        let key = MonthKey::new(year, month)?;
        if MonthKey::from_date(date) != key {
            return Err(LedgerError::validation(format!(
                "date {date} does not fall in {key}"
            )));
        }
        self.record_movement(kind, amount, date, description)
    }

    pub(crate) fn summarize_month(&self, key: &MonthKey) -> LedgerResult<MonthSummary> {
        self.months
            .get(key)
            .map(|record| MonthSummary::of(*key, record))
            .ok_or_else(|| LedgerError::not_found(format!("month {key}")))
    }

    pub(crate) fn summaries(&self) -> Vec<MonthSummary> {
        self.months
            .iter()
            .map(|(key, record)| MonthSummary::of(*key, record))
            .collect()
    }

    pub(crate) fn aggregate_period(
        &self,
        year: i32,
        month_from: u32,
        month_to: u32,
    ) -> LedgerResult<PeriodSummary> {
        PeriodSummary::aggregate(self, year, month_from, month_to)
    }

    /// Put back a record loaded from storage. Storage is the only caller;
    /// everything else goes through `ensure_month` / `record_movement`.
    pub(crate) fn insert_restored(&mut self, key: MonthKey, record: MonthRecord) {
        self.months.insert(key, record);
    }
}

#[cfg(test)]
mod tests;
