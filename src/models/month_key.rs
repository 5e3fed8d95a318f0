use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::error::{LedgerError, LedgerResult};

pub(crate) const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

const SEPARATOR: char = '-';

/// A calendar month. Field order gives the derived `Ord` its
/// (year, month) ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Years are limited to what a calendar date can carry, which keeps
    /// `predecessor` and `successor` clear of integer overflow.
    pub(crate) fn new(year: i32, month: u32) -> LedgerResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::Range(format!(
                "month {month} is not between 1 and 12"
            )));
        }
        let (min, max) = (NaiveDate::MIN.year(), NaiveDate::MAX.year());
        if !(min..=max).contains(&year) {
            return Err(LedgerError::Range(format!(
                "year {year} is not between {min} and {max}"
            )));
        }
        Ok(Self { year, month })
    }

    pub(crate) fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub(crate) fn year(&self) -> i32 {
        self.year
    }

    pub(crate) fn month(&self) -> u32 {
        self.month
    }

    pub(crate) fn name(&self) -> &'static str {
        // month is validated on construction
        MONTH_NAMES[(self.month - 1) as usize]
    }

    pub(crate) fn predecessor(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub(crate) fn successor(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Parse the canonical `"<MonthName>-<year>"` form. Names are matched
    /// case-sensitively.
    pub(crate) fn parse(text: &str) -> LedgerResult<Self> {
        let malformed = || LedgerError::Format(text.to_string());
        let (name, year) = text.split_once(SEPARATOR).ok_or_else(malformed)?;
        let index = MONTH_NAMES
            .iter()
            .position(|n| *n == name)
            .ok_or_else(malformed)?;
        let year: i32 = year.parse().map_err(|_| malformed())?;
        Self::new(year, index as u32 + 1)
    }
}

/// Render the canonical text form without building a key first.
pub(crate) fn format_month(year: i32, month: u32) -> LedgerResult<String> {
    MonthKey::new(year, month).map(|k| k.to_string())
}

/// Parse every key and return them in (year, month) order. Equal keys keep
/// their input order.
pub(crate) fn sort_keys<S: AsRef<str>>(keys: &[S]) -> LedgerResult<Vec<MonthKey>> {
    let mut parsed = keys
        .iter()
        .map(|k| MonthKey::parse(k.as_ref()))
        .collect::<LedgerResult<Vec<_>>>()?;
    parsed.sort();
    Ok(parsed)
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.name(), self.year)
    }
}

impl FromStr for MonthKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
