//! Turning typed user text into validated values for the ledger.

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;
use crate::models::{MonthKey, Movement, MovementKind};

const DATE_FORMATS: [&str; 2] = ["%d/%m/%Y", "%Y-%m-%d"];

// Optional currency prefix, optional sign, digits, optional fraction with
// either separator.
static AMOUNT_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(?:R\$|\$)?[ ]*([+-]?[0-9]+(?:[.,][0-9]+)?)$").ok()
});

pub(crate) fn parse_amount(text: &str) -> LedgerResult<Decimal> {
    let trimmed = text.trim();
    let number = AMOUNT_RE
        .as_ref()
        .and_then(|re| re.captures(trimmed))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().replace(',', "."))
        .ok_or_else(|| LedgerError::validation(format!("'{trimmed}' is not an amount")))?;
    let amount = Decimal::from_str(&number)
        .map_err(|e| LedgerError::validation(format!("'{trimmed}' is not an amount: {e}")))?;
    if amount < Decimal::ZERO {
        return Err(LedgerError::validation(format!(
            "amount must not be negative (got {trimmed})"
        )));
    }
    Ok(amount)
}

/// Parse `dd/mm/yyyy` or `yyyy-mm-dd`. An empty string or `today` yields
/// `today`.
pub(crate) fn parse_date(text: &str, today: NaiveDate) -> LedgerResult<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("today") || trimmed == "hoje" {
        return Ok(today);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| {
            LedgerError::validation(format!(
                "'{trimmed}' is not a date (use dd/mm/yyyy or yyyy-mm-dd)"
            ))
        })
}

pub(crate) fn looks_like_date(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.eq_ignore_ascii_case("today")
        || trimmed == "hoje"
        || DATE_FORMATS
            .iter()
            .any(|fmt| NaiveDate::parse_from_str(trimmed, fmt).is_ok())
}

/// A movement request as typed by the user, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MovementInput {
    /// Month the date is required to fall in, when the user named one.
    pub(crate) month: Option<MonthKey>,
    pub(crate) kind: MovementKind,
    pub(crate) amount: Decimal,
    pub(crate) date: NaiveDate,
    pub(crate) description: String,
}

impl MovementInput {
    pub(crate) fn record_into(self, ledger: &mut Ledger) -> LedgerResult<Movement> {
        match self.month {
            Some(key) => ledger.record_movement_in(
                key.year(),
                key.month(),
                self.kind,
                self.amount,
                self.date,
                self.description,
            ),
            None => ledger.record_movement(self.kind, self.amount, self.date, self.description),
        }
    }
}

/// Parse `[Month-year] <kind> <amount> [date] <description...>`.
///
/// A leading month pins the month the date must fall in. The date is
/// optional: when the word after the amount is not a date it is treated as
/// the start of the description and the movement is dated `today`.
pub(crate) fn parse_movement(words: &[&str], today: NaiveDate) -> LedgerResult<MovementInput> {
    let (month, words) = match words.split_first() {
        Some((first, rest)) => match MonthKey::parse(first) {
            Ok(key) => (Some(key), rest),
            Err(e @ LedgerError::Range(_)) => return Err(e),
            Err(_) => (None, words),
        },
        None => (None, words),
    };
    let (kind, amount, rest) = match words {
        [kind, amount, rest @ ..] => (kind, amount, rest),
        _ => {
            return Err(LedgerError::validation(
                "expected [Month-year] <entry|exit> <amount> [date] <description>",
            ))
        }
    };
    let kind = MovementKind::parse(kind)?;
    let amount = parse_amount(amount)?;
    let (date, description) = match rest {
        [first, tail @ ..] if looks_like_date(first) => (parse_date(first, today)?, tail),
        _ => (today, rest),
    };
    Ok(MovementInput {
        month,
        kind,
        amount,
        date,
        description: description.join(" "),
    })
}

/// Parse a `<year> <from> <to>` period request.
pub(crate) fn parse_period(words: &[&str]) -> LedgerResult<(i32, u32, u32)> {
    let usage = || LedgerError::Range("expected <year> <from-month> <to-month>".into());
    match words {
        [year, from, to] => {
            let year = year.parse().map_err(|_| usage())?;
            let from = from.parse().map_err(|_| usage())?;
            let to = to.parse().map_err(|_| usage())?;
            Ok((year, from, to))
        }
        _ => Err(usage()),
    }
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod input_tests;
