use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum MovementKind {
    Entry,
    Exit,
}

impl MovementKind {
    /// Accepts the English and Portuguese spellings, case-insensitively.
    pub(crate) fn parse(s: &str) -> LedgerResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "entry" | "entrada" | "in" => Ok(Self::Entry),
            "exit" | "saida" | "saída" | "out" => Ok(Self::Exit),
            other => Err(LedgerError::validation(format!(
                "unknown movement kind '{other}' (use entry or exit)"
            ))),
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Entry => "Entry",
            Self::Exit => "Exit",
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single dated cash event. Fields are private so a movement can only be
/// built through [`Movement::new`] and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Movement {
    kind: MovementKind,
    amount: Decimal,
    date: NaiveDate,
    description: String,
}

impl Movement {
    pub(crate) fn new(
        kind: MovementKind,
        amount: Decimal,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> LedgerResult<Self> {
        if amount < Decimal::ZERO {
            return Err(LedgerError::validation(format!(
                "amount must not be negative (got {amount})"
            )));
        }
        Ok(Self {
            kind,
            amount,
            date,
            description: description.into(),
        })
    }

    pub(crate) fn kind(&self) -> MovementKind {
        self.kind
    }

    pub(crate) fn amount(&self) -> Decimal {
        self.amount
    }

    pub(crate) fn date(&self) -> NaiveDate {
        self.date
    }

    pub(crate) fn description(&self) -> &str {
        &self.description
    }

    /// Effect on the month's closing balance.
    pub(crate) fn signed_amount(&self) -> Decimal {
        match self.kind {
            MovementKind::Entry => self.amount,
            MovementKind::Exit => -self.amount,
        }
    }
}
