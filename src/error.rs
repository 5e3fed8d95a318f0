use thiserror::Error;

/// Failures raised by the ledger core. Storage, report and terminal
/// failures travel as `anyhow::Error` with context instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum LedgerError {
    #[error("Invalid movement: {0}")]
    Validation(String),
    #[error("Malformed month '{0}' (expected e.g. Janeiro-2025)")]
    Format(String),
    #[error("Out of range: {0}")]
    Range(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl LedgerError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

pub(crate) type LedgerResult<T> = std::result::Result<T, LedgerError>;
