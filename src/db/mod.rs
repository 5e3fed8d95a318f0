mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, ErrorCode};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::ledger::Ledger;
use crate::models::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite-backed store for the whole ledger. The ledger is always read and
/// written as a unit: `load_ledger` once at startup, `save_ledger` after
/// every change.
pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the store at `path`. A file that is not an SQLite
    /// database, or one whose pages are damaged, is moved aside to
    /// `<path>.corrupt` and replaced by an empty store.
    pub(crate) fn open(path: &Path) -> Result<Self> {
        match Self::open_existing(path) {
            Err(e) if is_corrupt(&e) => {
                let aside = quarantine(path)?;
                let cause = format!("{e:#}");
                tracing::warn!(
                    path = %path.display(),
                    moved_to = %aside.display(),
                    error = %cause,
                    "ledger file is unreadable, starting with an empty ledger"
                );
                Self::open_existing(path)
            }
            result => result,
        }
    }

    fn open_existing(path: &Path) -> Result<Self> {
        let conn =
            connect(path).with_context(|| format!("Failed to open database: {}", path.display()))?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Load ──────────────────────────────────────────────────

    /// Read the stored ledger. Unreadable state is logged and yields an
    /// empty ledger rather than an error.
    pub(crate) fn load_ledger(&self) -> Ledger {
        match self.read_ledger() {
            Ok(ledger) => {
                tracing::info!(months = ledger.len(), "loaded ledger");
                ledger
            }
            Err(e) => {
                let cause = format!("{e:#}");
                tracing::warn!(error = %cause, "stored ledger is unreadable, starting empty");
                Ledger::new()
            }
        }
    }

    fn read_ledger(&self) -> Result<Ledger> {
        let mut stmt = self.conn.prepare(
            "SELECT year, month, opening_balance, closing_balance FROM months ORDER BY year, month",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i32>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut ledger = Ledger::new();
        for row in rows {
            let (year, month, opening, stored_closing) = row?;
            let key = MonthKey::new(year, month)?;
            let opening = parse_decimal(&opening)?;
            let stored_closing = parse_decimal(&stored_closing)?;
            let record = MonthRecord::restore(opening, self.read_movements(key)?)?;
            if record.closing_balance() != stored_closing {
                tracing::warn!(
                    month = %key,
                    stored = %stored_closing,
                    replayed = %record.closing_balance(),
                    "stored closing balance disagrees with movements, using movements"
                );
            }
            ledger.insert_restored(key, record);
        }
        Ok(ledger)
    }

    fn read_movements(&self, key: MonthKey) -> Result<Vec<Movement>> {
        let mut stmt = self.conn.prepare(
            "SELECT kind, amount, date, description FROM movements
             WHERE year = ?1 AND month = ?2 ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![key.year(), key.month()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut movements = Vec::new();
        for row in rows {
            let (kind, amount, date, description) = row?;
            let date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
                .with_context(|| format!("Bad movement date '{date}' in {key}"))?;
            if MonthKey::from_date(date) != key {
                anyhow::bail!("Movement dated {date} stored under {key}");
            }
            movements.push(Movement::new(
                MovementKind::parse(&kind)?,
                parse_decimal(&amount)?,
                date,
                description,
            )?);
        }
        Ok(movements)
    }

    // ── Save ──────────────────────────────────────────────────

    /// Replace the stored state with `ledger` in a single transaction; on
    /// failure the previously stored state is kept.
    pub(crate) fn save_ledger(&mut self, ledger: &Ledger) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM movements", [])?;
        tx.execute("DELETE FROM months", [])?;
        let mut movement_count = 0;
        for (key, record) in ledger.months() {
            tx.execute(
                "INSERT INTO months (year, month, opening_balance, total_entries, total_exits, closing_balance)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    key.year(),
                    key.month(),
                    record.opening_balance().to_string(),
                    record.total_entries().to_string(),
                    record.total_exits().to_string(),
                    record.closing_balance().to_string(),
                ],
            )?;
            for (seq, movement) in record.movements().iter().enumerate() {
                tx.execute(
                    "INSERT INTO movements (year, month, seq, kind, amount, date, description)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        key.year(),
                        key.month(),
                        seq as i64,
                        movement.kind().as_str(),
                        movement.amount().to_string(),
                        movement.date().format(DATE_FORMAT).to_string(),
                        movement.description(),
                    ],
                )?;
                movement_count += 1;
            }
        }
        tx.commit().context("Failed to commit ledger")?;
        tracing::info!(months = ledger.len(), movements = movement_count, "saved ledger");
        Ok(())
    }
}

fn connect(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    // Opening is lazy; touch the schema so a foreign file fails here.
    conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
        row.get::<_, i64>(0)
    })?;
    Ok(conn)
}

/// Whether SQLite reported the file itself as damaged, anywhere in the
/// error chain.
fn is_corrupt(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause
                .downcast_ref::<rusqlite::Error>()
                .and_then(rusqlite::Error::sqlite_error_code),
            Some(ErrorCode::NotADatabase | ErrorCode::DatabaseCorrupt)
        )
    })
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Move the ledger file aside, along with any WAL sidecars, so a fresh
/// store never replays the old log.
fn quarantine(path: &Path) -> Result<PathBuf> {
    let aside = with_suffix(path, ".corrupt");
    std::fs::rename(path, &aside).with_context(|| {
        format!(
            "Failed to move unreadable ledger {} to {}",
            path.display(),
            aside.display()
        )
    })?;
    for sidecar in ["-wal", "-shm"] {
        let from = with_suffix(path, sidecar);
        if from.exists() {
            let to = with_suffix(&aside, sidecar);
            std::fs::rename(&from, &to)
                .with_context(|| format!("Failed to move {} aside", from.display()))?;
        }
    }
    Ok(aside)
}

fn parse_decimal(s: &str) -> Result<Decimal> {
    Decimal::from_str(s).with_context(|| format!("Bad stored amount '{s}'"))
}
