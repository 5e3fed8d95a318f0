use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;

use crate::db::Database;
use crate::input::MovementInput;
use crate::ledger::{Ledger, MonthSummary, PeriodSummary};
use crate::models::{MonthKey, Movement};

pub(crate) const CARDS_HEIGHT: u16 = 5;
// borders plus header row
const TABLE_CHROME: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Months,
    Period,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Months, Self::Period]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Months => write!(f, "Months"),
            Self::Period => write!(f, "Period"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
        }
    }
}

/// A period the user asked for, kept so the view can be rebuilt after the
/// ledger changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PeriodRequest {
    pub(crate) year: i32,
    pub(crate) month_from: u32,
    pub(crate) month_to: u32,
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) today: NaiveDate,
    pub(crate) reports_dir: PathBuf,

    pub(crate) ledger: Ledger,

    // Months
    pub(crate) month_keys: Vec<MonthKey>,
    pub(crate) month_index: usize,
    pub(crate) selected: Option<MonthSummary>,
    pub(crate) movement_index: usize,
    pub(crate) movement_scroll: usize,

    // Period
    pub(crate) period_request: Option<PeriodRequest>,
    pub(crate) period: Option<PeriodSummary>,
    pub(crate) period_scroll: usize,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(ledger: Ledger, reports_dir: PathBuf) -> Self {
        let mut app = Self {
            running: true,
            screen: Screen::Months,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            today: Local::now().date_naive(),
            reports_dir,

            ledger,

            month_keys: Vec::new(),
            month_index: 0,
            selected: None,
            movement_index: 0,
            movement_scroll: 0,

            period_request: None,
            period: None,
            period_scroll: 0,

            visible_rows: 20,
        };
        app.refresh();
        // start on the most recent month
        app.month_index = app.month_keys.len().saturating_sub(1);
        app.refresh_selected();
        app
    }

    /// Rebuild every derived view from the ledger.
    pub(crate) fn refresh(&mut self) {
        self.month_keys = self.ledger.keys();
        if self.month_index >= self.month_keys.len() {
            self.month_index = self.month_keys.len().saturating_sub(1);
        }
        self.refresh_selected();
        self.refresh_period();
    }

    pub(crate) fn refresh_selected(&mut self) {
        self.selected = self
            .month_keys
            .get(self.month_index)
            .and_then(|key| self.ledger.summarize_month(key).ok());
        let len = self.selected_movements().len();
        if self.movement_index >= len {
            self.movement_index = len.saturating_sub(1);
        }
        if self.movement_scroll > self.movement_index {
            self.movement_scroll = self.movement_index;
        }
    }

    fn refresh_period(&mut self) {
        self.period = self.period_request.and_then(|req| {
            self.ledger
                .aggregate_period(req.year, req.month_from, req.month_to)
                .ok()
        });
    }

    pub(crate) fn selected_key(&self) -> Option<MonthKey> {
        self.month_keys.get(self.month_index).copied()
    }

    pub(crate) fn selected_movements(&self) -> &[Movement] {
        self.selected
            .as_ref()
            .map(|s| s.movements.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn select_month(&mut self, key: &MonthKey) -> bool {
        match self.month_keys.iter().position(|k| k == key) {
            Some(index) => {
                self.month_index = index;
                self.movement_index = 0;
                self.movement_scroll = 0;
                self.refresh_selected();
                true
            }
            None => false,
        }
    }

    pub(crate) fn next_month(&mut self) {
        if self.month_index + 1 < self.month_keys.len() {
            self.month_index += 1;
            self.movement_index = 0;
            self.movement_scroll = 0;
            self.refresh_selected();
        }
    }

    pub(crate) fn prev_month(&mut self) {
        if self.month_index > 0 {
            self.month_index -= 1;
            self.movement_index = 0;
            self.movement_scroll = 0;
            self.refresh_selected();
        }
    }

    /// Record a movement, persist the ledger, and jump to the month it
    /// landed in. A failed save keeps the movement in memory and is
    /// returned to the caller.
    pub(crate) fn record(&mut self, input: MovementInput, db: &mut Database) -> Result<Movement> {
        let movement = input.record_into(&mut self.ledger)?;
        self.refresh();
        self.select_month(&MonthKey::from_date(movement.date()));
        self.save(db)?;
        Ok(movement)
    }

    /// Make sure `key` exists, persist, and select it.
    pub(crate) fn open_month(&mut self, key: MonthKey, db: &mut Database) -> Result<()> {
        let existed = self.ledger.contains(&key);
        self.ledger.ensure_month(key.year(), key.month())?;
        self.refresh();
        self.select_month(&key);
        if !existed {
            self.save(db)?;
        }
        Ok(())
    }

    pub(crate) fn show_period(&mut self, request: PeriodRequest) -> Result<()> {
        let period =
            self.ledger
                .aggregate_period(request.year, request.month_from, request.month_to)?;
        self.period_request = Some(request);
        self.period = Some(period);
        self.period_scroll = 0;
        self.screen = Screen::Period;
        Ok(())
    }

    fn save(&self, db: &mut Database) -> Result<()> {
        db.save_ledger(&self.ledger).map_err(|e| {
            let cause = format!("{e:#}");
            tracing::error!(error = %cause, "failed to save ledger");
            e.context("Change kept in memory but the ledger could not be saved")
        })
    }

    /// Rows available to the movement table under the summary cards.
    pub(crate) fn movements_page(&self) -> usize {
        self.visible_rows
            .saturating_sub(CARDS_HEIGHT as usize + TABLE_CHROME)
            .max(1)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
