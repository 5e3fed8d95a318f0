use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::config::Config;
use crate::db::Database;
use crate::ledger::Ledger;
use crate::ui::app::{App, InputMode, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_up};

pub(crate) fn as_tui(db: &mut Database, ledger: Ledger, config: &Config) -> Result<()> {
    let mut app = App::new(ledger, config.reports_dir.clone());
    tracing::info!(months = app.ledger.len(), "starting tui");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "tui stopped");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            let content_height = f.area().height.saturating_sub(3) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app),
                InputMode::Command => handle_command_input(key, app, db),
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('c') if ctrl => app.running = false,
        KeyCode::Char('d') if ctrl => move_cursor(app, Motion::HalfPageDown),
        KeyCode::Char('u') if ctrl => move_cursor(app, Motion::HalfPageUp),
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
            app.status_message.clear();
        }
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('j') | KeyCode::Down => move_cursor(app, Motion::Down),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(app, Motion::Up),
        KeyCode::Char('g') | KeyCode::Home => move_cursor(app, Motion::Top),
        KeyCode::Char('G') | KeyCode::End => move_cursor(app, Motion::Bottom),
        KeyCode::Char('H') | KeyCode::Left => app.prev_month(),
        KeyCode::Char('L') | KeyCode::Right => app.next_month(),
        KeyCode::Char('1') => app.screen = Screen::Months,
        KeyCode::Char('2') => app.screen = Screen::Period,
        KeyCode::Tab => cycle_screen(app, 1),
        KeyCode::BackTab => cycle_screen(app, Screen::all().len() - 1),
        KeyCode::Esc => app.status_message.clear(),
        _ => {}
    }
}

fn cycle_screen(app: &mut App, step: usize) {
    let screens = Screen::all();
    let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
    app.screen = screens[(idx + step) % screens.len()];
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &mut Database) {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db);
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
}

// ── Cursor movement ──────────────────────────────────────────

#[derive(Clone, Copy)]
enum Motion {
    Up,
    Down,
    HalfPageUp,
    HalfPageDown,
    Top,
    Bottom,
}

/// Months moves the movement cursor; Period scrolls its month table.
fn move_cursor(app: &mut App, motion: Motion) {
    match app.screen {
        Screen::Months => {
            let page = app.movements_page();
            let len = app.selected_movements().len();
            let (index, scroll) = (&mut app.movement_index, &mut app.movement_scroll);
            match motion {
                Motion::Up => scroll_up(index, scroll),
                Motion::Down => scroll_down(index, scroll, len, page),
                Motion::HalfPageUp => (0..page / 2).for_each(|_| scroll_up(index, scroll)),
                Motion::HalfPageDown => {
                    (0..page / 2).for_each(|_| scroll_down(index, scroll, len, page))
                }
                Motion::Top => {
                    *index = 0;
                    *scroll = 0;
                }
                Motion::Bottom => scroll_to_bottom(index, scroll, len, page),
            }
        }
        Screen::Period => {
            let last = app
                .period
                .as_ref()
                .map(|p| p.months.len().saturating_sub(1))
                .unwrap_or(0);
            let half = (app.visible_rows / 2).max(1);
            let scroll = app.period_scroll;
            app.period_scroll = match motion {
                Motion::Up => scroll.saturating_sub(1),
                Motion::Down => (scroll + 1).min(last),
                Motion::HalfPageUp => scroll.saturating_sub(half),
                Motion::HalfPageDown => (scroll + half).min(last),
                Motion::Top => 0,
                Motion::Bottom => last,
            };
        }
    }
}
