use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, List, ListItem, Row, Table},
    Frame,
};

use super::{render_card, render_empty};
use crate::models::MovementKind;
use crate::ui::app::{App, CARDS_HEIGHT};
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.month_keys.is_empty() {
        render_empty(
            f,
            area,
            "Months",
            &[
                "The ledger is empty",
                "Record a movement with :add entry 1000 salary",
            ],
        );
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(40)])
        .split(area);

    render_month_list(f, columns[0], app);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(CARDS_HEIGHT), Constraint::Min(4)])
        .split(columns[1]);

    render_summary_cards(f, chunks[0], app);
    render_movements(f, chunks[1], app);
}

fn render_month_list(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .month_keys
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let style = if i == app.month_index {
                theme::selected_style()
            } else {
                theme::normal_style()
            };
            let closing = app
                .ledger
                .get(key)
                .map(|record| format_amount(record.closing_balance()))
                .unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:<15}", key.to_string()), style),
                Span::styled(format!("{closing:>15} "), style),
            ]))
        })
        .collect();

    // keep the selected month on screen
    let height = area.height.saturating_sub(2) as usize;
    let skip = app.month_index.saturating_sub(height.saturating_sub(1));
    let items: Vec<ListItem> = items.into_iter().skip(skip).collect();

    let list = List::new(items).block(theme::panel(format!("Months ({})", app.month_keys.len())));
    f.render_widget(list, area);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let Some(summary) = &app.selected else {
        return;
    };

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let entries = summary
        .movements
        .iter()
        .filter(|m| m.kind() == MovementKind::Entry)
        .count();
    let exits = summary.movements.len() - entries;

    render_card(
        f,
        cards[0],
        "Opening",
        summary.opening_balance,
        theme::balance_color(summary.opening_balance),
        None,
    );
    render_card(
        f,
        cards[1],
        "Entries",
        summary.total_entries,
        theme::GREEN,
        Some(format!("{entries} movements")),
    );
    render_card(
        f,
        cards[2],
        "Exits",
        summary.total_exits,
        theme::RED,
        Some(format!("{exits} movements")),
    );
    render_card(
        f,
        cards[3],
        "Closing",
        summary.closing_balance,
        theme::balance_color(summary.closing_balance),
        Some(format!("net {}", format_amount(summary.net()))),
    );
}

fn render_movements(f: &mut Frame, area: Rect, app: &App) {
    let movements = app.selected_movements();
    let title = match app.selected_key() {
        Some(key) => format!("{key} ({})", movements.len()),
        None => "Movements".to_string(),
    };

    if movements.is_empty() {
        render_empty(
            f,
            area,
            &title,
            &[
                "No movements this month",
                "Add one with :add exit 45,90 pharmacy",
            ],
        );
        return;
    }

    let header_cells = ["Date", "Kind", "Description", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = movements
        .iter()
        .enumerate()
        .skip(app.movement_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, movement)| {
            let amount_style = match movement.kind() {
                MovementKind::Entry => theme::entry_style(),
                MovementKind::Exit => theme::exit_style(),
            };
            let amount_str = match movement.kind() {
                MovementKind::Entry => format!("+{}", format_amount(movement.amount())),
                MovementKind::Exit => format!("-{}", format_amount(movement.amount())),
            };

            let style = if i == app.movement_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(movement.date().format("%d/%m/%Y").to_string()),
                Cell::from(movement.kind().label()),
                Cell::from(truncate(movement.description(), 40)),
                Cell::from(Span::styled(amount_str, amount_style)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(7),
        Constraint::Min(20),
        Constraint::Length(18),
    ];

    let table = Table::new(rows, widths).header(header).block(
        theme::panel(title).title_bottom(Span::styled(
            " j/k move | H/L month | :report ",
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::ITALIC),
        )),
    );

    f.render_widget(table, area);
}
