use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Cell, Row, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::{render_card, render_empty};
use crate::ledger::PeriodSummary;
use crate::ui::app::{App, CARDS_HEIGHT};
use crate::ui::theme;
use crate::ui::util::format_amount;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(period) = &app.period else {
        render_empty(
            f,
            area,
            "Period",
            &[
                "No period selected",
                "Consolidate months with :period 2024 1 6",
            ],
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(CARDS_HEIGHT),
            Constraint::Min(10),
            Constraint::Length(period.months.len() as u16 + 3),
        ])
        .split(area);

    render_totals(f, chunks[0], period);
    render_chart(f, chunks[1], period);
    render_month_table(f, chunks[2], app, period);
}

fn render_totals(f: &mut Frame, area: Rect, period: &PeriodSummary) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    render_card(
        f,
        cards[0],
        "Opening",
        period.opening_balance,
        theme::balance_color(period.opening_balance),
        Some(format!("{} months", period.months.len())),
    );
    render_card(
        f,
        cards[1],
        "Entries",
        period.total_entries,
        theme::GREEN,
        None,
    );
    render_card(
        f,
        cards[2],
        "Exits",
        period.total_exits,
        theme::RED,
        None,
    );
    render_card(
        f,
        cards[3],
        "Closing",
        period.closing_balance,
        theme::balance_color(period.closing_balance),
        Some(format!("net {}", format_amount(period.net()))),
    );
}

fn bar_value(amount: Decimal) -> u64 {
    amount.round().to_u64().unwrap_or(0)
}

fn render_chart(f: &mut Frame, area: Rect, period: &PeriodSummary) {
    let mut chart = BarChart::default()
        .block(theme::panel(format!("Entries and exits {}", period.label())).title_bottom(
            Line::from(vec![
                Span::styled(" ■ entries ", theme::entry_style()),
                Span::styled(" ■ exits ", theme::exit_style()),
            ]),
        ))
        .bar_width(7)
        .bar_gap(1)
        .group_gap(3)
        .value_style(
            Style::default()
                .fg(theme::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        );

    for summary in &period.months {
        let bars = [
            Bar::default()
                .value(bar_value(summary.total_entries))
                .style(theme::entry_style())
                .value_style(Style::default().fg(theme::HEADER_BG).bg(theme::GREEN)),
            Bar::default()
                .value(bar_value(summary.total_exits))
                .style(theme::exit_style())
                .value_style(Style::default().fg(theme::HEADER_BG).bg(theme::RED)),
        ];
        let label = summary.key.name().chars().take(3).collect::<String>();
        chart = chart.data(BarGroup::default().label(Line::from(label)).bars(&bars));
    }

    f.render_widget(chart, area);
}

fn render_month_table(f: &mut Frame, area: Rect, app: &App, period: &PeriodSummary) {
    let header_cells = ["Month", "Opening", "Entries", "Exits", "Closing"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = period
        .months
        .iter()
        .enumerate()
        .skip(app.period_scroll)
        .map(|(i, summary)| {
            let style = if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(summary.key.to_string()),
                Cell::from(format_amount(summary.opening_balance)),
                Cell::from(Span::styled(
                    format_amount(summary.total_entries),
                    theme::entry_style(),
                )),
                Cell::from(Span::styled(
                    format_amount(summary.total_exits),
                    theme::exit_style(),
                )),
                Cell::from(Span::styled(
                    format_amount(summary.closing_balance),
                    Style::default().fg(theme::balance_color(summary.closing_balance)),
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(16),
        Constraint::Length(18),
        Constraint::Length(18),
        Constraint::Length(18),
        Constraint::Length(18),
    ];

    let table = Table::new(rows, widths).header(header).block(theme::panel(format!(
        "Months in period ({}, {} movements)",
        period.months.len(),
        period.movement_count()
    )));
    f.render_widget(table, area);
}
