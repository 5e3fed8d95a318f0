use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, InputMode, Screen};
use super::commands;
use super::theme;

const KEY_BINDINGS: [(&str, &str); 9] = [
    ("j/k, Up/Down", "Move through movements"),
    ("g/G", "First/last movement"),
    ("Ctrl-d/u", "Half page down/up"),
    ("H/L, Left/Right", "Previous/next recorded month"),
    ("1/2, Tab", "Months/Period screen"),
    (":", "Command mode"),
    ("?", "This help"),
    ("Esc", "Clear status message"),
    ("Ctrl-q", "Quit"),
];

const INPUT_HINTS: [&str; 3] = [
    "Amounts: 1000, 45,90 or R$ 12.50",
    "Dates: dd/mm/yyyy or yyyy-mm-dd, defaults to today",
    "Months: Janeiro-2024 ... Dezembro-2024",
];

pub(crate) fn render(f: &mut Frame, app: &App) {
    let [tabs, body, status, command] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(f.area());

    render_tabs(f, tabs, app.screen);
    match app.screen {
        Screen::Months => super::screens::months::render(f, body, app),
        Screen::Period => super::screens::period::render(f, body, app),
    }
    render_status_bar(f, status, app);
    render_command_bar(f, command, app);

    if app.show_help {
        render_help(f, f.area());
    }
}

fn render_tabs(f: &mut Frame, area: Rect, current: Screen) {
    let titles: Vec<Line> = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, screen)| {
            let name_style = if *screen == current {
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                theme::dim_style()
            };
            Line::from(vec![
                Span::styled(format!("{}:", i + 1), theme::dim_style()),
                Span::styled(screen.to_string(), name_style),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(Screen::all().iter().position(|s| *s == current).unwrap_or(0))
        .highlight_style(Style::default())
        .divider(Span::styled(" | ", Style::default().fg(theme::OVERLAY)))
        .style(Style::default().bg(theme::HEADER_BG));
    f.render_widget(tabs, area);
}

fn mode_style(mode: InputMode) -> Style {
    let bg = match mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Command => theme::GREEN,
    };
    Style::default()
        .fg(theme::HEADER_BG)
        .bg(bg)
        .add_modifier(Modifier::BOLD)
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let focus = match app.screen {
        Screen::Months => app
            .selected_key()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "no months".into()),
        Screen::Period => app
            .period
            .as_ref()
            .map(|p| p.label())
            .unwrap_or_else(|| "no period".into()),
    };

    let left = [
        Span::styled(format!(" {} ", app.input_mode), mode_style(app.input_mode)),
        Span::styled(
            format!(" {} | {} | {} months", app.screen, focus, app.ledger.len()),
            theme::status_bar_style(),
        ),
    ];
    let right = match app.screen {
        Screen::Months => " H/L month | :add | ? help ",
        Screen::Period => " :period <year> <from> <to> | ? help ",
    };

    // width in chars, month names carry accents
    let used: usize = left.iter().map(|s| s.content.chars().count()).sum::<usize>()
        + right.chars().count();
    let pad = (area.width as usize).saturating_sub(used);

    let mut spans = left.to_vec();
    spans.push(Span::styled(" ".repeat(pad), theme::status_bar_style()));
    spans.push(Span::styled(right, theme::status_bar_style()));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.input_mode {
        InputMode::Command => {
            let cursor_x = area.x + 1 + app.command_input.chars().count() as u16;
            f.set_cursor_position((cursor_x, area.y));
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(app.command_input.as_str(), theme::command_bar_style()),
            ])
        }
        InputMode::Normal if app.status_message.is_empty() => Line::from(Span::styled(
            " Press : for commands, ? for help",
            theme::dim_style(),
        )),
        InputMode::Normal => Line::from(Span::styled(
            app.status_message.as_str(),
            theme::command_bar_style(),
        )),
    };

    f.render_widget(
        Paragraph::new(line).style(Style::default().bg(theme::COMMAND_BG)),
        area,
    );
}

fn help_lines() -> Vec<Line<'static>> {
    let title = Style::default()
        .fg(theme::ACCENT)
        .add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled(" Cashbook Help ", title)),
        Line::from(""),
        Line::from(Span::styled(" Keys", theme::section_style())),
    ];
    lines.extend(KEY_BINDINGS.iter().map(|(keys, what)| {
        Line::from(Span::styled(
            format!("  {keys:<18} {what}"),
            theme::normal_style(),
        ))
    }));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Input", theme::section_style())));
    lines.extend(
        INPUT_HINTS
            .iter()
            .map(|hint| Line::from(Span::styled(format!("  {hint}"), theme::normal_style()))),
    );

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Commands", theme::section_style())));
    // one line per command; short aliases share their long form's entry
    let mut entries: Vec<(&str, &str)> = commands::COMMANDS
        .iter()
        .filter(|(name, _)| name.len() > 2)
        .map(|(name, cmd)| (*name, cmd.description))
        .collect();
    entries.sort_by_key(|(name, _)| *name);
    entries.dedup_by_key(|(_, desc)| *desc);
    lines.extend(entries.into_iter().map(|(name, desc)| {
        Line::from(Span::styled(
            format!("  :{name:<15} {desc}"),
            theme::normal_style(),
        ))
    }));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Press any key to close ",
        theme::dim_style(),
    )));
    lines
}

fn render_help(f: &mut Frame, area: Rect) {
    let lines = help_lines();
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let width = 84.min(area.width.saturating_sub(4));
    let popup = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::ACCENT))
                .style(Style::default().bg(theme::HEADER_BG)),
        ),
        popup,
    );
}
