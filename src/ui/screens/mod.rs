pub(crate) mod months;
pub(crate) mod period;

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use rust_decimal::Decimal;

use crate::ui::theme;
use crate::ui::util::format_amount;

/// One boxed figure, used by both screens for their headline totals.
pub(crate) fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    amount: Decimal,
    color: Color,
    subtitle: Option<String>,
) {
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_amount(amount),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle.unwrap_or_default(), theme::dim_style())),
    ])
    .centered()
    .block(theme::panel(title));

    f.render_widget(text, area);
}

pub(crate) fn render_empty(f: &mut Frame, area: Rect, title: &str, lines: &[&str]) {
    let mut msg = vec![Line::from("")];
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            msg.push(Line::from(""));
        }
        msg.push(Line::from(Span::styled(*line, theme::dim_style())));
    }
    f.render_widget(
        Paragraph::new(msg).centered().block(theme::panel(title)),
        area,
    );
}
