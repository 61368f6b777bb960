use ratatui::layout::Direction;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders};

use crate::fmt::{money, number};

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const TITLE_STYLE: Style = Style::new().add_modifier(Modifier::BOLD);

pub const AMOUNT_STYLE: Style = Style::new().fg(Color::Rgb(80, 220, 100));

pub const SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(40, 40, 60))
    .add_modifier(Modifier::BOLD);

pub const BAR_STYLE: Style = Style::new().fg(Color::Rgb(90, 140, 230));

/// One color per payment method, in `PaymentMethod::ALL` order.
pub const PAYMENT_COLORS: [Color; 3] = [
    Color::Rgb(80, 220, 100),
    Color::Rgb(90, 140, 230),
    Color::Rgb(240, 170, 60),
];

pub fn money_span(amount: f64) -> Span<'static> {
    Span::styled(money(amount), AMOUNT_STYLE)
}

/// Wrap text to a given width. Returns (wrapped_string, line_count).
pub fn wrap_text(text: &str, width: usize) -> (String, u16) {
    if width == 0 {
        return (text.to_string(), 1);
    }
    let wrapped = textwrap::fill(text, width);
    let lines = wrapped.lines().count().max(1) as u16;
    (wrapped, lines)
}

/// Horizontal bar chart from `(label, value)` pairs, drawn top to bottom in
/// the order given.
pub fn ranking_chart(title: String, items: &[(String, i64)]) -> BarChart<'static> {
    let bars: Vec<Bar> = items
        .iter()
        .map(|(label, value)| {
            Bar::default()
                .label(Line::from(label.clone()))
                .value((*value).max(0) as u64)
                .text_value(number(*value))
                .style(BAR_STYLE)
        })
        .collect();

    BarChart::default()
        .block(
            Block::default()
                .title(title)
                .title_style(TITLE_STYLE)
                .borders(Borders::NONE),
        )
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars))
}
