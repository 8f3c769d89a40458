//! Dialog Components
//!
//! Confirmation shown before anything is deleted. Nothing is listed yet at
//! this point, so the dialog names the page and the kind, not a count.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
    Frame,
};

const DIALOG_WIDTH: u16 = 64;
const DIALOG_HEIGHT: u16 = 10;

pub fn render_confirm_dialog(f: &mut Frame, app: &App) {
    let area = popup_area(f.area(), DIALOG_WIDTH, DIALOG_HEIGHT);
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Red))
        .padding(Padding::horizontal(1))
        .title(Line::from(" Delete everything? ").centered())
        .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let [text_area, buttons_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

    let text = vec![
        Line::from(app.confirm_message()),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "Every page of {} is walked until the listing is empty.",
                app.target.edge()
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        text_area,
    );

    let delete_label = format!("Delete all {} (y)", app.target.edge());
    let buttons = Line::from(vec![
        button(&delete_label, app.confirm_selected_yes, Color::Red),
        Span::raw("   "),
        button("Keep them (n)", !app.confirm_selected_yes, Color::Gray),
    ])
    .centered();
    f.render_widget(Paragraph::new(buttons), buttons_area);
}

/// A bracketed label, filled with `accent` when selected
fn button(label: &str, selected: bool, accent: Color) -> Span<'static> {
    let style = if selected {
        Style::default()
            .fg(Color::Black)
            .bg(accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!("[ {} ]", label), style)
}

/// Fixed-size area centered in `area`, shrunk to fit small terminals
fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    popup
}
