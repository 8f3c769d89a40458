//! Header Component
//!
//! Displays the target page, the resource kind and the campaign status.

use crate::app::App;
use pagepurge::campaign::CampaignStatus;
use pagepurge::VERSION;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" pagepurge v{} ", VERSION),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    // Row 1: Page
    let page_line = Line::from(vec![
        Span::styled(" Page: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            &app.page_name,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        if app.page_name != app.page_id {
            Span::styled(
                format!(" ({})", app.page_id),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            Span::raw("")
        },
    ]);
    f.render_widget(Paragraph::new(page_line), rows[0]);

    // Row 2: Target and status
    let status_line = Line::from(vec![
        Span::styled(" Deleting: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.target.display_name(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Status: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.status.label(),
            Style::default()
                .fg(status_color(app.status))
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(status_line), rows[1]);
}

pub fn status_color(status: CampaignStatus) -> Color {
    match status {
        CampaignStatus::Idle => Color::DarkGray,
        CampaignStatus::Running => Color::Green,
        CampaignStatus::Cancelling | CampaignStatus::Stopped => Color::Yellow,
        CampaignStatus::Completed => Color::Cyan,
        CampaignStatus::Failed => Color::Red,
    }
}
