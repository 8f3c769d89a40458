//! Terminal User Interface rendering module
//!
//! One screen: header, progress gauge, counters and the activity log, with
//! the confirmation dialog drawn on top until the user approves.
//!
//! # Architecture
//!
//! - `header` - Page, target and campaign status
//! - `dialog` - Confirmation dialog for the deletion

mod dialog;
mod header;

use crate::app::{App, Mode};
use pagepurge::activity::ActivityLevel;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Length(3), // Gauge
            Constraint::Length(3), // Counters
            Constraint::Min(3),    // Activity log
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    header::render(f, app, chunks[0]);
    render_gauge(f, app, chunks[1]);
    render_counters(f, app, chunks[2]);
    render_log(f, app, chunks[3]);
    render_footer(f, app, chunks[4]);

    if app.mode == Mode::Confirm {
        dialog::render_confirm_dialog(f, app);
    }
}

fn render_gauge(f: &mut Frame, app: &App, area: Rect) {
    let progress = app.progress;
    let label = if progress.total == 0 {
        "waiting for the first page".to_string()
    } else {
        format!(
            "{}/{} ({}%)",
            progress.processed,
            progress.total,
            progress.percent()
        )
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Progress "),
        )
        .gauge_style(Style::default().fg(header::status_color(app.status)))
        .percent(progress.percent())
        .label(label);
    f.render_widget(gauge, area);
}

fn render_counters(f: &mut Frame, app: &App, area: Rect) {
    let progress = app.progress;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(inner);

    let counters = [
        ("Found", progress.total, Color::White),
        ("Processed", progress.processed, Color::Cyan),
        ("Deleted", progress.succeeded, Color::Green),
        ("Failed", progress.failed, Color::Red),
    ];

    for ((label, value, color), cell) in counters.into_iter().zip(cells.iter()) {
        let line = Line::from(vec![
            Span::styled(format!(" {}: ", label), Style::default().fg(Color::DarkGray)),
            Span::styled(
                value.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ]);
        f.render_widget(Paragraph::new(line), *cell);
    }
}

/// Render the activity log, newest entry at the bottom
fn render_log(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" Activity ({}) ", app.log.len()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.log.is_empty() {
        let placeholder = Paragraph::new(" Nothing deleted yet").style(Style::default().fg(Color::DarkGray));
        f.render_widget(placeholder, inner);
        return;
    }

    let visible = inner.height as usize;
    let total = app.log.len();
    let scroll = app.log_scroll.min(total.saturating_sub(1));

    let mut lines: Vec<Line> = app
        .log
        .entries()
        .rev()
        .skip(scroll)
        .take(visible)
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    entry.at.format("%H:%M:%S ").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{} {}", entry.level.icon(), entry.message),
                    level_style(entry.level),
                ),
            ])
        })
        .collect();
    lines.reverse();

    f.render_widget(Paragraph::new(lines), inner);

    if total > visible {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .symbols(symbols::scrollbar::VERTICAL)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));

        // Scrollbar position counts from the top
        let max_offset = total.saturating_sub(visible);
        let mut scrollbar_state =
            ScrollbarState::new(max_offset).position(max_offset.saturating_sub(scroll));

        f.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

fn level_style(level: ActivityLevel) -> Style {
    match level {
        ActivityLevel::Info => Style::default().fg(Color::White),
        ActivityLevel::Success => Style::default().fg(Color::Green),
        ActivityLevel::Warning => Style::default().fg(Color::Yellow),
        ActivityLevel::Error => Style::default().fg(Color::Red),
    }
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if let Some(err) = &app.error_message {
        (
            format!("Error: {}  |  q: quit", err),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        let hint = match app.mode {
            Mode::Confirm => "y: delete  n/Esc: cancel  ←/→: select".to_string(),
            Mode::Running if app.is_stopping() => {
                "Stopping after the current item...  Ctrl-C: quit".to_string()
            },
            Mode::Running => "s/Esc: stop  j/k: scroll  Ctrl-C: stop and quit".to_string(),
            Mode::Finished => format!(
                "{}  |  q: quit",
                app.summary.as_deref().unwrap_or("Finished")
            ),
        };
        let style = if app.is_stopping() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        (hint, style)
    };

    let crumb = Line::from(vec![
        Span::styled(
            format!("<{}>", app.target.edge()),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(text, style),
    ]);
    f.render_widget(Paragraph::new(crumb), area);
}
