//! Main dashboard layout

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::{Screen, alerts, hosts, offenders};

/// Render the main dashboard UI
pub fn render(frame: &mut Frame, screen: &Screen) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], screen);
    render_content(frame, chunks[1], screen);
    render_footer(frame, chunks[2], screen);
}

fn render_header(frame: &mut Frame, area: Rect, screen: &Screen) {
    let mut spans = vec![Span::styled(
        "Hostwatch",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(last_update) = screen.view.last_update {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!(
                "updated {}",
                last_update.with_timezone(&chrono::Local).format("%H:%M:%S")
            ),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

/// Host list on the left, aggregate views on the right
fn render_content(frame: &mut Frame, area: Rect, screen: &Screen) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let aggregates = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(columns[1]);

    hosts::render(frame, columns[0], screen);
    alerts::render(frame, aggregates[0], screen.view);
    offenders::render(frame, aggregates[1], screen.view);
}

/// Render footer with key bindings and the last status message
fn render_footer(frame: &mut Frame, area: Rect, screen: &Screen) {
    let mut footer_text = vec![
        Span::raw("Hosts: "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" | Status: "),
        Span::styled("S", Style::default().fg(Color::Yellow)),
        Span::raw(" | Logs: "),
        Span::styled("L", Style::default().fg(Color::Yellow)),
        Span::raw(" | Reload: "),
        Span::styled("R", Style::default().fg(Color::Yellow)),
        Span::raw(" | Alerts: "),
        Span::styled("A", Style::default().fg(Color::Yellow)),
        Span::raw(" | Quit: "),
        Span::styled("Q", Style::default().fg(Color::Yellow)),
    ];

    if let Some(message) = screen.status_message {
        footer_text.push(Span::raw(" | "));
        footer_text.push(Span::styled(message, Style::default().fg(Color::Red)));
    }

    let footer =
        Paragraph::new(Line::from(footer_text)).block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}
