//! Alert table UI

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::view::{AlertTable, DashboardView, NO_ALERTS};

use super::tone_color;

pub fn render(frame: &mut Frame, area: Rect, view: &DashboardView) {
    let block = Block::default().borders(Borders::ALL);

    let rows = match &view.alerts {
        None => {
            let message = Paragraph::new("Loading alerts...")
                .block(block.title("Recent Alerts"))
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(message, area);
            return;
        }
        Some(AlertTable::Empty) => {
            let message = Paragraph::new(NO_ALERTS)
                .block(block.title("Recent Alerts"))
                .style(Style::default().fg(Color::Gray));
            frame.render_widget(message, area);
            return;
        }
        Some(AlertTable::Rows(rows)) => rows,
    };

    let header = Row::new(["Time", "Host", "Type", "Source", "Message"]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let items: Vec<Row> = rows
        .iter()
        .map(|alert| {
            let severity = Style::default().fg(tone_color(alert.tone));

            Row::new(vec![
                Cell::from(alert.timestamp.as_str()).style(Style::default().fg(Color::DarkGray)),
                Cell::from(alert.host_name.as_str()).style(Style::default().fg(Color::Cyan)),
                Cell::from(alert.alert_type.as_str()).style(severity.add_modifier(Modifier::BOLD)),
                Cell::from(alert.source_ip.as_str()),
                Cell::from(alert.message.as_str()),
            ])
        })
        .collect();

    let table = Table::new(
        items,
        [
            Constraint::Length(19),
            Constraint::Length(12),
            Constraint::Length(16),
            Constraint::Length(15),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(block.title(format!("Recent Alerts ({})", rows.len())));

    frame.render_widget(table, area);
}
