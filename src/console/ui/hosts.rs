//! Host list UI

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::types::ActionKind;
use crate::view::{
    ActionView, HostListPlaceholder, HostRow, STATUS_CONNECTING, STATUS_PROMPT, Tone,
};

use super::{Screen, tone_color};

pub fn render(frame: &mut Frame, area: Rect, screen: &Screen) {
    let block = Block::default().borders(Borders::ALL);

    if let Some(placeholder) = &screen.view.host_placeholder {
        let color = match placeholder {
            HostListPlaceholder::Empty => Color::Gray,
            HostListPlaceholder::Failed { .. } => Color::Red,
        };

        let message = Paragraph::new(placeholder.text())
            .block(block.title("Hosts"))
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: true });

        frame.render_widget(message, area);
        return;
    }

    let items: Vec<ListItem> = screen
        .view
        .hosts
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut style = Style::default();
            if i == screen.selected_host {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }

            ListItem::new(vec![title_line(row), status_line(&row.status), Line::raw("")])
                .style(style)
        })
        .collect();

    let list = List::new(items).block(block.title(format!("Hosts ({})", screen.view.hosts.len())));

    frame.render_widget(list, area);
}

/// Icon, name, address and both affordances
fn title_line(row: &HostRow) -> Line<'_> {
    Line::from(vec![
        Span::raw(format!("{} ", row.host.os_kind.icon())),
        Span::styled(
            &row.host.hostname,
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(&row.host.ip_address, Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        affordance(&row.status, ActionKind::StatusCheck),
        Span::raw(" "),
        affordance(&row.collection, ActionKind::LogCollection),
    ])
}

fn affordance(view: &ActionView, kind: ActionKind) -> Span<'static> {
    let style = match view {
        ActionView::Neutral => Style::default().fg(Color::Cyan),
        ActionView::Loading => Style::default().fg(Color::DarkGray),
        ActionView::Badges(_) => Style::default().fg(Color::Cyan),
        ActionView::AlertCount { tone, .. } => Style::default()
            .fg(Color::Black)
            .bg(tone_color(*tone)),
        ActionView::Failed { .. } => Style::default().fg(Color::Red),
    };

    Span::styled(format!("[{}]", view.affordance(kind)), style)
}

/// Status region below the host title
fn status_line(view: &ActionView) -> Line<'static> {
    match view {
        ActionView::Badges(badges) => {
            let mut spans = vec![Span::raw("   ")];
            for badge in badges {
                spans.push(Span::styled(
                    format!("{} ", badge.label),
                    Style::default().fg(Color::DarkGray),
                ));
                spans.push(Span::styled(
                    format!("{}  ", badge.value),
                    Style::default()
                        .fg(tone_color(badge.tone))
                        .add_modifier(Modifier::BOLD),
                ));
            }
            Line::from(spans)
        }
        ActionView::Loading => muted(STATUS_CONNECTING),
        ActionView::Failed { message } => Line::from(vec![
            Span::raw("   "),
            Span::styled(
                "Error",
                Style::default()
                    .fg(tone_color(Tone::Danger))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {message}"), Style::default().fg(Color::DarkGray)),
        ]),
        ActionView::Neutral | ActionView::AlertCount { .. } => muted(STATUS_PROMPT),
    }
}

fn muted(text: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("   "),
        Span::styled(
            text,
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        ),
    ])
}
