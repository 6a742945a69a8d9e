//! Top offender chart

use ratatui::{
    Frame,
    layout::{Direction, Rect},
    style::{Color, Style},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
};

use crate::view::{DashboardView, OFFENDER_SERIES};

pub fn render(frame: &mut Frame, area: Rect, view: &DashboardView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Top Offenders ({OFFENDER_SERIES})"));

    if view.offenders.is_empty() {
        let message = Paragraph::new("No offender data")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(message, area);
        return;
    }

    let bars: Vec<Bar> = view
        .offenders
        .iter()
        .map(|offender| {
            Bar::default()
                .label(offender.ip.clone().into())
                .value(offender.count)
                .style(Style::default().fg(Color::Red))
                .value_style(Style::default().fg(Color::White).bg(Color::Red))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}
