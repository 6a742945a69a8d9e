//! UI rendering module

mod alerts;
mod hosts;
mod layout;
mod offenders;

use ratatui::style::Color;

use crate::view::{DashboardView, Tone};

pub use layout::render;

/// Everything a frame needs besides the dashboard itself
pub struct Screen<'a> {
    pub view: &'a DashboardView,
    pub selected_host: usize,
    pub status_message: Option<&'a str>,
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Neutral => Color::White,
        Tone::Success => Color::Green,
        Tone::Warning => Color::Yellow,
        Tone::Info => Color::Cyan,
        Tone::Muted => Color::Gray,
        Tone::Danger => Color::Red,
    }
}
