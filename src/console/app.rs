//! Main application logic

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use crate::actors::messages::TriggerOutcome;
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::gateway::HttpGateway;
use crate::types::{ActionKind, HostId};
use crate::view::SharedView;

use super::ui::{self, Screen};

/// Main TUI application
pub struct App {
    dashboard: Dashboard,
    view: SharedView,
    selected_host: usize,
    status_message: Option<String>,
}

impl App {
    /// Activate a dashboard against the configured host API
    pub async fn mount(config: Config) -> Result<Self> {
        let gateway = HttpGateway::from_config(&config)
            .with_context(|| format!("failed to create client for {}", config.api_url))?;
        let view = SharedView::new();

        let dashboard = Dashboard::mount(&config, Arc::new(gateway), Arc::new(view.clone())).await;

        Ok(Self {
            dashboard,
            view,
            selected_host: 0,
            status_message: None,
        })
    }

    /// Run the application until the operator quits
    ///
    /// The dashboard is unmounted even when the terminal fails to restore.
    pub async fn run(mut self) -> Result<()> {
        let session = self.run_terminal().await;
        let unmounted = self.dashboard.unmount().await;

        first_error(session, unmounted)
    }

    async fn run_terminal(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_event_loop(&mut terminal).await;

        // Restore terminal
        let restored = (|| -> Result<()> {
            disable_raw_mode()?;
            execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
            terminal.show_cursor()?;
            Ok(())
        })();

        first_error(result, restored)
    }

    async fn run_event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        loop {
            {
                let view = self.view.read();
                self.selected_host = self.selected_host.min(view.hosts.len().saturating_sub(1));

                let screen = Screen {
                    view: &view,
                    selected_host: self.selected_host,
                    status_message: self.status_message.as_deref(),
                };
                terminal.draw(|f| ui::render(f, &screen))?;
            }

            if event::poll(Duration::from_millis(100))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
                && self.handle_key_event(key.code).await?
            {
                break;
            }
        }

        Ok(())
    }

    fn selected_host_id(&self) -> Option<HostId> {
        self.view
            .read()
            .hosts
            .get(self.selected_host)
            .map(|row| row.host.id)
    }

    async fn trigger_selected(&mut self, kind: ActionKind) -> Result<()> {
        let Some(host_id) = self.selected_host_id() else {
            return Ok(());
        };

        match self.dashboard.trigger(host_id, kind).await? {
            TriggerOutcome::Started => self.status_message = None,
            TriggerOutcome::AlreadyInFlight => {
                debug!("{kind} for host {host_id} already in flight");
            }
            TriggerOutcome::UnknownHost => {
                self.status_message = Some(format!("Host {host_id} is no longer attached"));
            }
        }

        Ok(())
    }

    /// Handle keyboard event, returns `true` when the app should quit
    async fn handle_key_event(&mut self, code: KeyCode) -> Result<bool> {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                return Ok(true);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let count = self.view.read().hosts.len();
                if count > 0 {
                    self.selected_host = (self.selected_host + 1) % count;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let count = self.view.read().hosts.len();
                if count > 0 {
                    self.selected_host = (self.selected_host + count - 1) % count;
                }
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.trigger_selected(ActionKind::StatusCheck).await?;
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.trigger_selected(ActionKind::LogCollection).await?;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.selected_host = 0;
                self.status_message = match self.dashboard.reload_hosts().await {
                    Ok(_) => None,
                    Err(e) => Some(format!("{e:#}")),
                };
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                self.dashboard.refresh_alerts().await?;
            }
            KeyCode::Char('c') => {
                self.status_message = None;
            }
            _ => {}
        }

        Ok(false)
    }
}

/// Keep the earlier failure; a later one is only logged
fn first_error(earlier: Result<()>, later: Result<()>) -> Result<()> {
    match (earlier, later) {
        (Err(e), Err(later)) => {
            warn!("{later:#}");
            Err(e)
        }
        (earlier, later) => earlier.and(later),
    }
}
