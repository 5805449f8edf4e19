//! PlanLine TUI - terminal timeline viewer for the PlanLine project
//! management API.
//!
//! Fetches one project's timeline (tasks, milestones, date range) and
//! renders it as a Gantt-style period grid with a Kanagawa Dragon theme.

mod api;
mod app;
mod layout;
mod models;
mod theme;
mod timeline;
mod ui;

use std::io::{self, stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use api::{ApiClient, ApiCommand, ApiMessage};
use app::App;

/// Input poll cadence
const FRAME_DURATION: Duration = Duration::from_millis(50);

/// Environment variable holding the bearer token issued by the auth
/// service.
const TOKEN_ENV: &str = "PLANLINE_TOKEN";

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install().ok();

    // Usage: planline-tui <project_id> [api_url]
    let args: Vec<String> = std::env::args().collect();
    let Some(project_id) = args.get(1).and_then(|arg| arg.parse::<i64>().ok()) else {
        // Without a project id there is nothing to render.
        let name = args
            .first()
            .map(String::as_str)
            .unwrap_or("planline-tui");
        eprintln!("Usage: {name} <project_id> [api_url]");
        eprintln!("The bearer token is read from {TOKEN_ENV}.");
        return Ok(());
    };
    let api_url = args
        .get(2)
        .map(String::as_str)
        .unwrap_or(api::DEFAULT_BASE_URL);
    let token = std::env::var(TOKEN_ENV).ok();

    run_tui(project_id, api_url, token).await
}

/// Run the TUI application
async fn run_tui(project_id: i64, api_url: &str, token: Option<String>) -> Result<()> {
    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Create communication channels
    let (api_tx, mut api_rx) = mpsc::channel::<ApiMessage>(32);
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<ApiCommand>(32);

    // Create API client and spawn worker task
    let api_client = ApiClient::new(api_url, token)?;
    let api_task = tokio::spawn(async move {
        run_api_worker(api_client, api_tx, &mut cmd_rx).await;
    });

    // Create application state and kick off the first fetch
    let mut app = App::new(project_id);
    cmd_tx.send(app.initial_command()).await.ok();

    // Main event loop
    let result = run_event_loop(&mut terminal, &mut app, &mut api_rx, &cmd_tx).await;

    // Cleanup
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    api_task.abort();

    result
}

/// Run the API worker task. Commands are handled one at a time; a refetch
/// triggered while another is in flight simply queues behind it.
async fn run_api_worker(
    client: ApiClient,
    tx: mpsc::Sender<ApiMessage>,
    rx: &mut mpsc::Receiver<ApiCommand>,
) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            ApiCommand::LoadTimeline { project_id, view } => {
                match client.fetch_timeline(project_id, view).await {
                    Ok(data) => {
                        tx.send(ApiMessage::TimelineLoaded(data)).await.ok();
                    }
                    Err(e) => {
                        tx.send(ApiMessage::Error(e.to_string())).await.ok();
                    }
                }
            }
            ApiCommand::Shutdown => break,
        }
    }
}

/// Run the main event loop
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    api_rx: &mut mpsc::Receiver<ApiMessage>,
    cmd_tx: &mpsc::Sender<ApiCommand>,
) -> Result<()> {
    loop {
        // Render the UI
        terminal.draw(|frame| ui::render(frame, app))?;

        // Check for API messages (non-blocking)
        while let Ok(msg) = api_rx.try_recv() {
            app.handle_api_message(msg);
        }

        // Handle input events with a poll timeout
        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    if let Some(cmd) = app.handle_key(key) {
                        cmd_tx.send(cmd).await.ok();
                    }
                }
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}
