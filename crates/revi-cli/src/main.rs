mod app;
mod commands;
mod config;
mod event;
mod history;
mod ingest;
mod logging;
mod session;
mod strings;
mod theme;
mod ui;
mod welcome;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;
use std::sync::Arc;

use app::{App, BackendEvent};
use clap::{Parser, Subcommand};
use ratatui::DefaultTerminal;
use revi_client::{HttpBackend, ReviewBackend};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::info;

use crate::config::Settings;
use crate::theme::ThemeMode;

#[derive(Parser)]
#[command(name = "revi")]
#[command(about = "Terminal chat client for the REVI.AI review assistant")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend base URL (overrides the config file)
    #[arg(long, env = "REVI_API_URL")]
    api_url: Option<String>,

    /// Path to a settings file
    #[arg(short, long, env = "REVI_CONFIG")]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat TUI - Default
    Chat,
    /// Ask a single question and print the answer with its sources
    Ask { question: String },
    /// Print the backend's conversation history
    History,
    /// Upload a .txt or .csv file of reviews
    Upload { path: PathBuf },
    /// Upload pasted reviews (from --text or stdin)
    UploadText {
        #[arg(long)]
        text: Option<String>,
    },
    /// Similarity search over the indexed reviews
    Search { query: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    color_eyre::install().ok();
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        settings.api.base_url = url;
    }

    let command = cli.command.unwrap_or(Commands::Chat);
    let console = !matches!(command, Commands::Chat);
    let _guard = logging::init_logger(&settings.logging, console)?;

    info!("Backend: {}", settings.api.base_url);
    let backend: Arc<dyn ReviewBackend> = Arc::new(HttpBackend::new(
        &settings.api.base_url,
        settings.api.timeout(),
    )?);

    let mut out = std::io::stdout();
    match command {
        Commands::Chat => start_tui(backend, settings.ui.theme).await?,
        Commands::Ask { question } => commands::ask(backend.as_ref(), &question, &mut out).await?,
        Commands::History => commands::history(backend.as_ref(), &mut out).await?,
        Commands::Upload { path } => commands::upload(backend.as_ref(), &path, &mut out).await?,
        Commands::UploadText { text } => {
            commands::upload_text(backend.as_ref(), text, &mut out).await?
        }
        Commands::Search { query } => commands::search(backend.as_ref(), &query, &mut out).await?,
    }

    Ok(())
}

async fn start_tui(backend: Arc<dyn ReviewBackend>, theme: ThemeMode) -> anyhow::Result<()> {
    // Initialize terminal (ratatui::init handles raw mode + alternate screen)
    let terminal = ratatui::init();

    let result = run_app(terminal, backend, theme).await;

    // Restore terminal (always, even on error)
    ratatui::restore();

    result
}

async fn run_app(
    mut terminal: DefaultTerminal,
    backend: Arc<dyn ReviewBackend>,
    theme: ThemeMode,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(backend, tx, theme);

    loop {
        drain_backend_events(&mut app, &mut rx);
        app.tick = app.tick.wrapping_add(1);
        app.sync_scroll();

        // Draw
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Check quit flag
        if app.should_quit {
            break;
        }

        // Poll events (non-blocking with 100ms timeout)
        if let Some(evt) = event::poll_event(100)? {
            event::handle_event(&mut app, evt)?;
        }
    }

    info!("Chat closed");
    Ok(())
}

fn drain_backend_events(app: &mut App, rx: &mut UnboundedReceiver<BackendEvent>) {
    while let Ok(event) = rx.try_recv() {
        app.apply(event);
    }
}
