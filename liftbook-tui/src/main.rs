mod app;
mod author_store;
mod cli;
mod config;
mod logging;
mod runtime;
mod test_data;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use liftbook::{InMemoryStore, JournalApiClient, JournalStore};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use time::UtcOffset;

// Single-threaded so the local UTC offset can be read safely.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    match cli.command {
        cli::Commands::ConfigPath => {
            let path = config::LiftbookConfig::config_path()?;
            if !path.exists() {
                config::LiftbookConfig::default().save()?;
                println!("Created default config at: {}", path.display());
            } else {
                println!("{}", path.display());
            }
        }
        cli::Commands::SetAuthor { name } => {
            let author = name.trim().to_lowercase();
            author_store::save_author(&author)?;
            println!("Author set to {}", author);
        }
        cli::Commands::Run => {
            let cfg = config::LiftbookConfig::load()?;
            let log_path = logging::init()?;
            tracing::info!(api_url = %cfg.api_url, "starting against journal service");
            let client = JournalApiClient::new(&cfg.api_url)
                .with_context(|| format!("Cannot create client for {}", cfg.api_url))?;
            let author = author_store::load_author()?.unwrap_or_default();
            run_ui(&client, &author).await?;
            println!("Log written to {}", log_path.display());
        }
        cli::Commands::Dev => {
            let log_path = logging::init()?;
            tracing::info!("starting in dev mode");
            let store = InMemoryStore::new();
            test_data::seed(&store)?;
            run_ui(&store, test_data::DEV_AUTHOR).await?;
            println!("Log written to {}", log_path.display());
        }
    }

    Ok(())
}

async fn run_ui(store: &dyn JournalStore, author: &str) -> Result<()> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let mut app = App::new(author, offset);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = runtime::run_app(&mut terminal, &mut app, store).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!(error = ?err, "ui exited with error");
    }
    res
}
