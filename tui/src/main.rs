//! EcoBin TUI Entry Point
//!
//! Launches the terminal UI for EcoBin.
//!
//! Usage:
//!   ecobin-tui
//!
//! Configuration comes from `$XDG_CONFIG_HOME/ecobin/ecobin.toml` and
//! `ECOBIN_*` environment variables. Logs go to
//! `$XDG_DATA_HOME/ecobin/ecobin-tui.log`; set `RUST_LOG` to change the level.

use std::fs::{self, File};
use std::io;
use std::panic;
use std::path::PathBuf;

use anyhow::Context;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ecobin_core::load_config;
use ecobin_tui::App;

/// Log file location, falling back to the working directory
fn log_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("ecobin"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ecobin-tui.log")
}

/// Log to a file so the terminal stays clean
fn init_logging() -> anyhow::Result<PathBuf> {
    let path = log_path();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    let file = File::create(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ecobin_tui=info,ecobin_core=info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .init();

    Ok(path)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: ecobin-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("For scripted or piped use, try the headless driver:");
        eprintln!("  ecobin walkthrough --waste laptop");
        eprintln!("  ecobin chat");
        std::process::exit(1);
    }

    let log_file = init_logging()?;
    let config = load_config().context("Failed to load configuration")?;
    tracing::info!(source = %config.source(), log = %log_file.display(), "EcoBin TUI starting");

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(config)?;
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "TUI exited with an error");
    } else {
        println!("\n\x1b[32mEcoBin:\x1b[0m Thanks for recycling! 🌱\n");
    }

    result
}
