//! EcoBin headless driver
//!
//! Runs the controller without a terminal UI. Every message the controller
//! emits is printed as one JSON object per line on stdout; logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Whole recycling flow for a laptop
//! ecobin walkthrough --waste laptop
//!
//! # Feed events yourself
//! echo '{"type":"navigate","screen":"home"}' | ecobin replay
//!
//! # Talk to EcoBot
//! ecobin chat
//!
//! # Show the effective configuration
//! ecobin --config ./ecobin.toml config
//!
//! # Verbose logging
//! RUST_LOG=debug ecobin walkthrough
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use ecobin_core::{
    load_config, load_config_from_path, ChatSender, ConfigOverrides, Controller,
    ControllerMessage, EcobinConfig, GeoPosition, ScreenId, SurfaceEvent, WasteTypeId,
    QUICK_ACTIONS,
};

/// Surface channel capacity; the driver drains after every tick
const CHANNEL_CAPACITY: usize = 256;

/// EcoBin - e-waste recycling app, headless
#[derive(Parser, Debug)]
#[command(name = "ecobin")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "ECOBIN_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "ECOBIN_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Screen shown on start
    #[arg(long, value_name = "SCREEN")]
    initial_screen: Option<ScreenId>,

    /// Show an empty result instead of defaulting to phone
    #[arg(long)]
    strict_selection: bool,

    /// Report this latitude as the user's position
    #[arg(long, requires = "longitude", allow_hyphen_values = true)]
    latitude: Option<f64>,

    /// Report this longitude as the user's position
    #[arg(long, requires = "latitude", allow_hyphen_values = true)]
    longitude: Option<f64>,

    /// Key-value store file for signups
    #[arg(long, value_name = "FILE")]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the whole recycling flow for one item
    Walkthrough {
        /// Item to recycle
        #[arg(short, long, default_value = "phone")]
        waste: WasteTypeId,
    },

    /// Read surface events (JSON, one per line) from stdin
    Replay {
        /// Virtual milliseconds to advance after each event
        #[arg(long, default_value_t = 5000)]
        step_ms: u64,
    },

    /// Chat with EcoBot
    Chat,

    /// Print the effective configuration
    Config,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(screen) = self.initial_screen {
            overrides = overrides.with_initial_screen(screen);
        }
        if self.strict_selection {
            overrides = overrides.with_strict_selection(true);
        }
        if let (Some(lat), Some(lon)) = (self.latitude, self.longitude) {
            overrides = overrides.with_fixed_position(GeoPosition::new(lat, lon));
        }
        if let Some(ref path) = self.storage {
            overrides = overrides.with_storage_path(path.clone());
        }
        overrides
    }
}

/// Initialize logging with the specified level
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("ecobin={level},ecobin_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn resolve_config(args: &Args) -> Result<EcobinConfig> {
    let mut config = match args.config {
        Some(ref path) => load_config_from_path(Some(path.clone())),
        None => load_config(),
    }
    .context("Failed to load configuration")?;
    args.overrides().apply(&mut config);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Print everything the controller has sent so far as JSON lines
fn print_messages(
    rx: &mut mpsc::Receiver<ControllerMessage>,
    out: &mut impl Write,
) -> Result<Vec<ControllerMessage>> {
    let mut seen = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        writeln!(out, "{}", serde_json::to_string(&msg)?)?;
        seen.push(msg);
    }
    Ok(seen)
}

/// Advance virtual time until no timer or location request is left
async fn run_until_idle(
    controller: &mut Controller,
    rx: &mut mpsc::Receiver<ControllerMessage>,
    out: &mut impl Write,
) -> Result<Vec<ControllerMessage>> {
    let mut seen = Vec::new();
    loop {
        seen.extend(print_messages(rx, out)?);
        if controller.awaiting_location() {
            controller.wait_for_location().await;
            continue;
        }
        match controller.next_due_in() {
            Some(delay) => controller.tick(delay).await,
            None => break,
        }
    }
    Ok(seen)
}

async fn walkthrough(config: EcobinConfig, waste: WasteTypeId, out: &mut impl Write) -> Result<()> {
    let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);
    let mut controller = Controller::new(config, tx);

    let script = [
        SurfaceEvent::Start,
        SurfaceEvent::Navigate {
            screen: ScreenId::Home,
        },
        SurfaceEvent::SelectWaste { waste },
        SurfaceEvent::Navigate {
            screen: ScreenId::Scanning,
        },
        SurfaceEvent::CaptureScan,
        SurfaceEvent::ShowNatureReaction,
        SurfaceEvent::ShowImpact,
        SurfaceEvent::QuitRequested,
    ];

    for event in script {
        info!(event = event.name(), at = ?controller.now(), "Walkthrough step");
        controller.handle_event(event).await?;
        run_until_idle(&mut controller, &mut rx, out).await?;
    }
    Ok(())
}

async fn replay(config: EcobinConfig, step: Duration, out: &mut impl Write) -> Result<()> {
    let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);
    let mut controller = Controller::new(config, tx);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event: SurfaceEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping malformed event");
                continue;
            }
        };

        controller.handle_event(event).await?;
        controller.tick(step).await;
        if controller.awaiting_location() {
            controller.wait_for_location().await;
        }
        print_messages(&mut rx, out)?;

        if !controller.is_running() {
            break;
        }
    }
    Ok(())
}

async fn chat(config: EcobinConfig) -> Result<()> {
    let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);
    let mut controller = Controller::new(config, tx);
    let mut sink = std::io::sink();
    let mut stdout = std::io::stdout();

    writeln!(stdout, "EcoBot: Hi! Ask me anything about recycling e-waste. 🌱")?;
    for (i, action) in QUICK_ACTIONS.iter().enumerate() {
        writeln!(stdout, "  [{}] {action}", i + 1)?;
    }
    writeln!(stdout, "Type a number for a quick question, or 'quit' to leave.")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if matches!(text, "quit" | "exit") {
            break;
        }

        let quick = text
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| QUICK_ACTIONS.get(i));
        let event = match quick {
            Some(action) => SurfaceEvent::ChatQuick {
                text: (*action).to_string(),
            },
            None => SurfaceEvent::ChatSend {
                text: text.to_string(),
            },
        };
        controller.handle_event(event).await?;

        for msg in run_until_idle(&mut controller, &mut rx, &mut sink).await? {
            if let ControllerMessage::ChatAppend { message } = msg {
                if message.sender == ChatSender::Bot {
                    writeln!(stdout, "EcoBot: {}", message.text)?;
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = resolve_config(&args)?;
    info!(source = %config.source(), "Configuration loaded");

    let mut stdout = std::io::stdout();
    match args.command {
        Command::Walkthrough { waste } => walkthrough(config, waste, &mut stdout).await,
        Command::Replay { step_ms } => {
            replay(config, Duration::from_millis(step_ms), &mut stdout).await
        }
        Command::Chat => chat(config).await,
        Command::Config => {
            writeln!(stdout, "{config:#?}")?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_walkthrough() {
        let args = Args::try_parse_from(["ecobin", "walkthrough", "--waste", "charger"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Walkthrough {
                waste: WasteTypeId::Charger
            }
        ));
    }

    #[test]
    fn test_position_needs_both_coordinates() {
        assert!(Args::try_parse_from(["ecobin", "--latitude", "25.3", "chat"]).is_err());

        let args = Args::try_parse_from([
            "ecobin",
            "--latitude",
            "25.3",
            "--longitude",
            "-82.9",
            "--initial-screen",
            "home",
            "chat",
        ])
        .unwrap();
        let mut config = EcobinConfig::default();
        args.overrides().apply(&mut config);
        assert_eq!(config.fixed_position, Some(GeoPosition::new(25.3, -82.9)));
        assert_eq!(config.initial_screen, ScreenId::Home);
    }

    #[tokio::test]
    async fn test_walkthrough_prints_json_lines() {
        let mut out = Vec::new();
        walkthrough(EcobinConfig::default(), WasteTypeId::Laptop, &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        let messages: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        let detection = messages
            .iter()
            .find(|m| m["type"] == "detection_result")
            .unwrap();
        assert_eq!(detection["summary"]["name"], "Laptop Computer");
        assert!(messages.iter().any(|m| m["cue"]["cue"] == "impact_shown"));
        assert_eq!(messages.last().unwrap()["type"], "quit");
    }
}
