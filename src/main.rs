#![forbid(unsafe_code)]

//! `flashpoint-launcher` — CLI host binary.
//!
//! Bootstraps configuration and tracing, then lists the configured
//! collection or launches a game and follows its lifecycle events.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use flashpoint_launcher::catalog::{db, library, playlist};
use flashpoint_launcher::config::LauncherConfig;
use flashpoint_launcher::play::{Launcher, SessionEvent, SessionRegistry};
use flashpoint_launcher::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "flashpoint-launcher", about = "Flashpoint library host", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// List the games in the configured collection.
    List,
    /// Launch a game and follow its session until it stops.
    Play {
        /// Namespaced game identifier (e.g. `flashpoint-<uuid>`).
        game_id: String,
    },
    /// Resolve and print the playlist file for the configured collection.
    ResolveCollection,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let config = Arc::new(LauncherConfig::load_from_path(&args.config)?);
    info!("configuration loaded");

    match args.command {
        CliCommand::List => list_games(&config).await,
        CliCommand::Play { game_id } => play_game(config, game_id).await,
        CliCommand::ResolveCollection => {
            let path = playlist::resolve_collection_file(&config)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

async fn list_games(config: &LauncherConfig) -> Result<()> {
    let pool = db::connect_read_only(&config.database_path()).await?;
    let entries = library::load_entries(config, &pool).await?;

    for entry in &entries {
        println!(
            "{}\t{}\t{} plays\t{}s",
            entry.game_id, entry.name, entry.play_count, entry.playtime_seconds
        );
    }
    info!(count = entries.len(), "collection listed");
    Ok(())
}

async fn play_game(config: Arc<LauncherConfig>, game_id: String) -> Result<()> {
    let (event_tx, mut events) = mpsc::channel(16);
    let registry = Arc::new(SessionRegistry::new());
    let launcher = Launcher::new(Arc::clone(&config), Arc::clone(&registry), event_tx);

    let handle = launcher.launch(&game_id).await?;
    info!(session_id = handle.session_id(), "session launched");

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    warn!(%err, "ctrl-c signal handler failed");
                } else {
                    info!("cancellation requested");
                    handle.request_cancel();
                }
            }
            event = events.recv() => match event {
                Some(SessionEvent::Started { session_id, game_id }) => {
                    info!(session_id, game_id, "session started");
                }
                Some(SessionEvent::Stopped { session_id, game_id, outcome }) => {
                    info!(session_id, game_id, ?outcome, "session stopped");
                    break;
                }
                None => break,
            }
        }
    }

    registry.shutdown_all().await;
    Ok(())
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
