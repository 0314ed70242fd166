//! lscache - inspect and edit cache slots stored on disk.
//!
//! Each slot is a JSON file holding `user -> cache -> entry -> {data, time}`,
//! the same layout the library writes into any key-value host store.

mod cli;
mod commands;
mod config;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use lscache_core::{FileStore, StoreFront, DEFAULT_USER};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Args, Command};
use config::Config;

/// Initialize the tracing subscriber for logging.
/// The returned guard flushes buffered log lines when dropped.
fn init_tracing() -> WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (writer, guard) = tracing_appender::non_blocking(io::stderr());

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer))
        .with(filter)
        .init();

    guard
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _guard = init_tracing();

    let args = match cli::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, cli::USAGE);
            std::process::exit(2);
        }
    };

    let command = match args.command {
        Command::Help => {
            println!("{}", cli::USAGE);
            return Ok(());
        }
        Command::SaveConfig => {
            let config = load_config(&args)?;
            let path = Config::config_path()
                .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
            config.save_to(&path)?;
            println!("Saved {}", path.display());
            return Ok(());
        }
        Command::Slot(ref command) => command,
    };

    let config = load_config(&args)?;

    let store = match config.store_dir {
        Some(ref dir) => FileStore::new(dir.clone()),
        None => FileStore::open_default(),
    }
    .context("Failed to open store directory")?;

    let user = config.user.clone().unwrap_or_else(|| DEFAULT_USER.to_string());
    info!(dir = %store.dir().display(), user = %user, "lscache starting");

    let front = StoreFront::new(Arc::new(store), config.slot_name.as_deref()).with_user(user);

    let mut stdout = io::stdout().lock();
    commands::run(&front, command, &mut stdout)
}

/// Config file, then environment, then command-line flags.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load()?;
    config.apply_env(|key| std::env::var(key).ok());
    args.apply_to(&mut config);
    Ok(config)
}
