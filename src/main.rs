//! Binary entry point: resolve where the store lives, route logging into a
//! file so it does not fight the TUI for the terminal, make sure the schema
//! exists, then hand control to the event loop.
use std::fs::{self, OpenOptions};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Env, Target};
use log::info;
use student_roster::{run_app, App, Cli, Config, RosterView, StorageGateway, StudentRepository};

fn main() -> Result<()> {
    let config = Config::from_cli(Cli::parse())?;
    init_logging(&config)?;

    let gateway = StorageGateway::new(&config.db_path);
    gateway
        .initialize()
        .context("failed to prepare the student store")?;
    let repo = StudentRepository::new(gateway);
    info!("using student store {}", repo.gateway().location().display());
    let view = RosterView::load(&repo).context("failed to load students")?;

    let mut app = App::new(repo, view);
    run_app(&mut app)
}

/// Send `log` output to the configured file, `info` unless `RUST_LOG` says
/// otherwise.
fn init_logging(config: &Config) -> Result<()> {
    if let Some(parent) = config.log_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("failed to create log directory")?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("failed to open log file {}", config.log_path.display()))?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
