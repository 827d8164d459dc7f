use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".student-roster";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "students.sqlite";
/// Log file written next to the database unless overridden.
const LOG_FILE_NAME: &str = "student-roster.log";

/// Command line for the roster manager.
#[derive(Debug, Parser)]
#[command(name = "student-roster", version, about = "Manage a student roster stored in SQLite")]
pub struct Cli {
    /// Path to the SQLite store
    #[arg(long, env = "STUDENT_ROSTER_DB")]
    pub db: Option<PathBuf>,
    /// Where to write the log; the terminal is taken by the interface
    #[arg(long, env = "STUDENT_ROSTER_LOG")]
    pub log_file: Option<PathBuf>,
}

/// Resolved locations the application runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
}

impl Config {
    /// Fill whatever the command line left out with paths under the home
    /// directory.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let db_path = match cli.db {
            Some(path) => path,
            None => data_dir()?.join(DB_FILE_NAME),
        };
        let log_path = match cli.log_file {
            Some(path) => path,
            None => data_dir()?.join(LOG_FILE_NAME),
        };
        Ok(Self { db_path, log_path })
    }
}

fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
