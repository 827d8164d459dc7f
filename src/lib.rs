//! Core library surface for the Student Roster TUI application.
//!
//! The data layer (`db`, `roster`, `workflows`) carries all of the rules; the
//! `ui` module only forwards key presses into it.
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod roster;
pub mod ui;
pub mod workflows;

pub use config::{Cli, Config};
pub use db::{StorageGateway, StudentRepository};
pub use error::RosterError;
pub use models::{Course, Student, StudentInput};
pub use roster::RosterView;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
