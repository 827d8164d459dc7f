//! Ratatui front-end for the roster. It owns no records of its own: every key
//! press is translated into a workflow call and the table is drawn straight
//! from the roster view.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
