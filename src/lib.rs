pub mod app;
pub mod autosave;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod host;
pub mod input;
pub mod logging;
pub mod models;
pub mod state;
pub mod store;
pub mod theme;
pub mod ui;
pub mod utils;
