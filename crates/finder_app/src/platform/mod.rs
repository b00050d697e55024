//! Console host: stdin commands in, text views out.
mod app;
mod config;
mod effects;
mod logging;
mod persistence;
mod ui;

pub use app::run_app;
