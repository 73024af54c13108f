//! Chat histogram CLI
//!
//! Per-user message counts by hour of day, weekday and absolute hour.

mod aggregation;
mod cli;
mod commands;
mod config;
mod data;
mod logging;
mod models;
mod report;


fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
