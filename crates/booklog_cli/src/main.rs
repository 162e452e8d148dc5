//! Booklog command-line entry point.
//!
//! Parses intents, runs them against the catalogue and exits non-zero on
//! any failure. All work is delegated to `commands::run`.

mod cli;
mod commands;
mod config;
mod render;

fn main() {
    if let Err(message) = commands::run() {
        eprintln!("{message}");
        std::process::exit(1);
    }
}
