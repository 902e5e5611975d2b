use std::fs::OpenOptions;
use std::sync::Mutex;

use clap::Parser;
use taskflow::cli::commands::Cli;
use taskflow::cli::handlers;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Tracing is opt-in via RUST_LOG. The TUI owns the terminal, so it logs to
/// `taskflow.log` in the state directory; subcommands log to stderr.
fn init_tracing(tui: bool) {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > 4096 {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        });
    let Some(filter) = filter else {
        return;
    };

    let (stderr_layer, file_layer) = if tui {
        let dir = taskflow::io::state_dir();
        let file = std::fs::create_dir_all(&dir).and_then(|_| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("taskflow.log"))
        });
        match file {
            Ok(file) => (
                None,
                Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file))),
            ),
            Err(_) => return,
        }
    } else {
        (Some(fmt::layer().with_writer(std::io::stderr)), None)
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.command.is_none());

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
