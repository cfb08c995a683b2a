// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rookie Run — trivia card deck companion.
//
// Entry point. Initialises logging, loads configuration, and dispatches the
// card production subcommands (import, sheet generation, QR export).

mod commands;

use rookierun_core::human_errors::humanize_error;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Rookie Run starting");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = commands::dispatch(&args) {
        let human = humanize_error(&e);
        eprintln!("error: {}", human.message);
        eprintln!("  {}", human.suggestion);
        tracing::error!(error = %e, "command failed");
        std::process::exit(1);
    }
}
