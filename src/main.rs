//! StatForge - compose dashboard results from already-fetched aggregates
//!
//! Reads one compose request (JSON) from the file named by the first argument
//! or from stdin, and writes the composed response to stdout.

use std::io::{self, Read, Write};

use statforge::{log_error, logging, ComposeRequest, Config, ResultComposer, Result};

fn main() {
    if let Err(e) = run() {
        log_error!(e, "Composition failed");
        eprintln!("statforge: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env()?;
    config.validate()?;

    logging::init_tracing(&config.logging.log_level, &config.logging.environment)?;
    config.log_config();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting StatForge");

    let composer = ResultComposer::from_config(&config.compose)?;

    let input = match std::env::args().nth(1) {
        Some(path) if path != "-" => std::fs::read_to_string(&path)?,
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        },
    };

    let request: ComposeRequest = serde_json::from_str(&input)?;
    let response = composer.compose(request);

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &response)?;
    writeln!(stdout)?;

    tracing::info!(rows = response.len(), "StatForge composition complete");
    Ok(())
}
