//! Mason CLI - incremental asset build orchestrator
//!
//! Usage: mason [--source <dir>] [--target <dir>] [--server] [--force]
//!              [--profile <name>] [--json] [-v...]
//!
//! Without `--server` Mason brings the target tree up to date and exits.

mod cli;

use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mason::{BuildEventSink, BuildServer, BuilderParams, JsonEventSink, LogEventSink};

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    install_tracing_subscriber(cli.verbose);

    let params = BuilderParams {
        source_path: cli.source.clone(),
        target_path: cli.target.clone(),
        server: cli.server,
        force_recompile: cli.force,
    };

    let events: Arc<dyn BuildEventSink> = if cli.json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(LogEventSink)
    };

    let mut server = BuildServer::open(&params)
        .with_context(|| format!("failed to open source tree {}", cli.source.display()))?
        .with_event_sink(events);

    if let Some(profile) = &cli.profile {
        if !server.select_profile(profile) {
            bail!(
                "unknown setting profile '{profile}' (available: {})",
                server.setting_profiles().join(", ")
            );
        }
    }

    if cli.server {
        let stop = server.handle();
        ctrlc::set_handler(move || stop.stop()).context("failed to install Ctrl+C handler")?;
        tracing::info!(source = %cli.source.display(), "Build server started, press Ctrl+C to stop");
    }

    let worker = thread::Builder::new()
        .name("build-server".to_string())
        .spawn(move || server.run())
        .context("failed to spawn build server thread")?;

    worker
        .join()
        .map_err(|_| anyhow!("build server thread panicked"))??;
    Ok(())
}

/// Logs go to stderr so `--json` events on stdout stay machine readable.
fn install_tracing_subscriber(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
