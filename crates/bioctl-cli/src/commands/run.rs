//! The `run` command: drive one batch to completion.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use bioctl_core::{ReactorSession, SessionConfig, TickEvent};
use clap::Args;
use tracing::debug;

use crate::http::HttpReactorClient;
use crate::render;

/// Arguments for `bioctl run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Base URL of the simulator API
    #[arg(long, default_value = "http://mini-mes.resilience.com")]
    pub host: String,

    /// Reactor id; discovered from the API when omitted
    #[arg(long)]
    pub reactor_id: Option<u64>,

    /// Path to a TOML configuration file with process thresholds
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Milliseconds to sleep between polls. The API sometimes takes a
    /// quarter-second to answer, so going much faster buys nothing.
    #[arg(long, default_value = "350")]
    pub poll_interval_ms: u64,

    /// Output format for the final report (`text` or `json`)
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,
}

/// Runs one batch and renders the final report.
///
/// Returns the process exit code: 0 for a successful batch, 1 for a failed
/// or cancelled one.
///
/// # Errors
///
/// Returns an error (exit code 2 at the boundary) when the configuration
/// cannot be loaded or the simulator transport fails; no report is printed
/// in that case because it could not be trusted.
pub fn run_batch(args: &RunArgs) -> Result<u8> {
    let config = load_config(args.config.as_deref())?;

    let mut client = HttpReactorClient::connect(&args.host, args.reactor_id)
        .context("failed to connect to the reactor simulator")?;
    println!("Starting reaction in reactor {}", client.reactor_id());

    let cancelled = install_ctrl_c_flag();
    let poll_interval = Duration::from_millis(args.poll_interval_ms);
    let mut session = ReactorSession::new(config);

    while !session.is_terminal() {
        if cancelled.load(Ordering::SeqCst) {
            eprintln!("interrupted; producing a partial report");
            break;
        }

        let outcome = session
            .tick(&mut client)
            .context("polling the reactor failed")?;
        match &outcome.event {
            TickEvent::Stayed(phase) => {
                debug!(%phase, elapsed_secs = outcome.elapsed_secs, "holding");
            }
            TickEvent::Advanced(phase) => {
                println!("T={:.2}, Process State={phase}", outcome.elapsed_secs);
            }
            TickEvent::Aborted(reason) => {
                println!("T={:.2}, Process State=failed", outcome.elapsed_secs);
                eprintln!("Reaction aborted because of: {reason}");
            }
        }

        if !session.is_terminal() {
            thread::sleep(poll_interval);
        }
    }

    let report = session.finish_cancelled();
    match args.format.as_str() {
        "json" => println!("{}", render::render_json(&report)?),
        _ => print!("{}", render::render_text(&report)),
    }

    Ok(u8::from(!report.status.is_success()))
}

fn load_config(path: Option<&std::path::Path>) -> Result<SessionConfig> {
    match path {
        Some(path) => SessionConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(SessionConfig::default()),
    }
}

/// Sets a flag on Ctrl-C so the polling loop can stop between ticks.
fn install_ctrl_c_flag() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);
    thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build();
        if let Ok(rt) = rt {
            if rt.block_on(tokio::signal::ctrl_c()).is_ok() {
                handler_flag.store(true, Ordering::SeqCst);
            }
        }
    });
    flag
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_used_without_a_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let result = load_config(Some(std::path::Path::new("/nonexistent/bioctl.toml")));
        assert!(result.is_err());
    }
}
