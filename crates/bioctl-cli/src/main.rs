//! bioctl - bioreactor simulator batch client
//!
//! Drives a batch on the remote bioreactor simulator through its lifecycle
//! and prints the final CPP report.

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod http;
mod render;

/// bioctl - bioreactor simulator batch client
#[derive(Parser, Debug)]
#[command(name = "bioctl")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one batch to completion and print the final report
    Run(commands::run::RunArgs),

    /// Validate a configuration file and print the effective settings
    Config(commands::config::ConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Exit codes: 0 = successful batch, 1 = failed or cancelled batch,
    // 2 = transport/config error before a report could be produced.
    let exit_code = match cli.command {
        Commands::Run(args) => commands::run::run_batch(&args),
        Commands::Config(args) => commands::config::check(&args),
    }
    .unwrap_or_else(|err| {
        eprintln!("error: {err:#}");
        2
    });

    std::process::exit(i32::from(exit_code));
}
