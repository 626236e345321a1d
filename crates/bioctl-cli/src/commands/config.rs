//! The `config` command: validate settings and show the effective values.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bioctl_core::SessionConfig;
use clap::Args;

/// Arguments for `bioctl config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Path to a TOML configuration file; defaults are shown when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Loads and validates the configuration, then prints the effective
/// settings as TOML.
///
/// # Errors
///
/// Returns an error when the file cannot be read, parsed, or validated.
pub fn check(args: &ConfigArgs) -> Result<u8> {
    let config = match &args.config {
        Some(path) => SessionConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SessionConfig::default(),
    };

    let rendered = toml::to_string_pretty(&config).context("failed to render config")?;
    print!("{rendered}");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_the_check() {
        let args = ConfigArgs { config: None };
        assert_eq!(check(&args).unwrap(), 0);
    }
}
