//! Command-line interface definitions for arxiv_alert.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Everything else is read from the YAML configuration file.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for one alert run.
///
/// # Examples
///
/// ```sh
/// # Use ./config-demo.yaml
/// arxiv_alert
///
/// # Explicit config, password from the environment
/// ARXIV_ALERT_SENDER_PASSWORD=... arxiv_alert --config_path ~/.config/arxiv.yaml
///
/// # Print the digest instead of emailing it
/// arxiv_alert --dry-run > digest.html
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(long = "config_path", alias = "config-path", default_value = "config-demo.yaml")]
    pub config_path: PathBuf,

    /// SMTP password; overrides `sender_password` from the config file
    #[arg(long, env = "ARXIV_ALERT_SENDER_PASSWORD", hide_env_values = true)]
    pub sender_password: Option<String>,

    /// Print the HTML digest to stdout instead of emailing it
    #[arg(long)]
    pub dry_run: bool,
}
