//! CLI module for Flogin
//!
//! Provides subcommands for running the API and maintaining its database:
//! - `serve`: HTTP API server (default)
//! - `migrate`: apply (or revert) SQL migrations
//! - `migrate-credentials`: hash legacy plaintext passwords

pub mod migrate;
pub mod serve;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;

/// Flogin - user authentication and product management API
#[derive(Debug, Parser)]
#[command(name = "flogin")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file layered over config/default and config/local
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API server (default)
    Serve,

    /// Apply pending database migrations
    Migrate {
        /// Revert the most recently applied migration instead
        #[arg(long)]
        revert: bool,
    },

    /// Re-store every legacy plaintext password as an Argon2 hash
    MigrateCredentials,
}

/// Load `.env`, the layered configuration and the global subscriber
pub fn bootstrap(config_path: Option<&Path>) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load(config_path).context("Failed to load configuration")?;
    init_logging(&config.logging);

    Ok(config)
}
