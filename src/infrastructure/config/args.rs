//! Command line arguments.

use super::app_config::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "steamlens",
    version,
    about = "Resolve Steam identities, profile backgrounds and equipped item prices",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Steam Web API key.
    #[arg(long, env = "STEAM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Steam market currency code.
    #[arg(long)]
    pub currency: Option<u32>,

    /// Language for item definitions.
    #[arg(long)]
    pub language: Option<String>,

    /// Maximum market lookups in flight.
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Lookup to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Lookup to perform.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a vanity name, 64-bit ID or profile URL to all ID forms.
    Resolve {
        /// Vanity name, 64-bit community ID or community profile URL.
        identifier: String,
    },
    /// Find the background of a community profile.
    Background {
        /// Community profile URL.
        profile_url: String,
    },
    /// Look up the game behind a store or image URL.
    Game {
        /// Store page or image URL containing an app ID.
        url: String,
    },
    /// List the equipped profile items of an account.
    Items {
        /// 64-bit community ID.
        steam_id: String,
        /// Attach market listings and prices.
        #[arg(long)]
        market: bool,
    },
    /// Extract the app ID from a URL.
    AppId {
        /// Store page or image URL.
        url: String,
    },
}
