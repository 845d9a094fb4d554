//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// VoiceLedger - voice-driven expense ledger
#[derive(Parser, Debug)]
#[command(name = "voice-ledger")]
#[command(version = "0.1.0")]
#[command(about = "Record a voice note, extract an expense record, keep it in a local ledger")]
#[command(long_about = None)]
pub struct Cli {
    /// Ledger database path (overrides config)
    #[arg(long, value_name = "PATH", global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a voice note and run it through the pipeline
    /// (press Enter to stop and process, Ctrl+C to discard)
    Record {
        /// Recognition language tag (e.g. ja-JP, en-US)
        #[arg(short = 'l', long, value_name = "TAG")]
        language: Option<String>,

        /// Extraction model name
        #[arg(short = 'm', long, value_name = "MODEL")]
        model: Option<String>,
    },
    /// List all stored expense records
    List,
    /// Delete one record by id
    Delete {
        /// Record id
        id: i64,
    },
    /// Delete every record
    Clear,
    /// Show the grand total and per-category breakdown
    Analyze,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "stt_api_key",
    "llm_api_key",
    "language",
    "llm_model",
    "sample_rate",
    "db_path",
    "wav_path",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
