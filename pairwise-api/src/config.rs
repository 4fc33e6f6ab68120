//! Configuration loading
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (via clap `env` attributes)
//! 3. TOML config file
//! 4. Compiled default (fallback)

use clap::Parser;
use pairwise_common::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "pairwise-api", about = "PairWise list-matching wizard API")]
pub struct Args {
    /// Path to a TOML config file
    #[arg(long, env = "PAIRWISE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Socket address to listen on
    #[arg(long, env = "PAIRWISE_BIND")]
    pub bind: Option<String>,

    /// Path to the JSON registry file
    #[arg(long, env = "PAIRWISE_DATA_FILE")]
    pub data_file: Option<PathBuf>,
}

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Socket address to listen on
    pub bind_address: String,

    /// Registry backing file (single JSON array of file records)
    pub data_file: PathBuf,

    /// Origin allowed by the CORS layer
    pub allowed_origin: String,

    /// Demo identity; a real identity provider would replace these
    pub username: String,
    pub one_time_password: String,
    pub access_code: String,

    /// Bearer token lifetime in minutes
    pub token_ttl_minutes: u64,

    /// Simulated matching/download work duration in milliseconds
    pub provider_delay_ms: u64,

    /// Upper bound on a single provider call before it is treated as failed
    pub provider_timeout_ms: u64,

    /// Header columns an uploaded CSV must contain (empty disables the check)
    pub required_csv_columns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3001".to_string(),
            data_file: PathBuf::from("./data.json"),
            allowed_origin: "http://localhost:3000".to_string(),
            username: "validUser".to_string(),
            one_time_password: "123456".to_string(),
            access_code: "098765".to_string(),
            token_ttl_minutes: 60,
            provider_delay_ms: 2000,
            provider_timeout_ms: 10_000,
            required_csv_columns: Vec::new(),
        }
    }
}

impl Config {
    /// Resolve configuration from CLI arguments, config file, and defaults
    pub fn load(args: &Args) -> Result<Self> {
        let mut config = match config_file_path(args) {
            Some(path) => {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    Error::Storage(format!("failed to read config {}: {}", path.display(), e))
                })?;
                toml::from_str(&content)
                    .map_err(|e| Error::InvalidInput(format!("invalid config file: {}", e)))?
            }
            None => Config::default(),
        };

        // CLI/env overrides take precedence over the file
        if let Some(bind) = &args.bind {
            config.bind_address = bind.clone();
        }
        if let Some(data_file) = &args.data_file {
            config.data_file = data_file.clone();
        }

        Ok(config)
    }

    pub fn token_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.token_ttl_minutes * 60)
    }

    pub fn provider_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.provider_delay_ms)
    }

    pub fn provider_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.provider_timeout_ms)
    }
}

fn config_file_path(args: &Args) -> Option<PathBuf> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }

    let default = PathBuf::from("./pairwise.toml");
    if default.exists() {
        return Some(default);
    }

    None
}
