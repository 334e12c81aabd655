use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "singlefile-bridge")]
#[command(about = "Bridges SingleFile page captures into a bookmark service", long_about = None)]
pub struct Cli {
    /// Optional dotenv-style file loaded before reading the environment.
    #[arg(short = 'e', long = "env-file")]
    pub env_file: Option<String>,
}

/// Immutable process configuration, read from the environment once at startup
/// and injected into every component. Handlers never read env vars directly.
#[derive(Debug, Clone)]
pub struct Config {
    pub max_asset_size_mb: u64,
    pub max_request_size_mb: u64,
    pub upstream_base_url: String,
    pub listen_host: String,
    pub listen_port: u16,
    pub request_timeout: Duration,
    pub bookmarks_db_path: PathBuf,
    pub queue_db_path: Option<PathBuf>,
    pub db_busy_timeout_ms: u64,
    pub pushover_token: Option<String>,
    pub pushover_user: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let upstream_base_url = env_or("UPSTREAM_BASE_URL", "http://127.0.0.1:3000")
            .trim_end_matches('/')
            .to_string();

        let bookmarks_db_path = env::var("BOOKMARKS_DB_PATH")
            .map(PathBuf::from)
            .context("BOOKMARKS_DB_PATH must point at the bookmark service's primary database")?;

        Ok(Config {
            max_asset_size_mb: env_u64("MAX_ASSET_SIZE_MB", 50)?,
            max_request_size_mb: env_u64("MAX_REQUEST_SIZE_MB", 512)?,
            upstream_base_url,
            listen_host: env_or("BRIDGE_LISTEN_HOST", "127.0.0.1"),
            listen_port: env_u64("BRIDGE_LISTEN_PORT", 3010)?
                .try_into()
                .context("BRIDGE_LISTEN_PORT out of range")?,
            request_timeout: Duration::from_secs(env_u64("REQUEST_TIMEOUT_SEC", 240)?),
            bookmarks_db_path,
            queue_db_path: env::var("QUEUE_DB_PATH").ok().map(PathBuf::from),
            db_busy_timeout_ms: env_u64("DB_BUSY_TIMEOUT_MS", 10_000)?,
            pushover_token: env_nonempty("PUSHOVER_TOKEN"),
            pushover_user: env_nonempty("PUSHOVER_USER"),
        })
    }

    pub fn max_asset_size_bytes(&self) -> u64 {
        self.max_asset_size_mb * 1024 * 1024
    }

    pub fn max_request_size_bytes(&self) -> usize {
        (self.max_request_size_mb * 1024 * 1024) as usize
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_host, self.listen_port)
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_nonempty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_u64(name: &str, default: u64) -> Result<u64> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{} must be a non-negative integer, got {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}
