use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub calendars_file: PathBuf,
    pub static_dir: PathBuf,
    /// Per-fetch upper bound. `None` lets a hung upstream stall its own slot.
    pub fetch_timeout: Option<Duration>,
    pub cors_allowed_origins: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            calendars_file: env::var("CALENDARS_FILE")
                .unwrap_or_else(|_| "calendars.toml".to_string())
                .into(),
            static_dir: env::var("STATIC_DIR")
                .unwrap_or_else(|_| "public".to_string())
                .into(),
            fetch_timeout: parse_timeout(env::var("FETCH_TIMEOUT_SECS").ok())
                .context("FETCH_TIMEOUT_SECS must be a whole number of seconds")?,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS").ok(),
        })
    }
}

fn parse_timeout(raw: Option<String>) -> Result<Option<Duration>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let secs: u64 = raw.trim().parse()?;
    // 0 means "no timeout"
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}
