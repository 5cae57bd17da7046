use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Prefix for the `resultUrl` handed back to clients.
    pub public_base_url: String,
    pub result_ttl: Duration,
    pub sweep_interval: Duration,
    /// Unset: results are kept in process memory.
    pub redis_url: Option<String>,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let port: u16 = parse_env("PORT", 8080)?;
        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            result_ttl: Duration::from_secs(parse_env("RESULT_TTL_SECS", 3600)?),
            sweep_interval: Duration::from_secs(parse_env::<u64>("SWEEP_INTERVAL_SECS", 300)?.max(1)),
            redis_url: std::env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty()),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        })
    }

    pub fn result_url(&self, id: uuid::Uuid) -> String {
        format!("{}/api/v1/results/{id}", self.public_base_url)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Config for router tests; never touches the environment.
    pub fn for_tests() -> Self {
        Config {
            anthropic_api_key: "test-key".to_string(),
            port: 8080,
            rust_log: "debug".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
            result_ttl: Duration::from_secs(3600),
            sweep_interval: Duration::from_secs(300),
            redis_url: None,
            max_upload_bytes: 1024 * 1024,
        }
    }
}
