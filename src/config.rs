// config.rs
use std::{
    env, fmt::Display, net::IpAddr, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration,
};

use reqwest::Url;
use tracing::{info, warn};

use crate::error::ConfigError;

pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Origin of the polls REST API; endpoint paths are fixed.
    pub api_base_url: Url,
    /// Pause on the "poll created" screen before moving to the dashboard.
    pub redirect_delay: Duration,
    pub cookie_secure: bool,
    /// Browser records unused this long are dropped.
    pub browser_idle: Duration,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    pub fn from_source<F>(source: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url: Url = try_load(&source, "API_BASE_URL", "http://localhost:3000")?;
        if !matches!(api_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme { key: "API_BASE_URL" });
        }

        Ok(Self {
            host: try_load(&source, "HOST", "0.0.0.0")?,
            port: try_load(&source, "PORT", "3030")?,
            api_base_url,
            redirect_delay: Duration::from_secs(try_load(&source, "REDIRECT_DELAY_SECS", "2")?),
            cookie_secure: try_load(&source, "COOKIE_SECURE", "false")?,
            browser_idle: Duration::from_secs(try_load(&source, "BROWSER_IDLE_SECS", "1800")?),
            static_dir: try_load(&source, "STATIC_DIR", "static")?,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn try_load<T, F>(source: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    source(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .trim()
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key,
                message: e.to_string(),
            }
        })
}
