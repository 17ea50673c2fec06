use std::{env, fmt::Display, net::SocketAddr, path::PathBuf, str::FromStr};

use anyhow::{Context, Result};
use tracing::info;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_RECOMMENDER_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_PICS_DIR: &str = "public/pics";

/// Runtime settings for the storefront server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory holding games.json and user.json
    pub data_dir: PathBuf,
    /// Base URL of the recommendation service
    pub recommender_url: String,
    /// Directory served under /pics
    pub pics_dir: PathBuf,
}

impl ServerConfig {
    /// Read settings from the environment, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_addr: try_load("STOREFRONT_BIND", DEFAULT_BIND)?,
            data_dir: try_load("STOREFRONT_DATA_DIR", DEFAULT_DATA_DIR)?,
            recommender_url: try_load("RECOMMENDER_URL", DEFAULT_RECOMMENDER_URL)?,
            pics_dir: try_load("STOREFRONT_PICS_DIR", DEFAULT_PICS_DIR)?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            recommender_url: DEFAULT_RECOMMENDER_URL.to_string(),
            pics_dir: PathBuf::from(DEFAULT_PICS_DIR),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {raw:?}"))
}
