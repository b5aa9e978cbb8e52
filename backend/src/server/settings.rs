//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, then `FOODGRAM_*` environment variables, then
//! the defaults below.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use pagination::{DEFAULT_LIMIT, MAX_LIMIT, PageLimits};
use serde::Deserialize;

use foodgram::domain::{
    DEFAULT_MAX_VALUE, DEFAULT_MIN_VALUE, RecipeLimits, RecipeServiceSettings, ValueBounds,
};
use foodgram::outbound::persistence::{DEFAULT_POOL_SIZE, PoolConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MEDIA_ROOT: &str = "media";
const DEFAULT_MEDIA_URL: &str = "/media/";

/// Failures turning raw settings into runtime values.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("FOODGRAM_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
}

/// Configuration values for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FOODGRAM")]
pub struct AppSettings {
    /// Socket address the server listens on.
    #[ortho_config(default = DEFAULT_BIND_ADDR.to_owned())]
    pub bind_addr: String,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_size: Option<u32>,
    /// Directory uploaded images are written below.
    pub media_root: Option<PathBuf>,
    /// Prefix turning stored image paths into URLs.
    pub media_url: Option<String>,
    pub cooking_time_min: Option<u32>,
    pub cooking_time_max: Option<u32>,
    pub amount_min: Option<u32>,
    pub amount_max: Option<u32>,
    /// Page size used when a request omits `limit`.
    pub page_size: Option<u32>,
    /// Largest `limit` honoured.
    pub max_page_size: Option<u32>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: self.bind_addr.clone(),
                message: err.to_string(),
            })
    }

    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let url = self
            .database_url
            .as_deref()
            .ok_or(SettingsError::MissingDatabaseUrl)?;
        Ok(PoolConfig::new(url).with_max_size(self.pool_size.unwrap_or(DEFAULT_POOL_SIZE)))
    }

    pub fn media_root(&self) -> PathBuf {
        self.media_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_ROOT))
    }

    pub fn media_url(&self) -> &str {
        self.media_url.as_deref().unwrap_or(DEFAULT_MEDIA_URL)
    }

    pub fn recipe_settings(&self) -> RecipeServiceSettings {
        let bounds = |min: Option<u32>, max: Option<u32>| {
            ValueBounds::new(
                min.unwrap_or(DEFAULT_MIN_VALUE),
                max.unwrap_or(DEFAULT_MAX_VALUE),
            )
        };
        RecipeServiceSettings {
            limits: RecipeLimits {
                cooking_time: bounds(self.cooking_time_min, self.cooking_time_max),
                amount: bounds(self.amount_min, self.amount_max),
            },
            ..RecipeServiceSettings::default()
        }
    }

    pub fn page_limits(&self) -> PageLimits {
        PageLimits::new(
            self.page_size.unwrap_or(DEFAULT_LIMIT),
            self.max_page_size.unwrap_or(MAX_LIMIT),
        )
    }
}
