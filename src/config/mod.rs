use crate::core::{AppError, Result};
use crate::modules::gst::models::GstMode;
use std::env;

pub mod server;

pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub gst: GstConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Calculation policy shared by every request
#[derive(Debug, Clone)]
pub struct GstConfig {
    /// Accept rates outside the standard slabs (any value in 0..=100)
    pub allow_custom_rates: bool,
    /// Mode used when a preview request does not name one
    pub default_mode: GstMode,
}

impl Default for GstConfig {
    fn default() -> Self {
        Self {
            allow_custom_rates: true,
            default_mode: GstMode::Exclusive,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub rate_limit_per_minute: u32,
    /// Empty means any origin
    pub cors_allowed_origins: Vec<String>,
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Configuration(format!("Invalid {}", name))),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                log_format: match env::var("LOG_FORMAT")
                    .unwrap_or_else(|_| "pretty".to_string())
                    .to_lowercase()
                    .as_str()
                {
                    "pretty" => LogFormat::Pretty,
                    "json" => LogFormat::Json,
                    _ => return Err(AppError::Configuration("Invalid LOG_FORMAT".to_string())),
                },
            },
            server: ServerConfig::from_env()?,
            gst: GstConfig {
                allow_custom_rates: parse_bool(
                    "GST_ALLOW_CUSTOM_RATES",
                    &env::var("GST_ALLOW_CUSTOM_RATES").unwrap_or_else(|_| "true".to_string()),
                )?,
                default_mode: env::var("DEFAULT_GST_MODE")
                    .unwrap_or_else(|_| "EXCLUSIVE".to_string())
                    .parse()
                    .map_err(|_| AppError::Configuration("Invalid DEFAULT_GST_MODE".to_string()))?,
            },
            security: SecurityConfig {
                rate_limit_per_minute: env::var("RATE_LIMIT_PER_MINUTE")
                    .unwrap_or_else(|_| "1000".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid RATE_LIMIT_PER_MINUTE".to_string())
                    })?,
                cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_default()
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect(),
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.workers == 0 {
            return Err(AppError::Configuration(
                "Server workers must be greater than 0".to_string(),
            ));
        }

        if self.security.rate_limit_per_minute == 0 {
            return Err(AppError::Configuration(
                "Rate limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
