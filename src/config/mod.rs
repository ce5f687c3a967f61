use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3300
}

/// Where the store API lives and what a principal needs to use the back office.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Role name the profile endpoint must report for a session to be accepted
    #[serde(default = "default_admin_role")]
    pub admin_role: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            admin_role: default_admin_role(),
        }
    }
}

fn default_base_url() -> String {
    "https://server-api.example/api/v1".to_string()
}

fn default_admin_role() -> String {
    "Super-Admin".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_max_age_days")]
    pub max_age_days: i64,
    /// Mark the session cookie `Secure` (disable only for plain-http development)
    #[serde(default = "default_secure")]
    pub secure: bool,
    #[serde(default = "default_sign_in_path")]
    pub sign_in_path: String,
    #[serde(default = "default_home_path")]
    pub home_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            max_age_days: default_max_age_days(),
            secure: default_secure(),
            sign_in_path: default_sign_in_path(),
            home_path: default_home_path(),
        }
    }
}

fn default_cookie_name() -> String {
    "japAccessToken".to_string()
}

fn default_max_age_days() -> i64 {
    1
}

fn default_secure() -> bool {
    true
}

fn default_sign_in_path() -> String {
    "/authentication/sign-in".to_string()
}

fn default_home_path() -> String {
    "/".to_string()
}

/// Limits applied to every file field before anything is sent upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
    /// Largest request body accepted; oversized files must still reach validation
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: default_max_file_bytes(),
            allowed_mime_types: default_allowed_mime_types(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_max_file_bytes() -> u64 {
    3_000_000
}

fn default_max_body_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_allowed_mime_types() -> Vec<String> {
    ["image/png", "image/jpeg", "image/jpg", "image/webp"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::parse(&content)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse configuration file")
    }
}
