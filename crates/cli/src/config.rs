use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use meublerp_api::{ApiClientConfig, DecodePolicy};

/// Application configuration.
///
/// Sources, later ones winning: defaults, `meublerp.toml` (optional),
/// `MEUBLERP__*` environment variables (a `.env` file is loaded first).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub decode_policy: DecodePolicy,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_api_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Config::builder()
            .add_source(File::with_name("meublerp").required(false))
            .add_source(Environment::with_prefix("MEUBLERP").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn api_client_config(&self) -> ApiClientConfig {
        ApiClientConfig {
            base_url: self.api_base_url.clone(),
            token: self.api_token.clone(),
            policy: self.decode_policy,
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}
