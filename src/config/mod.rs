use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the record API connection.
///
/// Every field is read from an `APPER_`-prefixed environment variable.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Backend project identifier (`APPER_PROJECT_ID`)
    pub project_id: String,
    /// Public key sent alongside the project id (`APPER_PUBLIC_KEY`)
    pub public_key: String,
    /// Base URL of the record API (`APPER_API_URL`)
    pub api_url: String,
    /// Request timeout in seconds (`APPER_TIMEOUT_SECS`)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize `APPER_*` variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = Self::from_vars(std::env::vars())?;

        Ok(config)
    }

    /// Build a Config from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::prefixed("APPER_").from_iter::<_, Config>(vars)?;

        if config.api_url.trim().is_empty() {
            anyhow::bail!("APPER_API_URL must not be empty");
        }

        Ok(config)
    }

    /// Base URL without a trailing slash
    pub fn api_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    let config = Config::load()?;

    Ok(config)
}
