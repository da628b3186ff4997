use std::env;
use std::fmt;
use std::time::Duration;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_USER_AGENT: &str = concat!("bookstore-admin/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug)]
pub struct Config {
    /// Record store base, `/books` is appended to it
    pub api_base_url: Url,
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Admin sign-in flag carried over from the login screen
    pub admin_authenticated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidApiUrl(String),
    InvalidTimeout(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidApiUrl(msg) => write!(f, "Invalid BOOKSTORE_API_URL: {}", msg),
            ConfigError::InvalidTimeout(v) => write!(f, "Invalid REQUEST_TIMEOUT_SECS: {}", v),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("BOOKSTORE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_base_url =
            Url::parse(&raw_url).map_err(|e| ConfigError::InvalidApiUrl(e.to_string()))?;
        if api_base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidApiUrl(raw_url));
        }

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidTimeout(v))?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_base_url,
            request_timeout,
            user_agent: lookup("USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            admin_authenticated: lookup("ADMIN_AUTHENTICATED")
                .map(|v| v.trim() == "true")
                .unwrap_or(false),
        })
    }
}
