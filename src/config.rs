use std::env;

pub const DEFAULT_API_BASE: &str = "https://api.tunegrab.app";

pub const API_BASE_ENV: &str = "TUNEGRAB_API_BASE";
pub const YOUTUBE_API_KEY_ENV: &str = "TUNEGRAB_YOUTUBE_API_KEY";
pub const TOKEN_ENV: &str = "TUNEGRAB_TOKEN";

/// Runtime configuration, read from the environment and overridable by callers
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the download service
    pub api_base: String,
    /// Key for the video platform's search API, required only for free-text search
    pub youtube_api_key: Option<String>,
    /// Bearer token for the download service, required to start a download
    pub auth_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            youtube_api_key: None,
            auth_token: None,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base: non_empty_var(API_BASE_ENV)
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            youtube_api_key: non_empty_var(YOUTUBE_API_KEY_ENV),
            auth_token: non_empty_var(TOKEN_ENV),
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: String) -> Self {
        self.auth_token = Some(token);
        self
    }

    /// Set the search API key
    pub fn with_api_key(mut self, key: String) -> Self {
        self.youtube_api_key = Some(key);
        self
    }
}
