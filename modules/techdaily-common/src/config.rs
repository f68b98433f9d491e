use std::env;

use crate::types::Theme;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the TechDaily backend, e.g. `https://api.techdaily.dev`.
    pub api_base_url: String,

    /// Where the bearer token is persisted between runs.
    pub token_path: String,

    /// Active display theme; keys the diagram hand-off.
    pub theme: Theme,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            api_base_url: required_env("TECHDAILY_API_URL"),
            token_path: env::var("TECHDAILY_TOKEN_PATH").unwrap_or_else(|_| default_token_path()),
            theme: match env::var("TECHDAILY_THEME").ok().as_deref() {
                Some("dark") => Theme::Dark,
                _ => Theme::Light,
            },
        }
    }
}

fn default_token_path() -> String {
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{home}/.techdaily/token")
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
