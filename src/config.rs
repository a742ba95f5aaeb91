//! Application configuration loaded from environment variables.
//!
//! The OAuth client secret is the only sensitive value; it is read once at
//! startup and held in memory.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Google OAuth client ID (public)
    pub oauth_client_id: String,
    /// Google OAuth client secret
    pub oauth_client_secret: String,
    /// Redirect URL registered with the provider (the hosted callback page)
    pub oauth_redirect_url: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Steps-to-distance conversion ratio (steps per kilometre)
    pub steps_per_km: f64,
    /// Path of the JSON preferences file; `None` keeps everything in memory
    pub prefs_path: Option<String>,
    /// MapQuest static-map API key
    pub map_api_key: String,
    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            oauth_client_id: env::var("OAUTH_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("OAUTH_CLIENT_ID"))?,
            oauth_client_secret: env::var("OAUTH_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("OAUTH_CLIENT_SECRET"))?,
            oauth_redirect_url: env::var("OAUTH_REDIRECT_URL")
                .map_err(|_| ConfigError::Missing("OAUTH_REDIRECT_URL"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            steps_per_km: env::var("STEPS_PER_KM")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &f64| *v > 0.0)
                .unwrap_or(DEFAULT_STEPS_PER_KM),
            prefs_path: env::var("PREFS_PATH").ok(),
            map_api_key: env::var("MAP_API_KEY").unwrap_or_default(),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            oauth_client_id: "test_client_id".to_string(),
            oauth_client_secret: "test_secret".to_string(),
            oauth_redirect_url: "http://localhost:8080/auth/callback".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            steps_per_km: DEFAULT_STEPS_PER_KM,
            prefs_path: None,
            map_api_key: "test_map_key".to_string(),
            port: 8080,
        }
    }
}

/// Average walking cadence; overridable per user via `STEPS_PER_KM`.
pub const DEFAULT_STEPS_PER_KM: f64 = 1300.0;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("OAUTH_CLIENT_ID", "test_id");
        env::set_var("OAUTH_CLIENT_SECRET", "test_secret");
        env::set_var("OAUTH_REDIRECT_URL", "http://localhost:8080/auth/callback");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.oauth_client_id, "test_id");
        assert_eq!(config.oauth_client_secret, "test_secret");
        assert_eq!(config.port, 8080);
        assert_eq!(config.steps_per_km, DEFAULT_STEPS_PER_KM);
    }
}
