//! Application configuration loaded from environment variables.
//!
//! Everything the fetch pipelines need (credentials, the client-identifier
//! header value) is loaded once at startup and injected into components at
//! construction; nothing reads process-wide state at request time.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Reddit OAuth client ID (public)
    pub reddit_client_id: String,
    /// Reddit OAuth client secret
    pub reddit_client_secret: String,
    /// Redirect URI registered with the Reddit app
    pub redirect_uri: String,
    /// User-Agent header value required by the Reddit API on every request
    pub user_agent: String,
    /// HMAC key for signing the OAuth state parameter
    pub oauth_state_key: Vec<u8>,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            reddit_client_id: "test_client_id".to_string(),
            reddit_client_secret: "test_secret".to_string(),
            redirect_uri: "http://localhost:8080/auth/reddit/callback".to_string(),
            user_agent: "reddit-recap/0.1 by test_user".to_string(),
            oauth_state_key: b"test_state_key_32_bytes_minimum!".to_vec(),
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            reddit_client_id: env::var("REDDIT_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("REDDIT_CLIENT_ID"))?,
            reddit_client_secret: env::var("REDDIT_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("REDDIT_CLIENT_SECRET"))?,
            redirect_uri: env::var("REDDIT_REDIRECT_URI")
                .map_err(|_| ConfigError::Missing("REDDIT_REDIRECT_URI"))?,
            user_agent: env::var("REDDIT_USER_AGENT")
                .map_err(|_| ConfigError::Missing("REDDIT_USER_AGENT"))?,
            oauth_state_key: env::var("OAUTH_STATE_KEY")
                .map_err(|_| ConfigError::Missing("OAUTH_STATE_KEY"))?
                .into_bytes(),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }
}

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
        // Set required env vars for test
        env::set_var("REDDIT_CLIENT_ID", "test_id");
        env::set_var("REDDIT_CLIENT_SECRET", "test_secret");
        env::set_var("REDDIT_REDIRECT_URI", "http://localhost:8080/auth/reddit/callback");
        env::set_var("REDDIT_USER_AGENT", "reddit-recap/0.1 by tester");
        env::set_var("OAUTH_STATE_KEY", "test_state_key_32_bytes_minimum!");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.reddit_client_id, "test_id");
        assert_eq!(config.reddit_client_secret, "test_secret");
        assert_eq!(config.user_agent, "reddit-recap/0.1 by tester");
        assert_eq!(config.port, 8080);
    }
}
