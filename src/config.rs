//! Application configuration loaded from environment variables.
//!
//! Strava credentials seed the in-memory credential pair; refreshed
//! tokens live only in process memory and are not written back.

use std::env;
use std::time::Duration;

const DEFAULT_STRAVA_API_URL: &str = "https://www.strava.com/api/v3";
const DEFAULT_STRAVA_TOKEN_URL: &str = "https://www.strava.com/oauth/token";
const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_LLM_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_CACHE_TTL_SECS: u64 = 5 * 60;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Strava ---
    /// Strava OAuth client ID
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Initial access token
    pub strava_access_token: String,
    /// Initial refresh token
    pub strava_refresh_token: String,
    /// Base URL of the Strava REST API
    pub strava_api_url: String,
    /// OAuth token endpoint used for refresh
    pub strava_token_url: String,

    // --- Model service ---
    /// Bearer key for the chat completions endpoint
    pub llm_api_key: String,
    /// Base URL of the OpenAI-compatible API
    pub llm_base_url: String,
    /// Model name sent with every request
    pub llm_model: String,

    // --- Server ---
    /// How long a fetched activity history stays fresh
    pub activity_cache_ttl: Duration,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            strava_access_token: "test_access_token".to_string(),
            strava_refresh_token: "test_refresh_token".to_string(),
            strava_api_url: "http://127.0.0.1:9/api/v3".to_string(),
            strava_token_url: "http://127.0.0.1:9/oauth/token".to_string(),
            llm_api_key: "test_llm_key".to_string(),
            llm_base_url: "http://127.0.0.1:9/v1".to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            activity_cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
        }
    }

    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let llm_api_key = env::var("LLM_API_KEY")
            .or_else(|_| env::var("GROQ_API_KEY"))
            .map(|v| v.trim().to_string())
            .map_err(|_| ConfigError::Missing("LLM_API_KEY"))?;

        let cache_ttl_secs = match env::var("ACTIVITY_CACHE_TTL_SECS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("ACTIVITY_CACHE_TTL_SECS", raw))?,
            Err(_) => DEFAULT_CACHE_TTL_SECS,
        };

        Ok(Self {
            strava_client_id: required("STRAVA_CLIENT_ID")?,
            strava_client_secret: required("STRAVA_CLIENT_SECRET")?,
            strava_access_token: required("STRAVA_ACCESS_TOKEN")?,
            strava_refresh_token: required("STRAVA_REFRESH_TOKEN")?,
            strava_api_url: env::var("STRAVA_API_URL")
                .unwrap_or_else(|_| DEFAULT_STRAVA_API_URL.to_string()),
            strava_token_url: env::var("STRAVA_TOKEN_URL")
                .unwrap_or_else(|_| DEFAULT_STRAVA_TOKEN_URL.to_string()),
            llm_api_key,
            llm_base_url: env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            activity_cache_ttl: Duration::from_secs(cache_ttl_secs),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }
}

/// Read a required variable, trimming stray whitespace from secrets.
fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .map_err(|_| ConfigError::Missing(name))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
