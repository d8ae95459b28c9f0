use anyhow::{Context, Result};

const DEFAULT_TWITTER_API_URL: &str = "https://api.twitter.com";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Base64-encoded HMAC secret for session tokens.
    pub jwt_secret: String,
    pub google_client_id: String,
    pub twitter_bearer_token: String,
    pub twitter_api_url: String,
    /// Base URL of the copy generation service. `None` selects the built-in template generator.
    pub generator_url: Option<String>,
    /// Allowed CORS origins. Empty means permissive.
    pub cors_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_secret: require_env("JWT_SECRET")?,
            google_client_id: require_env("GOOGLE_CLIENT_ID")?,
            twitter_bearer_token: require_env("TWITTER_BEARER_TOKEN")?,
            twitter_api_url: std::env::var("TWITTER_API_URL")
                .unwrap_or_else(|_| DEFAULT_TWITTER_API_URL.to_string()),
            generator_url: optional_env("GENERATOR_URL"),
            cors_origins: optional_env("CORS_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_trims_and_skips_blanks() {
        let origins = parse_origins(" http://localhost:5173, ,https://app.example.com ");
        assert_eq!(
            origins,
            vec!["http://localhost:5173", "https://app.example.com"]
        );
    }

    #[test]
    fn test_parse_origins_empty() {
        assert!(parse_origins("").is_empty());
    }
}
