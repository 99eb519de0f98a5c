use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::images::{bria, stability, unsplash};
use crate::llm_client;

/// Application configuration loaded from environment variables.
/// Vendor credentials are all optional: a missing key disables that backend.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub stability_api_key: Option<String>,
    pub stability_api_url: String,
    pub bria_api_key: Option<String>,
    pub bria_api_url: String,
    pub unsplash_access_key: Option<String>,
    pub unsplash_api_url: String,
    pub redis_url: Option<String>,
    pub session_ttl: Duration,
    pub s3: Option<S3Config>,
    pub export_dir: PathBuf,
    pub storage_dir: PathBuf,
    pub social_font_path: Option<PathBuf>,
    pub image_count: usize,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub endpoint: String,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let s3 = match (optional_env("S3_BUCKET"), optional_env("S3_ENDPOINT")) {
            (Some(bucket), Some(endpoint)) => Some(S3Config {
                bucket,
                endpoint,
                region: env_or("S3_REGION", "us-east-1"),
                access_key_id: optional_env("AWS_ACCESS_KEY_ID"),
                secret_access_key: optional_env("AWS_SECRET_ACCESS_KEY"),
            }),
            _ => None,
        };

        Ok(Config {
            llm_api_key: optional_env("LLM_API_KEY"),
            llm_base_url: env_or("LLM_BASE_URL", llm_client::DEFAULT_BASE_URL),
            llm_model: env_or("LLM_MODEL", llm_client::DEFAULT_MODEL),
            stability_api_key: optional_env("STABILITY_API_KEY"),
            stability_api_url: env_or("STABILITY_API_URL", stability::DEFAULT_URL),
            bria_api_key: optional_env("BRIA_API_KEY"),
            bria_api_url: env_or("BRIA_API_URL", bria::DEFAULT_URL),
            unsplash_access_key: optional_env("UNSPLASH_ACCESS_KEY"),
            unsplash_api_url: env_or("UNSPLASH_API_URL", unsplash::DEFAULT_URL),
            redis_url: optional_env("REDIS_URL"),
            session_ttl: Duration::from_secs(parse_env("SESSION_TTL_SECS", 86_400)?),
            s3,
            export_dir: PathBuf::from(env_or("EXPORT_DIR", "exports")),
            storage_dir: PathBuf::from(env_or("STORAGE_DIR", "storage")),
            social_font_path: optional_env("SOCIAL_FONT_PATH").map(PathBuf::from),
            image_count: parse_env("IMAGE_COUNT", 3)?,
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names; the process environment is shared.

    #[test]
    fn test_blank_values_are_absent() {
        std::env::set_var("BOOSTER_TEST_BLANK", "   ");
        assert_eq!(optional_env("BOOSTER_TEST_BLANK"), None);
        assert_eq!(env_or("BOOSTER_TEST_BLANK", "fallback"), "fallback");
    }

    #[test]
    fn test_parse_env_default_and_invalid() {
        assert_eq!(parse_env::<u16>("BOOSTER_TEST_UNSET_PORT", 8080).unwrap(), 8080);

        std::env::set_var("BOOSTER_TEST_BAD_PORT", "eighty");
        let err = parse_env::<u16>("BOOSTER_TEST_BAD_PORT", 8080).unwrap_err();
        assert!(err.to_string().contains("BOOSTER_TEST_BAD_PORT"));

        std::env::set_var("BOOSTER_TEST_COUNT", " 5 ");
        assert_eq!(parse_env::<usize>("BOOSTER_TEST_COUNT", 3).unwrap(), 5);
    }
}
