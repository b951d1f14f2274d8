use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    /// Base URL of the HTML → PDF conversion service.
    pub pdf_service_url: String,
    pub pdf_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
    pub default_max_bullets: usize,
    /// Upper bound on concurrent per-bullet tailoring calls.
    pub tailor_concurrency: usize,
    pub tailor_lock_ttl_secs: u64,
    pub enable_llm_match_scoring: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            pdf_service_url: require_env("PDF_SERVICE_URL")?,
            pdf_timeout_secs: parse_env("PDF_TIMEOUT_SECS", 60)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            default_max_bullets: parse_env("DEFAULT_MAX_BULLETS", 15)?,
            tailor_concurrency: parse_env("TAILOR_CONCURRENCY", 4)?,
            tailor_lock_ttl_secs: parse_env("TAILOR_LOCK_TTL_SECS", 300)?,
            enable_llm_match_scoring: parse_env("ENABLE_LLM_MATCH_SCORING", false)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads an optional variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
