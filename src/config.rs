use std::{env, str::FromStr, time::Duration};

use anyhow::{Context, bail};

pub const DEFAULT_FEED_URL: &str = "https://petstore.swagger.io/v2/pet/findByStatus?status=available";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub sync: SyncConfig,
}

/// Settings for the background catalog sync.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub enabled: bool,
    pub feed_url: String,
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            feed_url: DEFAULT_FEED_URL.to_string(),
            interval: Duration::from_secs(30 * 60),
            timeout: Duration::from_secs(30),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_var("APP_PORT", 3000)?;
        let max_connections = parse_var("DB_MAX_CONNECTIONS", 10)?;
        let token_ttl = minutes("TOKEN_TTL_MINUTES", parse_var("TOKEN_TTL_MINUTES", 60)?)?;

        let defaults = SyncConfig::default();
        let sync = SyncConfig {
            enabled: parse_var("CATALOG_SYNC_ENABLED", defaults.enabled)?,
            feed_url: env::var("CATALOG_FEED_URL").unwrap_or(defaults.feed_url),
            interval: seconds(
                "CATALOG_SYNC_INTERVAL_SECS",
                parse_var("CATALOG_SYNC_INTERVAL_SECS", defaults.interval.as_secs())?,
            )?,
            timeout: seconds(
                "CATALOG_FEED_TIMEOUT_SECS",
                parse_var("CATALOG_FEED_TIMEOUT_SECS", defaults.timeout.as_secs())?,
            )?,
        };

        Ok(Self {
            database_url,
            host,
            port,
            max_connections,
            jwt_secret,
            token_ttl,
            sync,
        })
    }
}

/// Non-zero number of seconds; the sync timer cannot tick with a zero period.
fn seconds(key: &str, secs: u64) -> anyhow::Result<Duration> {
    if secs == 0 {
        bail!("{key} must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}

fn minutes(key: &str, minutes: u64) -> anyhow::Result<Duration> {
    let secs = minutes
        .checked_mul(60)
        .with_context(|| format!("{key} is too large: {minutes}"))?;
    seconds(key, secs)
}

fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_value(key, env::var(key).ok(), default)
}

fn parse_value<T>(key: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: {value}")),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_value_falls_back_to_default() {
        let port: u16 = parse_value("APP_PORT", None, 3000).unwrap();
        assert_eq!(port, 3000);

        let port: u16 = parse_value("APP_PORT", Some("  ".into()), 3000).unwrap();
        assert_eq!(port, 3000);
    }

    #[test]
    fn present_value_is_parsed() {
        let secs: u64 = parse_value("CATALOG_SYNC_INTERVAL_SECS", Some("90".into()), 1800).unwrap();
        assert_eq!(secs, 90);

        let enabled: bool = parse_value("CATALOG_SYNC_ENABLED", Some("false".into()), true).unwrap();
        assert!(!enabled);
    }

    #[test]
    fn malformed_value_is_an_error() {
        let err = parse_value::<u16>("APP_PORT", Some("eighty".into()), 3000).unwrap_err();
        assert!(err.to_string().contains("APP_PORT"));
    }

    #[test]
    fn zero_durations_are_rejected() {
        let err = seconds("CATALOG_SYNC_INTERVAL_SECS", 0).unwrap_err();
        assert!(err.to_string().contains("CATALOG_SYNC_INTERVAL_SECS"));
        assert!(seconds("CATALOG_FEED_TIMEOUT_SECS", 0).is_err());
        assert!(minutes("TOKEN_TTL_MINUTES", 0).is_err());
        assert_eq!(
            seconds("CATALOG_SYNC_INTERVAL_SECS", 90).unwrap(),
            Duration::from_secs(90)
        );
    }

    #[test]
    fn oversized_ttl_is_rejected() {
        let err = minutes("TOKEN_TTL_MINUTES", u64::MAX).unwrap_err();
        assert!(err.to_string().contains("TOKEN_TTL_MINUTES"));
        assert_eq!(
            minutes("TOKEN_TTL_MINUTES", 60).unwrap(),
            Duration::from_secs(3600)
        );
    }

    #[test]
    fn sync_defaults_match_the_reference_schedule() {
        let sync = SyncConfig::default();
        assert_eq!(sync.interval, Duration::from_secs(1800));
        assert_eq!(sync.feed_url, DEFAULT_FEED_URL);
    }
}
