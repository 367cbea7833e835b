//! Configuration management for Lambda functions.

use std::env;
use std::time::Duration;

use crate::{Error, Result};

/// Default Ex Libris analytics reports endpoint (North America).
pub const DEFAULT_ANALYTICS_API_URL: &str =
    "https://api-na.hosted.exlibrisgroup.com/almaws/v1/analytics/reports";

/// Name of the API area whose keys grant analytics access.
pub const DEFAULT_ANALYTICS_AREA: &str = "analytics";

/// Report generation on the remote side can take minutes.
pub const DEFAULT_ANALYTICS_TIMEOUT_SECS: u64 = 600;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database host
    pub db_host: String,
    /// Database name
    pub db_name: String,
    /// ARN of the secret containing database credentials
    pub db_secret_arn: String,
    /// AWS region
    pub aws_region: String,
    /// Analytics reports endpoint
    pub analytics_api_url: String,
    /// Area looked up to select the API key
    pub analytics_area: String,
    /// Timeout for the outbound report call
    pub analytics_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| Error::Config(format!("{} not set", key)))
        };

        let analytics_timeout = match lookup("ANALYTICS_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                Error::Config(format!("Invalid ANALYTICS_TIMEOUT_SECS {:?}: {}", raw, e))
            })?,
            None => DEFAULT_ANALYTICS_TIMEOUT_SECS,
        };

        Ok(Self {
            db_host: required("DATABASE_HOST")?,
            db_name: lookup("DATABASE_NAME").unwrap_or_else(|| "barcodecheck".to_string()),
            db_secret_arn: required("DATABASE_URL_SECRET_ARN")?,
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            analytics_api_url: lookup("ANALYTICS_API_URL")
                .unwrap_or_else(|| DEFAULT_ANALYTICS_API_URL.to_string()),
            analytics_area: lookup("ANALYTICS_AREA")
                .unwrap_or_else(|| DEFAULT_ANALYTICS_AREA.to_string()),
            analytics_timeout: Duration::from_secs(analytics_timeout),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[
            ("DATABASE_HOST", "db.internal"),
            ("DATABASE_URL_SECRET_ARN", "arn:aws:secretsmanager:us-east-1:1:secret:db"),
        ])
        .unwrap();

        assert_eq!(config.db_name, "barcodecheck");
        assert_eq!(config.analytics_api_url, DEFAULT_ANALYTICS_API_URL);
        assert_eq!(config.analytics_area, "analytics");
        assert_eq!(config.analytics_timeout, Duration::from_secs(600));
    }

    #[test]
    fn test_missing_required() {
        let err = config_from(&[("DATABASE_HOST", "db.internal")]).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("DATABASE_URL_SECRET_ARN")));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = config_from(&[
            ("DATABASE_HOST", "db.internal"),
            ("DATABASE_URL_SECRET_ARN", "arn"),
            ("ANALYTICS_TIMEOUT_SECS", "ten minutes"),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
