use std::time::Duration;

use crate::resource::WaitPolicy;
use crate::{Error, Result};

/// Engine settings, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub api_key: String,
    pub api_url: String,
    pub wait: WaitPolicy,
}

impl EngineConfig {
    /// Create from env vars (a `.env` file is honoured):
    ///
    /// - `TYPESENSE_CLOUD_MANAGEMENT_API_KEY` (required)
    /// - `TYPESENSE_CLOUD_API_URL` (default: the public control plane)
    /// - `TYPESENSE_POLL_INTERVAL_SECS` (default: `8`)
    /// - `TYPESENSE_MAX_POLLS` (default: `225`, at least `1`)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("TYPESENSE_CLOUD_MANAGEMENT_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::MissingEnv("TYPESENSE_CLOUD_MANAGEMENT_API_KEY".into()))?;

        let api_url = lookup("TYPESENSE_CLOUD_API_URL")
            .unwrap_or_else(|| typesense_cloud_api::DEFAULT_BASE_URL.into());

        let defaults = WaitPolicy::default();

        let interval = match lookup("TYPESENSE_POLL_INTERVAL_SECS") {
            Some(raw) => Duration::from_secs(parse_number(&raw, "TYPESENSE_POLL_INTERVAL_SECS")?),
            None => defaults.interval,
        };

        let max_polls = match lookup("TYPESENSE_MAX_POLLS") {
            Some(raw) => parse_number(&raw, "TYPESENSE_MAX_POLLS")?,
            None => defaults.max_polls,
        };
        if max_polls == 0 {
            return Err(Error::InvalidConfig("TYPESENSE_MAX_POLLS must be at least 1".into()));
        }

        Ok(Self {
            api_key,
            api_url,
            wait: WaitPolicy { interval, max_polls },
        })
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, key: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("{key} must be a non-negative integer, got {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[("TYPESENSE_CLOUD_MANAGEMENT_API_KEY", "k")])).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.api_url, typesense_cloud_api::DEFAULT_BASE_URL);
        assert_eq!(config.wait.interval, Duration::from_secs(8));
        assert_eq!(config.wait.max_polls, 225);
    }

    #[test]
    fn test_missing_api_key() {
        let err = EngineConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, Error::MissingEnv(ref key) if key == "TYPESENSE_CLOUD_MANAGEMENT_API_KEY"));

        let err = EngineConfig::from_lookup(lookup(&[("TYPESENSE_CLOUD_MANAGEMENT_API_KEY", "")])).unwrap_err();
        assert!(matches!(err, Error::MissingEnv(_)));
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("TYPESENSE_CLOUD_MANAGEMENT_API_KEY", "k"),
            ("TYPESENSE_CLOUD_API_URL", "http://127.0.0.1:9000"),
            ("TYPESENSE_POLL_INTERVAL_SECS", "2"),
            ("TYPESENSE_MAX_POLLS", " 10 "),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "http://127.0.0.1:9000");
        assert_eq!(config.wait.interval, Duration::from_secs(2));
        assert_eq!(config.wait.max_polls, 10);
    }

    #[test]
    fn test_invalid_numbers() {
        let err = EngineConfig::from_lookup(lookup(&[
            ("TYPESENSE_CLOUD_MANAGEMENT_API_KEY", "k"),
            ("TYPESENSE_POLL_INTERVAL_SECS", "-1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = EngineConfig::from_lookup(lookup(&[
            ("TYPESENSE_CLOUD_MANAGEMENT_API_KEY", "k"),
            ("TYPESENSE_MAX_POLLS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
