use serde::Deserialize;
use std::fmt;

#[derive(Deserialize, Clone)]
pub struct Config {
    /// Admin API root; collections live under `{api_url}/admin/`
    pub api_url: String,
    /// Static admin token sent as `X-API-KEY`
    pub api_key: String,
    pub request_timeout_secs: u64,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:9180/apisix".to_string(),
            api_key: "admin".to_string(),
            request_timeout_secs: 10,
            debug: false,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("api_key", &"***")
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("debug", &self.debug)
            .finish()
    }
}

impl Config {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.api_url)
            .map_err(|e| ConfigError::InvalidApiUrl(format!("{}: {}", self.api_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(ConfigError::InvalidApiUrl(self.api_url.clone()));
        }
        if self.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid admin API url: {0}")]
    InvalidApiUrl(String),
    #[error("admin API key is required")]
    MissingApiKey,
}

pub fn load_config() -> anyhow::Result<Config> {
    let api_url = std::env::var("DASHBOARD_API_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:9180/apisix".to_string());

    let api_key = std::env::var("DASHBOARD_API_KEY").unwrap_or_else(|_| "admin".to_string());

    let request_timeout_secs = std::env::var("DASHBOARD_REQUEST_TIMEOUT_SECS")
        .unwrap_or_else(|_| "10".to_string())
        .parse()
        .unwrap_or(10);

    let debug = std::env::var("DEBUG").is_ok();

    Ok(Config {
        api_url,
        api_key,
        request_timeout_secs,
        debug,
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    // Each test owns a distinct variable so parallel test threads don't race.

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.api_url, "http://127.0.0.1:9180/apisix");
        assert_eq!(cfg.api_key, "admin");
        assert_eq!(cfg.request_timeout_secs, 10);
        assert!(!cfg.debug);
    }

    #[test]
    fn test_load_config_with_custom_url() {
        std::env::set_var("DASHBOARD_API_URL", "http://gateway:9180/apisix");
        let cfg = load_config().unwrap();
        assert_eq!(cfg.api_url, "http://gateway:9180/apisix");
        std::env::remove_var("DASHBOARD_API_URL");
    }

    #[test]
    fn test_load_config_with_custom_key() {
        std::env::set_var("DASHBOARD_API_KEY", "edd1c9f034335f136f87ad84b625c8f1");
        let cfg = load_config().unwrap();
        assert_eq!(cfg.api_key, "edd1c9f034335f136f87ad84b625c8f1");
        std::env::remove_var("DASHBOARD_API_KEY");
    }

    #[test]
    fn test_load_config_parse_error_uses_default() {
        std::env::set_var("DASHBOARD_REQUEST_TIMEOUT_SECS", "not_a_number");
        let cfg = load_config().unwrap();
        assert_eq!(cfg.request_timeout_secs, 10); // default
        std::env::remove_var("DASHBOARD_REQUEST_TIMEOUT_SECS");
    }

    #[test]
    fn test_config_debug() {
        let cfg = Config::default();
        let debug_str = format!("{:?}", cfg);
        assert!(debug_str.contains("api_url"));
        assert!(debug_str.contains("9180"));
    }

    #[test]
    fn test_config_debug_redacts_api_key() {
        let cfg = Config {
            api_key: "edd1c9f034335f136f87ad84b625c8f1".to_string(),
            ..Config::default()
        };
        let debug_str = format!("{:?}", cfg);
        assert!(debug_str.contains("api_key: \"***\""));
        assert!(!debug_str.contains("edd1c9f0"));
    }

    #[test]
    fn test_validate_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_url() {
        let cfg = Config {
            api_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidApiUrl(_))));
    }

    #[test]
    fn test_validate_cannot_be_base() {
        let cfg = Config {
            api_url: "mailto:ops@example.com".to_string(),
            ..Config::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidApiUrl(_))));
    }

    #[test]
    fn test_validate_missing_key() {
        let cfg = Config {
            api_key: String::new(),
            ..Config::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::MissingApiKey)));
    }
}
