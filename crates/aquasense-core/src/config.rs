//! Configuration types for the AquaSense client.
//!
//! Settings come from three layers: built-in defaults, an optional
//! `config.toml` in the data directory, and environment variables.

use crate::alerts::{DEFAULT_DAILY_QUOTA, DEFAULT_USED_TODAY};
use crate::error::{AquaError, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Default base URL of the prediction service.
pub const DEFAULT_PREDICTION_URL: &str = "http://localhost:8000";

/// Backend API base used in development.
pub const DEVELOPMENT_BACKEND_URL: &str = "http://localhost:5000/api";

/// Backend host used outside development when none is configured.
pub const PRODUCTION_BACKEND_HOST: &str = "https://aqua-ppr5.onrender.com";

/// Environment variable selecting the deployment mode.
pub const ENV_MODE: &str = "AQUASENSE_ENV";

/// Environment variable naming the backend host (without `/api`).
pub const ENV_BACKEND_URL: &str = "AQUASENSE_BACKEND_URL";

/// Environment variable naming the prediction service base URL.
pub const ENV_PREDICTION_URL: &str = "AQUASENSE_PREDICTION_URL";

/// Main AquaSense configuration.
#[derive(Debug, Clone)]
pub struct AquaConfig {
    /// Directory holding client storage and configuration.
    pub data_dir: PathBuf,

    /// Path to the configuration file (`<data_dir>/config.toml`).
    pub config_file: PathBuf,

    /// Path to the client storage file (`<data_dir>/storage.json`).
    pub storage_file: PathBuf,

    /// Directory with view template overrides, if any.
    pub views_dir: Option<PathBuf>,

    /// Remote endpoints.
    pub endpoints: EndpointConfig,

    /// HTTP client settings.
    pub http: HttpConfig,

    /// Dashboard alert widget settings.
    pub alerts: AlertConfig,
}

impl AquaConfig {
    /// Creates a configuration with defaults rooted at `data_dir`.
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            config_file: data_dir.join("config.toml"),
            storage_file: data_dir.join("storage.json"),
            views_dir: None,
            data_dir,
            endpoints: EndpointConfig::default(),
            http: HttpConfig::default(),
            alerts: AlertConfig::default(),
        }
    }

    /// Loads `<data_dir>/config.toml` on top of the defaults.
    ///
    /// A missing file yields the defaults. Paths derived from `data_dir` are
    /// never taken from the file.
    ///
    /// # Errors
    ///
    /// Returns `AquaError::ConfigParseError` if the file is not valid TOML or
    /// has fields of the wrong type, and `AquaError::InvalidConfig` if a
    /// value is out of range.
    pub fn load(data_dir: PathBuf) -> Result<Self> {
        let mut config = Self::new(data_dir);
        if !config.config_file.exists() {
            tracing::debug!(path = %config.config_file.display(), "no config file, using defaults");
            return Ok(config);
        }

        let raw = std::fs::read_to_string(&config.config_file)?;
        let file: FileConfig =
            toml::from_str(&raw).map_err(|e| AquaError::ConfigParseError(e.to_string()))?;

        if let Some(endpoints) = file.endpoints {
            if let Some(url) = endpoints.prediction_url {
                config.endpoints.prediction_url = trim_url(&url);
            }
            if let Some(url) = endpoints.backend_url {
                config.endpoints.backend_url = trim_url(&url);
            }
        }
        if let Some(http) = file.http {
            if let Some(secs) = http.request_timeout_secs {
                config.http.request_timeout_secs = secs;
            }
            if let Some(secs) = http.connect_timeout_secs {
                config.http.connect_timeout_secs = secs;
            }
        }
        if let Some(alerts) = file.alerts {
            if let Some(quota) = alerts.daily_quota {
                config.alerts.daily_quota = quota;
            }
            if let Some(used) = alerts.used_today {
                config.alerts.used_today = used;
            }
        }
        if let Some(dir) = file.views_dir {
            config.views_dir = Some(config.data_dir.join(dir));
        }

        config.validate()?;
        Ok(config)
    }

    /// Applies environment overrides using `lookup` to read variables.
    ///
    /// `AQUASENSE_ENV` defaults to `development`, which pins the backend to
    /// `http://localhost:5000/api`. In any other mode the backend is
    /// `AQUASENSE_BACKEND_URL` (or the hosted default) with `/api` appended.
    /// Without any of these variables set the configuration is unchanged.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mode = lookup(ENV_MODE);
        let backend_host = lookup(ENV_BACKEND_URL);

        match mode.as_deref() {
            Some(mode) if mode != "development" => {
                let host = backend_host.unwrap_or_else(|| PRODUCTION_BACKEND_HOST.to_string());
                self.endpoints.backend_url = format!("{}/api", trim_url(&host));
            }
            Some(_) => self.endpoints.backend_url = DEVELOPMENT_BACKEND_URL.to_string(),
            None => {}
        }

        if let Some(url) = lookup(ENV_PREDICTION_URL) {
            self.endpoints.prediction_url = trim_url(&url);
        }

        self
    }

    fn validate(&self) -> Result<()> {
        if self.endpoints.prediction_url.is_empty() || self.endpoints.backend_url.is_empty() {
            return Err(AquaError::InvalidConfig("endpoint URLs must not be empty".into()));
        }
        if self.http.request_timeout_secs == 0 {
            return Err(AquaError::InvalidConfig(
                "http.request_timeout_secs must be positive".into(),
            ));
        }
        if !(self.alerts.daily_quota.is_finite() && self.alerts.daily_quota > 0.0) {
            return Err(AquaError::InvalidConfig(format!(
                "alerts.daily_quota must be positive, got {}",
                self.alerts.daily_quota
            )));
        }
        Ok(())
    }
}

/// Remote endpoints used by the questionnaire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Prediction service base URL; `/predict` is appended.
    pub prediction_url: String,

    /// Backend API base URL (including `/api`); `/predictions` is appended.
    pub backend_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            prediction_url: DEFAULT_PREDICTION_URL.to_string(),
            backend_url: DEVELOPMENT_BACKEND_URL.to_string(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Alert widget settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertConfig {
    /// Daily quota in litres.
    pub daily_quota: f64,

    /// Litres used today, until a live reading exists.
    pub used_today: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            daily_quota: DEFAULT_DAILY_QUOTA,
            used_today: DEFAULT_USED_TODAY,
        }
    }
}

/// On-disk shape of `config.toml`; every field is optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    endpoints: Option<FileEndpoints>,
    http: Option<FileHttp>,
    alerts: Option<FileAlerts>,
    views_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct FileEndpoints {
    prediction_url: Option<String>,
    backend_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileHttp {
    request_timeout_secs: Option<u64>,
    connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct FileAlerts {
    daily_quota: Option<f64>,
    used_today: Option<f64>,
}

fn trim_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_derive_paths_from_data_dir() {
        let config = AquaConfig::new(PathBuf::from("/data"));
        assert_eq!(config.config_file, PathBuf::from("/data/config.toml"));
        assert_eq!(config.storage_file, PathBuf::from("/data/storage.json"));
        assert_eq!(config.endpoints.prediction_url, "http://localhost:8000");
        assert_eq!(config.endpoints.backend_url, "http://localhost:5000/api");
    }

    #[test]
    fn test_no_env_keeps_config() {
        let config = AquaConfig::new(PathBuf::from("/data")).with_env_overrides(env(&[]));
        assert_eq!(config.endpoints, EndpointConfig::default());
    }

    #[test]
    fn test_production_uses_hosted_backend() {
        let config = AquaConfig::new(PathBuf::from("/data"))
            .with_env_overrides(env(&[(ENV_MODE, "production")]));
        assert_eq!(
            config.endpoints.backend_url,
            "https://aqua-ppr5.onrender.com/api"
        );
    }

    #[test]
    fn test_production_honours_backend_override() {
        let config = AquaConfig::new(PathBuf::from("/data")).with_env_overrides(env(&[
            (ENV_MODE, "production"),
            (ENV_BACKEND_URL, "https://water.example.org/"),
            (ENV_PREDICTION_URL, "https://ml.example.org/"),
        ]));
        assert_eq!(config.endpoints.backend_url, "https://water.example.org/api");
        assert_eq!(config.endpoints.prediction_url, "https://ml.example.org");
    }

    #[test]
    fn test_development_ignores_backend_override() {
        let mut config = AquaConfig::new(PathBuf::from("/data"));
        config.endpoints.backend_url = "http://elsewhere/api".into();
        let config = config.with_env_overrides(env(&[
            (ENV_MODE, "development"),
            (ENV_BACKEND_URL, "https://water.example.org"),
        ]));
        assert_eq!(config.endpoints.backend_url, DEVELOPMENT_BACKEND_URL);
    }
}
