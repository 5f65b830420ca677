use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Invalid value in an environment variable.
#[derive(Debug, thiserror::Error)]
#[error("{var} must be a valid {expected}, got '{value}'")]
pub struct ConfigError {
    pub var: &'static str,
    pub expected: &'static str,
    pub value: String,
}

/// Dashboard client configuration.
///
/// Endpoints default to the local development services; keys have no
/// default and must be supplied through the environment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the project API, without the `/api` suffix.
    pub api_base_url: String,
    /// Full URL of the report generator endpoint.
    pub report_endpoint: String,
    /// Full URL of the traffic prediction endpoint.
    pub prediction_endpoint: String,
    pub google_maps_api_key: Option<String>,
    /// Appended to every geocoded address, e.g. `", Pasadena, CA"`.
    pub geocode_region_suffix: Option<String>,
    /// Directory holding the local project blob.
    pub local_store_dir: PathBuf,
    pub http_timeout_secs: u64,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                                  |
    /// |-------------------------|------------------------------------------|
    /// | `API_BASE_URL`          | `http://localhost:5000`                  |
    /// | `REPORT_ENDPOINT`       | `http://localhost:8001/generate_report`  |
    /// | `PREDICTION_ENDPOINT`   | `http://localhost:8000/predict`          |
    /// | `GOOGLE_MAPS_API_KEY`   | unset                                    |
    /// | `GEOCODE_REGION_SUFFIX` | unset                                    |
    /// | `LOCAL_STORE_DIR`       | `.`                                      |
    /// | `HTTP_TIMEOUT_SECS`     | `30`                                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = non_empty("API_BASE_URL")
            .unwrap_or_else(|| "http://localhost:5000".into())
            .trim_end_matches('/')
            .to_string();
        let report_endpoint = non_empty("REPORT_ENDPOINT")
            .unwrap_or_else(|| "http://localhost:8001/generate_report".into());
        let prediction_endpoint = non_empty("PREDICTION_ENDPOINT")
            .unwrap_or_else(|| "http://localhost:8000/predict".into());
        let google_maps_api_key = non_empty("GOOGLE_MAPS_API_KEY");
        let geocode_region_suffix = non_empty("GEOCODE_REGION_SUFFIX");
        let local_store_dir = PathBuf::from(non_empty("LOCAL_STORE_DIR").unwrap_or_else(|| ".".into()));
        let http_timeout_secs = parse_or(&lookup, "HTTP_TIMEOUT_SECS", "u64", 30)?;

        Ok(Self {
            api_base_url,
            report_endpoint,
            prediction_endpoint,
            google_maps_api_key,
            geocode_region_suffix,
            local_store_dir,
            http_timeout_secs,
        })
    }

    /// Shared HTTP client with the configured timeout.
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.http_timeout_secs))
            .build()
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError {
            var,
            expected,
            value,
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_point_at_local_services() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.report_endpoint, "http://localhost:8001/generate_report");
        assert_eq!(config.prediction_endpoint, "http://localhost:8000/predict");
        assert!(config.google_maps_api_key.is_none());
        assert!(config.geocode_region_suffix.is_none());
        assert_eq!(config.local_store_dir, PathBuf::from("."));
        assert_eq!(config.http_timeout_secs, 30);
    }

    #[test]
    fn trailing_slash_is_stripped_from_base_url() {
        let config = config_from(&[("API_BASE_URL", "https://city.example/")]).unwrap();
        assert_eq!(config.api_base_url, "https://city.example");
    }

    #[test]
    fn blank_key_counts_as_unset() {
        let config = config_from(&[("GOOGLE_MAPS_API_KEY", "  ")]).unwrap();
        assert!(config.google_maps_api_key.is_none());
    }

    #[test]
    fn http_client_builds_with_timeout() {
        let config = config_from(&[("HTTP_TIMEOUT_SECS", "5")]).unwrap();
        assert_eq!(config.http_timeout_secs, 5);
        assert!(config.http_client().is_ok());
    }

    #[test]
    fn invalid_timeout_is_reported() {
        let err = config_from(&[("HTTP_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert_eq!(err.var, "HTTP_TIMEOUT_SECS");
    }
}
