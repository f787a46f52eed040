//! Process configuration, read once from the environment at startup.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_PORT, GEO_API_BASE, GEO_TIMEOUT, OPENWEATHER_API_BASE, OPEN_METEO_API_BASE,
    REQUEST_TIMEOUT, STATIC_DIR, TEMPLATE_PATH,
};
use crate::error::StartupError;

/// Which weather backend serves current conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeatherProvider {
    #[default]
    OpenMeteo,
    OpenWeather,
}

impl FromStr for WeatherProvider {
    type Err = StartupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open-meteo" | "open_meteo" | "openmeteo" => Ok(Self::OpenMeteo),
            "openweather" | "openweathermap" => Ok(Self::OpenWeather),
            _ => Err(StartupError::UnknownProvider(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = StartupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(StartupError::InvalidValue {
                key: "LOG_FORMAT",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Listen port (`PORT`)
    pub port: u16,

    /// Address looked up in place of a loopback client (`LOCAL_IP`)
    pub local_ip: Option<String>,

    pub weather_provider: WeatherProvider,
    pub openweather_api_key: Option<String>,

    pub static_dir: PathBuf,
    pub template_path: PathBuf,

    /// Deadline shared by both lookups of one request
    pub request_timeout: Duration,
    /// Per-call limit of the geolocation client
    pub geo_timeout: Duration,

    pub geo_api_base: String,
    pub open_meteo_api_base: String,
    pub openweather_api_base: String,

    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            local_ip: None,
            weather_provider: WeatherProvider::default(),
            openweather_api_key: None,
            static_dir: PathBuf::from(STATIC_DIR),
            template_path: PathBuf::from(TEMPLATE_PATH),
            request_timeout: REQUEST_TIMEOUT,
            geo_timeout: GEO_TIMEOUT,
            geo_api_base: GEO_API_BASE.to_string(),
            open_meteo_api_base: OPEN_METEO_API_BASE.to_string(),
            openweather_api_base: OPENWEATHER_API_BASE.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, StartupError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(port) = get("PORT") {
            config.port = parse_value("PORT", &port)?;
        }
        config.local_ip = get("LOCAL_IP").map(|ip| ip.trim().to_string());

        if let Some(provider) = get("WEATHER_PROVIDER") {
            config.weather_provider = provider.parse()?;
        }
        config.openweather_api_key = get("OPENWEATHER_API_KEY");
        if config.weather_provider == WeatherProvider::OpenWeather
            && config.openweather_api_key.is_none()
        {
            return Err(StartupError::MissingApiKey);
        }

        if let Some(dir) = get("STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(path) = get("TEMPLATE_PATH") {
            config.template_path = PathBuf::from(path);
        }

        if let Some(ms) = get("REQUEST_TIMEOUT_MS") {
            config.request_timeout = Duration::from_millis(parse_value("REQUEST_TIMEOUT_MS", &ms)?);
        }
        if let Some(ms) = get("GEO_TIMEOUT_MS") {
            config.geo_timeout = Duration::from_millis(parse_value("GEO_TIMEOUT_MS", &ms)?);
        }

        if let Some(url) = get("GEO_API_BASE") {
            config.geo_api_base = url;
        }
        if let Some(url) = get("OPEN_METEO_API_BASE") {
            config.open_meteo_api_base = url;
        }
        if let Some(url) = get("OPENWEATHER_API_BASE") {
            config.openweather_api_base = url;
        }

        if let Some(format) = get("LOG_FORMAT") {
            config.log_format = format.parse()?;
        }

        Ok(config)
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, StartupError> {
    value.trim().parse().map_err(|_| StartupError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, StartupError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.local_ip, None);
        assert_eq!(config.weather_provider, WeatherProvider::OpenMeteo);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.geo_timeout, Duration::from_secs(2));
        assert_eq!(config.template_path, PathBuf::from("static/index.html"));
        assert_eq!(config.geo_api_base, "http://ip-api.com");
    }

    #[test]
    fn test_reads_values() {
        let config = config_from(&[
            ("PORT", "3000"),
            ("LOCAL_IP", " 103.21.244.0 "),
            ("REQUEST_TIMEOUT_MS", "1500"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.local_ip.as_deref(), Some("103.21.244.0"));
        assert_eq!(config.request_timeout, Duration::from_millis(1500));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = config_from(&[("PORT", ""), ("LOCAL_IP", "  ")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.local_ip, None);
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, StartupError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn test_openweather_needs_key() {
        let err = config_from(&[("WEATHER_PROVIDER", "openweather")]).unwrap_err();
        assert!(matches!(err, StartupError::MissingApiKey));

        let config = config_from(&[
            ("WEATHER_PROVIDER", "openweather"),
            ("OPENWEATHER_API_KEY", "secret"),
        ])
        .unwrap();
        assert_eq!(config.weather_provider, WeatherProvider::OpenWeather);
        assert_eq!(config.openweather_api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_unknown_provider() {
        let err = config_from(&[("WEATHER_PROVIDER", "darksky")]).unwrap_err();
        assert!(matches!(err, StartupError::UnknownProvider(_)));
    }
}
