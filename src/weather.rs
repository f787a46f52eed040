//! Current-conditions clients. Open-Meteo is the default; the keyed OpenWeather
//! One Call API is kept as a drop-in alternative selected by configuration.

use reqwest::Client;

use crate::config::{Config, WeatherProvider};
use crate::constants::{OPEN_METEO_CURRENT_FIELDS, USER_AGENT};
use crate::error::{LookupError, StartupError};
use crate::fetch::make_request;
use crate::formatters::{describe_weather_code, format_coordinate};
use crate::models::{OpenMeteoResponse, OpenWeatherResponse, WeatherData};

/// Weather lookup backed by one of the supported providers
#[derive(Debug, Clone)]
pub enum WeatherClient {
    OpenMeteo(OpenMeteoClient),
    OpenWeather(OpenWeatherClient),
}

impl WeatherClient {
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let client = match config.weather_provider {
            WeatherProvider::OpenMeteo => {
                Self::OpenMeteo(OpenMeteoClient::new(&config.open_meteo_api_base)?)
            }
            WeatherProvider::OpenWeather => {
                let api_key = config
                    .openweather_api_key
                    .clone()
                    .ok_or(StartupError::MissingApiKey)?;
                Self::OpenWeather(OpenWeatherClient::new(
                    &config.openweather_api_base,
                    api_key,
                )?)
            }
        };
        Ok(client)
    }

    /// Fetches current conditions at the given coordinates
    pub async fn resolve_weather(&self, lat: f64, lon: f64) -> Result<WeatherData, LookupError> {
        match self {
            Self::OpenMeteo(client) => client.resolve_weather(lat, lon).await,
            Self::OpenWeather(client) => client.resolve_weather(lat, lon).await,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(base_url: &str) -> Result<Self, StartupError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn forecast_url(&self, lat: f64, lon: f64) -> String {
        format!(
            "{}/v1/forecast?latitude={}&longitude={}&current={}&timezone=auto",
            self.base_url,
            format_coordinate(lat),
            format_coordinate(lon),
            OPEN_METEO_CURRENT_FIELDS
        )
    }

    pub async fn resolve_weather(&self, lat: f64, lon: f64) -> Result<WeatherData, LookupError> {
        let url = self.forecast_url(lat, lon);
        tracing::debug!("Requesting Open-Meteo conditions from {}", url);

        let resp = make_request::<OpenMeteoResponse, _>(&self.client, &url).await?;
        let current = resp.current;

        Ok(WeatherData {
            temperature: current.temperature,
            humidity: current.relative_humidity,
            wind_speed: None,
            code: current.weathercode,
            description: describe_weather_code(current.weathercode).to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(base_url: &str, api_key: String) -> Result<Self, StartupError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn onecall_url(&self, lat: f64, lon: f64) -> String {
        format!(
            concat!(
                "{}/data/3.0/onecall?lat={}&lon={}",
                "&exclude=minutely,hourly,daily,alerts&appid={}&units=metric"
            ),
            self.base_url,
            format_coordinate(lat),
            format_coordinate(lon),
            self.api_key
        )
    }

    pub async fn resolve_weather(&self, lat: f64, lon: f64) -> Result<WeatherData, LookupError> {
        // The URL carries the API key, so only coordinates are logged
        tracing::debug!("Requesting OpenWeather conditions for {}, {}", lat, lon);

        let url = self.onecall_url(lat, lon);
        let resp = make_request::<OpenWeatherResponse, _>(&self.client, &url).await?;
        let current = resp.current;
        let (code, description) = current
            .weather
            .into_iter()
            .next()
            .map(|condition| (condition.id, condition.description))
            .unwrap_or_default();

        Ok(WeatherData {
            temperature: current.temp,
            humidity: current.humidity,
            wind_speed: current.wind_speed,
            code,
            description,
        })
    }
}
