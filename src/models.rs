use serde::{Deserialize, Serialize};

use crate::constants::UNKNOWN;

// ============================================================================
// Page Models
// ============================================================================

/// Visitor location as exposed to the page template.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocationData {
    #[serde(rename = "IP")]
    pub ip: String,
    pub status: String,
    pub country: String,
    pub country_code: String,
    pub region: String,
    pub region_name: String,
    pub city: String,
    pub zip: String,
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
    #[serde(rename = "ISP")]
    pub isp: String,
    pub org: String,
    #[serde(rename = "AS")]
    pub as_name: String,
}

impl LocationData {
    /// Sentinel used when geolocation fails; coordinates stay at zero.
    pub fn unknown() -> Self {
        Self {
            country: UNKNOWN.to_string(),
            region_name: UNKNOWN.to_string(),
            timezone: UNKNOWN.to_string(),
            ..Self::default()
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.country == UNKNOWN && self.lat == 0.0 && self.lon == 0.0
    }
}

/// Current conditions as exposed to the page template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WeatherData {
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: Option<u8>,
    pub wind_speed: Option<f64>,
    pub code: i32,
    pub description: String,
}

/// Everything one page render needs. `weather` is `None` when the lookup failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ViewModel {
    pub location: LocationData,
    pub weather: Option<WeatherData>,
}

// ============================================================================
// ip-api.com Models
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IpApiResponse {
    pub query: String,
    pub status: String,
    pub message: Option<String>,
    pub country: String,
    pub country_code: String,
    pub region: String,
    pub region_name: String,
    pub city: String,
    pub zip: String,
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
    pub isp: String,
    pub org: String,
    #[serde(rename = "as")]
    pub as_name: String,
}

impl From<IpApiResponse> for LocationData {
    fn from(resp: IpApiResponse) -> Self {
        Self {
            ip: resp.query,
            status: resp.status,
            country: resp.country,
            country_code: resp.country_code,
            region: resp.region,
            region_name: resp.region_name,
            city: resp.city,
            zip: resp.zip,
            lat: resp.lat,
            lon: resp.lon,
            timezone: resp.timezone,
            isp: resp.isp,
            org: resp.org,
            as_name: resp.as_name,
        }
    }
}

// ============================================================================
// Open-Meteo API Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OpenMeteoResponse {
    pub current: OpenMeteoCurrent,
}

#[derive(Debug, Deserialize)]
pub struct OpenMeteoCurrent {
    #[serde(rename = "temperature_2m")]
    pub temperature: f64,
    #[serde(rename = "relative_humidity_2m", default)]
    pub relative_humidity: Option<u8>,
    #[serde(alias = "weather_code")]
    pub weathercode: i32,
}

// ============================================================================
// OpenWeather One Call API Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OpenWeatherResponse {
    pub current: OpenWeatherCurrent,
}

#[derive(Debug, Deserialize)]
pub struct OpenWeatherCurrent {
    pub temp: f64,
    #[serde(default)]
    pub humidity: Option<u8>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub weather: Vec<OpenWeatherCondition>,
}

#[derive(Debug, Deserialize)]
pub struct OpenWeatherCondition {
    pub id: i32,
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_location_sentinel() {
        let loc = LocationData::unknown();
        assert_eq!(loc.country, "Unknown");
        assert_eq!(loc.region_name, "Unknown");
        assert_eq!(loc.timezone, "Unknown");
        assert_eq!(loc.lat, 0.0);
        assert_eq!(loc.lon, 0.0);
        assert!(loc.city.is_empty());
        assert!(loc.is_unknown());
    }

    #[test]
    fn test_ip_api_payload_maps_to_location() {
        let payload = serde_json::json!({
            "query": "24.48.0.1",
            "status": "success",
            "country": "Canada",
            "countryCode": "CA",
            "region": "QC",
            "regionName": "Quebec",
            "city": "Montreal",
            "zip": "H1K",
            "lat": 45.6085,
            "lon": -73.5493,
            "timezone": "America/Toronto",
            "isp": "Le Groupe Videotron Ltee",
            "org": "Videotron Ltee",
            "as": "AS5769 Videotron Ltee"
        });
        let resp: IpApiResponse = serde_json::from_value(payload).unwrap();
        let loc = LocationData::from(resp);

        assert_eq!(loc.ip, "24.48.0.1");
        assert_eq!(loc.region_name, "Quebec");
        assert_eq!(loc.as_name, "AS5769 Videotron Ltee");
        assert!(!loc.is_unknown());
    }

    #[test]
    fn test_ip_api_failure_payload_decodes() {
        let payload = serde_json::json!({
            "status": "fail",
            "message": "private range",
            "query": "10.0.0.1"
        });
        let resp: IpApiResponse = serde_json::from_value(payload).unwrap();
        assert_eq!(resp.status, "fail");
        assert_eq!(resp.message.as_deref(), Some("private range"));
    }

    #[test]
    fn test_view_model_uses_template_field_names() {
        let view = ViewModel {
            location: LocationData::unknown(),
            weather: None,
        };
        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(value["Location"]["RegionName"], "Unknown");
        assert_eq!(value["Location"]["IP"], "");
        assert!(value["Weather"].is_null());
    }

    #[test]
    fn test_open_meteo_accepts_both_code_spellings() {
        let legacy: OpenMeteoCurrent = serde_json::from_value(serde_json::json!({
            "temperature_2m": 21.3,
            "relative_humidity_2m": 40,
            "weathercode": 2
        }))
        .unwrap();
        let current: OpenMeteoCurrent = serde_json::from_value(serde_json::json!({
            "temperature_2m": 21.3,
            "weather_code": 2
        }))
        .unwrap();

        assert_eq!(legacy.weathercode, 2);
        assert_eq!(legacy.relative_humidity, Some(40));
        assert_eq!(current.weathercode, 2);
        assert_eq!(current.relative_humidity, None);
    }
}
