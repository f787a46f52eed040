use std::time::Duration;

/// User agent string for HTTP requests
pub const USER_AGENT: &str = "weather-portfolio/0.1.0";

/// ip-api.com base URL (the free tier is plain HTTP only)
pub const GEO_API_BASE: &str = "http://ip-api.com";

/// Open-Meteo API base URL
pub const OPEN_METEO_API_BASE: &str = "https://api.open-meteo.com";

/// OpenWeather API base URL
pub const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org";

/// Current-conditions variables requested from Open-Meteo
pub const OPEN_METEO_CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,weathercode";

pub const DEFAULT_PORT: u16 = 8080;

/// Geolocation client timeout, applied regardless of the request deadline
pub const GEO_TIMEOUT: Duration = Duration::from_secs(2);

/// Deadline shared by the geolocation and weather calls of one request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

pub const STATIC_DIR: &str = "static";
pub const TEMPLATE_PATH: &str = "static/index.html";

/// Placeholder for every textual field of the sentinel location
pub const UNKNOWN: &str = "Unknown";
