//! Geolocation client for the ip-api.com JSON endpoint.

use reqwest::{Client, Url};
use std::time::Duration;

use crate::constants::USER_AGENT;
use crate::error::{LookupError, StartupError};
use crate::fetch::make_request;
use crate::models::{IpApiResponse, LocationData};

const SUCCESS: &str = "success";

/// Resolves an IP address to an approximate location
#[derive(Debug, Clone)]
pub struct GeoClient {
    client: Client,
    base_url: Url,
}

impl GeoClient {
    /// `timeout` bounds every lookup on its own, independent of the caller's deadline.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StartupError> {
        let invalid = || StartupError::InvalidValue {
            key: "GEO_API_BASE",
            value: base_url.to_string(),
        };
        let base_url = Url::parse(base_url).map_err(|_| invalid())?;
        if base_url.cannot_be_a_base() {
            return Err(invalid());
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// `{base}/json/{ip}`, with `ip` encoded as a single path segment
    fn location_url(&self, ip: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("json").push(ip);
        }
        url
    }

    /// Looks up `ip`. An empty `ip` asks the service about the caller's own address.
    pub async fn resolve_location(&self, ip: &str) -> Result<LocationData, LookupError> {
        let url = self.location_url(ip);
        tracing::debug!("Requesting location from {}", url);

        let resp = make_request::<IpApiResponse, _>(&self.client, url).await?;

        if resp.status != SUCCESS {
            let message = resp
                .message
                .unwrap_or_else(|| format!("status {:?}", resp.status));
            return Err(LookupError::Upstream(message));
        }

        Ok(LocationData::from(resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> GeoClient {
        GeoClient::new(base, Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_location_url() {
        let geo = client("http://ip-api.com");
        assert_eq!(
            geo.location_url("24.48.0.1").as_str(),
            "http://ip-api.com/json/24.48.0.1"
        );
        assert_eq!(
            geo.location_url("2001:db8::1").as_str(),
            "http://ip-api.com/json/2001:db8::1"
        );
        assert_eq!(geo.location_url("").as_str(), "http://ip-api.com/json/");
    }

    #[test]
    fn test_location_url_keeps_base_path() {
        let geo = client("http://localhost:8081/geo/");
        assert_eq!(
            geo.location_url("8.8.8.8").as_str(),
            "http://localhost:8081/geo/json/8.8.8.8"
        );
    }

    #[test]
    fn test_location_url_encodes_hostile_input() {
        let geo = client("http://ip-api.com");
        let url = geo.location_url("../batch?fields=all#x");

        assert_eq!(url.path(), "/json/..%2Fbatch%3Ffields=all%23x");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            GeoClient::new("not a url", Duration::from_secs(2)),
            Err(StartupError::InvalidValue { key: "GEO_API_BASE", .. })
        ));
        assert!(matches!(
            GeoClient::new("mailto:geo@example.com", Duration::from_secs(2)),
            Err(StartupError::InvalidValue { .. })
        ));
    }
}
