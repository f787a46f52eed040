use axum::http::HeaderMap;
use std::future::Future;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

use crate::config::Config;
use crate::error::{LookupError, StartupError};
use crate::geo::GeoClient;
use crate::ip::extract_client_ip;
use crate::models::{LocationData, ViewModel};
use crate::weather::WeatherClient;

/// Request-scoped enrichment: client IP → location → weather → view model.
///
/// Both lookups share one deadline. Failures degrade the page content instead
/// of failing the request.
#[derive(Debug, Clone)]
pub struct Enricher {
    geo: GeoClient,
    weather: WeatherClient,
    local_ip: Option<String>,
    request_timeout: Duration,
}

impl Enricher {
    pub fn new(config: &Config) -> Result<Self, StartupError> {
        Ok(Self::with_clients(
            GeoClient::new(&config.geo_api_base, config.geo_timeout)?,
            WeatherClient::from_config(config)?,
            config.local_ip.clone(),
            config.request_timeout,
        ))
    }

    pub fn with_clients(
        geo: GeoClient,
        weather: WeatherClient,
        local_ip: Option<String>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            geo,
            weather,
            local_ip,
            request_timeout,
        }
    }

    /// Enriches an inbound request identified by its headers and peer address
    pub async fn enrich(&self, headers: &HeaderMap, peer: &str) -> ViewModel {
        let ip = extract_client_ip(headers, peer, self.local_ip.as_deref());
        self.enrich_ip(&ip).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn enrich_ip(&self, ip: &str) -> ViewModel {
        tracing::info!("User IP: {}", ip);
        let deadline = Instant::now() + self.request_timeout;

        let location = match within(deadline, self.geo.resolve_location(ip)).await {
            Ok(location) => location,
            Err(e) => {
                tracing::error!(error = %e, "Failed to get location");
                LocationData::unknown()
            }
        };

        // Attempted even with the sentinel's zero coordinates
        let lookup = self.weather.resolve_weather(location.lat, location.lon);
        let weather = match within(deadline, lookup).await {
            Ok(weather) => {
                tracing::info!(
                    description = %weather.description,
                    code = weather.code,
                    "Weather info"
                );
                Some(weather)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to get weather");
                None
            }
        };

        ViewModel { location, weather }
    }
}

/// Runs `fut` until `deadline`; expiry drops it, aborting any in-flight request.
async fn within<T, F>(deadline: Instant, fut: F) -> Result<T, LookupError>
where
    F: Future<Output = Result<T, LookupError>>,
{
    timeout_at(deadline, fut).await?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_within_expired_deadline() {
        let deadline = Instant::now();
        let result: Result<(), LookupError> = within(deadline, std::future::pending()).await;
        assert!(matches!(result, Err(LookupError::DeadlineExceeded(_))));
    }

    #[tokio::test]
    async fn test_within_passes_through_result() {
        let deadline = Instant::now() + Duration::from_secs(1);
        let ok = within(deadline, async { Ok::<_, LookupError>(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err = within(deadline, async {
            Err::<(), _>(LookupError::Upstream("private range".to_string()))
        })
        .await;
        assert!(matches!(err, Err(LookupError::Upstream(_))));
    }
}
