use tracing::Dispatch;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

use crate::config::LogFormat;

const DEFAULT_FILTER: &str = "weather_portfolio=info,tower_http=info";

/// Builds the process logging pipeline without installing it.
///
/// `main` installs the result once; tests keep the no-op default or scope
/// their own dispatcher with `tracing::dispatcher::with_default`.
pub fn dispatch(format: LogFormat) -> Dispatch {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let json = format == LogFormat::Json;

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer));

    Dispatch::new(subscriber)
}

/// Installs [`dispatch`] as the global default, bridging `log` records from
/// dependencies into it. Fails if a global subscriber is already set.
pub fn init(format: LogFormat) -> Result<(), TryInitError> {
    dispatch(format).try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_can_be_scoped() {
        let dispatch = dispatch(LogFormat::Json);
        tracing::dispatcher::with_default(&dispatch, || {
            tracing::info!("scoped log line");
        });
    }

    #[test]
    fn test_text_dispatch_enables_info_by_default() {
        let dispatch = dispatch(LogFormat::Text);
        tracing::dispatcher::with_default(&dispatch, || {
            if std::env::var_os("RUST_LOG").is_none() {
                assert!(tracing::enabled!(target: "weather_portfolio", tracing::Level::INFO));
                assert!(!tracing::enabled!(target: "weather_portfolio", tracing::Level::DEBUG));
            }
        });
    }
}
