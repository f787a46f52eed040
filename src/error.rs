use reqwest::StatusCode;

/// Failure to obtain or parse data from the geolocation or weather service.
///
/// Always absorbed by the enrichment pipeline; never reaches the visitor.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("request failed with status: {0}")]
    Status(StatusCode),
    #[error("failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("lookup rejected by upstream: {0}")]
    Upstream(String),
    #[error("request deadline exceeded")]
    DeadlineExceeded(#[from] tokio::time::error::Elapsed),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err)
        } else {
            Self::Transport(err)
        }
    }
}

/// Template load, parse or execution failure. Fatal to the request (HTTP 500).
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to read template: {0}")]
    Io(#[from] std::io::Error),
    #[error("template parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("unknown template field: {0}")]
    UnknownField(String),
    #[error("template field is not printable: {0}")]
    NotPrintable(String),
}

impl RenderError {
    /// Whether the failure happened before execution started
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Parse { .. })
    }
}

/// Invalid configuration or failure to bring the server up. Fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("unknown weather provider: {0:?} (expected \"open-meteo\" or \"openweather\")")]
    UnknownProvider(String),
    #[error("OPENWEATHER_API_KEY must be set when WEATHER_PROVIDER=openweather")]
    MissingApiKey,
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
