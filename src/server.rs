//! HTTP surface: the enriched index page, static assets and a health check.

use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{RenderError, StartupError};
use crate::service::Enricher;
use crate::template::Template;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub enricher: Arc<Enricher>,
    pub template_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(enricher: Enricher, template_path: impl Into<PathBuf>) -> Self {
        Self {
            enricher: Arc::new(enricher),
            template_path: Arc::new(template_path.into()),
        }
    }
}

/// GET / - Render the page for the calling visitor
async fn index(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let view = state.enricher.enrich(&headers, &peer.to_string()).await;

    let rendered = Template::load(state.template_path.as_path())
        .await
        .and_then(|template| template.render(&view));

    match rendered {
        Ok(body) => Html(body).into_response(),
        Err(e) => render_failure(e),
    }
}

fn render_failure(err: RenderError) -> Response {
    let message = if err.is_parse() {
        "Template parsing error"
    } else {
        "Template executing error"
    };
    tracing::error!(error = %err, "{}", message);
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}

/// GET /health - Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// Create the HTTP router
pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves `app` on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
}

/// Run the HTTP server
pub async fn run_http_server(config: &Config) -> anyhow::Result<()> {
    let enricher = Enricher::new(config)?;
    let state = AppState::new(enricher, config.template_path.clone());
    let app = create_router(state, &config.static_dir);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("Server running at: http://localhost:{}", config.port);

    serve(listener, app, shutdown_signal()).await?;
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
