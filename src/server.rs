//! HTTP exposition
//!
//! Serves a landing page on `/` and runs one collection cycle per request on
//! the telemetry path. Scrapes are serialised so cycles never overlap.

use crate::{
    collector::NetworkdCollector,
    config::ExporterConfig,
    error::ExporterError,
    metrics::{render_text, Measurement},
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

pub struct AppState {
    collector: NetworkdCollector,
    telemetry_path: String,
    scrape_lock: Mutex<()>,
}

impl AppState {
    pub fn new(collector: NetworkdCollector, telemetry_path: impl Into<String>) -> Self {
        Self {
            collector,
            telemetry_path: telemetry_path.into(),
            scrape_lock: Mutex::new(()),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let telemetry_path = state.telemetry_path.clone();
    Router::new()
        .route("/", get(landing_page))
        .route(&telemetry_path, get(metrics))
        .with_state(state)
}

/// Runs one collection cycle and renders it in the text exposition format.
pub async fn scrape_text(state: &AppState) -> Result<String, ExporterError> {
    let _guard = state.scrape_lock.lock().await;
    let mut measurements: Vec<Measurement> = Vec::new();
    state.collector.scrape(&mut measurements).await;
    tracing::debug!("Collected {} measurements", measurements.len());
    render_text(&state.collector.describe(), &measurements)
}

async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match scrape_text(&state).await {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            tracing::error!("Failed to render metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn landing_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(format!(
        "<html>\n<head><title>networkd exporter</title></head>\n<body>\n\
         <h1>networkd exporter</h1>\n\
         <p><a href=\"{path}\">Metrics</a></p>\n\
         </body>\n</html>\n",
        path = state.telemetry_path
    ))
}

/// Binds the listener and serves until Ctrl+C or SIGTERM.
pub async fn serve(config: &ExporterConfig, collector: NetworkdCollector) -> Result<(), ExporterError> {
    let state = Arc::new(AppState::new(collector, config.telemetry_path.as_str()));
    let listener = TcpListener::bind(config.listen_address).await?;
    tracing::info!(
        "Listening on {} (metrics at {})",
        listener.local_addr()?,
        config.telemetry_path
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
