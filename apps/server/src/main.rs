// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room Scan Server - live room layout inference over HTTP.
//!
//! Clients open a scan session, push depth frames as they are captured and
//! follow incremental results over Server-Sent Events. Stopping a scan runs a
//! final pass over everything buffered and caches a JSON export.
//!
//! # Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `POST /api/v1/scans` - Create and start a scan session
//! - `POST /api/v1/scans/:id/frames` - Push one depth frame
//! - `GET /api/v1/scans/:id/events` - Live updates (SSE)
//! - `GET /api/v1/scans/:id` - Latest snapshot
//! - `POST /api/v1/scans/:id/stop` - Finish and export
//! - `POST /api/v1/scans/:id/abort` - Cancel and discard
//! - `GET /api/v1/exports/:key` - Retrieve a cached export
//! - `POST /api/v1/render` - Forward media to the render backend

use axum::http::HeaderValue;
use roomscan_processing::RenderService;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod config;
mod error;
mod routes;
mod services;
mod types;

use config::Config;
use services::{DiskCache, HttpRenderService, SessionRegistry};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<DiskCache>,
    pub config: Arc<Config>,
    pub sessions: Arc<SessionRegistry>,
    pub render: Option<Arc<dyn RenderService>>,
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

async fn shutdown_signal(sessions: Arc<SessionRegistry>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down, stopping live sessions");
    sessions.stop_all();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt().with_env_filter(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "info,tower_http=debug,roomscan_server=debug".into()),
    );
    if config.json_logs {
        subscriber.json().init();
    } else {
        subscriber.pretty().init();
    }

    tracing::info!(
        port = config.port,
        cache_dir = %config.cache_dir,
        max_frame_size_mb = config.max_frame_size_mb,
        worker_threads = config.worker_threads,
        tick_interval_ms = config.tick_interval_ms,
        max_sessions = config.max_sessions,
        "Starting Room Scan Server"
    );

    // Clustering passes run on the global rayon pool
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build_global()?;

    let cache = Arc::new(DiskCache::new(&config.cache_dir).await);
    let sessions = Arc::new(SessionRegistry::new(config.max_sessions));

    let render = match &config.render_service_url {
        Some(url) => {
            tracing::info!(endpoint = %url, "Render backend enabled");
            let service = HttpRenderService::new(
                url.clone(),
                Duration::from_secs(config.request_timeout_secs),
            )?;
            Some(Arc::new(service) as Arc<dyn RenderService>)
        }
        None => None,
    };

    let state = AppState {
        cache,
        config: Arc::new(config.clone()),
        sessions: Arc::clone(&sessions),
        render,
    };

    // The timeout covers producing response headers; SSE bodies outlive it
    let app = routes::router(state)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sessions))
        .await?;

    Ok(())
}
