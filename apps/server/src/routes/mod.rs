// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP routes.

pub mod export;
pub mod health;
pub mod render;
pub mod scan;

use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

/// All API routes, without transport middleware.
pub fn router(state: AppState) -> Router {
    let frame_limit = state.config.max_frame_size_mb.saturating_mul(1024 * 1024);

    Router::new()
        // Root endpoint - API information
        .route("/", get(health::info))
        // Health check
        .route("/api/v1/health", get(health::check))
        // Scan sessions
        .route("/api/v1/scans", post(scan::create))
        .route("/api/v1/scans/:id", get(scan::get_scan))
        .route(
            "/api/v1/scans/:id/frames",
            post(scan::push_frame).layer(DefaultBodyLimit::max(frame_limit)),
        )
        .route("/api/v1/scans/:id/events", get(scan::events))
        .route("/api/v1/scans/:id/stop", post(scan::stop))
        .route("/api/v1/scans/:id/abort", post(scan::abort))
        // Exports
        .route("/api/v1/exports/:key", get(export::get_export))
        // Rendering
        .route("/api/v1/render", post(render::submit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::services::{DiskCache, SessionRegistry};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use roomscan_core::{Frame, Point3D};
    use roomscan_processing::{RenderOutcome, RenderRequest, RenderService};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FakeRenderer;

    impl RenderService for FakeRenderer {
        fn submit(&self, request: RenderRequest) -> BoxFuture<'_, RenderOutcome> {
            async move {
                RenderOutcome::from_images(
                    request
                        .media_urls
                        .iter()
                        .map(|u| format!("{u}.rendered.png"))
                        .collect(),
                )
            }
            .boxed()
        }
    }

    fn test_config(cache_dir: &str) -> Config {
        Config {
            port: 0,
            cache_dir: cache_dir.to_string(),
            max_frame_size_mb: 1,
            request_timeout_secs: 5,
            worker_threads: 1,
            // long enough that no tick runs during a test
            tick_interval_ms: 60_000,
            max_tick_points: 1000,
            max_sessions: 4,
            session_idle_timeout_secs: 300,
            render_service_url: None,
            json_logs: false,
            cors_origins: vec!["*".to_string()],
        }
    }

    fn temp_cache_dir() -> String {
        std::env::temp_dir()
            .join(format!("roomscan-routes-{}", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .into_owned()
    }

    async fn test_app(render: bool) -> Router {
        app_with(test_config(&temp_cache_dir()), render).await
    }

    async fn app_with(config: Config, render: bool) -> Router {
        let state = AppState {
            cache: Arc::new(DiskCache::new(&config.cache_dir).await),
            sessions: Arc::new(SessionRegistry::new(config.max_sessions)),
            render: if render {
                Some(Arc::new(FakeRenderer) as Arc<dyn RenderService>)
            } else {
                None
            },
            config: Arc::new(config),
        };
        router(state)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn wall_patch(cx: f32) -> Vec<Point3D> {
        (0..75)
            .map(|i| {
                let col = (i % 9) as f32 - 4.0;
                let row = (i / 9) as f32 - 4.0;
                Point3D::new(cx + col * 0.008, 2.0 + row * 0.008, 0.0)
            })
            .collect()
    }

    fn frame_json(points: &[Point3D]) -> Value {
        serde_json::to_value(Frame::from_points(points, 0.0)).unwrap()
    }

    async fn create_scan(app: &Router) -> String {
        let response = send(app, "POST", "/api/v1/scans", Some(json!({"device": "iPhone"}))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["status"], "scanning");
        assert_eq!(body["capability"]["device"], "iPhone");
        body["sessionId"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_reports_sessions() {
        let app = test_app(false).await;
        let response = send(&app, "GET", "/api/v1/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["activeSessions"], 0);
        assert_eq!(body["renderEnabled"], false);
    }

    #[tokio::test]
    async fn oversized_frame_limit_saturates() {
        let config = Config {
            max_frame_size_mb: usize::MAX,
            ..test_config(&temp_cache_dir())
        };
        let app = app_with(config, false).await;
        let id = create_scan(&app).await;
        let response = send(
            &app,
            "POST",
            &format!("/api/v1/scans/{id}/frames"),
            Some(frame_json(&wall_patch(0.0))),
        )
        .await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn scan_lifecycle_with_export() {
        let app = test_app(false).await;
        let id = create_scan(&app).await;

        for cx in [0.0, 4.0] {
            let response = send(
                &app,
                "POST",
                &format!("/api/v1/scans/{id}/frames"),
                Some(frame_json(&wall_patch(cx))),
            )
            .await;
            assert_eq!(response.status(), StatusCode::ACCEPTED);
            assert_eq!(json_body(response).await["points"], 75);
        }

        let response = send(&app, "POST", &format!("/api/v1/scans/{id}/stop"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["result"]["status"], "completed");
        assert_eq!(body["result"]["pointCount"], 150);
        assert_eq!(body["result"]["roomLayout"]["wallCount"], 2);
        let key = body["exportKey"].as_str().unwrap().to_string();

        let response = send(&app, "GET", &format!("/api/v1/exports/{key}"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let export = json_body(response).await;
        assert_eq!(export["metadata"]["pointCount"], 150);
        assert_eq!(export["points"].as_array().unwrap().len(), 450);

        let response = send(&app, "GET", &format!("/api/v1/scans/{id}"), None).await;
        let snapshot = json_body(response).await;
        assert_eq!(snapshot["status"], "completed");
        assert_eq!(snapshot["exportKey"], key.as_str());

        // terminal now
        let response = send(&app, "POST", &format!("/api/v1/scans/{id}/stop"), None).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(response).await["code"], "ALREADY_STOPPED");

        let response = send(
            &app,
            "POST",
            &format!("/api/v1/scans/{id}/frames"),
            Some(frame_json(&wall_patch(0.0))),
        )
        .await;
        assert_eq!(response.status(), StatusCode::GONE);
    }

    #[tokio::test]
    async fn events_replay_final_result() {
        let app = test_app(false).await;
        let id = create_scan(&app).await;
        send(
            &app,
            "POST",
            &format!("/api/v1/scans/{id}/frames"),
            Some(frame_json(&wall_patch(0.0))),
        )
        .await;
        send(&app, "POST", &format!("/api/v1/scans/{id}/stop"), None).await;

        let response = send(&app, "GET", &format!("/api/v1/scans/{id}/events"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("event: scan"));
        assert!(text.contains("\"status\":\"completed\""));
    }

    #[tokio::test]
    async fn abort_ends_session() {
        let app = test_app(false).await;
        let id = create_scan(&app).await;
        let response = send(&app, "POST", &format!("/api/v1/scans/{id}/abort"), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, "GET", &format!("/api/v1/scans/{id}"), None).await;
        assert_eq!(json_body(response).await["status"], "stopped");

        let response = send(&app, "POST", &format!("/api/v1/scans/{id}/stop"), None).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(response).await["code"], "NOT_SCANNING");
    }

    #[tokio::test]
    async fn unsupported_device_is_rejected() {
        let app = test_app(false).await;
        let response = send(&app, "POST", "/api/v1/scans", Some(json!({"supported": false}))).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["code"], "UNSUPPORTED_DEVICE");
    }

    #[tokio::test]
    async fn invalid_session_config_is_bad_request() {
        let app = test_app(false).await;
        let response = send(
            &app,
            "POST",
            "/api/v1/scans",
            Some(json!({"config": {"pipeline": {"wallClusterDistance": 0.0}}})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "INVALID_CONFIG");
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let app = test_app(false).await;
        let id = uuid::Uuid::new_v4();
        let response = send(&app, "GET", &format!("/api/v1/scans/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn render_requires_service_and_media() {
        let app = test_app(false).await;
        let request = json!({"mediaUrls": ["house.jpg"], "type": "exterior"});
        let response = send(&app, "POST", "/api/v1/render", Some(request.clone())).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let app = test_app(true).await;
        let response = send(
            &app,
            "POST",
            "/api/v1/render",
            Some(json!({"mediaUrls": [], "type": "decks"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "EMPTY_RENDER_REQUEST");

        let response = send(&app, "POST", "/api/v1/render", Some(request)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "completed");
        assert_eq!(body["processType"], "exterior-rendering");
        assert_eq!(body["images"][0], "house.jpg.rendered.png");
    }
}
