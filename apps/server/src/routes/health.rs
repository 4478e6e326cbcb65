// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Health check endpoint.

use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub active_sessions: usize,
    pub render_enabled: bool,
}

/// API information response.
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

/// Endpoint information.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// GET /api/v1/health - Health check endpoint.
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "roomscan-server",
        active_sessions: state.sessions.len(),
        render_enabled: state.render.is_some(),
    })
}

/// GET / - API information endpoint.
pub async fn info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: "roomscan-server",
        version: env!("CARGO_PKG_VERSION"),
        description: "Live room scanning: walls, furniture and floor plans from depth frames",
        endpoints: vec![
            EndpointInfo {
                method: "GET",
                path: "/api/v1/health",
                description: "Health check endpoint",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/scans",
                description: "Create and start a scan session",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/scans/:id/frames",
                description: "Push one depth frame",
            },
            EndpointInfo {
                method: "GET",
                path: "/api/v1/scans/:id/events",
                description: "Live scan updates (Server-Sent Events)",
            },
            EndpointInfo {
                method: "GET",
                path: "/api/v1/scans/:id",
                description: "Latest scan snapshot",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/scans/:id/stop",
                description: "Finish the scan and export it",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/scans/:id/abort",
                description: "Cancel the scan and discard its data",
            },
            EndpointInfo {
                method: "GET",
                path: "/api/v1/exports/:key",
                description: "Download a cached scan export",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/v1/render",
                description: "Submit media to the render service",
            },
        ],
    })
}
