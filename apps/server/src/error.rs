// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types and handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roomscan_processing::Error as ScanError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Session limit reached: at most {max} sessions")]
    TooManySessions { max: usize },

    #[error("Sensor feed for this session is closed")]
    FeedClosed,

    #[error("Rendering is not configured on this server")]
    RenderUnavailable,

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Join error")]
    Join(#[from] tokio::task::JoinError),
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Scan(err) => match err {
                ScanError::UnsupportedDevice => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "UNSUPPORTED_DEVICE")
                }
                ScanError::SensorUnavailable { .. } => {
                    (StatusCode::SERVICE_UNAVAILABLE, "SENSOR_UNAVAILABLE")
                }
                ScanError::AlreadyScanning => (StatusCode::CONFLICT, "ALREADY_SCANNING"),
                ScanError::NotScanning => (StatusCode::CONFLICT, "NOT_SCANNING"),
                ScanError::AlreadyStopped => (StatusCode::CONFLICT, "ALREADY_STOPPED"),
                ScanError::SessionFinished => (StatusCode::CONFLICT, "SESSION_FINISHED"),
                ScanError::InvalidConfig(_) | ScanError::InvalidSetting { .. } => {
                    (StatusCode::BAD_REQUEST, "INVALID_CONFIG")
                }
                ScanError::EmptyRenderRequest => (StatusCode::BAD_REQUEST, "EMPTY_RENDER_REQUEST"),
                ScanError::Export(_) => (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_ERROR"),
            },
            ApiError::TooManySessions { .. } => (StatusCode::TOO_MANY_REQUESTS, "TOO_MANY_SESSIONS"),
            ApiError::FeedClosed => (StatusCode::GONE, "FEED_CLOSED"),
            ApiError::RenderUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "RENDER_UNAVAILABLE"),
            ApiError::Cache(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CACHE_ERROR"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Join(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TASK_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code, "Request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<cacache::Error> for ApiError {
    fn from(err: cacache::Error) -> Self {
        ApiError::Cache(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(format!("JSON error: {}", err))
    }
}
