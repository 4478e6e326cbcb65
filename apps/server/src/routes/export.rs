// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export download endpoint.

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

/// GET /api/v1/exports/:key - Cached export document.
pub async fn get_export(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    tracing::debug!(key = %key, "Export lookup");

    match state.cache.get_bytes(&key).await? {
        Some(bytes) => {
            tracing::info!(key = %key, size = bytes.len(), "Export HIT");
            let short: String = key.chars().take(12).collect();
            let disposition = format!("attachment; filename=\"room-scan-{short}.json\"");
            Ok((
                [
                    (header::CONTENT_TYPE, "application/json".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response())
        }
        None => {
            tracing::debug!(key = %key, "Export MISS");
            Err(ApiError::NotFound(format!("Export not found: {}", key)))
        }
    }
}
