// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Render submission endpoint.

use crate::error::ApiError;
use crate::types::RenderResponse;
use crate::AppState;
use axum::{extract::State, Json};
use roomscan_processing::{RenderOutcome, RenderRequest};

/// POST /api/v1/render - Forward media to the render service.
pub async fn submit(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, ApiError> {
    request.validate()?;
    let service = state.render.clone().ok_or(ApiError::RenderUnavailable)?;
    let process_type = request.kind.process_type().to_string();

    let outcome = service.submit(request).await;
    let status = outcome.status();
    tracing::info!(process_type = %process_type, status = ?status, "Render finished");

    let error = match &outcome {
        RenderOutcome::Failed(reason) => Some(reason.clone()),
        _ => None,
    };

    Ok(Json(RenderResponse {
        status,
        process_type,
        images: outcome.images().to_vec(),
        error,
    }))
}
