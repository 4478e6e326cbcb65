// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scan session endpoints.

use crate::error::ApiError;
use crate::services::{driver, PublishedEvent, SessionHandle};
use crate::types::{
    CreateScanRequest, CreateScanResponse, FrameAccepted, ScanSnapshotResponse, StopScanResponse,
};
use crate::AppState;
use async_stream::stream;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::Stream;
use roomscan_core::Frame;
use roomscan_processing::{
    ExportDocument, FrameQueue, ScanEvent, ScanSession, ScanStatus, SystemClock,
};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

/// POST /api/v1/scans - Create a session and start scanning.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateScanRequest>,
) -> Result<(StatusCode, Json<CreateScanResponse>), ApiError> {
    let config = request
        .config
        .unwrap_or_else(|| state.config.session_defaults());
    let (queue, sender) = FrameQueue::new(request.supported, request.device);

    let mut session = ScanSession::new(queue, SystemClock, config)?;
    session.start()?;

    let id = Uuid::new_v4();
    let handle = Arc::new(SessionHandle::new(
        id,
        session,
        sender,
        state.config.session_idle_timeout(),
    ));
    state.sessions.insert(Arc::clone(&handle))?;
    driver::spawn_driver(Arc::clone(&handle));

    tracing::info!(
        session_id = %id,
        device = %handle.capability.device,
        tick_interval_ms = handle.tick_interval_ms,
        "Scan session created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateScanResponse {
            session_id: id.to_string(),
            status: ScanStatus::Scanning,
            capability: handle.capability.clone(),
            tick_interval_ms: handle.tick_interval_ms,
            events_url: format!("/api/v1/scans/{id}/events"),
        }),
    ))
}

/// POST /api/v1/scans/:id/frames - Queue one depth frame.
pub async fn push_frame(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(frame): Json<Frame>,
) -> Result<(StatusCode, Json<FrameAccepted>), ApiError> {
    let handle = state.sessions.get(&id)?;
    if handle.is_finished() {
        return Err(ApiError::FeedClosed);
    }
    handle.touch();

    let points = frame.point_count();
    if !handle.sender().push(frame) {
        return Err(ApiError::FeedClosed);
    }
    tracing::trace!(session_id = %id, points, "Frame queued");

    Ok((
        StatusCode::ACCEPTED,
        Json(FrameAccepted {
            session_id: id.to_string(),
            points,
        }),
    ))
}

fn to_sse(published: &PublishedEvent) -> Event {
    match serde_json::to_string(published.event.as_ref()) {
        Ok(json) => Event::default()
            .id(published.sequence.to_string())
            .event("scan")
            .data(json),
        Err(e) => Event::default().event("error").data(e.to_string()),
    }
}

/// GET /api/v1/scans/:id/events - Stream scan updates (SSE).
///
/// Starts with the latest event, if any, then follows live updates until a
/// final event has been sent.
pub async fn events(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let handle = state.sessions.get(&id)?;
    handle.touch();
    // Subscribe before reading `latest` so nothing falls in between
    let mut rx = handle.subscribe();
    let latest = handle.latest();

    let stream = stream! {
        let mut last_sequence = 0;
        let mut done = false;
        if let Some(published) = latest {
            last_sequence = published.sequence;
            done = published.event.status.is_final();
            yield Ok::<_, Infallible>(to_sse(&published));
        }

        while !done {
            match rx.recv().await {
                Ok(published) => {
                    if published.sequence <= last_sequence {
                        continue;
                    }
                    last_sequence = published.sequence;
                    done = published.event.status.is_final();
                    yield Ok::<_, Infallible>(to_sse(&published));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(session_id = %id, skipped, "Slow event subscriber");
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// GET /api/v1/scans/:id - Latest snapshot of a scan.
pub async fn get_scan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScanSnapshotResponse>, ApiError> {
    let handle = state.sessions.get(&id)?;
    let latest = handle.latest();

    Ok(Json(ScanSnapshotResponse {
        session_id: id.to_string(),
        status: latest
            .as_ref()
            .map(|p| p.event.status)
            .unwrap_or(ScanStatus::Scanning),
        sequence: latest.as_ref().map(|p| p.sequence).unwrap_or(0),
        latest: latest.map(|p| p.event.as_ref().clone()),
        export_key: handle.export_key(),
    }))
}

/// POST /api/v1/scans/:id/stop - Finish the scan, cache its export.
pub async fn stop(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StopScanResponse>, ApiError> {
    let handle = state.sessions.get(&id)?;
    let result = driver::finish(Arc::clone(&handle)).await?;

    let document = ExportDocument::from_result(&result);
    let bytes = document.to_json()?;
    let key = state.cache.put(&bytes).await?;
    handle.set_export_key(key.clone());

    tracing::info!(
        session_id = %id,
        points = result.pass.points.len(),
        walls = result.pass.walls.len(),
        furniture = result.pass.furniture.len(),
        export_key = %key,
        "Scan stopped"
    );

    Ok(Json(StopScanResponse {
        session_id: id.to_string(),
        export_url: format!("/api/v1/exports/{key}"),
        export_key: key,
        result: ScanEvent::from(&result),
    }))
}

/// POST /api/v1/scans/:id/abort - Cancel the scan and discard its data.
pub async fn abort(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let handle = state.sessions.get(&id)?;
    driver::abort(handle).await?;
    tracing::info!(session_id = %id, "Scan aborted");
    Ok(StatusCode::NO_CONTENT)
}
