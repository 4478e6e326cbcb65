// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic tick loop for one live session.
//!
//! Ticks run on the blocking pool (clustering is CPU-bound). A late tick is
//! delayed rather than bunched up, so two passes of the same session never
//! overlap. The loop ends as soon as the session stops producing updates, or
//! aborts the session once its client has been idle for too long.

use super::sessions::SessionHandle;
use crate::error::ApiError;
use roomscan_processing::{Error as ScanError, ScanEvent, ScanResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Outcome of one driver step
#[derive(Debug)]
enum Step {
    Continue,
    Done,
}

pub fn spawn_driver(handle: Arc<SessionHandle>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_millis(handle.tick_interval_ms.max(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of `interval` fires immediately; skip it so the first
        // pass sees one interval's worth of frames.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if handle.stop_signal().is_raised() {
                break;
            }
            if handle.is_expired() {
                tracing::warn!(
                    session_id = %handle.id,
                    idle_secs = handle.idle_for().as_secs(),
                    "Aborting abandoned scan session"
                );
                if let Err(e) = abort(Arc::clone(&handle)).await {
                    tracing::debug!(
                        session_id = %handle.id,
                        error = %e,
                        "Abort after idle timeout failed"
                    );
                }
                break;
            }

            let session = Arc::clone(&handle);
            match tokio::task::spawn_blocking(move || tick_once(&session)).await {
                Ok(Step::Continue) => {}
                Ok(Step::Done) => break,
                Err(e) => {
                    tracing::error!(session_id = %handle.id, error = %e, "Tick task failed");
                    break;
                }
            }
        }

        tracing::debug!(session_id = %handle.id, "Driver finished");
    })
}

fn tick_once(handle: &SessionHandle) -> Step {
    let mut session = handle.lock();
    match session.tick() {
        Ok(Some(update)) => {
            tracing::debug!(
                session_id = %handle.id,
                sequence = update.sequence,
                points = update.pass.points.len(),
                buffered = update.buffered_points,
                walls = update.pass.walls.len(),
                furniture = update.pass.furniture.len(),
                "Scan tick"
            );
            handle.publish(update.sequence, ScanEvent::from(&update));
            Step::Continue
        }
        Ok(None) => Step::Done,
        Err(err) => {
            tracing::warn!(session_id = %handle.id, error = %err, "Scan ended by sensor");
            if let Some(partial) = err.partial_result() {
                handle.publish(session.last_sequence() + 1, ScanEvent::from(partial));
            }
            Step::Done
        }
    }
}

/// Finalize a session on the blocking pool and publish its final event.
pub async fn finish(handle: Arc<SessionHandle>) -> Result<ScanResult, ApiError> {
    handle.stop_signal().raise();
    let result = tokio::task::spawn_blocking(move || {
        let mut session = handle.lock();
        let result = session.stop()?;
        handle.publish(session.last_sequence() + 1, ScanEvent::from(&result));
        Ok::<_, ScanError>(result)
    })
    .await??;
    Ok(result)
}

/// Abort a session on the blocking pool and publish a terminal event.
pub async fn abort(handle: Arc<SessionHandle>) -> Result<(), ApiError> {
    handle.stop_signal().raise();
    tokio::task::spawn_blocking(move || {
        let mut session = handle.lock();
        session.abort()?;
        handle.publish(session.last_sequence() + 1, ScanEvent::aborted(0));
        Ok::<_, ScanError>(())
    })
    .await??;
    Ok(())
}
