// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory registry of live scan sessions.
//!
//! Each session sits behind its own mutex. Ticks and stop both publish their
//! event while still holding that mutex, so subscribers always see events in
//! sequence order and the final event last.
//!
//! A session that sees no client activity (frame uploads, event
//! subscriptions) for its idle timeout is considered abandoned: its driver
//! aborts it and a full registry evicts it.

use crate::error::ApiError;
use roomscan_processing::{
    Capability, FrameQueue, FrameSender, ScanEvent, ScanSession, StopSignal, SystemClock,
};
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Session type driven by the server
pub type LiveSession = ScanSession<FrameQueue, SystemClock>;

/// Capacity of each session's event channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Event as broadcast to subscribers
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub sequence: u64,
    pub event: Arc<ScanEvent>,
}

/// Everything the server keeps per session
pub struct SessionHandle {
    pub id: Uuid,
    pub capability: Capability,
    pub tick_interval_ms: u64,
    session: Mutex<LiveSession>,
    sender: FrameSender,
    stop: StopSignal,
    events: broadcast::Sender<PublishedEvent>,
    latest: RwLock<Option<PublishedEvent>>,
    export_key: RwLock<Option<String>>,
    finished: AtomicBool,
    created: Instant,
    /// Milliseconds after `created` of the last client activity
    last_activity_ms: AtomicU64,
    idle_timeout: Duration,
}

impl SessionHandle {
    pub fn new(
        id: Uuid,
        session: LiveSession,
        sender: FrameSender,
        idle_timeout: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            id,
            capability: session.capability(),
            tick_interval_ms: session.config().tick_interval_ms,
            stop: session.stop_signal(),
            session: Mutex::new(session),
            sender,
            events,
            latest: RwLock::new(None),
            export_key: RwLock::new(None),
            finished: AtomicBool::new(false),
            created: Instant::now(),
            last_activity_ms: AtomicU64::new(0),
            idle_timeout,
        }
    }

    /// Lock the session. Blocking; call from `spawn_blocking`.
    pub fn lock(&self) -> MutexGuard<'_, LiveSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn sender(&self) -> &FrameSender {
        &self.sender
    }

    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.events.subscribe()
    }

    /// Record and broadcast an event. Call with the session lock held.
    pub fn publish(&self, sequence: u64, event: ScanEvent) {
        let published = PublishedEvent {
            sequence,
            event: Arc::new(event),
        };
        if published.event.status.is_final() {
            self.finished.store(true, Ordering::SeqCst);
        }
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = Some(published.clone());
        // No receivers is fine; late subscribers start from `latest`
        let _ = self.events.send(published);
    }

    pub fn latest(&self) -> Option<PublishedEvent> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_export_key(&self, key: String) {
        *self.export_key.write().unwrap_or_else(PoisonError::into_inner) = Some(key);
    }

    pub fn export_key(&self) -> Option<String> {
        self.export_key
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// A final event has been published
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Record client activity
    pub fn touch(&self) {
        let now = self.created.elapsed().as_millis() as u64;
        self.last_activity_ms.fetch_max(now, Ordering::SeqCst);
    }

    /// Time since the last client activity
    pub fn idle_for(&self) -> Duration {
        let last = Duration::from_millis(self.last_activity_ms.load(Ordering::SeqCst));
        self.created.elapsed().saturating_sub(last)
    }

    /// Still live, but abandoned by its client
    pub fn is_expired(&self) -> bool {
        !self.is_finished() && self.idle_for() >= self.idle_timeout
    }
}

/// All sessions known to this server
pub struct SessionRegistry {
    sessions: RwLock<FxHashMap<Uuid, Arc<SessionHandle>>>,
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(FxHashMap::default()),
            max_sessions,
        }
    }

    /// Register a session, evicting finished and abandoned ones when full.
    ///
    /// Evicted live sessions are left to their driver, which aborts them.
    pub fn insert(&self, handle: Arc<SessionHandle>) -> Result<(), ApiError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        if sessions.len() >= self.max_sessions {
            let before = sessions.len();
            sessions.retain(|_, h| !h.is_finished() && !h.is_expired());
            tracing::debug!(evicted = before - sessions.len(), "Evicted inactive sessions");
        }
        if sessions.len() >= self.max_sessions {
            return Err(ApiError::TooManySessions {
                max: self.max_sessions,
            });
        }
        sessions.insert(handle.id, handle);
        Ok(())
    }

    pub fn get(&self, id: &Uuid) -> Result<Arc<SessionHandle>, ApiError> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Scan session not found: {}", id)))
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Raise the stop signal of every session (used on shutdown).
    pub fn stop_all(&self) {
        for handle in self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
        {
            handle.stop_signal().raise();
        }
    }
}
