// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Depth sensor seam
//!
//! A [`PointSource`] hands out batches of [`Frame`]s whenever the session
//! asks for them. [`FrameQueue`] is the in-memory implementation: any number
//! of [`FrameSender`] handles push frames from other threads (the HTTP server
//! feeds it from request bodies) and the session drains them on each tick.

use crate::error::SourceError;
use roomscan_core::Frame;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// What the device reports about its depth sensor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    pub supported: bool,
    /// Device model name as reported by the platform
    pub device: String,
}

pub trait PointSource: Send {
    fn capability(&self) -> Capability;

    fn is_scan_supported(&self) -> bool {
        self.capability().supported
    }

    /// Open the sensor. Called once per scan.
    fn acquire(&mut self) -> Result<(), SourceError>;

    /// Frames captured since the last poll, oldest first. An error means the
    /// sensor is gone and no more frames will arrive.
    fn poll_frames(&mut self) -> Result<Vec<Frame>, SourceError>;

    /// Close the sensor. Safe to call more than once. Frames captured before
    /// the release can still be polled; nothing captured after it is kept.
    fn release(&mut self);
}

#[derive(Debug, Default)]
struct Shared {
    frames: VecDeque<Frame>,
    lost: Option<SourceError>,
    /// Set by `release`, cleared by the next `acquire`
    closed: bool,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory frame feed
#[derive(Debug)]
pub struct FrameQueue {
    shared: Arc<Mutex<Shared>>,
    capability: Capability,
    acquired: bool,
}

/// Producer handle for a [`FrameQueue`]
#[derive(Debug, Clone)]
pub struct FrameSender {
    shared: Arc<Mutex<Shared>>,
}

impl FrameQueue {
    pub fn new(supported: bool, device: impl Into<String>) -> (Self, FrameSender) {
        let shared = Arc::new(Mutex::new(Shared::default()));
        let queue = Self {
            shared: Arc::clone(&shared),
            capability: Capability {
                supported,
                device: device.into(),
            },
            acquired: false,
        };
        (queue, FrameSender { shared })
    }

    /// Frames waiting to be polled
    pub fn pending(&self) -> usize {
        lock(&self.shared).frames.len()
    }

}

impl PointSource for FrameQueue {
    fn capability(&self) -> Capability {
        self.capability.clone()
    }

    fn acquire(&mut self) -> Result<(), SourceError> {
        let mut shared = lock(&self.shared);
        if let Some(lost) = shared.lost.clone() {
            return Err(lost);
        }
        if shared.closed {
            // Leftovers belong to the previous scan
            shared.frames.clear();
            shared.closed = false;
        }
        self.acquired = true;
        Ok(())
    }

    fn poll_frames(&mut self) -> Result<Vec<Frame>, SourceError> {
        let mut shared = lock(&self.shared);
        if !self.acquired && !shared.closed {
            return Err(SourceError::Unavailable("sensor not acquired".into()));
        }
        // Frames queued before a loss are still delivered once
        if shared.frames.is_empty() {
            if let Some(lost) = shared.lost.clone() {
                return Err(lost);
            }
        }
        Ok(shared.frames.drain(..).collect())
    }

    fn release(&mut self) {
        self.acquired = false;
        lock(&self.shared).closed = true;
    }
}

impl FrameSender {
    /// Queue a frame. Returns false once the feed has been lost or released.
    pub fn push(&self, frame: Frame) -> bool {
        let mut shared = lock(&self.shared);
        if shared.lost.is_some() || shared.closed {
            return false;
        }
        shared.frames.push_back(frame);
        true
    }

    /// Mark the sensor as gone
    pub fn disconnect(&self) {
        self.fail(SourceError::Disconnected);
    }

    pub fn fail(&self, error: SourceError) {
        let mut shared = lock(&self.shared);
        if shared.lost.is_none() {
            shared.lost = Some(error);
        }
    }
}
