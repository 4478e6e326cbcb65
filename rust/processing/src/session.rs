// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scan session state machine
//!
//! ```text
//!          start()            stop()
//!   Idle ----------> Scanning -------> Stopped
//!     ^                  |
//!     +---- abort() -----+
//! ```
//!
//! The session is synchronous. A driver (the server's tokio task, a test, a
//! native shell) calls [`ScanSession::tick`] periodically and
//! [`ScanSession::stop`] once. Ticks and stop take `&mut self`, so a driver
//! that shares the session behind a mutex gets them serialized for free: an
//! in-flight tick always completes and is reported before stop runs.

use crate::buffer::PointBuffer;
use crate::clock::Clock;
use crate::config::SessionConfig;
use crate::decimate::{decimate, effective_stride};
use crate::error::{Error, Result, SourceError};
use crate::event::ScanStatus;
use crate::pipeline::{PassOutput, Pipeline};
use crate::source::{Capability, PointSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Scanning,
    Stopped,
}

/// Cross-thread stop request
///
/// Raising the signal prevents any further tick from running. The driver
/// still has to call [`ScanSession::stop`] to produce the final result.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Result of one incremental pass over a decimated snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct ScanUpdate {
    /// Strictly increasing within a scan, starting at 1
    pub sequence: u64,
    /// Buffer version the snapshot was taken at
    pub buffer_version: u64,
    /// Points accumulated when the snapshot was taken (before decimation)
    pub buffered_points: usize,
    /// Milliseconds since `start()`
    pub scan_time_millis: u64,
    pub status: ScanStatus,
    pub pass: PassOutput,
}

/// Result of a pass over the full buffer, produced once per scan
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub buffer_version: u64,
    /// Milliseconds since `start()`
    pub scan_time_millis: u64,
    /// Clock time the result was produced, milliseconds since the Unix epoch
    pub completed_at_millis: u64,
    /// `Completed` after `stop()`, `Stopped` when salvaged after sensor loss
    pub status: ScanStatus,
    pub pass: PassOutput,
}

/// One scan over one sensor feed
pub struct ScanSession<S: PointSource, C: Clock> {
    source: S,
    clock: C,
    config: SessionConfig,
    pipeline: Pipeline,
    state: SessionState,
    buffer: PointBuffer,
    sequence: u64,
    started_at: u64,
    stop_signal: StopSignal,
}

impl<S: PointSource, C: Clock> ScanSession<S, C> {
    pub fn new(source: S, clock: C, config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let pipeline = Pipeline::new(&config.pipeline)?;
        Ok(Self {
            source,
            clock,
            config,
            pipeline,
            state: SessionState::Idle,
            buffer: PointBuffer::new(),
            sequence: 0,
            started_at: 0,
            stop_signal: StopSignal::default(),
        })
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn capability(&self) -> Capability {
        self.source.capability()
    }

    /// Handle for requesting a stop from elsewhere
    pub fn stop_signal(&self) -> StopSignal {
        self.stop_signal.clone()
    }

    /// Points accumulated so far
    pub fn buffered_points(&self) -> usize {
        self.buffer.len()
    }

    /// Sequence number of the last update handed out
    pub fn last_sequence(&self) -> u64 {
        self.sequence
    }

    pub fn start(&mut self) -> Result<()> {
        match self.state {
            SessionState::Scanning => return Err(Error::AlreadyScanning),
            SessionState::Stopped => return Err(Error::SessionFinished),
            SessionState::Idle => {}
        }

        if !self.source.is_scan_supported() {
            return Err(Error::UnsupportedDevice);
        }
        self.source
            .acquire()
            .map_err(|e| Error::SensorUnavailable {
                reason: e.to_string(),
                partial: None,
            })?;

        self.buffer.clear();
        self.sequence = 0;
        self.started_at = self.clock.now_millis();
        self.stop_signal.reset();
        self.state = SessionState::Scanning;

        tracing::info!(
            device = %self.source.capability().device,
            max_tick_points = self.config.max_tick_points,
            "scan started"
        );
        Ok(())
    }

    /// Run one incremental pass.
    ///
    /// Returns `Ok(None)` when not scanning or once a stop was requested.
    /// Sensor loss ends the scan and the error carries the partial result.
    pub fn tick(&mut self) -> Result<Option<ScanUpdate>> {
        if self.state != SessionState::Scanning || self.stop_signal.is_raised() {
            return Ok(None);
        }

        if let Err(e) = self.drain() {
            return Err(self.fail(e));
        }

        let snapshot = self.buffer.snapshot();
        let stride = effective_stride(
            snapshot.len(),
            self.config.tick_stride,
            self.config.max_tick_points,
        );
        let sample = decimate(&snapshot, stride, self.config.max_tick_points);
        if sample.is_empty() {
            tracing::debug!(sequence = self.sequence + 1, "tick with no points");
        }
        let pass = self.pipeline.run(sample);

        self.sequence += 1;
        Ok(Some(ScanUpdate {
            sequence: self.sequence,
            buffer_version: snapshot.version,
            buffered_points: snapshot.len(),
            scan_time_millis: self.elapsed(),
            status: ScanStatus::Scanning,
            pass,
        }))
    }

    /// Finalize the scan over every buffered point.
    pub fn stop(&mut self) -> Result<ScanResult> {
        match self.state {
            SessionState::Idle => return Err(Error::NotScanning),
            SessionState::Stopped => return Err(Error::AlreadyStopped),
            SessionState::Scanning => {}
        }

        // Close intake first so nothing accepted after this drain is lost
        self.source.release();
        if let Err(e) = self.drain() {
            tracing::warn!(error = %e, "sensor lost while stopping, finalizing buffered points");
        }
        self.stop_signal.raise();
        self.state = SessionState::Stopped;

        let result = self.finalize(ScanStatus::Completed);
        tracing::info!(
            points = result.pass.points.len(),
            walls = result.pass.walls.len(),
            furniture = result.pass.furniture.len(),
            room_type = %result.pass.layout.room_type,
            scan_time_ms = result.scan_time_millis,
            "scan completed"
        );
        Ok(result)
    }

    /// Cancel the scan and discard everything gathered. The session can be
    /// started again afterwards.
    pub fn abort(&mut self) -> Result<()> {
        match self.state {
            SessionState::Idle => return Err(Error::NotScanning),
            SessionState::Stopped => return Err(Error::AlreadyStopped),
            SessionState::Scanning => {}
        }

        self.source.release();
        let discarded = self.buffer.len();
        self.buffer.clear();
        self.state = SessionState::Idle;
        tracing::info!(discarded, "scan aborted");
        Ok(())
    }

    fn drain(&mut self) -> std::result::Result<(), SourceError> {
        for frame in self.source.poll_frames()? {
            self.buffer.extend(frame.points());
        }
        Ok(())
    }

    fn fail(&mut self, error: SourceError) -> Error {
        self.stop_signal.raise();
        self.state = SessionState::Stopped;
        self.source.release();

        let partial = self.finalize(ScanStatus::Stopped);
        tracing::warn!(
            error = %error,
            points = partial.pass.points.len(),
            "sensor lost, scan stopped with partial result"
        );
        Error::SensorUnavailable {
            reason: error.to_string(),
            partial: Some(Box::new(partial)),
        }
    }

    fn finalize(&self, status: ScanStatus) -> ScanResult {
        let snapshot = self.buffer.snapshot();
        if self.buffer.rejected() > 0 {
            tracing::debug!(rejected = self.buffer.rejected(), "malformed points dropped");
        }
        let pass = self.pipeline.run(snapshot.to_vec());
        ScanResult {
            buffer_version: snapshot.version,
            scan_time_millis: self.elapsed(),
            completed_at_millis: self.clock.now_millis(),
            status,
            pass,
        }
    }

    fn elapsed(&self) -> u64 {
        self.clock.now_millis().saturating_sub(self.started_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FrameQueue;
    use roomscan_core::Frame;
    use std::sync::atomic::AtomicU64;

    #[derive(Clone, Default)]
    struct StepClock(Arc<AtomicU64>);

    impl Clock for StepClock {
        fn now_millis(&self) -> u64 {
            self.0.fetch_add(10, Ordering::SeqCst)
        }
    }

    fn session(supported: bool) -> (ScanSession<FrameQueue, StepClock>, crate::FrameSender) {
        let (queue, sender) = FrameQueue::new(supported, "test");
        let session = ScanSession::new(queue, StepClock::default(), SessionConfig::default()).unwrap();
        (session, sender)
    }

    fn row(n: usize, y: f32) -> Frame {
        let mut vertices = Vec::new();
        for i in 0..n {
            vertices.extend_from_slice(&[i as f32 * 0.01, y, 0.0]);
        }
        Frame::new(vertices, 0.0)
    }

    #[test]
    fn second_start_is_rejected() {
        let (mut session, _sender) = session(true);
        session.start().unwrap();
        assert!(matches!(session.start(), Err(Error::AlreadyScanning)));
        assert_eq!(session.state(), SessionState::Scanning);
    }

    #[test]
    fn unsupported_device_stays_idle() {
        let (mut session, _sender) = session(false);
        assert!(matches!(session.start(), Err(Error::UnsupportedDevice)));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn lost_sensor_at_start_is_unavailable() {
        let (mut session, sender) = session(true);
        sender.disconnect();
        match session.start() {
            Err(Error::SensorUnavailable { partial, .. }) => assert!(partial.is_none()),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn idle_tick_does_nothing() {
        let (mut session, _sender) = session(true);
        assert!(session.tick().unwrap().is_none());
    }

    #[test]
    fn sequence_strictly_increases() {
        let (mut session, sender) = session(true);
        session.start().unwrap();
        let mut last = 0;
        for _ in 0..5 {
            sender.push(row(5, 1.0));
            let update = session.tick().unwrap().unwrap();
            assert!(update.sequence > last);
            assert_eq!(update.status, ScanStatus::Scanning);
            last = update.sequence;
        }
        assert_eq!(session.last_sequence(), 5);
    }

    #[test]
    fn empty_tick_is_not_an_error() {
        let (mut session, _sender) = session(true);
        session.start().unwrap();
        let update = session.tick().unwrap().unwrap();
        assert!(update.pass.points.is_empty());
        assert!(update.pass.walls.is_empty());
    }

    #[test]
    fn tick_sample_is_capped() {
        let (queue, sender) = FrameQueue::new(true, "test");
        let config = SessionConfig {
            max_tick_points: 100,
            ..Default::default()
        };
        let mut session = ScanSession::new(queue, StepClock::default(), config).unwrap();
        session.start().unwrap();
        sender.push(row(1234, 1.0));
        let update = session.tick().unwrap().unwrap();
        assert!(update.pass.points.len() <= 100);
        assert_eq!(update.buffered_points, 1234);

        let result = session.stop().unwrap();
        assert_eq!(result.pass.points.len(), 1234);
    }

    #[test]
    fn stop_signal_blocks_ticks() {
        let (mut session, sender) = session(true);
        session.start().unwrap();
        sender.push(row(3, 1.0));
        let signal = session.stop_signal();
        signal.raise();
        assert!(session.tick().unwrap().is_none());

        // stop still finalizes what was queued
        let result = session.stop().unwrap();
        assert_eq!(result.pass.points.len(), 3);
        assert_eq!(result.status, ScanStatus::Completed);
    }

    #[test]
    fn stop_transitions() {
        let (mut session, _sender) = session(true);
        assert!(matches!(session.stop(), Err(Error::NotScanning)));
        session.start().unwrap();
        session.stop().unwrap();
        assert_eq!(session.state(), SessionState::Stopped);
        assert!(matches!(session.stop(), Err(Error::AlreadyStopped)));
        assert!(matches!(session.start(), Err(Error::SessionFinished)));
        assert!(session.tick().unwrap().is_none());
    }

    #[test]
    fn frames_after_stop_are_refused() {
        let (mut session, sender) = session(true);
        session.start().unwrap();
        assert!(sender.push(row(4, 1.0)));
        let result = session.stop().unwrap();
        assert_eq!(result.pass.points.len(), 4);

        assert!(!sender.push(row(4, 1.0)));
        assert_eq!(session.state(), SessionState::Stopped);
    }

    #[test]
    fn abort_closes_feed_until_restart() {
        let (mut session, sender) = session(true);
        session.start().unwrap();
        session.abort().unwrap();
        assert!(!sender.push(row(4, 1.0)));

        session.start().unwrap();
        assert!(sender.push(row(4, 1.0)));
    }

    #[test]
    fn abort_discards_and_allows_restart() {
        let (mut session, sender) = session(true);
        session.start().unwrap();
        sender.push(row(20, 1.0));
        session.tick().unwrap();
        session.abort().unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.buffered_points(), 0);
        assert!(matches!(session.abort(), Err(Error::NotScanning)));

        session.start().unwrap();
        sender.push(row(2, 1.0));
        let update = session.tick().unwrap().unwrap();
        assert_eq!(update.sequence, 1);
        assert_eq!(update.buffered_points, 2);
    }

    #[test]
    fn sensor_loss_returns_partial_result() {
        let (mut session, sender) = session(true);
        session.start().unwrap();
        sender.push(row(12, 2.0));
        session.tick().unwrap().unwrap();
        sender.push(row(8, 2.0));
        sender.disconnect();
        // queued frames are delivered before the loss is reported
        session.tick().unwrap().unwrap();

        let error = session.tick().unwrap_err();
        let partial = error.partial_result().unwrap();
        assert_eq!(partial.status, ScanStatus::Stopped);
        assert_eq!(partial.pass.points.len(), 20);
        assert_eq!(session.state(), SessionState::Stopped);
        assert!(matches!(session.stop(), Err(Error::AlreadyStopped)));
    }

    #[test]
    fn scan_time_is_relative_to_start() {
        let (mut session, _sender) = session(true);
        session.start().unwrap();
        let update = session.tick().unwrap().unwrap();
        assert!(update.scan_time_millis > 0);
        assert!(update.scan_time_millis < 1000);
    }

    #[test]
    fn invalid_config_fails_construction() {
        let (queue, _) = FrameQueue::new(true, "test");
        let config = SessionConfig {
            tick_stride: 0,
            ..Default::default()
        };
        assert!(ScanSession::new(queue, StepClock::default(), config).is_err());
    }
}
