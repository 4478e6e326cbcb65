// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for scan sessions and wire formats.

use crate::session::ScanResult;

/// Result type alias for processing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by a [`PointSource`](crate::PointSource).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The producer side went away.
    #[error("sensor disconnected")]
    Disconnected,

    /// The sensor could not be opened or stopped delivering frames.
    #[error("sensor unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur while running a scan.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The device cannot produce depth data.
    #[error("depth scanning is not supported on this device")]
    UnsupportedDevice,

    /// The sensor failed to start or was lost mid-scan. When lost mid-scan the
    /// points gathered so far are processed and returned in `partial`.
    #[error("sensor unavailable: {reason}")]
    SensorUnavailable {
        reason: String,
        partial: Option<Box<ScanResult>>,
    },

    /// `start()` while a scan is already running.
    #[error("a scan is already in progress")]
    AlreadyScanning,

    /// `stop()` or `abort()` without a running scan.
    #[error("no scan is in progress")]
    NotScanning,

    /// `stop()` on a scan that has already been finalized.
    #[error("scan has already been stopped")]
    AlreadyStopped,

    /// `start()` on a finalized session. Sessions are single-use once stopped.
    #[error("scan session has finished; create a new session")]
    SessionFinished,

    /// Geometry parameters failed validation.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(#[from] roomscan_geometry::Error),

    /// Session parameter failed validation.
    #[error("invalid session setting `{name}`: {reason}")]
    InvalidSetting {
        name: &'static str,
        reason: &'static str,
    },

    /// Export document could not be encoded or decoded.
    #[error("export format error: {0}")]
    Export(#[from] serde_json::Error),

    /// Render request without any media.
    #[error("render request needs at least one media url")]
    EmptyRenderRequest,
}

impl Error {
    /// Points salvaged from a lost sensor, if any.
    pub fn partial_result(&self) -> Option<&ScanResult> {
        match self {
            Error::SensorUnavailable { partial, .. } => partial.as_deref(),
            _ => None,
        }
    }
}
