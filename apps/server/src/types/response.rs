// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use roomscan_processing::{Capability, RenderStatus, ScanEvent, ScanStatus};
use serde::{Deserialize, Serialize};

/// Reply to a newly started scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScanResponse {
    pub session_id: String,
    pub status: ScanStatus,
    pub capability: Capability,
    pub tick_interval_ms: u64,
    /// Path of the Server-Sent Events stream for this scan.
    pub events_url: String,
}

/// Reply to a frame upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameAccepted {
    pub session_id: String,
    /// Points in the uploaded frame (trailing partial triple excluded).
    pub points: usize,
}

/// Latest known state of a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSnapshotResponse {
    pub session_id: String,
    pub status: ScanStatus,
    /// Sequence number of `latest`, 0 before the first pass.
    pub sequence: u64,
    pub latest: Option<ScanEvent>,
    pub export_key: Option<String>,
}

/// Reply to a stop request: the final result and where its export lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopScanResponse {
    pub session_id: String,
    pub export_key: String,
    pub export_url: String,
    pub result: ScanEvent,
}

/// Reply to a render submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponse {
    pub status: RenderStatus,
    pub process_type: String,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
