// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request types for the API.

use roomscan_processing::SessionConfig;
use serde::Deserialize;

fn default_supported() -> bool {
    true
}

fn default_device() -> String {
    "unknown".to_string()
}

/// Body of `POST /api/v1/scans`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScanRequest {
    /// Whether the capturing device has a depth sensor.
    #[serde(default = "default_supported")]
    pub supported: bool,

    /// Device model reported by the client.
    #[serde(default = "default_device")]
    pub device: String,

    /// Session overrides; omitted entirely, the server defaults apply.
    /// Missing fields inside fall back to the library defaults.
    #[serde(default)]
    pub config: Option<SessionConfig>,
}

impl Default for CreateScanRequest {
    fn default() -> Self {
        Self {
            supported: default_supported(),
            device: default_device(),
            config: None,
        }
    }
}
