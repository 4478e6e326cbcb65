// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for the external render backend.

use futures::future::BoxFuture;
use futures::FutureExt;
use roomscan_processing::{RenderOutcome, RenderRequest, RenderService, RenderStatus};
use serde::Deserialize;
use std::time::Duration;

/// Backend reply to a submitted job
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackendReply {
    status: RenderStatus,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

impl BackendReply {
    fn into_outcome(self) -> RenderOutcome {
        match self.status {
            RenderStatus::Processing => RenderOutcome::Pending,
            RenderStatus::Completed => RenderOutcome::from_images(self.images),
            RenderStatus::Failed => {
                RenderOutcome::Failed(self.error.unwrap_or_else(|| "render failed".to_string()))
            }
        }
    }
}

/// Posts render jobs as JSON to a configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpRenderService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRenderService {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn send(&self, request: RenderRequest) -> RenderOutcome {
        let job = request.job();
        tracing::info!(
            process_type = %job.process_type,
            media = job.media_urls.len(),
            "Submitting render job"
        );

        let response = match self.client.post(&self.endpoint).json(&job).send().await {
            Ok(response) => response,
            Err(e) => return RenderOutcome::Failed(format!("render service unreachable: {e}")),
        };

        let status = response.status();
        if !status.is_success() {
            return RenderOutcome::Failed(format!("render service returned {status}"));
        }

        match response.json::<BackendReply>().await {
            Ok(reply) => reply.into_outcome(),
            Err(e) => RenderOutcome::Failed(format!("invalid render service reply: {e}")),
        }
    }
}

impl RenderService for HttpRenderService {
    fn submit(&self, request: RenderRequest) -> BoxFuture<'_, RenderOutcome> {
        self.send(request).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replies_map_to_outcomes() {
        let reply: BackendReply =
            serde_json::from_str(r#"{"status":"completed","images":["a.png"]}"#).unwrap();
        assert_eq!(reply.into_outcome(), RenderOutcome::Completed(vec!["a.png".into()]));

        let empty: BackendReply = serde_json::from_str(r#"{"status":"completed"}"#).unwrap();
        assert_eq!(empty.into_outcome().status(), RenderStatus::Failed);

        let pending: BackendReply = serde_json::from_str(r#"{"status":"processing"}"#).unwrap();
        assert_eq!(pending.into_outcome(), RenderOutcome::Pending);

        let failed: BackendReply =
            serde_json::from_str(r#"{"status":"failed","error":"quota"}"#).unwrap();
        assert_eq!(failed.into_outcome(), RenderOutcome::Failed("quota".into()));
    }
}
