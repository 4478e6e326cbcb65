// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scan processing shared by the HTTP server and embedders.
//!
//! Wraps the geometry stages into a single [`Pipeline`] pass and drives it
//! from a [`ScanSession`], which owns one sensor feed, an append-only point
//! buffer and the session state machine. Outbound wire formats (streaming
//! events, JSON export) and the render-service contract live here too so
//! every front end speaks the same shapes.
//!
//! ```no_run
//! use roomscan_processing::{FrameQueue, ScanSession, SessionConfig, SystemClock};
//!
//! let (queue, sender) = FrameQueue::new(true, "iPhone");
//! let mut session = ScanSession::new(queue, SystemClock, SessionConfig::default())?;
//! session.start()?;
//! sender.push(roomscan_core::Frame::new(vec![0.0, 1.0, 0.0], 0.0));
//! if let Some(update) = session.tick()? {
//!     println!("{} walls", update.pass.walls.len());
//! }
//! let result = session.stop()?;
//! # Ok::<(), roomscan_processing::Error>(())
//! ```

pub mod buffer;
pub mod clock;
pub mod config;
pub mod decimate;
pub mod error;
pub mod event;
pub mod export;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod source;

pub use buffer::{BufferSnapshot, PointBuffer};
pub use clock::{Clock, SystemClock};
pub use config::{PipelineConfig, SessionConfig};
pub use decimate::{decimate, effective_stride};
pub use error::{Error, Result, SourceError};
pub use event::{ScanEvent, ScanStatus};
pub use export::{height_color, ExportDocument, ExportMetadata};
pub use pipeline::{PassOutput, Pipeline};
pub use render::{RenderKind, RenderOutcome, RenderRequest, RenderService, RenderStatus};
pub use session::{ScanResult, ScanSession, ScanUpdate, SessionState, StopSignal};
pub use source::{Capability, FrameQueue, FrameSender, PointSource};
