// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Service modules for live scans, export caching and rendering.

pub mod cache;
pub mod driver;
pub mod render;
pub mod sessions;

pub use cache::DiskCache;
pub use render::HttpRenderService;
pub use sessions::{PublishedEvent, SessionHandle, SessionRegistry};
