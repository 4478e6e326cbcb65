// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Render-service contract
//!
//! Rendering is an opaque external service: it receives media URLs and a
//! kind tag and eventually answers with rendered image URLs. Nothing here
//! looks at image content.

use crate::error::{Error, Result};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// What the uploaded media shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderKind {
    Exterior,
    DesignIdeas,
    Decks,
}

impl RenderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderKind::Exterior => "exterior",
            RenderKind::DesignIdeas => "design-ideas",
            RenderKind::Decks => "decks",
        }
    }

    /// Processing job name understood by the render backend
    pub fn process_type(&self) -> &'static str {
        match self {
            RenderKind::Exterior => "exterior-rendering",
            RenderKind::DesignIdeas => "design-integration",
            RenderKind::Decks => "deck-rendering",
        }
    }

    /// Prompt sent with `media_count` reference images
    pub fn prompt(&self, media_count: usize) -> String {
        match self {
            RenderKind::Exterior => format!(
                "Professional architectural rendering of a home exterior based on {media_count} \
                 reference photos. Create a photorealistic, high-quality exterior visualization \
                 with enhanced lighting, materials, and landscaping. Style: Modern architectural \
                 photography, golden hour lighting, 4K resolution."
            ),
            RenderKind::DesignIdeas => "Integrate these design elements and ideas into a cohesive \
                 interior space. Blend the uploaded design concepts with the existing room layout. \
                 Create a harmonious, stylish interior that incorporates the design themes from the \
                 reference images. Style: Interior design photography, professional lighting, \
                 realistic materials and textures."
                .to_string(),
            RenderKind::Decks => "Add beautiful outdoor decks and patios to this house exterior. \
                 Based on the uploaded house photos, design and render custom deck additions that \
                 complement the architectural style. Include railings, outdoor furniture, and \
                 landscaping. Style: Professional architectural visualization, realistic materials, \
                 natural lighting."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub media_urls: Vec<String>,
    #[serde(rename = "type")]
    pub kind: RenderKind,
}

impl RenderRequest {
    pub fn new(media_urls: Vec<String>, kind: RenderKind) -> Result<Self> {
        let request = Self { media_urls, kind };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<()> {
        if self.media_urls.is_empty() {
            return Err(Error::EmptyRenderRequest);
        }
        Ok(())
    }

    pub fn prompt(&self) -> String {
        self.kind.prompt(self.media_urls.len())
    }

    pub fn job(&self) -> RenderJob {
        RenderJob {
            process_type: self.kind.process_type().to_string(),
            prompt: self.prompt(),
            media_urls: self.media_urls.clone(),
        }
    }
}

/// Payload forwarded to the render backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderJob {
    pub process_type: String,
    pub prompt: String,
    pub media_urls: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStatus {
    Processing,
    Completed,
    Failed,
}

/// How a render job ended, or that it has not yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Completed(Vec<String>),
    Failed(String),
    Pending,
}

impl RenderOutcome {
    /// A job only counts as completed when it produced at least one image.
    pub fn from_images(images: Vec<String>) -> Self {
        if images.is_empty() {
            RenderOutcome::Failed("no images were generated".to_string())
        } else {
            RenderOutcome::Completed(images)
        }
    }

    pub fn status(&self) -> RenderStatus {
        match self {
            RenderOutcome::Completed(_) => RenderStatus::Completed,
            RenderOutcome::Failed(_) => RenderStatus::Failed,
            RenderOutcome::Pending => RenderStatus::Processing,
        }
    }

    pub fn images(&self) -> &[String] {
        match self {
            RenderOutcome::Completed(images) => images,
            _ => &[],
        }
    }
}

pub trait RenderService: Send + Sync {
    fn submit(&self, request: RenderRequest) -> BoxFuture<'_, RenderOutcome>;
}
