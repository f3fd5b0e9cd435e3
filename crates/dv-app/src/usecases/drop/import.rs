use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use dv_core::drop::{classify, ContentKind, DropRejection};
use dv_core::file_view::filename_of;
use dv_core::geometry::{clamp_to_viewport, pixel_to_percent, PercentPoint, Point, Size, Viewport};
use dv_core::ports::{ByteRequest, CardRepositoryPort, ContentPort};
use dv_core::{Card, CardSource, NewCard, PreviewConfig, PreviewError, ProjectId};


/// How a drop gesture ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DropOutcome {
    Created { card: Card },
    /// Content was refused; the user gets a transient notice.
    Rejected { error: PreviewError },
    /// The gesture ended without usable data.
    Abandoned { reason: DropRejection },
    /// The card store failed after the content was accepted.
    Failed { reason: String },
}

/// Placement and limits applied to every drop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropPolicy {
    pub max_content_bytes: u64,
    pub card_offset: Point,
    pub keep_visible: Size,
}

impl From<&PreviewConfig> for DropPolicy {
    fn from(config: &PreviewConfig) -> Self {
        Self {
            max_content_bytes: config.max_content_bytes,
            card_offset: config.card_offset,
            keep_visible: config.min_visible,
        }
    }
}

impl DropPolicy {
    /// Card top-left, in percent, for a drop at `at` (content space).
    ///
    /// The card is shifted by the offset so it lands centered under the cursor,
    /// then kept on screen.
    pub fn placement(&self, at: Point, viewport: Viewport) -> PercentPoint {
        let top_left = at.offset(-self.card_offset.x, -self.card_offset.y);
        pixel_to_percent(
            clamp_to_viewport(top_left, viewport, self.keep_visible),
            viewport,
        )
    }
}

/// The drop pipeline: place, read, classify, create.
pub struct ImportDroppedContent {
    content: Arc<dyn ContentPort>,
    cards: Arc<dyn CardRepositoryPort>,
    policy: DropPolicy,
}

impl ImportDroppedContent {
    pub fn new(
        content: Arc<dyn ContentPort>,
        cards: Arc<dyn CardRepositoryPort>,
        policy: DropPolicy,
    ) -> Self {
        Self {
            content,
            cards,
            policy,
        }
    }

    /// Import a dropped file. `Err` only when the card store fails.
    #[tracing::instrument(
        name = "usecase.import_dropped_file.execute",
        skip(self, viewport),
        fields(project_id = %project_id, path = %path)
    )]
    pub async fn import_file(
        &self,
        project_id: &ProjectId,
        path: &str,
        at: Point,
        viewport: Viewport,
    ) -> anyhow::Result<DropOutcome> {
        let position = self.policy.placement(at, viewport);
        let read = match self
            .content
            .read_bytes(path, ByteRequest::whole(self.policy.max_content_bytes))
            .await
        {
            Ok(read) => read,
            Err(err) => return Ok(rejected(PreviewError::from_read(err))),
        };
        if classify(&read.content) == ContentKind::Binary {
            return Ok(rejected(PreviewError::BinaryContent));
        }

        let filename = if read.filename.is_empty() {
            filename_of(path)
        } else {
            read.filename
        };
        let card = self
            .cards
            .create(NewCard {
                project_id: project_id.clone(),
                filename,
                source: CardSource::File {
                    file_path: path.to_string(),
                },
                position: Some(position),
            })
            .await
            .with_context(|| format!("Failed to create card for dropped file {path}"))?;
        info!(card_id = %card.id, x = position.x, y = position.y, "Dropped file imported");
        Ok(DropOutcome::Created { card })
    }

    /// Import text dropped from inside the page.
    #[tracing::instrument(
        name = "usecase.import_dropped_text.execute",
        skip(self, text, viewport),
        fields(project_id = %project_id, filename = %filename, bytes = text.len())
    )]
    pub async fn import_text(
        &self,
        project_id: &ProjectId,
        filename: &str,
        text: String,
        at: Point,
        viewport: Viewport,
    ) -> anyhow::Result<DropOutcome> {
        let size = text.len() as u64;
        if size > self.policy.max_content_bytes {
            return Ok(rejected(PreviewError::OversizeContent {
                size,
                max: self.policy.max_content_bytes,
            }));
        }
        if classify(text.as_bytes()) == ContentKind::Binary {
            return Ok(rejected(PreviewError::BinaryContent));
        }

        let position = self.policy.placement(at, viewport);
        let card = self
            .cards
            .create(NewCard {
                project_id: project_id.clone(),
                filename: filename.to_string(),
                source: CardSource::Inline { content: text },
                position: Some(position),
            })
            .await
            .context("Failed to create card for dropped text")?;
        info!(card_id = %card.id, "Dropped text imported");
        Ok(DropOutcome::Created { card })
    }
}

fn rejected(error: PreviewError) -> DropOutcome {
    info!(error = %error, "Drop rejected");
    DropOutcome::Rejected { error }
}
