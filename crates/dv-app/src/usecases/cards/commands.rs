use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use dv_core::file_view::filename_of;
use dv_core::geometry::PercentPoint;
use dv_core::ports::CardRepositoryPort;
use dv_core::{Card, CardId, CardPatch, CardSource, NewCard, ProjectId};

use crate::notices::NoticeCenter;
use crate::usecases::file_view::FileViewer;

/// List a project's cards, bottom of the stack first.
pub struct ListCards {
    cards: Arc<dyn CardRepositoryPort>,
}

impl ListCards {
    pub fn new(cards: Arc<dyn CardRepositoryPort>) -> Self {
        Self { cards }
    }

    #[tracing::instrument(
        name = "usecase.list_cards.execute",
        skip(self),
        fields(project_id = %project_id)
    )]
    pub async fn execute(&self, project_id: &ProjectId) -> Result<Vec<Card>> {
        let mut cards = self.cards.list(project_id).await?;
        cards.sort_by_key(|c| c.z_index);
        Ok(cards)
    }
}

/// Add a card for a file path without a drop gesture.
pub struct AddFileCard {
    cards: Arc<dyn CardRepositoryPort>,
    default_position: PercentPoint,
}

impl AddFileCard {
    pub fn new(cards: Arc<dyn CardRepositoryPort>, default_position: PercentPoint) -> Self {
        Self {
            cards,
            default_position,
        }
    }

    #[tracing::instrument(
        name = "usecase.add_file_card.execute",
        skip(self),
        fields(project_id = %project_id, path = %path)
    )]
    pub async fn execute(
        &self,
        project_id: &ProjectId,
        path: &str,
        position: Option<PercentPoint>,
    ) -> Result<Card> {
        let position = position.unwrap_or(self.default_position);
        let card = self
            .cards
            .create(NewCard {
                project_id: project_id.clone(),
                filename: filename_of(path),
                source: CardSource::File {
                    file_path: path.to_string(),
                },
                position: Some(PercentPoint::new(
                    position.x.clamp(0.0, 100.0),
                    position.y.clamp(0.0, 100.0),
                )),
            })
            .await
            .with_context(|| format!("Failed to create card for {path}"))?;
        info!(card_id = %card.id, "Card added");
        Ok(card)
    }
}

pub struct ToggleCardMinimized {
    cards: Arc<dyn CardRepositoryPort>,
}

impl ToggleCardMinimized {
    pub fn new(cards: Arc<dyn CardRepositoryPort>) -> Self {
        Self { cards }
    }

    #[tracing::instrument(
        name = "usecase.toggle_card_minimized.execute",
        skip(self, card),
        fields(card_id = %card.id)
    )]
    pub async fn execute(&self, card: &Card) -> Result<Option<Card>> {
        self.cards
            .update(&card.id, CardPatch::minimized(!card.is_minimized))
            .await
    }
}

/// Expand or collapse a card. Collapsing closes the card's full view.
pub struct ToggleCardExpanded {
    cards: Arc<dyn CardRepositoryPort>,
    viewer: Arc<FileViewer>,
}

impl ToggleCardExpanded {
    pub fn new(cards: Arc<dyn CardRepositoryPort>, viewer: Arc<FileViewer>) -> Self {
        Self { cards, viewer }
    }

    #[tracing::instrument(
        name = "usecase.toggle_card_expanded.execute",
        skip(self, card),
        fields(card_id = %card.id)
    )]
    pub async fn execute(&self, card: &Card) -> Result<Option<Card>> {
        let expanded = !card.is_expanded;
        let updated = self
            .cards
            .update(&card.id, CardPatch::expanded(expanded))
            .await?;
        if !expanded && self.viewer.close(&card.id) {
            debug!("Full view closed on collapse");
        }
        Ok(updated)
    }
}

/// Delete a card after tearing down everything that still points at it.
///
/// Its full view is closed and its pending notice timers are stopped first, so
/// nothing writes to the card once it is gone.
pub struct DeleteCard {
    cards: Arc<dyn CardRepositoryPort>,
    viewer: Arc<FileViewer>,
    notices: Arc<NoticeCenter>,
}

impl DeleteCard {
    pub fn new(
        cards: Arc<dyn CardRepositoryPort>,
        viewer: Arc<FileViewer>,
        notices: Arc<NoticeCenter>,
    ) -> Self {
        Self {
            cards,
            viewer,
            notices,
        }
    }

    #[tracing::instrument(
        name = "usecase.delete_card.execute",
        skip(self),
        fields(card_id = %card_id)
    )]
    pub async fn execute(&self, card_id: &CardId) -> Result<bool> {
        self.viewer.close(card_id);
        if let Err(err) = self.notices.clear_card(card_id).await {
            warn!(error = %err, "Failed to clear card notices");
        }

        let deleted = self
            .cards
            .delete(card_id)
            .await
            .with_context(|| format!("Failed to delete card {card_id}"))?;
        info!(deleted, "Card deletion finished");
        Ok(deleted)
    }
}
