use anyhow::Result;
use async_trait::async_trait;

use crate::card::{Card, CardPatch, NewCard};
use crate::ids::{CardId, ProjectId};

/// Persistence for file cards.
#[async_trait]
pub trait CardRepositoryPort: Send + Sync {
    /// Cards of a project, lowest z-index first.
    async fn list(&self, project_id: &ProjectId) -> Result<Vec<Card>>;

    /// Store a new card on top of its project's stack.
    async fn create(&self, card: NewCard) -> Result<Card>;

    /// Apply `patch`; `None` when the card does not exist.
    async fn update(&self, id: &CardId, patch: CardPatch) -> Result<Option<Card>>;

    /// `true` when a card was removed.
    async fn delete(&self, id: &CardId) -> Result<bool>;
}
