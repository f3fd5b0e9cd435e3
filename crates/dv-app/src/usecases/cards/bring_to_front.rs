use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use dv_core::card::next_z_index;
use dv_core::ports::CardRepositoryPort;
use dv_core::{Card, CardId, CardPatch, ProjectId};

/// Raise a card above every other card of its project.
pub struct BringCardToFront {
    cards: Arc<dyn CardRepositoryPort>,
}

impl BringCardToFront {
    pub fn new(cards: Arc<dyn CardRepositoryPort>) -> Self {
        Self { cards }
    }

    /// Assigns `max z + 1` unless the card is already alone on top.
    ///
    /// Returns `None` when the card no longer exists.
    #[tracing::instrument(
        name = "usecase.bring_card_to_front.execute",
        skip(self),
        fields(project_id = %project_id, card_id = %card_id)
    )]
    pub async fn execute(&self, project_id: &ProjectId, card_id: &CardId) -> Result<Option<Card>> {
        let cards = self.cards.list(project_id).await?;
        let Some(card) = cards.iter().find(|c| &c.id == card_id) else {
            return Ok(None);
        };
        if cards
            .iter()
            .all(|c| c.id == card.id || c.z_index < card.z_index)
        {
            return Ok(Some(card.clone()));
        }

        let z_index = next_z_index(&cards);
        info!(z_index, "Bringing card to front");
        self.cards.update(card_id, CardPatch::z_index(z_index)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::testing::InMemoryCards;
    use dv_core::{CardSource, NewCard};

    async fn seed(cards: &InMemoryCards, project: &ProjectId, n: usize) -> Vec<Card> {
        let mut created = Vec::new();
        for i in 0..n {
            created.push(
                cards
                    .create(NewCard {
                        project_id: project.clone(),
                        filename: format!("{i}.txt"),
                        source: CardSource::File {
                            file_path: format!("/tmp/{i}.txt"),
                        },
                        position: None,
                    })
                    .await
                    .unwrap(),
            );
        }
        created
    }

    #[tokio::test]
    async fn raises_card_above_max() {
        let cards = Arc::new(InMemoryCards::default());
        let project = ProjectId::from("p1");
        let seeded = seed(&cards, &project, 3).await;
        let uc = BringCardToFront::new(cards.clone());

        let raised = uc.execute(&project, &seeded[0].id).await.unwrap().unwrap();

        assert_eq!(raised.z_index, 3);
        let listed = cards.list(&project).await.unwrap();
        assert_eq!(listed.last().unwrap().id, seeded[0].id);
    }

    #[tokio::test]
    async fn most_recent_action_wins() {
        let cards = Arc::new(InMemoryCards::default());
        let project = ProjectId::from("p1");
        let seeded = seed(&cards, &project, 2).await;
        let uc = BringCardToFront::new(cards.clone());

        uc.execute(&project, &seeded[0].id).await.unwrap();
        uc.execute(&project, &seeded[1].id).await.unwrap();

        let listed = cards.list(&project).await.unwrap();
        assert_eq!(listed.last().unwrap().id, seeded[1].id);
        assert!(listed[0].z_index < listed[1].z_index);
    }

    #[tokio::test]
    async fn top_card_is_not_rewritten() {
        let cards = Arc::new(InMemoryCards::default());
        let project = ProjectId::from("p1");
        let seeded = seed(&cards, &project, 2).await;
        let uc = BringCardToFront::new(cards.clone());

        let card = uc.execute(&project, &seeded[1].id).await.unwrap().unwrap();

        assert_eq!(card.z_index, 1);
        assert!(cards.updates().is_empty());
    }

    #[tokio::test]
    async fn missing_card_yields_none() {
        let cards = Arc::new(InMemoryCards::default());
        let uc = BringCardToFront::new(cards);

        let result = uc
            .execute(&ProjectId::from("p1"), &CardId::new())
            .await
            .unwrap();

        assert!(result.is_none());
    }
}
