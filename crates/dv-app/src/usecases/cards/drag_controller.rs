use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use dv_core::drag::{DragEngine, FrameRequest, PointerTarget};
use dv_core::geometry::{clamp_to_viewport, percent_to_pixel, Point, Size, Viewport};
use dv_core::ports::CardRepositoryPort;
use dv_core::{Card, CardPatch};

use super::BringCardToFront;

/// Drives one card through pointer-down, moves and pointer-up.
///
/// Moves only produce visual positions. The store sees two writes per gesture at
/// most: the bring-to-front on pointer-down and the position on pointer-up.
pub struct CardDragController {
    card: Card,
    engine: DragEngine,
    cards: Arc<dyn CardRepositoryPort>,
    bring_to_front: BringCardToFront,
}

impl CardDragController {
    pub fn new(card: Card, cards: Arc<dyn CardRepositoryPort>, keep_visible: Size) -> Self {
        Self {
            card,
            engine: DragEngine::new(keep_visible),
            bring_to_front: BringCardToFront::new(cards.clone()),
            cards,
        }
    }

    /// The card as last persisted.
    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn is_dragging(&self) -> bool {
        self.engine.is_dragging()
    }

    /// Where the card is drawn in `viewport` when no drag is running.
    pub fn resting_position(&self, viewport: Viewport) -> Point {
        clamp_to_viewport(
            percent_to_pixel(self.card.position(), viewport),
            viewport,
            self.keep_visible(),
        )
    }

    /// Start a drag and raise the card. Returns `false` if no drag started.
    #[tracing::instrument(
        name = "usecase.card_drag.pointer_down",
        skip(self, viewport),
        fields(card_id = %self.card.id)
    )]
    pub async fn pointer_down(
        &mut self,
        target: PointerTarget,
        pointer: Point,
        viewport: Viewport,
    ) -> Result<bool> {
        let start = self.resting_position(viewport);
        if !self.engine.begin(target, pointer, start) {
            return Ok(false);
        }
        debug!(x = start.x, y = start.y, "Drag started");

        match self
            .bring_to_front
            .execute(&self.card.project_id, &self.card.id)
            .await
        {
            Ok(Some(card)) => self.card.z_index = card.z_index,
            Ok(None) => warn!("Dragged card no longer exists"),
            Err(err) => warn!(error = %err, "Failed to bring dragged card to front"),
        }
        Ok(true)
    }

    pub fn pointer_move(&mut self, pointer: Point) -> FrameRequest {
        self.engine.pointer_move(pointer)
    }

    /// Animation frame callback: the visual position to draw, if it changed.
    pub fn animation_frame(&mut self, viewport: Viewport, zoom_factor: f64) -> Option<Point> {
        self.engine.on_frame(viewport, zoom_factor)
    }

    /// Finish the drag and persist the final position once.
    #[tracing::instrument(
        name = "usecase.card_drag.pointer_up",
        skip(self, viewport),
        fields(card_id = %self.card.id)
    )]
    pub async fn pointer_up(
        &mut self,
        pointer: Point,
        viewport: Viewport,
        zoom_factor: f64,
    ) -> Result<Option<Card>> {
        let Some(position) = self.engine.end(pointer, viewport, zoom_factor) else {
            return Ok(None);
        };
        let updated = self
            .cards
            .update(&self.card.id, CardPatch::position(position))
            .await?;
        match &updated {
            Some(card) => {
                info!(x = position.x, y = position.y, "Card position committed");
                self.card = card.clone();
            }
            None => warn!("Dragged card was deleted before the drop"),
        }
        Ok(updated)
    }

    pub fn cancel(&mut self) {
        self.engine.cancel();
    }

    /// Viewport resized: the pixel position to draw, unless a drag owns it.
    pub fn viewport_resized(&self, viewport: Viewport) -> Option<Point> {
        self.engine.resync(self.card.position(), viewport)
    }

    fn keep_visible(&self) -> Size {
        self.engine.keep_visible()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::testing::InMemoryCards;
    use dv_core::geometry::PercentPoint;
    use dv_core::{CardSource, NewCard, ProjectId};

    const VIEWPORT: Viewport = Size::new(1000.0, 800.0);
    const KEEP: Size = Size::new(100.0, 50.0);

    async fn setup() -> (CardDragController, Arc<InMemoryCards>, Card) {
        let cards = Arc::new(InMemoryCards::default());
        let project = ProjectId::from("p1");
        let mut created = Vec::new();
        for name in ["a.txt", "b.txt"] {
            created.push(
                cards
                    .create(NewCard {
                        project_id: project.clone(),
                        filename: name.into(),
                        source: CardSource::File {
                            file_path: format!("/tmp/{name}"),
                        },
                        position: Some(PercentPoint::new(10.0, 10.0)),
                    })
                    .await
                    .unwrap(),
            );
        }
        let first = created.remove(0);
        (
            CardDragController::new(first.clone(), cards.clone(), KEEP),
            cards,
            first,
        )
    }

    #[tokio::test]
    async fn gesture_commits_exactly_once() {
        let (mut ctl, cards, card) = setup().await;

        assert!(ctl
            .pointer_down(PointerTarget::DragRegion, Point::new(150.0, 100.0), VIEWPORT)
            .await
            .unwrap());
        assert_eq!(ctl.pointer_move(Point::new(200.0, 120.0)), FrameRequest::Schedule);
        assert_eq!(ctl.pointer_move(Point::new(250.0, 140.0)), FrameRequest::Coalesced);
        assert_eq!(
            ctl.animation_frame(VIEWPORT, 1.0),
            Some(Point::new(200.0, 120.0))
        );
        let committed = ctl
            .pointer_up(Point::new(350.0, 180.0), VIEWPORT, 1.0)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(committed.position(), PercentPoint::new(30.0, 20.0));
        let updates = cards.updates();
        // bring-to-front, then the single position commit
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].1, CardPatch::z_index(2));
        assert_eq!(updates[1], (card.id.clone(), CardPatch::position(committed.position())));
        assert!(!ctl.is_dragging());
    }

    #[tokio::test]
    async fn zoom_scales_pointer_delta() {
        let (mut ctl, _, _) = setup().await;
        ctl.pointer_down(PointerTarget::DragRegion, Point::new(0.0, 0.0), VIEWPORT)
            .await
            .unwrap();

        let committed = ctl
            .pointer_up(Point::new(200.0, 160.0), VIEWPORT, 2.0)
            .await
            .unwrap()
            .unwrap();

        // start (100, 80) + delta (100, 80)
        assert_eq!(committed.position(), PercentPoint::new(20.0, 20.0));
    }

    #[tokio::test]
    async fn committed_position_stays_on_screen() {
        let (mut ctl, _, _) = setup().await;
        ctl.pointer_down(PointerTarget::DragRegion, Point::new(0.0, 0.0), VIEWPORT)
            .await
            .unwrap();

        let committed = ctl
            .pointer_up(Point::new(5000.0, -5000.0), VIEWPORT, 1.0)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(committed.position(), PercentPoint::new(90.0, 0.0));
    }

    #[tokio::test]
    async fn interactive_control_does_not_start_drag() {
        let (mut ctl, cards, _) = setup().await;

        let started = ctl
            .pointer_down(
                PointerTarget::InteractiveControl,
                Point::new(0.0, 0.0),
                VIEWPORT,
            )
            .await
            .unwrap();

        assert!(!started);
        assert_eq!(ctl.pointer_move(Point::new(5.0, 5.0)), FrameRequest::Ignored);
        assert!(ctl
            .pointer_up(Point::new(5.0, 5.0), VIEWPORT, 1.0)
            .await
            .unwrap()
            .is_none());
        assert!(cards.updates().is_empty());
    }

    #[tokio::test]
    async fn resize_resyncs_only_when_idle() {
        let (mut ctl, _, _) = setup().await;
        let small = Size::new(500.0, 400.0);

        assert_eq!(ctl.viewport_resized(small), Some(Point::new(50.0, 40.0)));

        ctl.pointer_down(PointerTarget::DragRegion, Point::new(0.0, 0.0), VIEWPORT)
            .await
            .unwrap();
        assert_eq!(ctl.viewport_resized(small), None);
    }
}
