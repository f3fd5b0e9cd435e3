//! Drag state machine.
//!
//! `Idle -> Dragging -> Idle`. While dragging, the engine only produces visual
//! positions; the single percent commit comes out of [`DragEngine::end`].

use crate::geometry::{
    clamp_to_viewport, percent_to_pixel, pixel_to_percent, sanitize_factor, PercentPoint, Point,
    Size, Viewport,
};

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The card chrome or any other drag-eligible region.
    DragRegion,
    /// A button, input or other interactive child control.
    InteractiveControl,
}

/// Result of feeding a pointer move into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    /// No frame is pending; the caller should schedule one.
    Schedule,
    /// A frame is already pending and will pick up this move.
    Coalesced,
    /// Not dragging.
    Ignored,
}

/// Ephemeral state of one pointer-down to pointer-up gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub start_pointer: Point,
    pub start_card: Point,
    pending_pointer: Option<Point>,
    frame_pending: bool,
    visual: Point,
}

impl DragSession {
    /// The last position handed to the renderer.
    pub fn visual(&self) -> Point {
        self.visual
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }
}

#[derive(Debug, Clone, PartialEq)]
enum DragState {
    Idle,
    Dragging(DragSession),
}

#[derive(Debug, Clone)]
pub struct DragEngine {
    state: DragState,
    keep_visible: Size,
}

impl DragEngine {
    /// `keep_visible` is the part of a card that must stay on screen.
    pub fn new(keep_visible: Size) -> Self {
        Self {
            state: DragState::Idle,
            keep_visible,
        }
    }

    pub fn keep_visible(&self) -> Size {
        self.keep_visible
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    /// Start a drag. Returns `false` when the pointer landed on an interactive
    /// control or a drag is already running.
    pub fn begin(&mut self, target: PointerTarget, pointer: Point, card: Point) -> bool {
        if target == PointerTarget::InteractiveControl || self.is_dragging() {
            return false;
        }
        self.state = DragState::Dragging(DragSession {
            start_pointer: pointer,
            start_card: card,
            pending_pointer: None,
            frame_pending: false,
            visual: card,
        });
        true
    }

    /// Record a move. At most one frame is requested until [`Self::on_frame`] runs.
    pub fn pointer_move(&mut self, pointer: Point) -> FrameRequest {
        let DragState::Dragging(session) = &mut self.state else {
            return FrameRequest::Ignored;
        };
        session.pending_pointer = Some(pointer);
        if session.frame_pending {
            FrameRequest::Coalesced
        } else {
            session.frame_pending = true;
            FrameRequest::Schedule
        }
    }

    /// Animation frame: turn the latest move into a visual position.
    pub fn on_frame(&mut self, viewport: Viewport, zoom_factor: f64) -> Option<Point> {
        let keep_visible = self.keep_visible;
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        session.frame_pending = false;
        let pointer = session.pending_pointer.take()?;
        session.visual = dragged_position(session, pointer, viewport, zoom_factor, keep_visible);
        Some(session.visual)
    }

    /// Pointer released: the final position in percent, or `None` if not dragging.
    pub fn end(
        &mut self,
        pointer: Point,
        viewport: Viewport,
        zoom_factor: f64,
    ) -> Option<PercentPoint> {
        let DragState::Dragging(session) = std::mem::replace(&mut self.state, DragState::Idle)
        else {
            return None;
        };
        let pixel = dragged_position(&session, pointer, viewport, zoom_factor, self.keep_visible);
        Some(pixel_to_percent(pixel, viewport))
    }

    /// Abort without producing a commit.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Pixel position for a persisted percent after a viewport resize.
    ///
    /// Returns `None` while a drag is active; the live drag owns the position then.
    pub fn resync(&self, percent: PercentPoint, viewport: Viewport) -> Option<Point> {
        if self.is_dragging() {
            return None;
        }
        Some(clamp_to_viewport(
            percent_to_pixel(percent, viewport),
            viewport,
            self.keep_visible,
        ))
    }
}

fn dragged_position(
    session: &DragSession,
    pointer: Point,
    viewport: Viewport,
    zoom_factor: f64,
    keep_visible: Size,
) -> Point {
    let zoom = sanitize_factor(zoom_factor);
    let dx = (pointer.x - session.start_pointer.x) / zoom;
    let dy = (pointer.y - session.start_pointer.y) / zoom;
    clamp_to_viewport(session.start_card.offset(dx, dy), viewport, keep_visible)
}
