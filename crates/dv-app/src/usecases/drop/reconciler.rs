use std::sync::Arc;

use tracing::{debug, error, info, warn};

use dv_core::drop::{
    DropAction, DropEvent, DropIndicator, DropRejection, DropState, DropStateMachine,
};
use dv_core::geometry::{native_drop_to_content_space, Point, Viewport, WindowCalibration};
use dv_core::ports::{ClockPort, HostWindowPort};
use dv_core::ProjectId;

use super::{DropOutcome, ImportDroppedContent};
use crate::notices::{NoticeCenter, NoticeLevel};

/// Merges the page's drag signals and the host's native drop signals for one
/// canvas.
///
/// Native positions are converted into content space as they arrive, using the
/// window calibration captured at construction and the zoom of the moment. Every
/// outcome other than a created card is turned into a transient notice.
///
/// The reconciler owns no timers. With a hover timeout configured, the host
/// calls [`poll_hover_timeout`](Self::poll_hover_timeout) from its event loop,
/// at or after [`hover_deadline_ms`](Self::hover_deadline_ms); without polling a
/// hover waits for the native side indefinitely.
pub struct DropReconciler {
    project_id: ProjectId,
    state: DropState,
    calibration: WindowCalibration,
    hover_timeout_ms: Option<u64>,
    import: ImportDroppedContent,
    notices: Arc<NoticeCenter>,
    clock: Arc<dyn ClockPort>,
}

impl DropReconciler {
    pub fn new(
        project_id: ProjectId,
        host_window: &dyn HostWindowPort,
        import: ImportDroppedContent,
        notices: Arc<NoticeCenter>,
        clock: Arc<dyn ClockPort>,
        hover_timeout_ms: Option<u64>,
    ) -> Self {
        Self {
            project_id,
            state: DropState::Idle,
            calibration: capture_calibration(host_window),
            hover_timeout_ms,
            import,
            notices,
            clock,
        }
    }

    pub fn state(&self) -> &DropState {
        &self.state
    }

    pub fn indicator(&self) -> DropIndicator {
        self.state.indicator()
    }

    pub fn calibration(&self) -> WindowCalibration {
        self.calibration
    }

    pub async fn page_drag_enter(&mut self, has_files: bool) {
        let at_ms = self.clock.now_ms();
        self.dispatch(DropEvent::PageDragEnter { has_files, at_ms }, Viewport::default())
            .await;
    }

    pub async fn page_drag_leave(&mut self, left_window: bool) {
        self.dispatch(DropEvent::PageDragLeave { left_window }, Viewport::default())
            .await;
    }

    /// In-page text drop; `position` is already in content space.
    pub async fn page_drop_text(
        &mut self,
        filename: String,
        text: String,
        position: Point,
        viewport: Viewport,
    ) -> Vec<DropOutcome> {
        self.dispatch(
            DropEvent::PageDropText {
                filename,
                text,
                position,
            },
            viewport,
        )
        .await
    }

    /// Native drag-over at a window-relative physical position.
    pub async fn native_over(&mut self, native: Point, zoom_factor: f64) {
        let position = self.to_content_space(native, zoom_factor);
        self.dispatch(DropEvent::NativeOver { position }, Viewport::default())
            .await;
    }

    pub async fn native_leave(&mut self) {
        self.dispatch(DropEvent::NativeLeave, Viewport::default())
            .await;
    }

    /// Native drop. Only the first path is imported.
    pub async fn native_drop(
        &mut self,
        paths: Vec<String>,
        native: Option<Point>,
        zoom_factor: f64,
        viewport: Viewport,
    ) -> Vec<DropOutcome> {
        let position = native.map(|p| self.to_content_space(p, zoom_factor));
        self.dispatch(DropEvent::NativeDrop { paths, position }, viewport)
            .await
    }

    /// Clock time at which an unconfirmed hover expires, if one is pending.
    pub fn hover_deadline_ms(&self) -> Option<i64> {
        match (self.hover_timeout_ms, &self.state) {
            (Some(timeout), DropState::Hovering { since_ms }) => {
                Some(since_ms.saturating_add(i64::try_from(timeout).unwrap_or(i64::MAX)))
            }
            _ => None,
        }
    }

    /// Give up on a hover the native side never confirmed.
    ///
    /// Does nothing without a configured timeout or before it has elapsed.
    pub async fn poll_hover_timeout(&mut self) -> Vec<DropOutcome> {
        let (Some(timeout), DropState::Hovering { since_ms }) = (self.hover_timeout_ms, &self.state)
        else {
            return Vec::new();
        };
        let waited = self.clock.now_ms().saturating_sub(*since_ms);
        if waited < 0 || (waited as u64) < timeout {
            return Vec::new();
        }
        self.dispatch(DropEvent::HoverTimedOut, Viewport::default())
            .await
    }

    /// Feed one event through the state machine and run the resulting actions.
    ///
    /// The state is updated before any import starts, so the gesture is over even
    /// while content is still being read.
    #[tracing::instrument(
        name = "usecase.drop_reconciler.dispatch",
        skip_all,
        fields(project_id = %self.project_id)
    )]
    pub async fn dispatch(&mut self, event: DropEvent, viewport: Viewport) -> Vec<DropOutcome> {
        let state = std::mem::replace(&mut self.state, DropState::Idle);
        let before = state.indicator();
        let (next, actions) = DropStateMachine::transition(state, event);
        if next.indicator() != before || !actions.is_empty() {
            debug!(state = ?next, actions = actions.len(), "Drop state changed");
        }
        self.state = next;

        let mut outcomes = Vec::with_capacity(actions.len());
        for action in actions {
            let outcome = self.run(action, viewport).await;
            self.notify(&outcome).await;
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn run(&self, action: DropAction, viewport: Viewport) -> DropOutcome {
        let result = match action {
            DropAction::ImportFile { path, position } => {
                self.import
                    .import_file(&self.project_id, &path, position, viewport)
                    .await
            }
            DropAction::ImportText {
                filename,
                text,
                position,
            } => {
                self.import
                    .import_text(&self.project_id, &filename, text, position, viewport)
                    .await
            }
            DropAction::Reject { reason } => {
                info!(reason = ?reason, "Drop abandoned");
                Ok(DropOutcome::Abandoned { reason })
            }
        };
        result.unwrap_or_else(|err| {
            error!(error = %err, "Drop import failed");
            DropOutcome::Failed {
                reason: format!("{err:#}"),
            }
        })
    }

    async fn notify(&self, outcome: &DropOutcome) {
        let message = match outcome {
            DropOutcome::Created { .. } => return,
            DropOutcome::Rejected { error } => error.to_string(),
            DropOutcome::Abandoned { reason } => rejection_message(reason).to_string(),
            DropOutcome::Failed { reason } => format!("Failed to add card: {reason}"),
        };
        if let Err(err) = self.notices.push(NoticeLevel::Error, message, None).await {
            warn!(error = %err, "Failed to show drop notice");
        }
    }

    fn to_content_space(&self, native: Point, zoom_factor: f64) -> Point {
        native_drop_to_content_space(native, self.calibration, zoom_factor)
    }
}

fn rejection_message(reason: &DropRejection) -> &'static str {
    match reason {
        DropRejection::NativeSignalMissing => {
            "The window never confirmed the file drag. Try dropping again."
        }
    }
}

fn capture_calibration(host_window: &dyn HostWindowPort) -> WindowCalibration {
    let read = || -> anyhow::Result<WindowCalibration> {
        Ok(WindowCalibration::from_positions(
            host_window.scale_factor()?,
            host_window.outer_position()?,
            host_window.inner_position()?,
        ))
    };
    match read() {
        Ok(calibration) => {
            debug!(
                scale_factor = calibration.scale_factor,
                titlebar_height = calibration.titlebar_height,
                "Window calibration captured"
            );
            calibration
        }
        Err(err) => {
            warn!(error = %err, "Host window facts unavailable; assuming an undecorated 1x window");
            WindowCalibration::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::usecases::drop::DropPolicy;
    use crate::usecases::testing::{
        InMemoryCards, ManualTimer, MockContent, MockHostWindow, StepClock,
    };
    use dv_core::geometry::{PercentPoint, Size};
    use dv_core::ports::{ByteContent, ContentError};
    use dv_core::PreviewError;

    const VIEWPORT: Viewport = Size::new(1000.0, 800.0);
    const MIB: u64 = 1024 * 1024;

    struct Harness {
        reconciler: DropReconciler,
        cards: Arc<InMemoryCards>,
        notices: Arc<NoticeCenter>,
        clock: Arc<StepClock>,
    }

    fn host(scale: f64, titlebar: f64) -> MockHostWindow {
        let mut host = MockHostWindow::new();
        host.expect_scale_factor().times(1).returning(move || Ok(scale));
        host.expect_outer_position()
            .times(1)
            .returning(|| Ok(Point::new(100.0, 100.0)));
        host.expect_inner_position()
            .times(1)
            .returning(move || Ok(Point::new(100.0, 100.0 + titlebar)));
        host
    }

    fn harness(
        content: MockContent,
        host: MockHostWindow,
        hover_timeout_ms: Option<u64>,
    ) -> Harness {
        let cards = Arc::new(InMemoryCards::default());
        let notices = Arc::new(NoticeCenter::new(
            Arc::new(ManualTimer::default()),
            Duration::from_secs(3),
        ));
        let clock = Arc::new(StepClock::default());
        let import = ImportDroppedContent::new(
            Arc::new(content),
            cards.clone(),
            DropPolicy {
                max_content_bytes: MIB,
                card_offset: Point::new(140.0, 20.0),
                keep_visible: Size::new(100.0, 50.0),
            },
        );
        Harness {
            reconciler: DropReconciler::new(
                ProjectId::from("p1"),
                &host,
                import,
                notices.clone(),
                clock.clone(),
                hover_timeout_ms,
            ),
            cards,
            notices,
            clock,
        }
    }

    fn text_file(bytes: usize) -> MockContent {
        let mut content = MockContent::new();
        content.expect_read_bytes().returning(move |_, request| {
            let size = bytes as u64;
            if size > request.max_size {
                return Err(ContentError::TooLarge {
                    size,
                    max: request.max_size,
                });
            }
            Ok(ByteContent {
                filename: "readme.md".into(),
                content: vec![b'a'; bytes],
                byte_size: size,
            })
        });
        content
    }

    #[tokio::test]
    async fn hover_then_native_over_then_drop_creates_card() {
        let mut h = harness(text_file(64), host(1.25, 32.0), None);

        h.reconciler.page_drag_enter(true).await;
        assert_eq!(h.reconciler.indicator(), DropIndicator::Preparing);

        h.reconciler.native_over(Point::new(400.0, 300.0), 1.5).await;
        assert_eq!(h.reconciler.indicator(), DropIndicator::ReleaseToDrop);
        let DropState::Ready { position } = h.reconciler.state().clone() else {
            panic!("expected ready");
        };
        assert!((position.x - 213.333_333).abs() < 1e-3);
        assert!((position.y - 142.933_333).abs() < 1e-3);

        let outcomes = h
            .reconciler
            .native_drop(
                vec!["/docs/readme.md".into(), "/docs/other.md".into()],
                None,
                1.5,
                VIEWPORT,
            )
            .await;

        assert_eq!(h.reconciler.state(), &DropState::Idle);
        assert_eq!(outcomes.len(), 1);
        let DropOutcome::Created { card } = &outcomes[0] else {
            panic!("expected a card, got {outcomes:?}");
        };
        assert_eq!(card.source.file_path(), Some("/docs/readme.md"));
        let expected = PercentPoint::new(
            (400.0 / 1.875 - 140.0) / 1000.0 * 100.0,
            ((300.0 - 32.0) / 1.875 - 20.0) / 800.0 * 100.0,
        );
        assert!((card.position_x - expected.x).abs() < 1e-9);
        assert!((card.position_y - expected.y).abs() < 1e-9);
        assert_eq!(h.cards.all().len(), 1);
        assert!(h.notices.current().is_empty());
    }

    #[tokio::test]
    async fn oversize_drop_notifies_and_returns_to_idle() {
        let mut h = harness(text_file(2 * MIB as usize), host(1.0, 0.0), None);

        h.reconciler.page_drag_enter(true).await;
        h.reconciler.native_over(Point::new(500.0, 400.0), 1.0).await;
        let outcomes = h
            .reconciler
            .native_drop(vec!["/big.log".into()], Some(Point::new(500.0, 400.0)), 1.0, VIEWPORT)
            .await;

        assert_eq!(
            outcomes,
            vec![DropOutcome::Rejected {
                error: PreviewError::OversizeContent {
                    size: 2 * MIB,
                    max: MIB
                }
            }]
        );
        assert_eq!(h.reconciler.state(), &DropState::Idle);
        assert!(h.cards.all().is_empty());
        assert_eq!(h.notices.current().len(), 1);
        assert_eq!(h.notices.current()[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn unconfirmed_native_drop_is_abandoned() {
        let mut h = harness(MockContent::new(), host(1.0, 0.0), None);

        h.reconciler.page_drag_enter(true).await;
        let outcomes = h
            .reconciler
            .native_drop(vec!["/a.txt".into()], Some(Point::new(10.0, 10.0)), 1.0, VIEWPORT)
            .await;

        assert_eq!(
            outcomes,
            vec![DropOutcome::Abandoned {
                reason: DropRejection::NativeSignalMissing
            }]
        );
        assert_eq!(h.reconciler.state(), &DropState::Idle);
        assert!(h.cards.all().is_empty());
        assert_eq!(h.notices.current().len(), 1);
    }

    #[tokio::test]
    async fn leaving_window_resets_hover() {
        let mut h = harness(MockContent::new(), host(1.0, 0.0), None);

        h.reconciler.page_drag_enter(true).await;
        h.reconciler.page_drag_leave(false).await;
        assert_eq!(h.reconciler.indicator(), DropIndicator::Preparing);

        h.reconciler.page_drag_leave(true).await;
        assert_eq!(h.reconciler.state(), &DropState::Idle);

        h.reconciler.native_over(Point::new(1.0, 1.0), 1.0).await;
        h.reconciler.native_leave().await;
        assert_eq!(h.reconciler.state(), &DropState::Idle);
    }

    #[tokio::test]
    async fn hover_waits_forever_without_timeout() {
        let mut h = harness(MockContent::new(), host(1.0, 0.0), None);
        h.reconciler.page_drag_enter(true).await;

        h.clock.set(1_000_000);
        assert_eq!(h.reconciler.hover_deadline_ms(), None);
        assert!(h.reconciler.poll_hover_timeout().await.is_empty());
        assert_eq!(h.reconciler.indicator(), DropIndicator::Preparing);
    }

    #[tokio::test]
    async fn hover_timeout_falls_back_to_notice() {
        let mut h = harness(MockContent::new(), host(1.0, 0.0), Some(5_000));
        h.clock.set(1_000);
        h.reconciler.page_drag_enter(true).await;
        assert_eq!(h.reconciler.hover_deadline_ms(), Some(6_000));

        h.clock.set(5_999);
        assert!(h.reconciler.poll_hover_timeout().await.is_empty());

        h.clock.set(6_000);
        let outcomes = h.reconciler.poll_hover_timeout().await;

        assert_eq!(
            outcomes,
            vec![DropOutcome::Abandoned {
                reason: DropRejection::NativeSignalMissing
            }]
        );
        assert_eq!(h.reconciler.state(), &DropState::Idle);
        assert_eq!(h.reconciler.hover_deadline_ms(), None);
        assert_eq!(h.notices.current().len(), 1);
        assert!(h.cards.all().is_empty());
    }

    #[tokio::test]
    async fn text_drop_creates_inline_card() {
        let mut h = harness(MockContent::new(), host(1.0, 0.0), None);

        let outcomes = h
            .reconciler
            .page_drop_text(
                "clip.txt".into(),
                "some text".into(),
                Point::new(640.0, 420.0),
                VIEWPORT,
            )
            .await;

        let DropOutcome::Created { card } = &outcomes[0] else {
            panic!("expected a card, got {outcomes:?}");
        };
        assert_eq!(card.filename, "clip.txt");
        assert_eq!(card.position(), PercentPoint::new(50.0, 50.0));
    }

    #[tokio::test]
    async fn host_failure_falls_back_to_identity_calibration() {
        let mut host = MockHostWindow::new();
        host.expect_scale_factor()
            .returning(|| Err(anyhow::anyhow!("window gone")));
        host.expect_outer_position().never();
        host.expect_inner_position().never();

        let h = harness(MockContent::new(), host, None);

        assert_eq!(h.reconciler.calibration(), WindowCalibration::default());
    }
}
