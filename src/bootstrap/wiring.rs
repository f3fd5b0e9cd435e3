//! # Dependency Injection
//!
//! Builds the infra adapters, groups them into [`AppDeps`] and hands out use
//! cases through [`PreviewRuntime`].
//!
//! This is the only place that depends on dv-infra and dv-app at once. It
//! assembles; it does not decide. No business rules and no config validation
//! live here.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use dv_app::usecases::{
    AddFileCard, BringCardToFront, CardDragController, DeleteCard, DropPolicy, DropReconciler,
    FileViewer, ImportDroppedContent, ListCards, LoadQuickPreview, ToggleCardExpanded,
    ToggleCardMinimized,
};
use dv_app::{AppDeps, NoticeCenter};
use dv_core::{Card, PreviewConfig, ProjectId};
use dv_infra::fs::{app_data_dir, cards_dir};
use dv_infra::{
    FixedHostWindow, FsContentService, JsonCardStore, SystemClock, Timer, TracingVirtualList,
};

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Data directory resolution failed: {0}")]
    DataDir(String),
}

/// Resolve the data directory the store and logs live under.
pub fn resolve_data_dir(config: &PreviewConfig) -> WiringResult<PathBuf> {
    app_data_dir(&config.data_dir).map_err(|e| WiringError::DataDir(e.to_string()))
}

/// Wire every port to its infra implementation.
///
/// The host window is the headless one: unit scale, no title bar. A windowed
/// shell replaces it with its own adapter.
pub fn wire_dependencies(config: &PreviewConfig) -> WiringResult<AppDeps> {
    let data_dir = resolve_data_dir(config)?;

    Ok(AppDeps {
        content: Arc::new(FsContentService::new()),
        virtual_list: Arc::new(TracingVirtualList::new()),
        cards: Arc::new(JsonCardStore::new(
            cards_dir(&data_dir),
            config.default_position,
        )),
        host_window: Arc::new(FixedHostWindow::default()),
        clock: Arc::new(SystemClock),
        timer: Arc::new(Timer::new()),
        config: config.clone(),
    })
}

/// Use case accessors over one set of wired dependencies.
///
/// The file viewer and the notice center are shared: every accessor that needs
/// them gets the same instance.
pub struct PreviewRuntime {
    deps: AppDeps,
    viewer: Arc<FileViewer>,
    notices: Arc<NoticeCenter>,
}

impl PreviewRuntime {
    pub fn new(deps: AppDeps) -> Self {
        let viewer = Arc::new(FileViewer::new(
            deps.content.clone(),
            deps.virtual_list.clone(),
            deps.config.first_screen_lines,
            deps.config.buffer_lines,
        ));
        let notices = Arc::new(NoticeCenter::new(
            deps.timer.clone(),
            Duration::from_millis(deps.config.notice_ttl_ms),
        ));
        Self {
            deps,
            viewer,
            notices,
        }
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.deps.config
    }

    pub fn viewer(&self) -> Arc<FileViewer> {
        self.viewer.clone()
    }

    pub fn notices(&self) -> Arc<NoticeCenter> {
        self.notices.clone()
    }

    pub fn list_cards(&self) -> ListCards {
        ListCards::new(self.deps.cards.clone())
    }

    pub fn add_file_card(&self) -> AddFileCard {
        AddFileCard::new(self.deps.cards.clone(), self.deps.config.default_position)
    }

    pub fn delete_card(&self) -> DeleteCard {
        DeleteCard::new(
            self.deps.cards.clone(),
            self.viewer.clone(),
            self.notices.clone(),
        )
    }

    pub fn bring_card_to_front(&self) -> BringCardToFront {
        BringCardToFront::new(self.deps.cards.clone())
    }

    pub fn toggle_card_minimized(&self) -> ToggleCardMinimized {
        ToggleCardMinimized::new(self.deps.cards.clone())
    }

    pub fn toggle_card_expanded(&self) -> ToggleCardExpanded {
        ToggleCardExpanded::new(self.deps.cards.clone(), self.viewer.clone())
    }

    pub fn quick_preview(&self) -> LoadQuickPreview {
        LoadQuickPreview::new(
            self.deps.content.clone(),
            self.deps.config.quick_preview_bytes,
        )
    }

    pub fn import_dropped_content(&self) -> ImportDroppedContent {
        ImportDroppedContent::new(
            self.deps.content.clone(),
            self.deps.cards.clone(),
            DropPolicy::from(&self.deps.config),
        )
    }

    /// A reconciler for one canvas. Captures the window calibration now.
    pub fn drop_reconciler(&self, project_id: ProjectId) -> DropReconciler {
        DropReconciler::new(
            project_id,
            self.deps.host_window.as_ref(),
            self.import_dropped_content(),
            self.notices.clone(),
            self.deps.clock.clone(),
            self.deps.config.hover_timeout_ms,
        )
    }

    pub fn drag_controller(&self, card: Card) -> CardDragController {
        CardDragController::new(card, self.deps.cards.clone(), self.deps.config.min_visible)
    }
}
