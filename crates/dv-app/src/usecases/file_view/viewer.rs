use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::info;

use dv_core::file_view::FileViewState;
use dv_core::ports::{ContentPort, VirtualListPort};
use dv_core::CardId;

/// Opens and closes the full views of cards.
///
/// Each card has at most one live session. Opening a card's view again, for the
/// same path or a new one, closes the previous session and starts from an empty
/// cache.
pub struct FileViewer {
    content: Arc<dyn ContentPort>,
    list: Arc<dyn VirtualListPort>,
    first_screen_lines: usize,
    buffer_lines: usize,
    sessions: Mutex<HashMap<CardId, Arc<super::FileViewSession>>>,
}

impl FileViewer {
    pub fn new(
        content: Arc<dyn ContentPort>,
        list: Arc<dyn VirtualListPort>,
        first_screen_lines: usize,
        buffer_lines: usize,
    ) -> Self {
        Self {
            content,
            list,
            first_screen_lines,
            buffer_lines,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Open the full view of `card_id` on `path`.
    ///
    /// The session is registered before loading starts, so a close issued while
    /// the first screen is in flight cancels it.
    #[tracing::instrument(
        name = "usecase.file_viewer.open",
        skip(self),
        fields(card_id = %card_id, path = %path)
    )]
    pub async fn open(
        &self,
        card_id: &CardId,
        path: &str,
    ) -> (Arc<super::FileViewSession>, FileViewState) {
        let session = Arc::new(super::FileViewSession::new(
            path,
            self.content.clone(),
            self.list.clone(),
            self.first_screen_lines,
            self.buffer_lines,
        ));
        let previous = self.lock().insert(card_id.clone(), session.clone());
        if let Some(previous) = previous {
            info!(previous_session = %previous.id(), "Replacing open file view");
            previous.close();
        }

        let state = session.open().await;
        (session, state)
    }

    pub fn session(&self, card_id: &CardId) -> Option<Arc<super::FileViewSession>> {
        self.lock().get(card_id).cloned()
    }

    /// Close the view of `card_id`. Returns `false` when none was open.
    pub fn close(&self, card_id: &CardId) -> bool {
        match self.lock().remove(card_id) {
            Some(session) => {
                session.close();
                true
            }
            None => false,
        }
    }

    pub fn close_all(&self) {
        let sessions: Vec<_> = self.lock().drain().map(|(_, s)| s).collect();
        for session in sessions {
            session.close();
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CardId, Arc<super::FileViewSession>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
