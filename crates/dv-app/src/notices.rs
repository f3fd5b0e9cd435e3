//! Transient, auto-dismissing user notices.
//!
//! Every notice owns one timer in the [`TimerPort`]. Dismissing a notice, clearing
//! a card's notices or clearing the whole center stops the matching timers, so no
//! expiry ever fires into a component that is gone.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use dv_core::ports::TimerPort;
use dv_core::CardId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub id: String,
    pub level: NoticeLevel,
    pub message: String,
    /// Card the notice belongs to, if any.
    pub card_id: Option<CardId>,
}

type NoticeList = Mutex<Vec<Notice>>;

pub struct NoticeCenter {
    timer: Arc<dyn TimerPort>,
    ttl: Duration,
    notices: Arc<NoticeList>,
}

impl NoticeCenter {
    pub fn new(timer: Arc<dyn TimerPort>, ttl: Duration) -> Self {
        Self {
            timer,
            ttl,
            notices: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Notices currently on screen, oldest first.
    pub fn current(&self) -> Vec<Notice> {
        lock(&self.notices).clone()
    }

    /// Show a notice that disappears after the configured ttl.
    pub async fn push(
        &self,
        level: NoticeLevel,
        message: impl Into<String>,
        card_id: Option<CardId>,
    ) -> anyhow::Result<Notice> {
        let notice = Notice {
            id: uuid::Uuid::new_v4().to_string(),
            level,
            message: message.into(),
            card_id,
        };
        lock(&self.notices).push(notice.clone());

        let notices: Weak<NoticeList> = Arc::downgrade(&self.notices);
        let id = notice.id.clone();
        let expire = Box::new(move || {
            if let Some(notices) = notices.upgrade() {
                lock(&notices).retain(|n| n.id != id);
            }
        });
        if let Err(err) = self.timer.start(&timer_key(&notice.id), self.ttl, expire).await {
            lock(&self.notices).retain(|n| n.id != notice.id);
            return Err(err);
        }

        debug!(notice_id = %notice.id, level = ?notice.level, "Notice shown");
        Ok(notice)
    }

    pub async fn dismiss(&self, id: &str) -> anyhow::Result<()> {
        self.timer.stop(&timer_key(id)).await?;
        lock(&self.notices).retain(|n| n.id != id);
        Ok(())
    }

    /// Drop every notice of a card, e.g. when the card is deleted.
    pub async fn clear_card(&self, card_id: &CardId) -> anyhow::Result<()> {
        let ids: Vec<String> = lock(&self.notices)
            .iter()
            .filter(|n| n.card_id.as_ref() == Some(card_id))
            .map(|n| n.id.clone())
            .collect();
        for id in ids {
            self.dismiss(&id).await?;
        }
        Ok(())
    }

    /// Teardown: stop all timers and drop all notices.
    pub async fn clear(&self) -> anyhow::Result<()> {
        let ids: Vec<String> = lock(&self.notices).iter().map(|n| n.id.clone()).collect();
        for id in ids {
            self.timer.stop(&timer_key(&id)).await?;
        }
        lock(&self.notices).clear();
        Ok(())
    }
}

fn timer_key(id: &str) -> String {
    format!("notice:{id}")
}

fn lock(notices: &NoticeList) -> MutexGuard<'_, Vec<Notice>> {
    notices.lock().unwrap_or_else(PoisonError::into_inner)
}
