//! Port doubles shared by the use case tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use mockall::mock;

use dv_core::card::next_z_index;
use dv_core::file_view::{FileInfo, LineBatch};
use dv_core::geometry::Point;
use dv_core::ports::{
    ByteContent, ByteRequest, CardRepositoryPort, ClockPort, ContentError, ContentPort,
    HostWindowPort, TimerCallback, TimerPort,
};
use dv_core::{Card, CardId, CardPatch, NewCard, ProjectId};

mock! {
    pub Content {}

    #[async_trait]
    impl ContentPort for Content {
        async fn file_info(&self, path: &str) -> Result<FileInfo, ContentError>;
        async fn read_lines(
            &self,
            path: &str,
            start_line: usize,
            count: usize,
        ) -> Result<LineBatch, ContentError>;
        async fn read_bytes(
            &self,
            path: &str,
            request: ByteRequest,
        ) -> Result<ByteContent, ContentError>;
    }
}

mock! {
    pub HostWindow {}

    impl HostWindowPort for HostWindow {
        fn scale_factor(&self) -> anyhow::Result<f64>;
        fn outer_position(&self) -> anyhow::Result<Point>;
        fn inner_position(&self) -> anyhow::Result<Point>;
    }
}

/// Card store that records every update it receives.
#[derive(Default)]
pub(crate) struct InMemoryCards {
    cards: Mutex<Vec<Card>>,
    updates: Mutex<Vec<(CardId, CardPatch)>>,
}

impl InMemoryCards {
    pub(crate) fn all(&self) -> Vec<Card> {
        self.cards.lock().unwrap().clone()
    }

    pub(crate) fn updates(&self) -> Vec<(CardId, CardPatch)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl CardRepositoryPort for InMemoryCards {
    async fn list(&self, project_id: &ProjectId) -> anyhow::Result<Vec<Card>> {
        let mut cards: Vec<Card> = self
            .cards
            .lock()
            .unwrap()
            .iter()
            .filter(|c| &c.project_id == project_id)
            .cloned()
            .collect();
        cards.sort_by_key(|c| c.z_index);
        Ok(cards)
    }

    async fn create(&self, card: NewCard) -> anyhow::Result<Card> {
        let mut cards = self.cards.lock().unwrap();
        let now = Utc::now();
        let position = card.position.unwrap_or_default();
        let z_index = next_z_index(cards.iter().filter(|c| c.project_id == card.project_id));
        let created = Card {
            id: CardId::new(),
            project_id: card.project_id,
            filename: card.filename,
            source: card.source,
            position_x: position.x,
            position_y: position.y,
            is_expanded: false,
            is_minimized: false,
            z_index,
            created_at: now,
            updated_at: now,
        };
        cards.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &CardId, patch: CardPatch) -> anyhow::Result<Option<Card>> {
        self.updates.lock().unwrap().push((id.clone(), patch.clone()));
        let mut cards = self.cards.lock().unwrap();
        Ok(cards.iter_mut().find(|c| &c.id == id).map(|card| {
            card.apply(&patch);
            card.updated_at = Utc::now();
            card.clone()
        }))
    }

    async fn delete(&self, id: &CardId) -> anyhow::Result<bool> {
        let mut cards = self.cards.lock().unwrap();
        let before = cards.len();
        cards.retain(|c| &c.id != id);
        Ok(cards.len() != before)
    }
}

/// Timer that only fires when a test says so.
#[derive(Default)]
pub(crate) struct ManualTimer {
    pending: Mutex<HashMap<String, (Duration, TimerCallback)>>,
}

impl ManualTimer {
    pub(crate) fn pending(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.pending.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub(crate) fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.pending.lock().unwrap().get(key).map(|(ttl, _)| *ttl)
    }

    pub(crate) fn take(&self, key: &str) -> Option<TimerCallback> {
        self.pending.lock().unwrap().remove(key).map(|(_, cb)| cb)
    }

    pub(crate) fn fire(&self, key: &str) {
        if let Some(callback) = self.take(key) {
            callback();
        }
    }
}

#[async_trait]
impl TimerPort for ManualTimer {
    async fn start(
        &self,
        key: &str,
        ttl: Duration,
        on_expire: TimerCallback,
    ) -> anyhow::Result<()> {
        self.pending
            .lock()
            .unwrap()
            .insert(key.to_string(), (ttl, on_expire));
        Ok(())
    }

    async fn stop(&self, key: &str) -> anyhow::Result<()> {
        self.pending.lock().unwrap().remove(key);
        Ok(())
    }

    async fn stop_all(&self) -> anyhow::Result<()> {
        self.pending.lock().unwrap().clear();
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct StepClock {
    now: AtomicI64,
}

impl StepClock {
    pub(crate) fn set(&self, now_ms: i64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }
}

impl ClockPort for StepClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
