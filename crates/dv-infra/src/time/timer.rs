use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tokio::time::{sleep, Duration};
use tracing::debug;

use dv_core::ports::{TimerCallback, TimerPort};

type TimerMap = HashMap<String, (u64, AbortHandle)>;

/// Keyed one-shot timers on the tokio runtime.
///
/// Dropping the timer aborts everything still pending.
pub struct Timer {
    timers: Arc<Mutex<TimerMap>>,
    generation: AtomicU64,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            timers: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
        }
    }

    pub async fn pending(&self) -> usize {
        self.timers.lock().await.len()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TimerPort for Timer {
    async fn start(
        &self,
        key: &str,
        ttl: Duration,
        on_expire: TimerCallback,
    ) -> anyhow::Result<()> {
        let timers = Arc::clone(&self.timers);
        let key_clone = key.to_string();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);

        let mut timers_guard = self.timers.lock().await;
        if let Some((_, existing)) = timers_guard.remove(key) {
            existing.abort();
        }

        let handle = tokio::spawn(async move {
            sleep(ttl).await;
            {
                let mut timers_guard = timers.lock().await;
                match timers_guard.get(&key_clone) {
                    Some((current, _)) if *current == generation => {
                        timers_guard.remove(&key_clone);
                    }
                    _ => return,
                }
            }
            debug!(key = %key_clone, "timer fired");
            on_expire();
        });

        timers_guard.insert(key.to_string(), (generation, handle.abort_handle()));
        debug!(key = %key, ttl_ms = ttl.as_millis() as u64, "timer started");
        Ok(())
    }

    async fn stop(&self, key: &str) -> anyhow::Result<()> {
        let mut timers_guard = self.timers.lock().await;
        if let Some((_, handle)) = timers_guard.remove(key) {
            handle.abort();
            debug!(key = %key, "timer stopped");
        }
        Ok(())
    }

    async fn stop_all(&self) -> anyhow::Result<()> {
        let mut timers_guard = self.timers.lock().await;
        for (_, (_, handle)) in timers_guard.drain() {
            handle.abort();
        }
        Ok(())
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if let Ok(mut timers) = self.timers.try_lock() {
            for (_, (_, handle)) in timers.drain() {
                handle.abort();
            }
        }
    }
}
