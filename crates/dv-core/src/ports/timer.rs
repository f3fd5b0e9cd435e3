use std::time::Duration;

/// Runs once when a timer fires. Never runs for a stopped timer.
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Keyed one-shot timers owned by a component and released on its teardown.
#[async_trait::async_trait]
pub trait TimerPort: Send + Sync {
    /// Start (or restart) the timer named `key`.
    async fn start(&self, key: &str, ttl: Duration, on_expire: TimerCallback)
        -> anyhow::Result<()>;
    async fn stop(&self, key: &str) -> anyhow::Result<()>;
    /// Stop every pending timer.
    async fn stop_all(&self) -> anyhow::Result<()>;
}
