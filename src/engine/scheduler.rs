use std::{sync::Arc, time::Duration};

use tokio::sync::RwLock;
use tracing::debug;

use super::store::Store;

/// Runs store mutations after a fixed delay, off the caller's task.
#[derive(Clone)]
pub struct Scheduler {
    store: Arc<RwLock<Store>>,
    interval: Duration,
}

impl Scheduler {
    pub fn new(store: Arc<RwLock<Store>>, interval: Duration) -> Self {
        Self { store, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleeps one interval, then applies `action` under the write lock. The
    /// action gets the scheduler back so it can queue a follow-up phase.
    ///
    /// Must be called from within a tokio runtime.
    pub fn delayed_apply<F>(&self, label: &'static str, action: F)
    where
        F: FnOnce(&mut Store, &Scheduler) + Send + 'static,
    {
        let scheduler = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(scheduler.interval).await;
            let mut store = scheduler.store.write().await;
            action(&mut store, &scheduler);
            debug!(action = label, "delayed action applied");
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn action_lands_after_interval() {
        let store = Arc::new(RwLock::new(Store::default()));
        let scheduler = Scheduler::new(store.clone(), Duration::from_millis(20));

        scheduler.delayed_apply("bump", |store, _| {
            store.next_id().unwrap();
        });
        assert_eq!(store.read().await.generated_id(), 0);

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(store.read().await.generated_id(), 1);
    }

    #[tokio::test]
    async fn actions_can_chain() {
        let store = Arc::new(RwLock::new(Store::default()));
        let scheduler = Scheduler::new(store.clone(), Duration::from_millis(50));

        scheduler.delayed_apply("first", |store, scheduler| {
            store.next_id().unwrap();
            scheduler.delayed_apply("second", |store, _| {
                store.next_id().unwrap();
            });
        });

        tokio::time::sleep(Duration::from_millis(75)).await;
        assert_eq!(store.read().await.generated_id(), 1);
        tokio::time::sleep(Duration::from_millis(75)).await;
        assert_eq!(store.read().await.generated_id(), 2);
    }
}
