//! In-memory simulation of the PHY API.
//!
//! All records live in one [`Store`] behind a tokio `RwLock`. Queries take the
//! shared lock and return deep copies; synchronous mutations take the exclusive
//! lock. Asynchronous operations (OS install, power control) validate under the
//! shared lock and hand the actual state change to the [`Scheduler`], which
//! applies it one action interval later. The check and the delayed effect are
//! not atomic: two calls racing inside one interval both pass validation.

use std::{sync::Arc, time::Duration};

use tokio::sync::RwLock;

use crate::{
    dataset::Dataset,
    domain::{ListParams, PaginateMeta},
};

mod dedicated_subnets;
mod error;
mod private_networks;
mod scheduler;
mod servers;
mod services;
mod store;


pub use error::{EngineError, EngineResult, ErrorKind};
pub use scheduler::Scheduler;
pub use store::Store;

pub const DEFAULT_ACTION_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Clone)]
pub struct Engine {
    store: Arc<RwLock<Store>>,
    scheduler: Scheduler,
}

impl Engine {
    pub fn new(dataset: Dataset) -> Self {
        Self::with_action_interval(dataset, DEFAULT_ACTION_INTERVAL)
    }

    /// A zero interval falls back to [`DEFAULT_ACTION_INTERVAL`].
    pub fn with_action_interval(dataset: Dataset, interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            DEFAULT_ACTION_INTERVAL
        } else {
            interval
        };
        let store = Arc::new(RwLock::new(Store::from_dataset(dataset)));
        let scheduler = Scheduler::new(store.clone(), interval);
        Self { store, scheduler }
    }

    pub fn action_interval(&self) -> Duration {
        self.scheduler.interval()
    }

    /// Copy of every record, including the ID counter.
    pub async fn snapshot(&self) -> Dataset {
        self.store.read().await.to_dataset()
    }

    pub async fn last_generated_id(&self) -> i64 {
        self.store.read().await.generated_id()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Dataset::empty())
    }
}

fn paginate<T: Clone>(items: &[T], params: ListParams) -> (PaginateMeta, Vec<T>) {
    let count = items.len();
    let offset = params.offset.unwrap_or(0);
    let page_size = params.limit.unwrap_or(count);
    let page = if page_size == 0 {
        1
    } else {
        offset / page_size + 1
    };
    let window = items
        .iter()
        .skip(offset)
        .take(page_size)
        .cloned()
        .collect();
    (
        PaginateMeta {
            count,
            page,
            page_size,
        },
        window,
    )
}
