//! In-process memo of solved runs.
//!
//! Keyed by run id. A key is computed at most once even when many threads
//! ask for it at the same time: the map lock is only held to find the
//! key's slot, and the slot lock is held across the computation, so later
//! callers wait for the first one and then read its value. A failed
//! computation leaves the slot empty so the next caller retries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::AppResult;
use crate::run_service::Solution;

type Slot = Arc<Mutex<Option<Arc<Solution>>>>;

#[derive(Debug, Default)]
pub struct TrajectoryCache {
    slots: Mutex<HashMap<String, Slot>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    // Slot contents are written only after a successful compute, so a
    // poisoned lock still guards a consistent value.
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TrajectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Arc<Solution>> {
        let slot = lock(&self.slots).get(key).cloned()?;
        let value = lock(&slot).clone();
        value
    }

    pub fn get_or_compute<F>(&self, key: &str, compute: F) -> AppResult<Arc<Solution>>
    where
        F: FnOnce() -> AppResult<Solution>,
    {
        let slot = {
            let mut slots = lock(&self.slots);
            Arc::clone(slots.entry(key.to_string()).or_default())
        };

        let mut value = lock(&slot);
        if let Some(solution) = value.as_ref() {
            debug!(key, "memo hit");
            return Ok(Arc::clone(solution));
        }

        debug!(key, "memo miss");
        let solution = Arc::new(compute()?);
        *value = Some(Arc::clone(&solution));
        Ok(solution)
    }

    pub fn len(&self) -> usize {
        lock(&self.slots)
            .values()
            .filter(|slot| lock(slot).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.slots).clear();
    }
}
