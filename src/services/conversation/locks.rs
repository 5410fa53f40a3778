//! Single-flight lock keyed by sender.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Serialises message handling per sender so read-modify-write sequences on
/// one conversation record never interleave. Different senders proceed in
/// parallel.
#[derive(Debug, Clone, Default)]
pub struct UserLocks {
    inner: Arc<Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>>,
}

/// Held for the duration of one workflow run.
#[derive(Debug)]
pub struct UserGuard {
    _guard: OwnedMutexGuard<()>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, key: i64) -> UserGuard {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            // Entries referenced only by the map are neither held nor awaited.
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(map.entry(key).or_default())
        };
        UserGuard {
            _guard: lock.lock_owned().await,
        }
    }

    /// Number of senders currently holding or awaiting a lock.
    pub fn active(&self) -> usize {
        let map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        map.values().filter(|lock| Arc::strong_count(lock) > 1).count()
    }
}
