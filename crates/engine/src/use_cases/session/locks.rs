//! Per-session serialization of turns.

use std::sync::Arc;

use dashmap::DashMap;
use taleturn_domain::SessionToken;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per session token.
///
/// Holding the guard makes "count prior turns, assign the next order, append,
/// update the session" a single step for that session. Different tokens never
/// share a mutex. An entry lives only while someone holds or waits for it.
#[derive(Default)]
pub struct SessionLocks {
    locks: DashMap<SessionToken, Arc<Mutex<()>>>,
}

/// Exclusive hold on one session. Dropping it releases the mutex and removes
/// the map entry when no other task is waiting on it.
pub struct SessionGuard<'a> {
    locks: &'a SessionLocks,
    token: SessionToken,
    guard: Option<OwnedMutexGuard<()>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, token: &SessionToken) -> SessionGuard<'_> {
        // Clone the Arc out so the map shard is not held across the await.
        let mutex = self
            .locks
            .entry(token.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = mutex.lock_owned().await;
        SessionGuard {
            locks: self,
            token: token.clone(),
            guard: Some(guard),
        }
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // The map's own Arc is the only one left once no task holds or awaits
        // the mutex; a new locker bumps the count under the same shard lock.
        self.locks
            .locks
            .remove_if(&self.token, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
