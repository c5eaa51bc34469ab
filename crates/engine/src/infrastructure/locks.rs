//! Per-character write locks.
//!
//! A unit of work holds its character's guard from `begin` until it is
//! committed or dropped, so two writers for one character run one after the
//! other. Different characters use different mutexes. A character's entry is
//! removed once the last guard or waiter for it is gone.

use std::sync::Arc;

use ascendant_domain::CharacterId;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = Arc<DashMap<CharacterId, Arc<Mutex<()>>>>;

#[derive(Default)]
pub struct CharacterLocks {
    locks: LockMap,
}

impl CharacterLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to one character.
    pub async fn acquire(&self, id: CharacterId) -> CharacterLockGuard {
        // Clone the Arc out so the shard lock is released before awaiting.
        let lock = self.locks.entry(id).or_default().clone();
        let guard = lock.lock_owned().await;
        CharacterLockGuard {
            guard: Some(guard),
            locks: self.locks.clone(),
            id,
        }
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Exclusive access to one character. Dropping it releases the mutex and
/// removes the map entry when nobody else holds or waits on it.
pub struct CharacterLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    locks: LockMap,
    id: CharacterId,
}

impl Drop for CharacterLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Waiters hold a clone of the Arc, so a count of one means only the map is left.
        self.locks.remove_if(&self.id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_character_waits() {
        let locks = Arc::new(CharacterLocks::new());
        let id = CharacterId::new();

        let guard = locks.acquire(id).await;
        let waiting = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(id).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiting)
            .await
            .expect("second writer should get the lock")
            .unwrap();
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn different_characters_do_not_block() {
        let locks = CharacterLocks::new();
        let _first = locks.acquire(CharacterId::new()).await;

        let second = tokio::time::timeout(
            Duration::from_millis(100),
            locks.acquire(CharacterId::new()),
        )
        .await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn released_entries_are_removed() {
        let locks = CharacterLocks::new();
        let held = locks.acquire(CharacterId::new()).await;
        drop(locks.acquire(CharacterId::new()).await);
        assert_eq!(locks.len(), 1);

        drop(held);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn entry_survives_while_a_waiter_remains() {
        let locks = Arc::new(CharacterLocks::new());
        let id = CharacterId::new();
        let held = locks.acquire(id).await;

        let waiting = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(id).await;
                tokio::time::sleep(Duration::from_millis(20)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(held);
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(locks.len(), 1);

        waiting.await.unwrap();
        assert!(locks.is_empty());
    }
}
