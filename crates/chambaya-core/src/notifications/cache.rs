//! Stale-time cache for notification reads.
//!
//! Entries are served while younger than the stale time. Every mutation
//! calls [`NotificationCache::invalidate`], which clears all entries and
//! bumps a generation counter; a fetch that started before the bump is
//! not stored, so an old response can never mask the mutation.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chambaya_types::{Notification, NotificationStats};
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    fetched_at: Instant,
}

impl<T: Clone> Entry<T> {
    fn new(value: T, fetched_at: Instant) -> Self {
        Self { value, fetched_at }
    }

    fn fresh(&self, stale_time: Duration) -> Option<T> {
        (self.fetched_at.elapsed() < stale_time).then(|| self.value.clone())
    }
}

#[derive(Debug, Default)]
struct CacheState {
    generation: u64,
    lists: HashMap<Option<u32>, Entry<Vec<Notification>>>,
    unread: Option<Entry<Vec<Notification>>>,
    stats: Option<Entry<NotificationStats>>,
}

/// Token taken before a fetch and handed back when storing its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

#[derive(Debug)]
pub struct NotificationCache {
    stale_time: Duration,
    stats_stale_time: Duration,
    state: Mutex<CacheState>,
}

impl NotificationCache {
    /// Stats share `stale_time` until [`Self::with_stats_stale_time`] says otherwise.
    pub fn new(stale_time: Duration) -> Self {
        Self {
            stale_time,
            stats_stale_time: stale_time,
            state: Mutex::new(CacheState::default()),
        }
    }

    #[must_use]
    pub fn with_stats_stale_time(mut self, stats_stale_time: Duration) -> Self {
        self.stats_stale_time = stats_stale_time;
        self
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current generation; pass it back to the `store_*` call.
    pub fn generation(&self) -> Generation {
        Generation(self.state().generation)
    }

    pub fn list(&self, limit: Option<u32>) -> Option<Vec<Notification>> {
        let state = self.state();
        state.lists.get(&limit)?.fresh(self.stale_time)
    }

    pub fn unread(&self) -> Option<Vec<Notification>> {
        self.state().unread.as_ref()?.fresh(self.stale_time)
    }

    pub fn stats(&self) -> Option<NotificationStats> {
        self.state().stats.as_ref()?.fresh(self.stats_stale_time)
    }

    pub fn store_list(&self, generation: Generation, limit: Option<u32>, value: Vec<Notification>) {
        self.store(generation, |state, now| {
            state.lists.insert(limit, Entry::new(value, now));
        });
    }

    pub fn store_unread(&self, generation: Generation, value: Vec<Notification>) {
        self.store(generation, |state, now| state.unread = Some(Entry::new(value, now)));
    }

    pub fn store_stats(&self, generation: Generation, value: NotificationStats) {
        self.store(generation, |state, now| state.stats = Some(Entry::new(value, now)));
    }

    fn store(&self, generation: Generation, put: impl FnOnce(&mut CacheState, Instant)) {
        let mut state = self.state();
        if state.generation != generation.0 {
            tracing::debug!("dropping notification fetch that raced an invalidation");
            return;
        }
        put(&mut state, Instant::now());
    }

    /// Drops every entry so the next read refetches.
    pub fn invalidate(&self) {
        let mut state = self.state();
        state.generation = state.generation.wrapping_add(1);
        state.lists.clear();
        state.unread = None;
        state.stats = None;
        tracing::debug!(generation = state.generation, "notification cache invalidated");
    }
}
