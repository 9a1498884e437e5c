//! In-memory key/value cache with per-entry expiry.
//!
//! Expiry is driven by one sweeper task per cache that sleeps until the
//! earliest deadline in a min-heap. Each insert carries a generation stamp,
//! so a deadline scheduled for an overwritten value never removes its
//! replacement.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, trace};

/// Deadline used when `now + ttl` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

struct Entry<V> {
    value: V,
    expires_at: Instant,
    generation: u64,
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct Deadline<K> {
    at: Instant,
    generation: u64,
    key: K,
}

struct State<K, V> {
    entries: HashMap<K, Entry<V>>,
    deadlines: BinaryHeap<Reverse<Deadline<K>>>,
}

struct Inner<K, V> {
    name: &'static str,
    state: Mutex<State<K, V>>,
    next_generation: AtomicU64,
    wake: Arc<Notify>,
}

impl<K, V> Drop for Inner<K, V> {
    fn drop(&mut self) {
        // Lets the sweeper observe the drop and exit.
        self.wake.notify_one();
    }
}

impl<K: Hash + Eq + Ord, V> Inner<K, V> {
    /// Drops expired entries and returns the next pending deadline.
    fn purge_expired(&self, now: Instant) -> Option<Instant> {
        let mut state = self.state.lock();
        let mut removed = 0_usize;

        while let Some(Reverse(next)) = state.deadlines.peek() {
            if next.at > now {
                return Some(next.at);
            }
            let Some(Reverse(deadline)) = state.deadlines.pop() else {
                break;
            };
            let current = state
                .entries
                .get(&deadline.key)
                .is_some_and(|entry| entry.generation == deadline.generation);
            if current {
                state.entries.remove(&deadline.key);
                removed += 1;
            }
        }

        if removed > 0 {
            trace!(cache = self.name, removed, "Swept expired entries");
        }
        None
    }
}

/// Concurrent cache whose entries disappear after their own time-to-live.
///
/// Cloning yields another handle to the same store. Must be created inside a
/// Tokio runtime; the sweeper task exits once every handle is dropped.
pub struct ExpiringCache<K, V> {
    inner: Arc<Inner<K, V>>,
}

impl<K, V> Clone for ExpiringCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> fmt::Debug for ExpiringCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiringCache")
            .field("name", &self.inner.name)
            .field("len", &self.inner.state.lock().entries.len())
            .finish_non_exhaustive()
    }
}

impl<K, V> ExpiringCache<K, V>
where
    K: Hash + Eq + Ord + Clone + fmt::Debug + Send + 'static,
    V: Clone + Send + 'static,
{
    /// Creates an empty cache and spawns its sweeper.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        let wake = Arc::new(Notify::new());
        let inner = Arc::new(Inner {
            name,
            state: Mutex::new(State {
                entries: HashMap::new(),
                deadlines: BinaryHeap::new(),
            }),
            next_generation: AtomicU64::new(0),
            wake: Arc::clone(&wake),
        });

        tokio::spawn(Self::run_sweeper(Arc::downgrade(&inner), wake));

        Self { inner }
    }

    async fn run_sweeper(inner: Weak<Inner<K, V>>, wake: Arc<Notify>) {
        loop {
            let next = match inner.upgrade() {
                Some(inner) => inner.purge_expired(Instant::now()),
                None => break,
            };

            match next {
                Some(deadline) => {
                    tokio::select! {
                        () = sleep_until(deadline) => {}
                        () = wake.notified() => {}
                    }
                }
                None => wake.notified().await,
            }
        }
        debug!("Cache sweeper stopped");
    }

    /// Returns the live value for `key`.
    #[must_use]
    pub fn lookup(&self, key: &K) -> Option<V> {
        let state = self.inner.state.lock();
        let value = state
            .entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone());

        if value.is_some() {
            trace!(cache = self.inner.name, ?key, "Cache hit");
        } else {
            trace!(cache = self.inner.name, ?key, "Cache miss");
        }
        value
    }

    /// Stores `value` under `key` until `ttl` elapses, replacing any
    /// previous value.
    pub fn insert(&self, key: K, value: V, ttl: Duration) {
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        let now = Instant::now();
        let expires_at = now.checked_add(ttl).unwrap_or(now + FAR_FUTURE);

        {
            let mut state = self.inner.state.lock();
            state.deadlines.push(Reverse(Deadline {
                at: expires_at,
                generation,
                key: key.clone(),
            }));
            state.entries.insert(
                key,
                Entry {
                    value,
                    expires_at,
                    generation,
                },
            );
        }

        trace!(cache = self.inner.name, generation, ?ttl, "Cache insert");
        self.inner.wake.notify_one();
    }

    /// Returns the number of stored entries, including ones awaiting sweep.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.state.lock().entries.len()
    }

    /// Returns whether no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
