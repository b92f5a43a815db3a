//! Per-key request coalescing.
//!
//! The first caller for a key spawns the work onto the runtime; callers
//! arriving while it runs await the same task and receive a clone of its
//! output. The spawned task owns its table entry and removes it when it
//! finishes, whether or not any caller is still waiting, so the next call
//! after that starts fresh.
//!
//! The table is a sharded [`DashMap`]: callers on unrelated keys never wait on
//! a shared lock, and no lock is held across an `.await`.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::hash::Hash;
use std::sync::Arc;
use thiserror::Error;

/// The spawned work ended without producing output (it panicked or the
/// runtime shut down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("in-flight task ended without a result")]
pub struct FlightAborted;

type Flight<T> = Shared<BoxFuture<'static, Result<T, FlightAborted>>>;
type Table<K, T> = Arc<DashMap<K, Flight<T>>>;

/// Removes the key when the spawned task finishes or unwinds.
struct EntryGuard<K, T>
where
    K: Eq + Hash,
    T: Clone,
{
    table: Table<K, T>,
    key: K,
}

impl<K, T> Drop for EntryGuard<K, T>
where
    K: Eq + Hash,
    T: Clone,
{
    fn drop(&mut self) {
        self.table.remove(&self.key);
    }
}

/// Coalesces concurrent calls keyed by `K` into one execution.
pub struct SingleFlight<K, T>
where
    K: Eq + Hash,
    T: Clone,
{
    in_flight: Table<K, T>,
}

impl<K, T> SingleFlight<K, T>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Runs `work` for `key` unless a run for `key` is already in flight, in
    /// which case the running one is awaited instead and `work` is dropped
    /// unused.
    ///
    /// Dropping the returned future only stops waiting; the work itself keeps
    /// running to completion. Must be called inside a Tokio runtime.
    ///
    /// Returns the output and whether this call joined an existing flight.
    pub async fn run<F>(&self, key: K, work: F) -> (Result<T, FlightAborted>, bool)
    where
        F: FnOnce() -> BoxFuture<'static, T>,
    {
        let (flight, joined) = match self.in_flight.entry(key.clone()) {
            Entry::Occupied(entry) => (entry.get().clone(), true),
            Entry::Vacant(entry) => {
                let guard = EntryGuard {
                    table: Arc::clone(&self.in_flight),
                    key,
                };
                let task = work();
                // The shard stays locked until `insert` below, so the guard
                // cannot remove the key before it is in the table.
                let handle = tokio::spawn(async move {
                    let _guard = guard;
                    task.await
                });
                let flight = async move { handle.await.map_err(|_| FlightAborted) }
                    .boxed()
                    .shared();
                entry.insert(flight.clone());
                (flight, false)
            }
        };

        (flight.await, joined)
    }

    /// Number of keys with work in flight.
    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub fn is_in_flight(&self, key: &K) -> bool {
        self.in_flight.contains_key(key)
    }
}

impl<K, T> Default for SingleFlight<K, T>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
