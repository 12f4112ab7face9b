// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device connection pooling.
//!
//! This module keeps at most one live client per mixer address, so any
//! number of buttons bound to the same mixer produce a single query per
//! refresh tick.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::task::JoinSet;

use crate::device::{DeviceClient, DeviceConnector, DeviceKey};
use crate::error::ConnectError;
use crate::state::DeviceState;

use super::PoolEntry;

/// Outcome of one [`ConnectionPool::reconcile`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Entries created for newly referenced keys.
    pub created: usize,
    /// Entries dropped because no button references them anymore.
    pub evicted: usize,
    /// Keys whose client could not be constructed.
    pub failed: usize,
}

/// Outcome of one [`ConnectionPool::refresh_all`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Entries whose snapshot was replaced.
    pub refreshed: usize,
    /// Entries whose poll failed; their previous snapshot is kept.
    pub failed: usize,
    /// Entries skipped because a previous poll was still in flight.
    pub skipped: usize,
}

/// Registry of live device clients keyed by address.
///
/// The pool is the sole owner of device clients. Entries are created lazily
/// by [`get_or_create`](Self::get_or_create) or [`reconcile`](Self::reconcile)
/// and dropped by `reconcile` once their key is no longer referenced.
///
/// The entry map lock is only held for map operations and client
/// construction, never across a network call.
///
/// # Examples
///
/// ```no_run
/// use std::collections::HashSet;
/// use vmix_tally::device::DeviceKey;
/// use vmix_tally::pool::ConnectionPool;
///
/// # #[cfg(feature = "http")]
/// # async fn example() {
/// # use vmix_tally::protocol::HttpConnector;
/// let pool = ConnectionPool::new(HttpConnector::new());
/// let key = DeviceKey::new("192.168.1.20", 8088);
///
/// pool.reconcile(&HashSet::from([key.clone()]));
/// pool.refresh_all().await;
///
/// if let Some(state) = pool.lookup(&key) {
///     println!("{} inputs", state.inputs().len());
/// }
/// # }
/// ```
pub struct ConnectionPool<C: DeviceConnector> {
    connector: C,
    entries: RwLock<HashMap<DeviceKey, Arc<PoolEntry<C::Client>>>>,
}

impl<C: DeviceConnector> ConnectionPool<C> {
    /// Creates an empty pool using `connector` to build clients.
    #[must_use]
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the connector.
    #[must_use]
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Gets the entry for `key`, creating it if needed.
    ///
    /// Concurrent callers asking for the same new key observe a single client
    /// construction and receive the same entry.
    ///
    /// # Errors
    ///
    /// Returns `ConnectError` if the client cannot be constructed. No entry is
    /// stored in that case.
    pub fn get_or_create(
        &self,
        key: &DeviceKey,
    ) -> Result<Arc<PoolEntry<C::Client>>, ConnectError> {
        if let Some(entry) = self.entries.read().get(key) {
            return Ok(Arc::clone(entry));
        }

        let mut entries = self.entries.write();
        // Another caller may have won the race between the two locks.
        if let Some(entry) = entries.get(key) {
            return Ok(Arc::clone(entry));
        }

        let entry = Arc::new(self.create_entry(key)?);
        entries.insert(key.clone(), Arc::clone(&entry));
        Ok(entry)
    }

    /// Makes the pool's key set match `active`.
    ///
    /// Missing keys get a new entry; construction failures are logged and
    /// retried on the next call. Present keys absent from `active` are
    /// evicted along with their client.
    pub fn reconcile(&self, active: &HashSet<DeviceKey>) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        let mut entries = self.entries.write();

        entries.retain(|key, _| {
            let keep = active.contains(key);
            if !keep {
                tracing::info!(host = %key.host(), port = key.port(), "Evicting unreferenced mixer connection");
                summary.evicted += 1;
            }
            keep
        });

        for key in active {
            if entries.contains_key(key) {
                continue;
            }
            match self.create_entry(key) {
                Ok(entry) => {
                    entries.insert(key.clone(), Arc::new(entry));
                    summary.created += 1;
                }
                Err(e) => {
                    tracing::warn!(host = %key.host(), port = key.port(), error = %e, "Failed to create mixer connection");
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    /// Polls every entry once, concurrently.
    ///
    /// A successful poll replaces the entry's snapshot as a whole; a failed
    /// poll leaves it untouched. Entries whose previous poll is still in
    /// flight are skipped so a device never has two outstanding queries.
    pub async fn refresh_all(&self) -> RefreshSummary {
        let entries: Vec<_> = self.entries.read().values().map(Arc::clone).collect();

        let mut summary = RefreshSummary::default();
        let mut polls = JoinSet::new();

        for entry in entries {
            polls.spawn(async move {
                let Some(_guard) = entry.try_begin_poll() else {
                    return PollOutcome::Skipped;
                };
                match entry.client().query_state().await {
                    Ok(state) => {
                        entry.replace_state(state);
                        PollOutcome::Refreshed
                    }
                    Err(e) => {
                        let key = entry.key();
                        tracing::warn!(host = %key.host(), port = key.port(), error = %e, "Mixer poll failed, keeping previous state");
                        PollOutcome::Failed
                    }
                }
            });
        }

        while let Some(result) = polls.join_next().await {
            match result {
                Ok(PollOutcome::Refreshed) => summary.refreshed += 1,
                Ok(PollOutcome::Skipped) => summary.skipped += 1,
                Ok(PollOutcome::Failed) => summary.failed += 1,
                Err(e) => {
                    tracing::error!(error = %e, "Mixer poll task aborted");
                    summary.failed += 1;
                }
            }
        }

        tracing::debug!(?summary, "Mixer refresh complete");
        summary
    }

    /// Returns the last known snapshot for `key`.
    ///
    /// Returns `None` if there is no entry or it has never been polled
    /// successfully.
    #[must_use]
    pub fn lookup(&self, key: &DeviceKey) -> Option<Arc<DeviceState>> {
        self.entries.read().get(key).and_then(|entry| entry.state())
    }

    /// Returns true if an entry exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &DeviceKey) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Returns the keys currently pooled.
    #[must_use]
    pub fn keys(&self) -> HashSet<DeviceKey> {
        self.entries.read().keys().cloned().collect()
    }

    /// Returns the number of pooled entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the pool holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn create_entry(&self, key: &DeviceKey) -> Result<PoolEntry<C::Client>, ConnectError> {
        let client = self.connector.connect(key)?;
        tracing::info!(host = %key.host(), port = key.port(), "Created mixer connection");
        Ok(PoolEntry::new(key.clone(), client))
    }
}

impl<C: DeviceConnector> std::fmt::Debug for ConnectionPool<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

enum PollOutcome {
    Refreshed,
    Failed,
    Skipped,
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::TransientError;

    #[derive(Default)]
    struct Counters {
        constructed: AtomicUsize,
        queries: AtomicUsize,
    }

    struct FakeConnector {
        counters: Arc<Counters>,
        state: Arc<parking_lot::Mutex<Option<DeviceState>>>,
        down: Arc<parking_lot::Mutex<HashSet<String>>>,
    }

    impl FakeConnector {
        fn new() -> Self {
            Self {
                counters: Arc::default(),
                state: Arc::new(parking_lot::Mutex::new(Some(DeviceState::new()))),
                down: Arc::default(),
            }
        }

        fn respond_with(&self, state: Option<DeviceState>) {
            *self.state.lock() = state;
        }

        fn take_down(&self, host: &str) {
            self.down.lock().insert(host.to_string());
        }
    }

    struct FakeClient {
        host: String,
        counters: Arc<Counters>,
        state: Arc<parking_lot::Mutex<Option<DeviceState>>>,
        down: Arc<parking_lot::Mutex<HashSet<String>>>,
    }

    impl DeviceConnector for FakeConnector {
        type Client = FakeClient;

        fn connect(&self, key: &DeviceKey) -> Result<FakeClient, ConnectError> {
            if key.host() == "unreachable.invalid" {
                return Err(ConnectError::InvalidAddress(key.to_string()));
            }
            self.counters.constructed.fetch_add(1, Ordering::SeqCst);
            Ok(FakeClient {
                host: key.host().to_string(),
                counters: Arc::clone(&self.counters),
                state: Arc::clone(&self.state),
                down: Arc::clone(&self.down),
            })
        }
    }

    impl DeviceClient for FakeClient {
        async fn query_state(&self) -> Result<DeviceState, TransientError> {
            self.counters.queries.fetch_add(1, Ordering::SeqCst);
            if self.down.lock().contains(&self.host) {
                return Err(TransientError::Status(503));
            }
            self.state.lock().clone().ok_or(TransientError::Status(503))
        }

        async fn send_function(
            &self,
            _function: &str,
            _params: &[(String, String)],
        ) -> Result<(), TransientError> {
            Ok(())
        }
    }

    fn key(host: &str) -> DeviceKey {
        DeviceKey::new(host, 8088)
    }

    #[test]
    fn get_or_create_reuses_entry() {
        let pool = ConnectionPool::new(FakeConnector::new());

        let first = pool.get_or_create(&key("a")).unwrap();
        let second = pool.get_or_create(&key("a")).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(pool.connector().counters.constructed.load(Ordering::SeqCst), 1);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn get_or_create_failure_stores_nothing() {
        let pool = ConnectionPool::new(FakeConnector::new());

        assert!(pool.get_or_create(&key("unreachable.invalid")).is_err());
        assert!(pool.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_get_or_create_constructs_once() {
        let pool = Arc::new(ConnectionPool::new(FakeConnector::new()));
        let mut tasks = JoinSet::new();

        for _ in 0..64 {
            let pool = Arc::clone(&pool);
            tasks.spawn(async move { pool.get_or_create(&key("shared")).unwrap() });
        }

        let mut entries = Vec::new();
        while let Some(entry) = tasks.join_next().await {
            entries.push(entry.unwrap());
        }

        assert_eq!(entries.len(), 64);
        assert!(entries.iter().all(|e| Arc::ptr_eq(e, &entries[0])));
        assert_eq!(pool.connector().counters.constructed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reconcile_creates_and_evicts() {
        let pool = ConnectionPool::new(FakeConnector::new());
        pool.get_or_create(&key("old")).unwrap();

        let summary = pool.reconcile(&HashSet::from([key("a"), key("b")]));

        assert_eq!(
            summary,
            ReconcileSummary {
                created: 2,
                evicted: 1,
                failed: 0
            }
        );
        assert_eq!(pool.keys(), HashSet::from([key("a"), key("b")]));
    }

    #[test]
    fn reconcile_skips_unconstructible_keys() {
        let pool = ConnectionPool::new(FakeConnector::new());

        let summary = pool.reconcile(&HashSet::from([key("a"), key("unreachable.invalid")]));

        assert_eq!(summary.created, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(pool.keys(), HashSet::from([key("a")]));
    }

    #[test]
    fn reconcile_keeps_existing_entries() {
        let pool = ConnectionPool::new(FakeConnector::new());
        let before = pool.get_or_create(&key("a")).unwrap();

        pool.reconcile(&HashSet::from([key("a")]));

        let after = pool.get_or_create(&key("a")).unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(pool.connector().counters.constructed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn lookup_is_none_before_first_poll() {
        let pool = ConnectionPool::new(FakeConnector::new());
        pool.reconcile(&HashSet::from([key("a")]));

        assert!(pool.contains(&key("a")));
        assert!(pool.lookup(&key("a")).is_none());

        pool.refresh_all().await;
        assert!(pool.lookup(&key("a")).is_some());
    }

    #[tokio::test]
    async fn refresh_replaces_state() {
        let pool = ConnectionPool::new(FakeConnector::new());
        pool.reconcile(&HashSet::from([key("a")]));

        pool.connector().respond_with(Some(DeviceState::new().with_preview(3)));
        let summary = pool.refresh_all().await;

        assert_eq!(summary.refreshed, 1);
        assert_eq!(pool.lookup(&key("a")).unwrap().preview(), 3);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_state() {
        let pool = ConnectionPool::new(FakeConnector::new());
        pool.reconcile(&HashSet::from([key("a")]));

        pool.connector().respond_with(Some(DeviceState::new().with_active(7)));
        pool.refresh_all().await;

        pool.connector().respond_with(None);
        let summary = pool.refresh_all().await;

        assert_eq!(summary.failed, 1);
        assert!(pool.contains(&key("a")));
        assert_eq!(pool.lookup(&key("a")).unwrap().active(), 7);
    }

    #[tokio::test]
    async fn failing_device_does_not_affect_others() {
        let pool = ConnectionPool::new(FakeConnector::new());
        pool.reconcile(&HashSet::from([key("a"), key("b")]));

        pool.connector().respond_with(Some(DeviceState::new().with_active(1)));
        pool.refresh_all().await;

        pool.connector().take_down("a");
        pool.connector().respond_with(Some(DeviceState::new().with_active(2)));
        let summary = pool.refresh_all().await;

        assert_eq!(
            summary,
            RefreshSummary {
                refreshed: 1,
                failed: 1,
                skipped: 0
            }
        );
        assert_eq!(pool.lookup(&key("a")).unwrap().active(), 1);
        assert_eq!(pool.lookup(&key("b")).unwrap().active(), 2);
        assert!(pool.contains(&key("a")));
    }

    #[tokio::test]
    async fn refresh_issues_one_query_per_entry() {
        let pool = ConnectionPool::new(FakeConnector::new());
        pool.reconcile(&HashSet::from([key("a"), key("b")]));

        pool.refresh_all().await;

        assert_eq!(pool.connector().counters.queries.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn refresh_skips_entry_with_poll_in_flight() {
        let pool = ConnectionPool::new(FakeConnector::new());
        let entry = pool.get_or_create(&key("a")).unwrap();

        let _guard = entry.try_begin_poll().unwrap();
        let summary = pool.refresh_all().await;

        assert_eq!(summary.skipped, 1);
        assert_eq!(pool.connector().counters.queries.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn evicted_entry_is_unreachable() {
        let pool = ConnectionPool::new(FakeConnector::new());
        pool.reconcile(&HashSet::from([key("a")]));

        pool.reconcile(&HashSet::new());

        assert!(!pool.contains(&key("a")));
        assert!(pool.lookup(&key("a")).is_none());
    }
}
