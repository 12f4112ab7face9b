// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A pooled device client and its cached state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::device::DeviceKey;
use crate::state::DeviceState;

/// One live device client plus the last snapshot it produced.
///
/// Entries are owned by the [`ConnectionPool`](super::ConnectionPool).
/// Buttons only ever hold the [`DeviceKey`], so an entry can be evicted and
/// recreated without touching button state.
pub struct PoolEntry<Cl> {
    key: DeviceKey,
    client: Cl,
    /// `None` until the first successful poll.
    state: RwLock<Option<Arc<DeviceState>>>,
    polling: AtomicBool,
}

impl<Cl> PoolEntry<Cl> {
    pub(super) fn new(key: DeviceKey, client: Cl) -> Self {
        Self {
            key,
            client,
            state: RwLock::new(None),
            polling: AtomicBool::new(false),
        }
    }

    /// Returns the key this entry is bound to.
    #[must_use]
    pub fn key(&self) -> &DeviceKey {
        &self.key
    }

    /// Returns the device client.
    #[must_use]
    pub fn client(&self) -> &Cl {
        &self.client
    }

    /// Returns the last successfully polled snapshot, if any.
    #[must_use]
    pub fn state(&self) -> Option<Arc<DeviceState>> {
        self.state.read().clone()
    }

    /// Swaps in a new snapshot as a whole.
    pub(super) fn replace_state(&self, state: DeviceState) {
        *self.state.write() = Some(Arc::new(state));
    }

    /// Returns true while a poll is outstanding.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.polling.load(Ordering::Acquire)
    }

    /// Claims the poll slot, or returns `None` if a poll is already running.
    pub(super) fn try_begin_poll(&self) -> Option<PollGuard<'_>> {
        self.polling
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PollGuard(&self.polling))
    }
}

impl<Cl> std::fmt::Debug for PoolEntry<Cl> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolEntry")
            .field("key", &self.key)
            .field("has_state", &self.state.read().is_some())
            .field("polling", &self.is_polling())
            .finish_non_exhaustive()
    }
}

/// Releases the poll slot on drop.
pub(super) struct PollGuard<'a>(&'a AtomicBool);

impl Drop for PollGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
