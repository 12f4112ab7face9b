// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection pooling for mixers.
//!
//! The [`ConnectionPool`] deduplicates device clients by [`DeviceKey`],
//! caches each mixer's latest [`DeviceState`], and evicts entries that no
//! button references anymore.
//!
//! [`DeviceKey`]: crate::device::DeviceKey
//! [`DeviceState`]: crate::state::DeviceState

mod connection_pool;
mod pool_entry;

pub use connection_pool::{ConnectionPool, ReconcileSummary, RefreshSummary};
pub use pool_entry::PoolEntry;
