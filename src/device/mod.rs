// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device client seam.
//!
//! The engine never talks to a mixer directly. It asks a [`DeviceConnector`]
//! to build one [`DeviceClient`] per [`DeviceKey`] and drives all traffic
//! through that client. The `http` feature provides the production
//! implementation in [`crate::protocol`]; tests substitute in-memory fakes.

mod key;

use std::future::Future;

pub use key::DeviceKey;

use crate::error::{ConnectError, TransientError};
use crate::state::DeviceState;

/// A live client bound to one mixer address.
pub trait DeviceClient: Send + Sync + 'static {
    /// Queries the mixer's current state.
    ///
    /// # Errors
    ///
    /// Returns `TransientError` if the request or decoding fails.
    fn query_state(&self) -> impl Future<Output = Result<DeviceState, TransientError>> + Send;

    /// Invokes a named function on the mixer.
    ///
    /// # Arguments
    ///
    /// * `function` - The function name (e.g. `PreviewInput`)
    /// * `params` - Additional query parameters as `(name, value)` pairs
    ///
    /// # Errors
    ///
    /// Returns `TransientError` if the request fails.
    fn send_function(
        &self,
        function: &str,
        params: &[(String, String)],
    ) -> impl Future<Output = Result<(), TransientError>> + Send;
}

/// Factory for device clients.
///
/// `connect` must not perform network I/O: the pool calls it while holding
/// its entry lock.
pub trait DeviceConnector: Send + Sync + 'static {
    /// The client type produced by this connector.
    type Client: DeviceClient;

    /// Builds a client bound to `key`.
    ///
    /// # Errors
    ///
    /// Returns `ConnectError` if the address cannot be used.
    fn connect(&self, key: &DeviceKey) -> Result<Self::Client, ConnectError>;
}
