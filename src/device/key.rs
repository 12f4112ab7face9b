// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device address identity.

use std::fmt;

/// Key identifying a remote mixer.
///
/// Equality and hashing use the exact `(host, port)` pair. No normalization
/// is applied: `"Mixer.local"` and `"mixer.local"` are different keys, and a
/// missing port is never inferred.
///
/// # Examples
///
/// ```
/// use vmix_tally::device::DeviceKey;
///
/// let key = DeviceKey::new("192.168.1.20", 8088);
/// assert_eq!(key.to_string(), "192.168.1.20:8088");
/// assert!(key.is_configured());
/// assert!(!DeviceKey::default().is_configured());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DeviceKey {
    host: String,
    port: u16,
}

impl DeviceKey {
    /// Creates a key from a host and port.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns true once the user has entered a host for this key.
    ///
    /// Buttons with an unconfigured key are never polled.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.host.is_empty()
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
