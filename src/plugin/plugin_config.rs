// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plugin configuration.

use std::time::Duration;

use crate::host::ImageTarget;

/// Tunables of the tally engine.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use vmix_tally::plugin::PluginConfig;
///
/// let config = PluginConfig::new()
///     .with_refresh_interval(Duration::from_millis(500))
///     .with_request_timeout(Duration::from_secs(2));
///
/// assert_eq!(config.refresh_interval(), Duration::from_millis(500));
/// ```
#[derive(Debug, Clone)]
pub struct PluginConfig {
    refresh_interval: Duration,
    request_timeout: Duration,
    host_timeout: Duration,
    image_target: ImageTarget,
}

impl PluginConfig {
    /// Default period between refresh ticks.
    pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(200);
    /// Default timeout of one mixer request.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(1);
    /// Default timeout of one push to the host.
    pub const DEFAULT_HOST_TIMEOUT: Duration = Duration::from_secs(1);

    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            refresh_interval: Self::DEFAULT_REFRESH_INTERVAL,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
            host_timeout: Self::DEFAULT_HOST_TIMEOUT,
            image_target: ImageTarget::default(),
        }
    }

    /// Sets the refresh period.
    ///
    /// A zero duration is replaced by the default, since the tick timer
    /// cannot run with a zero period.
    #[must_use]
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = if interval.is_zero() {
            Self::DEFAULT_REFRESH_INTERVAL
        } else {
            interval
        };
        self
    }

    /// Sets the mixer request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets how long a single push to the host may take before it is
    /// abandoned.
    #[must_use]
    pub fn with_host_timeout(mut self, timeout: Duration) -> Self {
        self.host_timeout = timeout;
        self
    }

    /// Sets which surface icon updates target.
    #[must_use]
    pub fn with_image_target(mut self, target: ImageTarget) -> Self {
        self.image_target = target;
        self
    }

    /// Returns the refresh period.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Returns the mixer request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the host push timeout.
    #[must_use]
    pub fn host_timeout(&self) -> Duration {
        self.host_timeout
    }

    /// Returns the icon update target.
    #[must_use]
    pub fn image_target(&self) -> ImageTarget {
        self.image_target
    }

    /// Creates an HTTP connector using this configuration's timeout.
    #[cfg(feature = "http")]
    #[must_use]
    pub fn http_connector(&self) -> crate::protocol::HttpConnector {
        crate::protocol::HttpConnector::new().with_timeout(self.request_timeout)
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self::new()
    }
}
