// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for the mixer web API.

use std::time::Duration;

use reqwest::Client;

use crate::device::{DeviceClient, DeviceConnector, DeviceKey};
use crate::error::{ConnectError, TransientError};
use crate::state::DeviceState;

use super::xml::parse_state;

/// Builds [`HttpClient`]s for the connection pool.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use vmix_tally::device::{DeviceConnector, DeviceKey};
/// use vmix_tally::protocol::HttpConnector;
///
/// let connector = HttpConnector::new().with_timeout(Duration::from_millis(500));
/// let client = connector.connect(&DeviceKey::new("192.168.1.20", 8088)).unwrap();
/// assert_eq!(client.base_url(), "http://192.168.1.20:8088");
///
/// assert!(connector.connect(&DeviceKey::new("", 8088)).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct HttpConnector {
    timeout: Duration,
}

impl HttpConnector {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

    /// Creates a connector with the default timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for HttpConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceConnector for HttpConnector {
    type Client = HttpClient;

    fn connect(&self, key: &DeviceKey) -> Result<HttpClient, ConnectError> {
        validate_address(key)?;

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ConnectError::Client)?;

        Ok(HttpClient {
            base_url: format!("http://{}:{}", key.host(), key.port()),
            client,
            timeout: self.timeout,
        })
    }
}

fn validate_address(key: &DeviceKey) -> Result<(), ConnectError> {
    let host = key.host();
    if host.trim().is_empty() {
        return Err(ConnectError::InvalidAddress("host is empty".to_string()));
    }
    if host.contains("://") || host.contains('/') || host.contains(char::is_whitespace) {
        return Err(ConnectError::InvalidAddress(format!("invalid host: {host}")));
    }
    if key.port() == 0 {
        return Err(ConnectError::InvalidAddress("port 0".to_string()));
    }
    Ok(())
}

/// HTTP client bound to one mixer.
///
/// State is read from `GET /api`, functions are invoked through
/// `GET /api/?Function=<name>&...`.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Returns the base URL of the mixer.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL for a function call.
    fn build_function_url(&self, function: &str, params: &[(String, String)]) -> String {
        let mut url = format!(
            "{}/api/?Function={}",
            self.base_url,
            urlencoding::encode(function)
        );
        for (name, value) in params {
            url.push('&');
            url.push_str(&urlencoding::encode(name));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, TransientError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        if !response.status().is_success() {
            return Err(TransientError::Status(response.status().as_u16()));
        }

        Ok(response)
    }

    fn map_request_error(&self, error: reqwest::Error) -> TransientError {
        if error.is_timeout() {
            TransientError::Timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX))
        } else {
            TransientError::Http(error)
        }
    }
}

impl DeviceClient for HttpClient {
    async fn query_state(&self) -> Result<DeviceState, TransientError> {
        let url = format!("{}/api", self.base_url);

        tracing::debug!(url = %url, "Querying mixer state");

        let body = self
            .get(&url)
            .await?
            .text()
            .await
            .map_err(|e| self.map_request_error(e))?;

        parse_state(&body)
    }

    async fn send_function(
        &self,
        function: &str,
        params: &[(String, String)],
    ) -> Result<(), TransientError> {
        let url = self.build_function_url(function, params);

        tracing::debug!(url = %url, "Sending mixer function");

        self.get(&url).await?;
        Ok(())
    }
}
