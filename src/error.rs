// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the tally engine.
//!
//! Errors are contained at their own unit of work: a failed connect or poll
//! for one device never affects other devices, and a failed push for one
//! button never affects other buttons. The refresh loop itself has no fatal
//! error path.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A device client could not be constructed for an address.
    #[error("connect error: {0}")]
    Connect(#[from] ConnectError),

    /// A single poll or command against a device failed.
    #[error("transient error: {0}")]
    Transient(#[from] TransientError),

    /// A button's settings could not be turned into a binding.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A push to the host application failed.
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

/// Errors raised while constructing a device client.
///
/// No pool entry is stored when this occurs; reconciliation retries on the
/// next tick for as long as the key stays referenced.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The address cannot be used to build a client.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The underlying HTTP client could not be built.
    #[cfg(feature = "http")]
    #[error("HTTP client construction failed: {0}")]
    Client(#[from] reqwest::Error),
}

/// Errors from one network round trip to a device.
///
/// The previously cached state is kept and the operation is retried on the
/// next tick.
#[derive(Debug, Error)]
pub enum TransientError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The device answered with a non-success status.
    #[error("device replied with HTTP {0}")]
    Status(u16),

    /// The state document could not be decoded.
    #[error("failed to decode device state: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),
}

/// Errors in a button's persisted settings.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The settings payload does not match the expected shape.
    #[error("invalid button settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),

    /// A field required for the requested operation is empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Errors from the host application connection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The message could not be delivered.
    #[error("failed to send to host: {0}")]
    Send(String),

    /// The host did not acknowledge the message in time.
    #[error("host push timed out after {0} ms")]
    Timeout(u64),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
