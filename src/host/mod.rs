// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host application seam.
//!
//! The host owns the physical buttons. The engine only needs to push data to
//! a button's property inspector, change its image, and write to the host
//! log. Event delivery in the other direction goes through the handlers on
//! [`TallyPlugin`](crate::plugin::TallyPlugin).

use std::future::Future;

use serde::{Serialize, Serializer};

use crate::error::HostError;
use crate::state::NamedInput;

/// Which surface an image update applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ImageTarget {
    /// Both the hardware key and the on-screen representation.
    #[default]
    Both,
    /// Only the hardware key.
    Hardware,
    /// Only the on-screen representation.
    Software,
}

impl ImageTarget {
    /// Returns the host protocol code.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Both => 0,
            Self::Hardware => 1,
            Self::Software => 2,
        }
    }
}

impl Serialize for ImageTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Connection to the host application.
pub trait Host: Send + Sync + 'static {
    /// Sends a structured payload to the property inspector of `context`.
    ///
    /// # Errors
    ///
    /// Returns `HostError` if the message cannot be delivered.
    fn send_to_property_inspector(
        &self,
        context: &str,
        payload: &serde_json::Value,
    ) -> impl Future<Output = Result<(), HostError>> + Send;

    /// Replaces the image shown by `context`.
    ///
    /// # Errors
    ///
    /// Returns `HostError` if the message cannot be delivered.
    fn set_image(
        &self,
        context: &str,
        image: &str,
        target: ImageTarget,
    ) -> impl Future<Output = Result<(), HostError>> + Send;

    /// Writes a line to the host log.
    ///
    /// # Errors
    ///
    /// Returns `HostError` if the message cannot be delivered.
    fn log_message(&self, message: &str) -> impl Future<Output = Result<(), HostError>> + Send;
}

/// Inspector event carrying the input list.
pub const INPUTS_EVENT: &str = "inputs";

/// Envelope of a property inspector message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectorMessage<T> {
    /// Event name the inspector dispatches on.
    pub event: String,
    /// Event data.
    pub payload: T,
}

/// Payload of the [`INPUTS_EVENT`] message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputsPayload<'a> {
    /// The mixer's inputs in device order.
    pub inputs: &'a [NamedInput],
}

/// Builds the inspector message listing `inputs`.
///
/// # Errors
///
/// Returns `HostError` if serialization fails.
pub fn inputs_message(inputs: &[NamedInput]) -> Result<serde_json::Value, HostError> {
    serde_json::to_value(InspectorMessage {
        event: INPUTS_EVENT.to_string(),
        payload: InputsPayload { inputs },
    })
    .map_err(|e| HostError::Send(e.to_string()))
}
