// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persisted button settings as written by the property inspector.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Default mixer web API port.
pub const DEFAULT_PORT: u16 = 8088;

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn main_bus() -> i32 {
    1
}

/// Settings of preview and program buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallySettings {
    /// Mixer host.
    #[serde(default)]
    pub host: String,
    /// Mixer web API port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Key of the bound input.
    #[serde(default)]
    pub input: String,
    /// Whether tally is displayed.
    #[serde(default)]
    pub tally: bool,
    /// Bus selector; 1 or less selects the main output.
    #[serde(default = "main_bus")]
    pub mix: i32,
}

/// One extra query parameter of a function button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionQuery {
    /// Parameter name.
    pub key: String,
    /// Parameter value.
    #[serde(default)]
    pub value: String,
}

/// Settings of function buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSettings {
    /// Mixer host.
    #[serde(default)]
    pub host: String,
    /// Mixer web API port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Function name.
    #[serde(default)]
    pub name: String,
    /// Optional input key.
    #[serde(default)]
    pub input: String,
    /// Extra query parameters.
    #[serde(default)]
    pub queries: Vec<FunctionQuery>,
}

pub(super) trait FromSettingsValue: DeserializeOwned {
    /// A `null` payload is treated as empty settings.
    fn deserialize_value(value: &serde_json::Value) -> Result<Self, ConfigurationError> {
        let value = if value.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            value.clone()
        };
        serde_json::from_value(value).map_err(ConfigurationError::InvalidSettings)
    }
}

impl FromSettingsValue for TallySettings {}
impl FromSettingsValue for FunctionSettings {}
