// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Button bindings.

use crate::device::DeviceKey;
use crate::error::ConfigurationError;

use super::settings::{FromSettingsValue, FunctionSettings, TallySettings};

/// The kinds of button the plugin exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonKind {
    /// Puts an input into preview and lights while it is previewed.
    Preview,
    /// Takes an input to program and lights while it is on air.
    Program,
    /// Sends an arbitrary function. Never tracks tally.
    Function,
}

impl ButtonKind {
    /// Host action identifier for preview buttons.
    pub const PREVIEW_ACTION: &'static str = "dev.flowingspdg.vmix.preview";
    /// Host action identifier for program buttons.
    pub const PROGRAM_ACTION: &'static str = "dev.flowingspdg.vmix.program";
    /// Host action identifier for function buttons.
    pub const FUNCTION_ACTION: &'static str = "dev.flowingspdg.vmix.function";

    /// All kinds, in registry order.
    pub const ALL: [Self; 3] = [Self::Preview, Self::Program, Self::Function];

    /// Maps a host action identifier to a kind.
    #[must_use]
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            Self::PREVIEW_ACTION => Some(Self::Preview),
            Self::PROGRAM_ACTION => Some(Self::Program),
            Self::FUNCTION_ACTION => Some(Self::Function),
            _ => None,
        }
    }

    /// Returns the host action identifier.
    #[must_use]
    pub fn action(self) -> &'static str {
        match self {
            Self::Preview => Self::PREVIEW_ACTION,
            Self::Program => Self::PROGRAM_ACTION,
            Self::Function => Self::FUNCTION_ACTION,
        }
    }

    /// Returns true for kinds that are polled and show tally.
    #[must_use]
    pub fn tracks_tally(self) -> bool {
        !matches!(self, Self::Function)
    }
}

/// A function invocation template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionCall {
    /// Function name, e.g. `Cut` or `SetText`.
    pub name: String,
    /// Optional input key passed as `Input`.
    pub input: String,
    /// Extra query parameters.
    pub queries: Vec<(String, String)>,
}

impl FunctionCall {
    /// Returns the query parameters to send, with `Input` first when set.
    #[must_use]
    pub fn params(&self) -> Vec<(String, String)> {
        let input = (!self.input.is_empty()).then(|| ("Input".to_string(), self.input.clone()));
        input.into_iter().chain(self.queries.iter().cloned()).collect()
    }
}

/// What a button is bound to on its mixer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingTarget {
    /// Tally when `input` is previewed.
    Preview {
        /// Key of the tracked input.
        input: String,
    },
    /// Tally when `input` is on air.
    Program {
        /// Key of the tracked input.
        input: String,
    },
    /// One-shot command, not tracked.
    Function(FunctionCall),
}

/// Persisted association of one button to a mixer.
///
/// # Examples
///
/// ```
/// use vmix_tally::device::DeviceKey;
/// use vmix_tally::registry::{ButtonBinding, ButtonKind};
///
/// let binding = ButtonBinding::preview(DeviceKey::new("mixer", 8088), "cam-1")
///     .with_bus(2)
///     .with_tally(true);
///
/// assert_eq!(binding.kind(), ButtonKind::Preview);
/// assert_eq!(binding.input_key(), Some("cam-1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonBinding {
    /// Mixer address. May be unconfigured.
    pub device: DeviceKey,
    /// Bus selector; 1 or less means the main output.
    pub bus: i32,
    /// Whether the button displays tally at all.
    pub tally_enabled: bool,
    /// Kind-specific target.
    pub target: BindingTarget,
}

impl ButtonBinding {
    /// Bus number of the main output.
    pub const MAIN_BUS: i32 = 1;

    /// Creates a preview-tracking binding on the main bus, tally disabled.
    #[must_use]
    pub fn preview(device: DeviceKey, input: impl Into<String>) -> Self {
        Self::new(
            device,
            BindingTarget::Preview {
                input: input.into(),
            },
        )
    }

    /// Creates a program-tracking binding on the main bus, tally disabled.
    #[must_use]
    pub fn program(device: DeviceKey, input: impl Into<String>) -> Self {
        Self::new(
            device,
            BindingTarget::Program {
                input: input.into(),
            },
        )
    }

    /// Creates a function binding.
    #[must_use]
    pub fn function(device: DeviceKey, call: FunctionCall) -> Self {
        Self::new(device, BindingTarget::Function(call))
    }

    fn new(device: DeviceKey, target: BindingTarget) -> Self {
        Self {
            device,
            bus: Self::MAIN_BUS,
            tally_enabled: false,
            target,
        }
    }

    /// Sets the bus selector.
    #[must_use]
    pub fn with_bus(mut self, bus: i32) -> Self {
        self.bus = bus;
        self
    }

    /// Enables or disables tally display.
    #[must_use]
    pub fn with_tally(mut self, enabled: bool) -> Self {
        self.tally_enabled = enabled;
        self
    }

    /// Decodes a binding from a button's persisted settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidSettings` if the payload does not
    /// match the settings shape for `kind`.
    pub fn from_settings(
        kind: ButtonKind,
        settings: &serde_json::Value,
    ) -> Result<Self, ConfigurationError> {
        let binding = match kind {
            ButtonKind::Preview | ButtonKind::Program => {
                let s = TallySettings::deserialize_value(settings)?;
                let device = DeviceKey::new(s.host, s.port);
                let binding = if kind == ButtonKind::Preview {
                    Self::preview(device, s.input)
                } else {
                    Self::program(device, s.input)
                };
                binding.with_bus(s.mix).with_tally(s.tally)
            }
            ButtonKind::Function => {
                let s = FunctionSettings::deserialize_value(settings)?;
                Self::function(
                    DeviceKey::new(s.host, s.port),
                    FunctionCall {
                        name: s.name,
                        input: s.input,
                        queries: s.queries.into_iter().map(|q| (q.key, q.value)).collect(),
                    },
                )
            }
        };
        Ok(binding)
    }

    /// Returns the button kind this binding belongs to.
    #[must_use]
    pub fn kind(&self) -> ButtonKind {
        match self.target {
            BindingTarget::Preview { .. } => ButtonKind::Preview,
            BindingTarget::Program { .. } => ButtonKind::Program,
            BindingTarget::Function(_) => ButtonKind::Function,
        }
    }

    /// Returns the tracked input key for preview/program bindings.
    #[must_use]
    pub fn input_key(&self) -> Option<&str> {
        match &self.target {
            BindingTarget::Preview { input } | BindingTarget::Program { input } => Some(input),
            BindingTarget::Function(_) => None,
        }
    }

    /// Returns true if the binding has a mixer address.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.device.is_configured()
    }

    /// Returns the alternate bus number, if one is selected.
    #[must_use]
    pub fn alternate_bus(&self) -> Option<u32> {
        u32::try_from(self.bus).ok().filter(|bus| *bus > 1)
    }
}
