// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mixer state snapshot.

use serde::Serialize;

/// One selectable input on a mixer.
///
/// Buttons bind to [`key`](Self::key), which stays stable for the session
/// while names and numbers may move when the show changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedInput {
    /// Display name of the input.
    pub name: String,
    /// Opaque stable identifier.
    pub key: String,
    /// Position of the input (1-based).
    pub number: u32,
}

impl NamedInput {
    /// Creates a new input.
    #[must_use]
    pub fn new(name: impl Into<String>, key: impl Into<String>, number: u32) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            number,
        }
    }
}

/// An output bus with its own program/preview pair.
///
/// Bus 1 is the main output; alternate buses are numbered from 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bus {
    /// Bus number.
    pub number: u32,
    /// Input number currently on air on this bus.
    pub active: u32,
    /// Input number currently previewed on this bus.
    pub preview: u32,
}

impl Bus {
    /// Creates a new bus entry.
    #[must_use]
    pub fn new(number: u32, active: u32, preview: u32) -> Self {
        Self {
            number,
            active,
            preview,
        }
    }
}

/// Last successfully polled snapshot of one mixer.
///
/// A snapshot is replaced as a whole on every successful poll, never merged.
///
/// # Examples
///
/// ```
/// use vmix_tally::state::{Bus, DeviceState, NamedInput};
///
/// let state = DeviceState::new()
///     .with_input(NamedInput::new("Camera 1", "a1", 1))
///     .with_input(NamedInput::new("Camera 2", "b2", 2))
///     .with_active(1)
///     .with_preview(2)
///     .with_bus(Bus::new(2, 2, 1));
///
/// assert_eq!(state.input_by_key("b2").map(|i| i.number), Some(2));
/// assert_eq!(state.bus(2).map(|b| b.preview), Some(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceState {
    inputs: Vec<NamedInput>,
    active: u32,
    preview: u32,
    buses: Vec<Bus>,
}

impl DeviceState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an input to the end of the input list.
    #[must_use]
    pub fn with_input(mut self, input: NamedInput) -> Self {
        self.inputs.push(input);
        self
    }

    /// Replaces the input list.
    #[must_use]
    pub fn with_inputs(mut self, inputs: Vec<NamedInput>) -> Self {
        self.inputs = inputs;
        self
    }

    /// Sets the main output's active input number.
    #[must_use]
    pub fn with_active(mut self, number: u32) -> Self {
        self.active = number;
        self
    }

    /// Sets the main output's preview input number.
    #[must_use]
    pub fn with_preview(mut self, number: u32) -> Self {
        self.preview = number;
        self
    }

    /// Adds an alternate bus.
    #[must_use]
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.buses.push(bus);
        self
    }

    /// Returns the inputs in device order.
    #[must_use]
    pub fn inputs(&self) -> &[NamedInput] {
        &self.inputs
    }

    /// Returns the main output's active input number.
    #[must_use]
    pub fn active(&self) -> u32 {
        self.active
    }

    /// Returns the main output's preview input number.
    #[must_use]
    pub fn preview(&self) -> u32 {
        self.preview
    }

    /// Returns the alternate buses.
    #[must_use]
    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    /// Finds a bus by number.
    #[must_use]
    pub fn bus(&self, number: u32) -> Option<&Bus> {
        self.buses.iter().find(|b| b.number == number)
    }

    /// Finds the first input with the given key.
    #[must_use]
    pub fn input_by_key(&self, key: &str) -> Option<&NamedInput> {
        self.inputs.iter().find(|i| i.key == key)
    }
}
