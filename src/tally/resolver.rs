// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tally resolution.

use crate::registry::{BindingTarget, ButtonBinding};
use crate::state::DeviceState;

/// Displayed tally state of a button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TallyState {
    /// The tracked input is not previewed/on air, or tally is disabled.
    #[default]
    Inactive,
    /// The tracked input is previewed (preview buttons) or on air (program
    /// buttons).
    Active,
}

impl TallyState {
    /// Returns true for [`TallyState::Active`].
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl From<bool> for TallyState {
    fn from(active: bool) -> Self {
        if active { Self::Active } else { Self::Inactive }
    }
}

/// Computes the tally a button should show for a mixer snapshot.
///
/// The comparison number is the preview (preview buttons) or active (program
/// buttons) input of the selected bus. A bus selector above 1 that the mixer
/// does not expose falls back to the main output. The first input whose key
/// matches the binding is authoritative.
///
/// Function bindings and bindings with tally disabled are always inactive.
///
/// # Examples
///
/// ```
/// use vmix_tally::device::DeviceKey;
/// use vmix_tally::registry::ButtonBinding;
/// use vmix_tally::state::{DeviceState, NamedInput};
/// use vmix_tally::tally::{TallyState, resolve};
///
/// let state = DeviceState::new()
///     .with_input(NamedInput::new("Cam 1", "1", 1))
///     .with_input(NamedInput::new("Cam 2", "2", 2))
///     .with_preview(2);
///
/// let key = DeviceKey::new("mixer", 8088);
/// let binding = ButtonBinding::preview(key, "2").with_tally(true);
/// assert_eq!(resolve(&binding, &state), TallyState::Active);
/// ```
#[must_use]
pub fn resolve(binding: &ButtonBinding, state: &DeviceState) -> TallyState {
    if !binding.tally_enabled {
        return TallyState::Inactive;
    }

    let (input_key, comparison) = match &binding.target {
        BindingTarget::Preview { input } => {
            let bus = binding.alternate_bus().and_then(|n| state.bus(n));
            (input, bus.map_or(state.preview(), |b| b.preview))
        }
        BindingTarget::Program { input } => {
            let bus = binding.alternate_bus().and_then(|n| state.bus(n));
            (input, bus.map_or(state.active(), |b| b.active))
        }
        BindingTarget::Function(_) => return TallyState::Inactive,
    };

    state
        .input_by_key(input_key)
        .is_some_and(|input| input.number == comparison)
        .into()
}
