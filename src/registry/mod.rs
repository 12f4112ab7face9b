// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Button bindings and the registry of visible buttons.
//!
//! A [`ButtonBinding`] is created when a button appears, replaced when its
//! settings change, and removed when it disappears. The bindings only hold a
//! [`DeviceKey`](crate::device::DeviceKey), never a pool entry.

mod binding;
mod button_registry;
mod settings;

pub use binding::{BindingTarget, ButtonBinding, ButtonKind, FunctionCall};
pub use button_registry::ButtonRegistry;
pub use settings::{DEFAULT_PORT, FunctionQuery, FunctionSettings, TallySettings};
