// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mixer state types.
//!
//! [`DeviceState`] is the snapshot the pool caches per mixer. It holds the
//! ordered list of [`NamedInput`]s, the main program/preview input numbers,
//! and any alternate [`Bus`]es.

mod device_state;

pub use device_state::{Bus, DeviceState, NamedInput};
