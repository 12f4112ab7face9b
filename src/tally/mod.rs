// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tally computation and icons.

pub mod icons;
mod resolver;

pub use icons::icon_for;
pub use resolver::{TallyState, resolve};
