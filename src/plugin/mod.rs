// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plugin orchestration.
//!
//! [`TallyPlugin`] handles host events; [`RefreshLoop`] keeps button icons in
//! sync with the mixers on a fixed period.

mod plugin_config;
mod refresh_loop;
mod tally_plugin;

pub use plugin_config::PluginConfig;
pub use refresh_loop::{RefreshLoop, TickReport, UpdateSummary};
pub use tally_plugin::{PREVIEW_FUNCTION, PROGRAM_FUNCTION, TallyPlugin};
