// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Embedded tally icons.

use crate::registry::ButtonKind;

use super::TallyState;

/// Dark grey 72x72 icon.
pub const INACTIVE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAEgAAABICAIAAADajyQQAAAAV0lEQVR42u3PAQ0AAAwCICPZP505/kED0qciJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJnbVACwcZKaMQX5nAAAAAElFTkSuQmCC";

/// Green 72x72 icon.
pub const PREVIEW: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAEgAAABICAIAAADajyQQAAAAWklEQVR42u3PAQ0AAAgDoCcxibENaA4dGwVITb8UMTExMTExMTExMTExMTExMTExMTExMTExMTExMTExMTExMTExMTExMTExMTExMTExMTExMTExMTExMbGrFj2oXLymZgWIAAAAAElFTkSuQmCC";

/// Red 72x72 icon.
pub const PROGRAM: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAEgAAABICAIAAADajyQQAAAAWklEQVR42u3PAQ0AAAgDoCd5/zwmMoeOjQJk2pciJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJiYmJnbVAtsYXLy7zvLGAAAAAElFTkSuQmCC";

/// Selects the icon for a button.
///
/// Each tally-tracking kind shows its own color when active and the shared
/// inactive icon otherwise.
#[must_use]
pub fn icon_for(kind: ButtonKind, tally: TallyState) -> &'static str {
    match (kind, tally) {
        (ButtonKind::Preview, TallyState::Active) => PREVIEW,
        (ButtonKind::Program, TallyState::Active) => PROGRAM,
        _ => INACTIVE,
    }
}
