// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoding of the mixer's XML state document.

use serde::Deserialize;

use crate::error::TransientError;
use crate::state::{Bus, DeviceState, NamedInput};

#[derive(Debug, Deserialize)]
struct StateDocument {
    #[serde(default)]
    inputs: InputList,
    #[serde(default)]
    active: u32,
    #[serde(default)]
    preview: u32,
    #[serde(rename = "mix", default)]
    mixes: Vec<MixElement>,
}

#[derive(Debug, Default, Deserialize)]
struct InputList {
    #[serde(rename = "input", default)]
    items: Vec<InputElement>,
}

#[derive(Debug, Deserialize)]
struct InputElement {
    #[serde(rename = "@key")]
    key: String,
    #[serde(rename = "@number")]
    number: u32,
    #[serde(rename = "@title", default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct MixElement {
    #[serde(rename = "@number")]
    number: u32,
    #[serde(default)]
    active: u32,
    #[serde(default)]
    preview: u32,
}

/// Parses the body of `GET /api` into a [`DeviceState`].
///
/// Unknown elements and attributes are skipped.
///
/// # Errors
///
/// Returns `TransientError::Parse` if the document is malformed.
pub fn parse_state(body: &str) -> Result<DeviceState, TransientError> {
    let doc: StateDocument =
        quick_xml::de::from_str(body).map_err(|e| TransientError::Parse(e.to_string()))?;

    let inputs = doc
        .inputs
        .items
        .into_iter()
        .map(|i| NamedInput::new(i.title, i.key, i.number))
        .collect();

    let state = doc.mixes.into_iter().fold(
        DeviceState::new()
            .with_inputs(inputs)
            .with_active(doc.active)
            .with_preview(doc.preview),
        |state, mix| state.with_bus(Bus::new(mix.number, mix.active, mix.preview)),
    );

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<vmix>
<version>27.0.0.49</version>
<edition>4K</edition>
<inputs>
<input key="26cae087-b7b6-4d45-98e4-de03ab4feb6b" number="1" type="Capture" title="Camera 1" shortTitle="Camera 1" state="Running" position="0" duration="0" loop="False">Camera 1</input>
<input key="a7f5c1b3-0fa2-47a8-9c42-2b0b6e8a6f11" number="2" type="Colour" title="Colour" shortTitle="Colour" state="Paused" position="0" duration="0" loop="False">Colour</input>
<input key="4c9b0e1e-5d1c-4f0a-8d8e-0b5c3e9f2a77" number="3" type="GT" title="Lower Third" state="Paused"><text index="0" name="Headline.Text">Hello</text></input>
</inputs>
<overlays>
<overlay number="1"/>
<overlay number="2"/>
</overlays>
<preview>2</preview>
<active>1</active>
<fadeToBlack>False</fadeToBlack>
<transitions>
<transition number="1" effect="Fade" duration="500"/>
</transitions>
<recording>False</recording>
<mix number="2"><preview>3</preview><active>2</active></mix>
<mix number="3"><preview>1</preview><active>3</active></mix>
<audio><master volume="100" muted="False"/></audio>
</vmix>"#;

    #[test]
    fn parses_inputs_in_order() {
        let state = parse_state(SAMPLE).unwrap();

        let numbers: Vec<u32> = state.inputs().iter().map(|i| i.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(state.inputs()[0].name, "Camera 1");
        assert_eq!(state.inputs()[0].key, "26cae087-b7b6-4d45-98e4-de03ab4feb6b");
    }

    #[test]
    fn parses_main_output() {
        let state = parse_state(SAMPLE).unwrap();
        assert_eq!(state.active(), 1);
        assert_eq!(state.preview(), 2);
    }

    #[test]
    fn parses_alternate_buses() {
        let state = parse_state(SAMPLE).unwrap();
        assert_eq!(state.buses(), &[Bus::new(2, 2, 3), Bus::new(3, 3, 1)]);
    }

    #[test]
    fn missing_lists_decode_empty() {
        let state = parse_state("<vmix><active>4</active><preview>5</preview></vmix>").unwrap();
        assert!(state.inputs().is_empty());
        assert!(state.buses().is_empty());
        assert_eq!(state.active(), 4);
    }

    #[test]
    fn malformed_document_is_parse_error() {
        let err = parse_state("<vmix><inputs><input key=").unwrap_err();
        assert!(matches!(err, TransientError::Parse(_)));
    }
}
