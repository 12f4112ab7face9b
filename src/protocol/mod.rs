// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mixer web API implementation.
//!
//! - [`HttpConnector`]: builds one [`HttpClient`] per device address
//! - [`HttpClient`]: polls `GET /api` and invokes functions
//! - [`parse_state`]: decodes the XML state document

mod http;
mod xml;

pub use http::{HttpClient, HttpConnector};
pub use xml::parse_state;
