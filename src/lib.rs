// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `vmix_tally` - tally synchronization between control-surface buttons and
//! vMix mixers.
//!
//! Each button is bound to one mixer address and either tracks an input's
//! preview/program status or sends a function when pressed. The engine keeps
//! one connection per mixer however many buttons reference it, polls every
//! referenced mixer on a fixed period, and pushes a tally icon to each
//! button from the latest snapshot.
//!
//! # Components
//!
//! - [`pool::ConnectionPool`]: one client and one cached snapshot per mixer
//! - [`registry::ButtonRegistry`]: button context to binding, per kind
//! - [`tally::resolve`]: pure tally computation from a snapshot
//! - [`plugin::RefreshLoop`]: periodic reconcile, update and poll
//! - [`plugin::TallyPlugin`]: host event handlers
//!
//! # Quick Start
//!
//! ```no_run
//! use tokio::sync::watch;
//! use vmix_tally::host::Host;
//! use vmix_tally::plugin::{PluginConfig, TallyPlugin};
//! use vmix_tally::registry::ButtonKind;
//!
//! # #[cfg(feature = "http")]
//! # async fn example(host: impl Host) -> vmix_tally::Result<()> {
//! let config = PluginConfig::default();
//! let plugin = TallyPlugin::new(config.http_connector(), host, config);
//!
//! let (_stop, shutdown) = watch::channel(false);
//! plugin.spawn_refresh_loop(shutdown);
//!
//! let settings = serde_json::json!({
//!     "host": "192.168.1.20",
//!     "port": 8088,
//!     "input": "cam-1",
//!     "tally": true
//! });
//! plugin.on_will_appear(ButtonKind::Program, "ctx-1", &settings)?;
//! plugin.on_key_down(ButtonKind::Program, "ctx-1", &settings).await?;
//! # Ok(())
//! # }
//! ```

pub mod device;
pub mod error;
pub mod host;
pub mod plugin;
pub mod pool;
#[cfg(feature = "http")]
pub mod protocol;
pub mod registry;
pub mod state;
pub mod tally;

pub use device::{DeviceClient, DeviceConnector, DeviceKey};
pub use error::{ConfigurationError, ConnectError, Error, HostError, Result, TransientError};
pub use host::{Host, ImageTarget};
pub use plugin::{PluginConfig, RefreshLoop, TallyPlugin};
pub use pool::ConnectionPool;
pub use registry::{ButtonBinding, ButtonKind, ButtonRegistry};
pub use state::DeviceState;
pub use tally::{TallyState, resolve};
