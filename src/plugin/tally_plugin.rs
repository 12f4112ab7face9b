// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host event handlers.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::device::{DeviceClient, DeviceConnector};
use crate::error::{ConfigurationError, Result};
use crate::host::Host;
use crate::pool::ConnectionPool;
use crate::registry::{BindingTarget, ButtonBinding, ButtonKind, ButtonRegistry};

use super::{PluginConfig, RefreshLoop};

/// Function sent when a preview button is pressed.
pub const PREVIEW_FUNCTION: &str = "PreviewInput";
/// Function sent when a program button is pressed.
pub const PROGRAM_FUNCTION: &str = "CutDirect";

/// The tally plugin.
///
/// Owns the button registry and the connection pool, and translates host
/// events into registry updates and mixer commands. Tally display is driven
/// separately by the [`RefreshLoop`] returned from
/// [`spawn_refresh_loop`](Self::spawn_refresh_loop).
///
/// # Examples
///
/// ```no_run
/// use tokio::sync::watch;
/// use vmix_tally::host::Host;
/// use vmix_tally::plugin::{PluginConfig, TallyPlugin};
/// use vmix_tally::registry::ButtonKind;
///
/// # #[cfg(feature = "http")]
/// # async fn example(host: impl Host) -> vmix_tally::Result<()> {
/// let config = PluginConfig::default();
/// let plugin = TallyPlugin::new(config.http_connector(), host, config);
///
/// let (stop, shutdown) = watch::channel(false);
/// let refresh = plugin.spawn_refresh_loop(shutdown);
///
/// let settings = serde_json::json!({ "host": "192.168.1.20", "input": "cam-1", "tally": true });
/// plugin.on_will_appear(ButtonKind::Preview, "ctx-1", &settings)?;
///
/// // ...
/// let _ = stop.send(true);
/// let _ = refresh.await;
/// # Ok(())
/// # }
/// ```
pub struct TallyPlugin<C: DeviceConnector, H: Host> {
    pool: Arc<ConnectionPool<C>>,
    registry: Arc<ButtonRegistry>,
    host: Arc<H>,
    config: PluginConfig,
}

impl<C: DeviceConnector, H: Host> TallyPlugin<C, H> {
    /// Creates a plugin with an empty registry and pool.
    #[must_use]
    pub fn new(connector: C, host: H, config: PluginConfig) -> Self {
        Self {
            pool: Arc::new(ConnectionPool::new(connector)),
            registry: Arc::new(ButtonRegistry::new()),
            host: Arc::new(host),
            config,
        }
    }

    /// Returns the connection pool.
    #[must_use]
    pub fn pool(&self) -> &Arc<ConnectionPool<C>> {
        &self.pool
    }

    /// Returns the button registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ButtonRegistry> {
        &self.registry
    }

    /// Returns the host connection.
    #[must_use]
    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Creates a refresh loop sharing this plugin's components.
    #[must_use]
    pub fn refresh_loop(&self) -> RefreshLoop<C, H> {
        RefreshLoop::new(
            Arc::clone(&self.pool),
            Arc::clone(&self.registry),
            Arc::clone(&self.host),
            self.config.clone(),
        )
    }

    /// Spawns the refresh loop on the current runtime.
    ///
    /// The loop stops once `shutdown` carries `true` or its sender is
    /// dropped.
    pub fn spawn_refresh_loop(&self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.refresh_loop().run(shutdown))
    }

    /// Handles a button becoming visible.
    ///
    /// The button is registered with the binding decoded from `settings`.
    /// A tally button without a mixer address stays registered but is not
    /// polled and receives no icon updates until it is configured.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if `settings` cannot be decoded. In that
    /// case any previous binding for `context` is removed.
    pub fn on_will_appear(
        &self,
        kind: ButtonKind,
        context: &str,
        settings: &serde_json::Value,
    ) -> Result<()> {
        match ButtonBinding::from_settings(kind, settings) {
            Ok(binding) => {
                self.registry.register(context, binding);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(context = %context, ?kind, error = %e, "Invalid button settings");
                self.registry.unregister(context);
                Err(e.into())
            }
        }
    }

    /// Handles updated settings for a visible button.
    ///
    /// # Errors
    ///
    /// Same as [`on_will_appear`](Self::on_will_appear).
    pub fn on_did_receive_settings(
        &self,
        kind: ButtonKind,
        context: &str,
        settings: &serde_json::Value,
    ) -> Result<()> {
        self.on_will_appear(kind, context, settings)
    }

    /// Handles a button leaving the surface.
    ///
    /// Returns true if the button was registered. Its mixer connection is
    /// released on the next refresh tick if no other button uses it.
    pub fn on_will_disappear(&self, context: &str) -> bool {
        self.registry.unregister(context).is_some()
    }

    /// Handles a key press.
    ///
    /// Preview buttons send `PreviewInput` and program buttons send
    /// `CutDirect` for their input. On an alternate bus the zero-based
    /// `Mix` index is added. Function buttons send their configured
    /// function.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the settings are invalid or lack a
    /// required field, `Error::Connect` if no client can be built for the
    /// mixer, and `Error::Transient` if the mixer rejects the request.
    pub async fn on_key_down(
        &self,
        kind: ButtonKind,
        context: &str,
        settings: &serde_json::Value,
    ) -> Result<()> {
        let binding = ButtonBinding::from_settings(kind, settings)?;
        if !binding.is_configured() {
            return Err(ConfigurationError::MissingField("host").into());
        }

        let (function, params) = key_down_request(&binding)?;

        let entry = self.pool.get_or_create(&binding.device)?;
        if let Err(e) = entry.client().send_function(function, &params).await {
            tracing::warn!(context = %context, device = %binding.device, function, error = %e, "Key press command failed");
            return Err(e.into());
        }

        tracing::debug!(context = %context, device = %binding.device, function, "Key press command sent");
        Ok(())
    }
}

impl<C: DeviceConnector, H: Host> std::fmt::Debug for TallyPlugin<C, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TallyPlugin")
            .field("pool", &self.pool)
            .field("buttons", &self.registry.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn key_down_request(
    binding: &ButtonBinding,
) -> std::result::Result<(&str, Vec<(String, String)>), ConfigurationError> {
    let (function, input) = match &binding.target {
        BindingTarget::Function(call) => {
            if call.name.is_empty() {
                return Err(ConfigurationError::MissingField("name"));
            }
            return Ok((call.name.as_str(), call.params()));
        }
        BindingTarget::Preview { input } => (PREVIEW_FUNCTION, input),
        BindingTarget::Program { input } => (PROGRAM_FUNCTION, input),
    };

    if input.is_empty() {
        return Err(ConfigurationError::MissingField("input"));
    }

    let mut params = vec![("Input".to_string(), input.clone())];
    if let Some(bus) = binding.alternate_bus() {
        params.push(("Mix".to_string(), (bus - 1).to_string()));
    }
    Ok((function, params))
}
