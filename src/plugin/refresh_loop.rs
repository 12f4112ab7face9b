// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic tally refresh.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::device::DeviceConnector;
use crate::error::HostError;
use crate::host::{Host, ImageTarget, inputs_message};
use crate::pool::{ConnectionPool, ReconcileSummary, RefreshSummary};
use crate::registry::{ButtonBinding, ButtonKind, ButtonRegistry};
use crate::state::DeviceState;
use crate::tally::{icon_for, resolve};

use super::PluginConfig;

/// Outcome of the button pushes started by one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Buttons whose icon was pushed successfully.
    pub updated: usize,
    /// Buttons whose icon push failed or timed out.
    pub failed: usize,
}

/// Result of one [`RefreshLoop::tick`].
///
/// Both handles belong to detached tasks. Dropping them does not cancel
/// the work.
#[derive(Debug)]
pub struct TickReport {
    /// What pool reconciliation did this tick.
    pub reconcile: ReconcileSummary,
    /// Buttons left untouched because their mixer has no snapshot yet.
    pub skipped: usize,
    /// Completes once every button push of this tick has finished.
    pub updates: JoinHandle<UpdateSummary>,
    /// Background poll started for the next tick.
    pub refresh: JoinHandle<RefreshSummary>,
}

/// Drives reconciliation, polling and button updates on a fixed period.
///
/// Each tick:
///
/// 1. collects the mixer keys referenced by preview/program buttons,
/// 2. reconciles the pool against them,
/// 3. spawns one update per button whose mixer has a snapshot,
/// 4. spawns a background poll of all pooled mixers for the next tick.
///
/// Nothing in a tick waits on the network. Buttons read a snapshot at most
/// one tick old, and a slow host or mixer only delays its own task. Every
/// host push is bounded by [`PluginConfig::host_timeout`].
pub struct RefreshLoop<C: DeviceConnector, H: Host> {
    pool: Arc<ConnectionPool<C>>,
    registry: Arc<ButtonRegistry>,
    host: Arc<H>,
    config: PluginConfig,
}

impl<C: DeviceConnector, H: Host> RefreshLoop<C, H> {
    /// Creates a refresh loop over shared components.
    #[must_use]
    pub fn new(
        pool: Arc<ConnectionPool<C>>,
        registry: Arc<ButtonRegistry>,
        host: Arc<H>,
        config: PluginConfig,
    ) -> Self {
        Self {
            pool,
            registry,
            host,
            config,
        }
    }

    /// Runs one refresh pass.
    ///
    /// Returns as soon as the work is spawned. Must be called within a tokio
    /// runtime.
    pub fn tick(&self) -> TickReport {
        let keys = self.registry.snapshot_active_keys();
        let reconcile = self.pool.reconcile(&keys);

        let mut updates = Vec::new();
        let mut skipped = 0;

        for kind in [ButtonKind::Preview, ButtonKind::Program] {
            for (context, binding) in self.registry.snapshot(kind) {
                if !binding.is_configured() {
                    continue;
                }
                let Some(state) = self.pool.lookup(&binding.device) else {
                    skipped += 1;
                    continue;
                };
                updates.push(tokio::spawn(update_button(
                    Arc::clone(&self.host),
                    context,
                    binding,
                    state,
                    self.config.image_target(),
                    self.config.host_timeout(),
                )));
            }
        }

        let pool = Arc::clone(&self.pool);
        let refresh = tokio::spawn(async move { pool.refresh_all().await });
        let updates = tokio::spawn(collect_updates(updates));

        tracing::debug!(?reconcile, skipped, "Refresh tick dispatched");

        TickReport {
            reconcile,
            skipped,
            updates,
            refresh,
        }
    }

    /// Ticks on the configured period until `shutdown` becomes `true` or
    /// its sender is dropped.
    ///
    /// In-flight button pushes and polls are detached, not cancelled.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.config.refresh_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(period = ?self.config.refresh_interval(), "Refresh loop started");

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let _report = self.tick();
                }
                () = shutdown_requested(&mut shutdown) => break,
            }
        }

        tracing::info!("Refresh loop stopped");
    }
}

async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    // A dropped sender also ends the loop.
    let _ = shutdown.wait_for(|stop| *stop).await;
}

async fn collect_updates(updates: Vec<JoinHandle<bool>>) -> UpdateSummary {
    let mut summary = UpdateSummary::default();
    for update in updates {
        match update.await {
            Ok(true) => summary.updated += 1,
            Ok(false) => summary.failed += 1,
            Err(e) => {
                tracing::error!(error = %e, "Button update task aborted");
                summary.failed += 1;
            }
        }
    }
    summary
}

async fn bounded(
    timeout: Duration,
    push: impl Future<Output = Result<(), HostError>>,
) -> Result<(), HostError> {
    tokio::time::timeout(timeout, push).await.unwrap_or_else(|_| {
        Err(HostError::Timeout(
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        ))
    })
}

/// Pushes the input list and the tally icon for one button.
///
/// Returns true if the icon push succeeded.
async fn update_button<H: Host>(
    host: Arc<H>,
    context: String,
    binding: ButtonBinding,
    state: Arc<DeviceState>,
    target: ImageTarget,
    timeout: Duration,
) -> bool {
    match inputs_message(state.inputs()) {
        Ok(message) => {
            let push = host.send_to_property_inspector(&context, &message);
            if let Err(e) = bounded(timeout, push).await {
                tracing::debug!(context = %context, error = %e, "Failed to push inputs to inspector");
            }
        }
        Err(e) => tracing::warn!(context = %context, error = %e, "Failed to build inputs message"),
    }

    let kind = binding.kind();
    let tally = resolve(&binding, &state);

    match bounded(timeout, host.set_image(&context, icon_for(kind, tally), target)).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(context = %context, ?kind, error = %e, "Failed to set tally icon");
            let msg = format!("failed to set {kind:?} tally: {e}");
            let log = host.log_message(&msg);
            let _ = bounded(timeout, log).await;
            false
        }
    }
}
