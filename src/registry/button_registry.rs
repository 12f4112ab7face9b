// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of visible buttons.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use crate::device::DeviceKey;

use super::{ButtonBinding, ButtonKind};

type Bindings = RwLock<HashMap<String, ButtonBinding>>;

/// Active buttons, one map per [`ButtonKind`], keyed by host context id.
///
/// The event path writes (appear, settings changed, disappear) while the
/// refresh loop reads snapshots. Every read returns owned copies so no lock
/// outlives the call.
///
/// # Examples
///
/// ```
/// use vmix_tally::device::DeviceKey;
/// use vmix_tally::registry::{ButtonBinding, ButtonRegistry};
///
/// let registry = ButtonRegistry::new();
/// let key = DeviceKey::new("mixer", 8088);
///
/// registry.register("ctx-1", ButtonBinding::preview(key.clone(), "cam-1"));
/// registry.register("ctx-2", ButtonBinding::program(key.clone(), "cam-2"));
///
/// assert_eq!(registry.snapshot_active_keys().len(), 1);
///
/// registry.unregister("ctx-1");
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ButtonRegistry {
    preview: Bindings,
    program: Bindings,
    function: Bindings,
}

impl ButtonRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn bindings(&self, kind: ButtonKind) -> &Bindings {
        match kind {
            ButtonKind::Preview => &self.preview,
            ButtonKind::Program => &self.program,
            ButtonKind::Function => &self.function,
        }
    }

    /// Inserts or replaces the binding for `context`.
    ///
    /// A context belongs to one kind at a time; an entry under another kind
    /// is dropped in the same critical section. Returns the binding
    /// previously registered for the context, if any.
    pub fn register(
        &self,
        context: impl Into<String>,
        binding: ButtonBinding,
    ) -> Option<ButtonBinding> {
        let context = context.into();
        let kind = binding.kind();

        tracing::debug!(context = %context, ?kind, device = %binding.device, "Registering button");

        // Locks are always taken in preview, program, function order.
        let mut maps = [
            (ButtonKind::Preview, self.preview.write()),
            (ButtonKind::Program, self.program.write()),
            (ButtonKind::Function, self.function.write()),
        ];

        let mut previous = None;
        for (map_kind, map) in &mut maps {
            if *map_kind != kind
                && let Some(old) = map.remove(&context)
            {
                previous = Some(old);
            }
        }

        maps.into_iter()
            .find(|(map_kind, _)| *map_kind == kind)
            .and_then(|(_, mut map)| map.insert(context, binding))
            .or(previous)
    }

    /// Removes the binding for `context`.
    pub fn unregister(&self, context: &str) -> Option<ButtonBinding> {
        let mut preview = self.preview.write();
        let mut program = self.program.write();
        let mut function = self.function.write();

        let removed = preview
            .remove(context)
            .or_else(|| program.remove(context))
            .or_else(|| function.remove(context));

        if removed.is_some() {
            tracing::debug!(context = %context, "Unregistered button");
        }
        removed
    }

    /// Returns the binding for `context`.
    #[must_use]
    pub fn get(&self, context: &str) -> Option<ButtonBinding> {
        ButtonKind::ALL
            .into_iter()
            .find_map(|kind| self.bindings(kind).read().get(context).cloned())
    }

    /// Returns the distinct configured device keys of all tally-tracking
    /// buttons. Function buttons are excluded.
    #[must_use]
    pub fn snapshot_active_keys(&self) -> HashSet<DeviceKey> {
        ButtonKind::ALL
            .into_iter()
            .filter(|kind| kind.tracks_tally())
            .flat_map(|kind| {
                self.bindings(kind)
                    .read()
                    .values()
                    .filter(|b| b.is_configured())
                    .map(|b| b.device.clone())
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Returns a point-in-time copy of the bindings of one kind.
    #[must_use]
    pub fn snapshot(&self, kind: ButtonKind) -> Vec<(String, ButtonBinding)> {
        self.bindings(kind)
            .read()
            .iter()
            .map(|(context, binding)| (context.clone(), binding.clone()))
            .collect()
    }

    /// Visits a point-in-time copy of every registered binding.
    ///
    /// Concurrent registrations during the visit are not reflected.
    pub fn for_each(&self, mut visit: impl FnMut(&str, &ButtonBinding)) {
        for kind in ButtonKind::ALL {
            for (context, binding) in self.snapshot(kind) {
                visit(&context, &binding);
            }
        }
    }

    /// Returns the total number of registered buttons.
    #[must_use]
    pub fn len(&self) -> usize {
        ButtonKind::ALL
            .into_iter()
            .map(|kind| self.bindings(kind).read().len())
            .sum()
    }

    /// Returns true if no button is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::registry::FunctionCall;

    fn key(host: &str) -> DeviceKey {
        DeviceKey::new(host, 8088)
    }

    #[test]
    fn register_replaces_existing_binding() {
        let registry = ButtonRegistry::new();

        assert!(registry
            .register("ctx", ButtonBinding::preview(key("a"), "1"))
            .is_none());
        let previous = registry.register("ctx", ButtonBinding::preview(key("b"), "1"));

        assert_eq!(previous.map(|b| b.device), Some(key("a")));
        assert_eq!(registry.get("ctx").map(|b| b.device), Some(key("b")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn register_moves_context_between_kinds() {
        let registry = ButtonRegistry::new();
        registry.register("ctx", ButtonBinding::preview(key("a"), "1"));
        registry.register("ctx", ButtonBinding::program(key("a"), "1"));

        assert_eq!(registry.len(), 1);
        assert!(registry.snapshot(ButtonKind::Preview).is_empty());
        assert_eq!(registry.snapshot(ButtonKind::Program).len(), 1);
    }

    #[test]
    fn unregister_removes_binding() {
        let registry = ButtonRegistry::new();
        registry.register("ctx", ButtonBinding::program(key("a"), "1"));

        assert!(registry.unregister("ctx").is_some());
        assert!(registry.unregister("ctx").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn active_keys_are_distinct() {
        let registry = ButtonRegistry::new();
        registry.register("p1", ButtonBinding::preview(key("a"), "1"));
        registry.register("p2", ButtonBinding::preview(key("a"), "2"));
        registry.register("g1", ButtonBinding::program(key("b"), "1"));

        assert_eq!(
            registry.snapshot_active_keys(),
            HashSet::from([key("a"), key("b")])
        );
    }

    #[test]
    fn active_keys_exclude_function_and_unconfigured() {
        let registry = ButtonRegistry::new();
        registry.register("f1", ButtonBinding::function(key("f"), FunctionCall::default()));
        registry.register("p1", ButtonBinding::preview(DeviceKey::default(), "1"));
        registry.register("p2", ButtonBinding::preview(key("a"), "1"));

        assert_eq!(registry.snapshot_active_keys(), HashSet::from([key("a")]));
    }

    #[test]
    fn for_each_visits_all_kinds() {
        let registry = ButtonRegistry::new();
        registry.register("p", ButtonBinding::preview(key("a"), "1"));
        registry.register("g", ButtonBinding::program(key("a"), "1"));
        registry.register("f", ButtonBinding::function(key("a"), FunctionCall::default()));

        let mut seen = Vec::new();
        registry.for_each(|context, _| seen.push(context.to_string()));
        seen.sort();

        assert_eq!(seen, vec!["f", "g", "p"]);
    }

    #[test]
    fn for_each_tolerates_mutation_during_visit() {
        let registry = ButtonRegistry::new();
        registry.register("p1", ButtonBinding::preview(key("a"), "1"));
        registry.register("p2", ButtonBinding::preview(key("a"), "2"));

        let mut visited = 0;
        registry.for_each(|context, _| {
            visited += 1;
            registry.unregister(context);
            registry.register(format!("{context}-new"), ButtonBinding::preview(key("b"), "1"));
        });

        assert_eq!(visited, 2);
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_register_and_snapshot() {
        let registry = Arc::new(ButtonRegistry::new());
        let mut tasks = tokio::task::JoinSet::new();

        for i in 0..32 {
            let registry = Arc::clone(&registry);
            tasks.spawn(async move {
                let context = format!("ctx-{i}");
                registry.register(context.clone(), ButtonBinding::preview(key("a"), "1"));
                let _ = registry.snapshot_active_keys();
                if i % 2 == 0 {
                    registry.unregister(&context);
                }
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap();
        }

        assert_eq!(registry.len(), 16);
        assert_eq!(registry.snapshot_active_keys(), HashSet::from([key("a")]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_kind_changes_leave_one_entry() {
        let registry = Arc::new(ButtonRegistry::new());

        for round in 0..50 {
            let context = format!("ctx-{round}");
            let mut tasks = tokio::task::JoinSet::new();
            for i in 0..12 {
                let registry = Arc::clone(&registry);
                let context = context.clone();
                tasks.spawn(async move {
                    let binding = match i % 3 {
                        0 => ButtonBinding::preview(key("a"), "1"),
                        1 => ButtonBinding::program(key("a"), "1"),
                        _ => ButtonBinding::function(key("a"), FunctionCall::default()),
                    };
                    registry.register(context, binding);
                });
            }
            while let Some(result) = tasks.join_next().await {
                result.unwrap();
            }

            let kinds = ButtonKind::ALL
                .into_iter()
                .filter(|kind| registry.snapshot(*kind).iter().any(|(c, _)| *c == context))
                .count();
            assert_eq!(kinds, 1, "{context} registered under {kinds} kinds");
        }

        assert_eq!(registry.len(), 50);
    }
}
