//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Qi.
//! The Qi project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Qi Dispatch Module
//!
//! This module implements the conditional application engine: eligibility
//! filtering, availability evaluation, handler dispatch, and history
//! recording, tied together by [`QiPluginManager`].
//!
//! ## Dispatch Flow
//!
//! For every resolved container, independently:
//!
//! 1. **Budget gate**: when the condition carries `times`, the container is
//!    skipped entirely once its history would exceed the budget — no
//!    handlers run, no entry is appended.
//! 2. **Eligibility filter**: candidates start as all registered plugins in
//!    insertion order, are intersected with the `only` allow-list, with the
//!    plugins of the last matching-outcome history entry (`last_status`),
//!    and have the `except` deny-list removed; each survivor then resolves
//!    its scope selector (an empty narrowed scope drops the plugin) and
//!    merges options (per-call overrides over plugin defaults).
//! 3. **Availability evaluation**: each candidate's static flag or dynamic
//!    predicate gets the final go/no-go decision.
//! 4. **Dispatch**: handlers run in candidate order; every outcome is
//!    recorded, and the batch is appended to the container's history.
//!
//! Execution is single-threaded and synchronous; the engine owns its
//! registry and history store, and nothing is shared ambiently.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::condition::{QiApplyCondition, QiConditionArg};
use crate::element::{QiDocument, QiElementId, QiTarget};
use crate::errors::{QiError, Result};
use crate::history::{QiDispatchRecord, QiHistoryEntry, QiHistoryStore};
use crate::plugin::{QiHandlerFn, QiOptions, QiPluginDetail, QiScope};
use crate::registry::QiPluginRegistry;
use crate::selector::QiSelector;

/// Configuration for the dispatch engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QiDispatchConfig {
    /// Reproduce the inverted `except` guard of the original engine, where
    /// the deny-list was only (vacuously) applied when it was empty. Off by
    /// default: the corrected semantics always honor `except`.
    #[serde(default)]
    pub legacy_except_gate: bool,
}

/// Aggregate result of one batch apply: plugin name to handler success,
/// accumulated across all resolved containers.
pub type QiApplyResult = IndexMap<String, bool>;

/// One plugin that passed the eligibility filter for a container, carrying
/// everything needed to run it without touching the registry again.
struct QiCandidate {
    plugin: String,
    options: QiOptions,
    target: Option<Vec<QiElementId>>,
    handler: QiHandlerFn,
}

/// Registry, history store, and dispatch engine in one unit.
///
/// The manager is the public API surface of Qi: registration bookkeeping
/// delegates to the registry, history queries delegate to the side-table,
/// and the apply operations drive the conditional application engine.
#[derive(Debug, Default)]
pub struct QiPluginManager {
    registry: QiPluginRegistry,
    history: QiHistoryStore,
    config: QiDispatchConfig,
}

impl QiPluginManager {
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(non_snake_case)]
    pub fn with_config(config: QiDispatchConfig) -> Self {
        QiPluginManager {
            registry: QiPluginRegistry::new(),
            history: QiHistoryStore::new(),
            config,
        }
    }

    /// Register a plugin; false on name collision, leaving the existing
    /// detail untouched.
    pub fn register(&mut self, name: &str, detail: QiPluginDetail) -> bool {
        self.registry.register(name, detail)
    }

    /// Replace any existing detail under `name`; never fails.
    pub fn re_register(&mut self, name: &str, detail: QiPluginDetail) {
        self.registry.re_register(name, detail);
    }

    /// Check if a plugin is registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.registry.is_registered(name)
    }

    /// Look up a plugin detail.
    pub fn detail(&self, name: &str) -> Option<&QiPluginDetail> {
        self.registry.detail(name)
    }

    /// Read access to the registry.
    pub fn registry(&self) -> &QiPluginRegistry {
        &self.registry
    }

    /// Mutable access to the registry, for callers that register plugins
    /// in bulk before dispatching.
    pub fn registry_mut(&mut self) -> &mut QiPluginRegistry {
        &mut self.registry
    }

    /// Apply registered plugins to every container the target resolves to.
    ///
    /// `options` is keyed by plugin name; each value must be a JSON object
    /// and is shallow-merged over that plugin's defaults. The returned map
    /// holds each dispatched plugin's handler outcome; an empty resolution
    /// yields an empty map.
    pub fn apply_container(
        &mut self,
        doc: &mut QiDocument,
        target: impl Into<QiTarget>,
        options: &QiOptions,
        condition: impl Into<QiConditionArg>,
    ) -> Result<QiApplyResult> {
        let condition = condition.into().normalize();
        let containers = target.into().resolve(doc)?;
        let mut result = QiApplyResult::new();

        if containers.is_empty() {
            return Ok(result);
        }

        for container in containers {
            self.apply_to_container(doc, container, options, &condition, &mut result);
        }

        Ok(result)
    }

    /// Apply with the condition's budget forced to a single time, so a
    /// container that already carries history is left alone.
    pub fn apply_container_once(
        &mut self,
        doc: &mut QiDocument,
        target: impl Into<QiTarget>,
        options: &QiOptions,
        condition: impl Into<QiConditionArg>,
    ) -> Result<QiApplyResult> {
        let mut condition = condition.into().normalize();
        condition.times = Some(1);
        self.apply_container(doc, target, options, condition)
    }

    /// Apply exactly one plugin to an explicit target.
    ///
    /// Fails fast with [`QiError::UnregisteredPlugin`] when the plugin is
    /// unknown. No container scope resolution, no history recording, and no
    /// `times`/`last_status` consultation; options merge and the
    /// availability check behave as in the batch path.
    pub fn apply_target(
        &self,
        doc: &mut QiDocument,
        target: impl Into<QiTarget>,
        plugin: &str,
        options: &QiOptions,
    ) -> Result<()> {
        let Some(detail) = self.registry.detail(plugin) else {
            return Err(QiError::unregistered(plugin));
        };

        let elements = target.into().resolve(doc)?;
        if elements.is_empty() {
            log::debug!(
                "dispatch.target_empty: target resolved to no elements - plugin={}",
                plugin
            );
            return Ok(());
        }

        let merged = merge_options(&detail.options, Some(options));
        let scope = QiScope {
            container: None,
            target: Some(elements),
        };

        if !detail.available.is_available(doc, &scope, &merged) {
            log::debug!(
                "dispatch.target_unavailable: availability check declined - plugin={}",
                plugin
            );
            return Ok(());
        }

        let handler = detail.handler.clone();
        log::debug!("dispatch.target_apply: invoking handler - plugin={}", plugin);
        handler(doc, &scope, &merged);
        Ok(())
    }

    /// Apply history of the first container the target resolves to,
    /// oldest entry first. Empty when nothing matches or nothing was ever
    /// dispatched.
    pub fn container_history(
        &self,
        doc: &QiDocument,
        target: impl Into<QiTarget>,
    ) -> Result<Vec<QiHistoryEntry>> {
        let containers = target.into().resolve(doc)?;
        Ok(containers
            .first()
            .map(|container| self.history.history(*container).to_vec())
            .unwrap_or_default())
    }

    /// Defensive copy of the most recent history entry of the first
    /// container the target resolves to.
    pub fn last_container_history_entry(
        &self,
        doc: &QiDocument,
        target: impl Into<QiTarget>,
    ) -> Result<Option<QiHistoryEntry>> {
        let containers = target.into().resolve(doc)?;
        Ok(containers
            .first()
            .and_then(|container| self.history.last_entry(*container)))
    }

    /// Records of the most recent history entry whose outcome matches
    /// `status`, for the first container the target resolves to.
    pub fn last_container_history_records(
        &self,
        doc: &QiDocument,
        target: impl Into<QiTarget>,
        status: bool,
    ) -> Result<Vec<QiDispatchRecord>> {
        let containers = target.into().resolve(doc)?;
        Ok(containers
            .first()
            .map(|container| self.history.last_records(*container, status))
            .unwrap_or_default())
    }

    /// Run the gate, filter, and dispatch steps for one container.
    fn apply_to_container(
        &mut self,
        doc: &mut QiDocument,
        container: QiElementId,
        options: &QiOptions,
        condition: &QiApplyCondition,
        result: &mut QiApplyResult,
    ) {
        if let Some(times) = condition.times {
            let applied = self.history.len(container);
            if applied as u64 + 1 > u64::from(times) {
                log::debug!(
                    "dispatch.budget_exhausted: container skipped - element={}, applied={}, times={}",
                    container.0,
                    applied,
                    times
                );
                return;
            }
        }

        let candidates = self.eligible_plugins(doc, container, condition, options);
        log::debug!(
            "dispatch.apply: dispatching to container - element={}, candidate_count={}",
            container.0,
            candidates.len()
        );

        let mut records = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let scope = QiScope {
                container: Some(container),
                target: candidate.target.clone(),
            };
            let is_success = (candidate.handler)(doc, &scope, &candidate.options);
            if !is_success {
                log::debug!(
                    "dispatch.handler_failed: handler reported failure - plugin={}, element={}",
                    candidate.plugin,
                    container.0
                );
            }
            result.insert(candidate.plugin.clone(), is_success);
            records.push(QiDispatchRecord {
                plugin: candidate.plugin,
                options: candidate.options,
                target: candidate.target,
                is_success,
            });
        }

        // An applying call always appends, even when no plugin survived the
        // filter; the history length counts calls, not handler runs.
        self.history.append(container, QiHistoryEntry::new(records));
    }

    /// The ordered candidate list for one container: registry order,
    /// filtered by the condition, with resolved scopes, merged options, and
    /// the availability decision already applied.
    fn eligible_plugins(
        &self,
        doc: &QiDocument,
        container: QiElementId,
        condition: &QiApplyCondition,
        options: &QiOptions,
    ) -> Vec<QiCandidate> {
        let mut names = self.registry.names();

        if !condition.only.is_empty() {
            names.retain(|name| condition.only.iter().any(|only| only == name));
        }

        if let Some(status) = condition.last_status {
            let last: Vec<String> = self
                .history
                .last_records(container, status)
                .into_iter()
                .map(|record| record.plugin)
                .collect();
            names.retain(|name| last.iter().any(|plugin| plugin == name));
        }

        // The original engine gated the deny-list on the inverted condition,
        // turning it into a no-op whenever one was actually supplied; the
        // corrected behavior is the default here.
        let honor_except = if self.config.legacy_except_gate {
            condition.except.is_empty()
        } else {
            true
        };
        if honor_except && !condition.except.is_empty() {
            names.retain(|name| !condition.except.iter().any(|except| except == name));
        }

        let mut candidates = Vec::new();

        for name in names {
            let Some(detail) = self.registry.detail(&name) else {
                continue;
            };

            let target = match self.resolve_plugin_scope(doc, container, &name, detail) {
                Ok(target) => target,
                Err(()) => continue,
            };

            let per_call = options.get(&name);
            let merged = merge_options(&detail.options, object_entries(per_call));

            let scope = QiScope {
                container: Some(container),
                target: target.clone(),
            };
            if !detail.available.is_available(doc, &scope, &merged) {
                log::debug!(
                    "dispatch.unavailable: availability check declined - plugin={}, element={}",
                    name,
                    container.0
                );
                continue;
            }

            candidates.push(QiCandidate {
                plugin: name,
                options: merged,
                target,
                handler: detail.handler.clone(),
            });
        }

        candidates
    }

    /// Resolve a plugin's declared scope against the container.
    ///
    /// `Ok(None)` means no selector was declared and the scope is the
    /// container itself; `Err(())` means the plugin must be dropped (empty
    /// narrowed scope or a malformed selector).
    fn resolve_plugin_scope(
        &self,
        doc: &QiDocument,
        container: QiElementId,
        name: &str,
        detail: &QiPluginDetail,
    ) -> std::result::Result<Option<Vec<QiElementId>>, ()> {
        let Some(expr) = detail.selector.as_deref() else {
            return Ok(None);
        };

        let selector = match QiSelector::parse(expr) {
            Ok(selector) => selector,
            Err(err) => {
                log::warn!(
                    "dispatch.selector_invalid: plugin skipped - plugin={}, selector={}, error={}",
                    name,
                    expr,
                    err
                );
                return Err(());
            }
        };

        let mut target = doc.select_within(container, &selector);

        if !target.is_empty() {
            if let Some(except_expr) = detail.except_selector.as_deref() {
                match QiSelector::parse(except_expr) {
                    Ok(except) => {
                        target.retain(|id| {
                            doc.element(*id).map(|el| !except.matches(el)).unwrap_or(false)
                        });
                    }
                    Err(err) => {
                        log::warn!(
                            "dispatch.except_selector_invalid: plugin skipped - plugin={}, selector={}, error={}",
                            name,
                            except_expr,
                            err
                        );
                        return Err(());
                    }
                }
            }
        }

        if target.is_empty() {
            log::debug!(
                "dispatch.scope_empty: plugin dropped for container - plugin={}, element={}",
                name,
                container.0
            );
            return Err(());
        }

        Ok(Some(target))
    }
}

/// Extract the object entries of a per-call option value, if present.
fn object_entries(value: Option<&Value>) -> Option<&QiOptions> {
    match value {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Shallow three-way merge: plugin defaults, overridden key by key with the
/// per-call entries; a missing per-call mapping contributes nothing.
fn merge_options(defaults: &QiOptions, per_call: Option<&QiOptions>) -> QiOptions {
    let mut merged = defaults.clone();
    if let Some(overrides) = per_call {
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}
