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

//! # Qi Registry Module
//!
//! This module provides the plugin registry, managing registration and
//! lookup of plugin details by unique name.
//!
//! ## Registry Operations
//!
//! - Register plugin details under unique names (collision returns false)
//! - Re-register to atomically replace an existing detail
//! - Query registration state and look up details
//!
//! Iteration order is insertion order; the dispatch engine's candidate
//! ordering is defined by it.

use indexmap::IndexMap;

use crate::plugin::QiPluginDetail;

/// Registry mapping plugin names to their details, in insertion order.
#[derive(Debug, Default, Clone)]
pub struct QiPluginRegistry {
    inner: IndexMap<String, QiPluginDetail>,
}

impl QiPluginRegistry {
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        QiPluginRegistry {
            inner: IndexMap::new(),
        }
    }

    /// Register a plugin under `name`.
    ///
    /// Succeeds and stores the detail iff the name is not already present;
    /// returns false without mutating anything on collision.
    pub fn register(&mut self, name: &str, detail: QiPluginDetail) -> bool {
        if self.inner.contains_key(name) {
            log::warn!(
                "registry.register_collision: plugin name already registered, keeping existing detail - plugin={}",
                name
            );
            return false;
        }

        log::info!(
            "registry.register: plugin registered - plugin={}, selector={:?}, except_selector={:?}",
            name,
            detail.selector,
            detail.except_selector
        );
        self.inner.insert(name.to_string(), detail);
        true
    }

    /// Unconditionally replace any existing detail under `name`.
    ///
    /// Implemented as delete-then-insert, so a re-registered plugin moves to
    /// the end of the iteration order.
    pub fn re_register(&mut self, name: &str, detail: QiPluginDetail) {
        let replaced = self.inner.shift_remove(name).is_some();
        log::info!(
            "registry.re_register: plugin detail replaced - plugin={}, had_previous={}",
            name,
            replaced
        );
        self.inner.insert(name.to_string(), detail);
    }

    /// Check if a plugin is registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Look up a plugin detail.
    pub fn detail(&self, name: &str) -> Option<&QiPluginDetail> {
        self.inner.get(name)
    }

    /// Registered plugin names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.inner.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
