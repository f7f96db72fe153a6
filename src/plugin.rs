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

//! # Qi Plugin Module
//!
//! This module defines the plugin unit Qi registers and dispatches: a
//! handler function, default options, an availability rule, and an optional
//! scope selector with exclusion.
//!
//! ## Handler Contract
//!
//! A handler receives mutable access to the document, the resolved scope
//! (`container` and/or narrowed `target` handles), and the merged options
//! for this invocation. It returns `true` for success and `false` for
//! failure; failure is an ordinary recorded outcome, never an error.
//!
//! ## Availability
//!
//! Availability is a tagged variant: a static flag, or a predicate invoked
//! per candidate with the resolved scope and merged options. Predicates
//! receive immutable borrows only, so they cannot mutate the document or
//! the options they inspect.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::element::{QiDocument, QiElementId};

/// Flat option mapping handed to handlers and availability predicates.
///
/// Merging is shallow: call-site entries override plugin defaults key by
/// key, nested objects are replaced wholesale.
pub type QiOptions = Map<String, Value>;

/// Handler function invoked by the dispatcher.
pub type QiHandlerFn = Arc<dyn Fn(&mut QiDocument, &QiScope, &QiOptions) -> bool + Send + Sync>;

/// Availability predicate invoked by the dispatcher before a handler runs.
pub type QiPredicateFn = Arc<dyn Fn(&QiDocument, &QiScope, &QiOptions) -> bool + Send + Sync>;

/// Resolved scope a plugin acts on during one invocation.
///
/// Container-based dispatch fills `container` and, when the plugin declares
/// a selector, the narrowed `target` handles. Single-target dispatch fills
/// only `target`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QiScope {
    pub container: Option<QiElementId>,
    pub target: Option<Vec<QiElementId>>,
}

impl QiScope {
    /// The elements a handler should act on: the narrowed target when one
    /// was resolved, otherwise the container itself.
    pub fn effective_elements(&self) -> Vec<QiElementId> {
        match (&self.target, self.container) {
            (Some(target), _) => target.clone(),
            (None, Some(container)) => vec![container],
            (None, None) => Vec::new(),
        }
    }
}

/// Whether a plugin may run: a static flag or a dynamic predicate.
#[derive(Clone)]
pub enum QiAvailability {
    Static(bool),
    Predicate(QiPredicateFn),
}

impl QiAvailability {
    /// Evaluate the availability decision for one candidate.
    pub fn is_available(&self, doc: &QiDocument, scope: &QiScope, options: &QiOptions) -> bool {
        match self {
            QiAvailability::Static(flag) => *flag,
            QiAvailability::Predicate(predicate) => predicate(doc, scope, options),
        }
    }
}

impl Default for QiAvailability {
    fn default() -> Self {
        QiAvailability::Static(true)
    }
}

impl fmt::Debug for QiAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QiAvailability::Static(flag) => write!(f, "Static({})", flag),
            QiAvailability::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

/// Registered plugin definition.
///
/// Owned exclusively by the registry; replaced atomically on
/// re-registration, never mutated in place.
#[derive(Clone)]
pub struct QiPluginDetail {
    /// Handler invoked with `(document, scope, merged_options)`.
    pub handler: QiHandlerFn,
    /// Default options, merged under per-call overrides.
    pub options: QiOptions,
    /// Static flag or dynamic predicate consulted per candidate.
    pub available: QiAvailability,
    /// Optional scope selector narrowing the container to descendants.
    pub selector: Option<String>,
    /// Optional exclusion selector removed from the narrowed scope.
    pub except_selector: Option<String>,
}

impl QiPluginDetail {
    /// A detail with all fields at their registration defaults: no-op
    /// handler (success), empty options, statically available, no selector.
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        QiPluginDetail {
            handler: Arc::new(|_, _, _| true),
            options: QiOptions::new(),
            available: QiAvailability::default(),
            selector: None,
            except_selector: None,
        }
    }

    /// Set the handler function.
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut QiDocument, &QiScope, &QiOptions) -> bool + Send + Sync + 'static,
    {
        self.handler = Arc::new(handler);
        self
    }

    /// Set the default options from a JSON object value.
    ///
    /// Non-object values are ignored and leave the defaults empty.
    pub fn default_options(mut self, options: Value) -> Self {
        if let Value::Object(map) = options {
            self.options = map;
        }
        self
    }

    /// Set a static availability flag.
    pub fn available(mut self, flag: bool) -> Self {
        self.available = QiAvailability::Static(flag);
        self
    }

    /// Set a dynamic availability predicate.
    pub fn available_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&QiDocument, &QiScope, &QiOptions) -> bool + Send + Sync + 'static,
    {
        self.available = QiAvailability::Predicate(Arc::new(predicate));
        self
    }

    /// Set the scope selector.
    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    /// Set the exclusion selector.
    pub fn except_selector(mut self, selector: impl Into<String>) -> Self {
        self.except_selector = Some(selector.into());
        self
    }
}

impl Default for QiPluginDetail {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QiPluginDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QiPluginDetail")
            .field("options", &self.options)
            .field("available", &self.available)
            .field("selector", &self.selector)
            .field("except_selector", &self.except_selector)
            .finish_non_exhaustive()
    }
}
