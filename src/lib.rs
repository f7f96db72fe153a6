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

//! # Qi Core Library
//!
//! This is the main library entry point for the Qi plugin dispatch runtime.
//! Qi lets independent plugins be registered once by name and later applied,
//! conditionally and repeatedly, against elements of an in-memory document
//! tree.
//!
//! ## Module Overview
//!
//! The library is organized into the following modules:
//!
//! - **element**: Arena-style document tree, stable element handles, and
//!   caller-supplied dispatch targets
//! - **selector**: Small selector language (tag, `.class`, `#id`, compounds,
//!   alternation) for addressing elements
//! - **plugin**: Plugin details — handler, default options, availability
//!   rule, optional scope selector with exclusion
//! - **registry**: Insertion-ordered plugin registry
//! - **condition**: Apply conditions and caller-shorthand normalization
//! - **history**: Append-only per-element apply history side-table
//! - **dispatch**: The conditional application engine tying it all together
//! - **plugins**: Built-in example plugins
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use qix::{QiDocument, QiOptions, QiPluginDetail, QiPluginManager};
//!
//! let mut doc = QiDocument::new();
//! let container = doc.create_element("div");
//! doc.create_child(container, "p");
//!
//! let mut manager = QiPluginManager::new();
//! manager.register(
//!     "color.text",
//!     QiPluginDetail::new()
//!         .handler(|doc, scope, _options| {
//!             for id in scope.effective_elements() {
//!                 doc.set_style(id, "color", "red");
//!             }
//!             true
//!         })
//!         .selector("p"),
//! );
//!
//! let result = manager
//!     .apply_container(&mut doc, container, &QiOptions::new(), ())
//!     .unwrap();
//! assert_eq!(result.get("color.text"), Some(&true));
//! ```
//!
//! ## Dispatch Model
//!
//! Each apply call normalizes its condition, resolves the target to a set
//! of containers, and processes every container independently: a `times`
//! budget gate, the eligibility filter (allow/deny lists, last-outcome
//! intersection, per-plugin scope narrowing, option merging), the
//! availability decision, then handler dispatch with every outcome appended
//! to the container's history.
//!
//! ## Error Handling
//!
//! Fallible operations return `Result<T, QiError>`. Dispatch itself favors
//! silent skips; the only hard dispatch failure is the single-target apply
//! of an unregistered plugin.

#![allow(non_snake_case)]

pub mod condition;
pub mod dispatch;
pub mod element;
pub mod errors;
pub mod history;
pub mod plugin;
pub mod plugins;
pub mod registry;
pub mod selector;

pub use condition::{QiApplyCondition, QiConditionArg};
pub use dispatch::{QiApplyResult, QiDispatchConfig, QiPluginManager};
pub use element::{QiDocument, QiElement, QiElementId, QiTarget};
pub use errors::{QiError, Result};
pub use history::{QiDispatchRecord, QiHistoryEntry, QiHistoryStore};
pub use plugin::{QiAvailability, QiOptions, QiPluginDetail, QiScope};
pub use registry::QiPluginRegistry;
pub use selector::{QiCompoundSelector, QiSelector};
