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

//! # Qi Condition Module
//!
//! This module defines the apply condition controlling which plugins run in
//! one dispatch call, and the normalization of caller shorthand into the
//! canonical form.
//!
//! Callers may pass nothing, a single plugin name, a list of names, or a
//! partial condition; names and name lists become the `only` allow-list,
//! everything else falls back to the all-defaults condition.

use serde::{Deserialize, Serialize};

/// Canonical filter condition for one dispatch call.
///
/// Defaults: empty `only` (all plugins), empty `except`, unbounded `times`,
/// `last_status` ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QiApplyCondition {
    /// Allow-list of plugin names; empty means all registered plugins.
    #[serde(default)]
    pub only: Vec<String>,
    /// Deny-list of plugin names.
    #[serde(default)]
    pub except: Vec<String>,
    /// Maximum number of applying calls per element; `None` is unbounded.
    #[serde(default)]
    pub times: Option<u32>,
    /// Restrict to plugins whose most recent recorded outcome matches:
    /// `Some(true)` requires success, `Some(false)` requires failure,
    /// `None` ignores history.
    #[serde(default)]
    pub last_status: Option<bool>,
}

impl QiApplyCondition {
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Condition restricted to the given plugin names.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QiApplyCondition {
            only: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Caller shorthand accepted wherever a condition is expected.
#[derive(Debug, Clone)]
pub enum QiConditionArg {
    /// No condition supplied: all defaults.
    None,
    /// A single plugin name, treated as a one-element `only` list.
    Name(String),
    /// A list of plugin names, treated as the `only` list.
    Names(Vec<String>),
    /// A full or partial condition, passed through as-is.
    Condition(QiApplyCondition),
}

impl QiConditionArg {
    /// Collapse the shorthand into a canonical condition.
    pub fn normalize(self) -> QiApplyCondition {
        match self {
            QiConditionArg::None => QiApplyCondition::default(),
            QiConditionArg::Name(name) => QiApplyCondition::only([name]),
            QiConditionArg::Names(names) => QiApplyCondition::only(names),
            QiConditionArg::Condition(condition) => condition,
        }
    }
}

impl Default for QiConditionArg {
    fn default() -> Self {
        QiConditionArg::None
    }
}

impl From<()> for QiConditionArg {
    fn from(_: ()) -> Self {
        QiConditionArg::None
    }
}

impl From<&str> for QiConditionArg {
    fn from(name: &str) -> Self {
        QiConditionArg::Name(name.to_string())
    }
}

impl From<String> for QiConditionArg {
    fn from(name: String) -> Self {
        QiConditionArg::Name(name)
    }
}

impl From<Vec<String>> for QiConditionArg {
    fn from(names: Vec<String>) -> Self {
        QiConditionArg::Names(names)
    }
}

impl From<Vec<&str>> for QiConditionArg {
    fn from(names: Vec<&str>) -> Self {
        QiConditionArg::Names(names.into_iter().map(str::to_string).collect())
    }
}

impl From<QiApplyCondition> for QiConditionArg {
    fn from(condition: QiApplyCondition) -> Self {
        QiConditionArg::Condition(condition)
    }
}
