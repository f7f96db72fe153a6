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

//! # Qi History Module
//!
//! This module provides the per-element apply history: an explicit
//! side-table mapping element handles to their append-only sequence of
//! history entries.
//!
//! ## Invariants
//!
//! - One entry per applying (non-gated) dispatch call, regardless of how
//!   many plugins ran — an entry with zero records is still an entry.
//! - Histories are created lazily on first append and only ever appended
//!   to, never rewritten or evicted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::element::QiElementId;
use crate::plugin::QiOptions;

/// Outcome of one plugin dispatch within a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QiDispatchRecord {
    /// Name of the dispatched plugin.
    pub plugin: String,
    /// Options the handler received, after merging.
    pub options: QiOptions,
    /// Narrowed target handles, when the plugin declared a scope selector.
    pub target: Option<Vec<QiElementId>>,
    /// Whether the handler reported success.
    pub is_success: bool,
}

/// Recorded outcome set of one dispatch call on one element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QiHistoryEntry {
    /// When the dispatch call was recorded.
    pub applied_at: DateTime<Utc>,
    /// One record per dispatched plugin, in dispatch order.
    pub records: Vec<QiDispatchRecord>,
}

impl QiHistoryEntry {
    #[allow(non_snake_case)]
    pub fn new(records: Vec<QiDispatchRecord>) -> Self {
        QiHistoryEntry {
            applied_at: Utc::now(),
            records,
        }
    }
}

/// Append-only side-table of per-element apply histories.
#[derive(Debug, Default, Clone)]
pub struct QiHistoryStore {
    inner: HashMap<QiElementId, Vec<QiHistoryEntry>>,
}

impl QiHistoryStore {
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        QiHistoryStore {
            inner: HashMap::new(),
        }
    }

    /// Append a history entry, creating the element's history lazily.
    pub fn append(&mut self, element: QiElementId, entry: QiHistoryEntry) {
        log::debug!(
            "history.append: dispatch batch recorded - element={}, record_count={}",
            element.0,
            entry.records.len()
        );
        self.inner.entry(element).or_default().push(entry);
    }

    /// The element's full history, oldest first. Empty if never dispatched.
    pub fn history(&self, element: QiElementId) -> &[QiHistoryEntry] {
        self.inner
            .get(&element)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of applying calls recorded for the element.
    pub fn len(&self, element: QiElementId) -> usize {
        self.inner.get(&element).map(Vec::len).unwrap_or(0)
    }

    /// Defensive copy of the most recent entry, if any.
    pub fn last_entry(&self, element: QiElementId) -> Option<QiHistoryEntry> {
        self.history(element).last().cloned()
    }

    /// Records of the most recent entry whose outcome matches `status`.
    pub fn last_records(&self, element: QiElementId, status: bool) -> Vec<QiDispatchRecord> {
        self.history(element)
            .last()
            .map(|entry| {
                entry
                    .records
                    .iter()
                    .filter(|record| record.is_success == status)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}
