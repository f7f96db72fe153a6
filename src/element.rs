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

//! # Qi Element Module
//!
//! This module provides the element tree Qi dispatches against: an
//! arena-style [`QiDocument`] holding [`QiElement`] nodes addressed by
//! stable [`QiElementId`] handles.
//!
//! ## Design
//!
//! - **Arena storage**: elements live in a flat vector; ids are indices and
//!   stay valid for the document's lifetime (elements are never removed).
//! - **Stable identity**: `QiElementId` is the key the history side-table
//!   uses, so an element's apply history survives arbitrary mutation of the
//!   element itself.
//! - **Opaque resolution**: callers address elements either by selector
//!   expression or by already-resolved handles via [`QiTarget`]; the
//!   dispatch engine only ever asks "which elements?" and "which
//!   descendants, minus which exclusions?".

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::selector::QiSelector;

/// Stable handle of an element inside a [`QiDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QiElementId(pub usize);

/// A single element node: tag, optional id, classes, attributes, and inline
/// styles. Handlers typically mutate `styles` or `attributes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QiElement {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: IndexMap<String, String>,
    pub styles: IndexMap<String, String>,
    pub children: Vec<QiElementId>,
    pub parent: Option<QiElementId>,
}

impl QiElement {
    #[allow(non_snake_case)]
    pub fn new(tag: impl Into<String>) -> Self {
        QiElement {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            attributes: IndexMap::new(),
            styles: IndexMap::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    /// Check whether the element carries the given class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// In-memory element tree with arena storage.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct QiDocument {
    nodes: Vec<QiElement>,
}

impl QiDocument {
    #[allow(non_snake_case)]
    pub fn new() -> Self {
        QiDocument { nodes: Vec::new() }
    }

    /// Create a detached element and return its handle.
    pub fn create_element(&mut self, tag: impl Into<String>) -> QiElementId {
        let id = QiElementId(self.nodes.len());
        self.nodes.push(QiElement::new(tag));
        id
    }

    /// Create an element and attach it under `parent` in one step.
    pub fn create_child(&mut self, parent: QiElementId, tag: impl Into<String>) -> QiElementId {
        let child = self.create_element(tag);
        self.append_child(parent, child);
        child
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// Attaching an already-attached element or an unknown handle is a
    /// silent no-op.
    pub fn append_child(&mut self, parent: QiElementId, child: QiElementId) {
        if parent.0 >= self.nodes.len() || child.0 >= self.nodes.len() || parent == child {
            return;
        }
        if self.nodes[child.0].parent.is_some() {
            return;
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn element(&self, id: QiElementId) -> Option<&QiElement> {
        self.nodes.get(id.0)
    }

    pub fn element_mut(&mut self, id: QiElementId) -> Option<&mut QiElement> {
        self.nodes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Read an inline style property of an element.
    pub fn style(&self, id: QiElementId, property: &str) -> Option<&str> {
        self.element(id)
            .and_then(|el| el.styles.get(property))
            .map(String::as_str)
    }

    /// Write an inline style property of an element. Unknown handles are a
    /// silent no-op.
    pub fn set_style(&mut self, id: QiElementId, property: impl Into<String>, value: impl Into<String>) {
        if let Some(el) = self.element_mut(id) {
            el.styles.insert(property.into(), value.into());
        }
    }

    /// All elements matching `selector`, in document (creation) order.
    pub fn select(&self, selector: &QiSelector) -> Vec<QiElementId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, el)| selector.matches(el))
            .map(|(index, _)| QiElementId(index))
            .collect()
    }

    /// Descendants of `root` matching `selector`, depth-first pre-order.
    ///
    /// The root itself is never part of the result.
    pub fn select_within(&self, root: QiElementId, selector: &QiSelector) -> Vec<QiElementId> {
        let mut matches = Vec::new();
        let Some(root_el) = self.element(root) else {
            return matches;
        };

        let mut stack: Vec<QiElementId> = root_el.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(el) = self.element(id) {
                if selector.matches(el) {
                    matches.push(id);
                }
                stack.extend(el.children.iter().rev().copied());
            }
        }
        matches
    }
}

/// Caller-supplied dispatch target: a selector expression or handles that
/// were resolved earlier.
#[derive(Debug, Clone)]
pub enum QiTarget {
    Selector(String),
    Elements(Vec<QiElementId>),
}

impl QiTarget {
    /// Resolve the target against a document.
    ///
    /// Selector expressions are parsed here, so malformed input surfaces as
    /// a selector error; pre-resolved handles pass through with unknown ids
    /// dropped.
    pub fn resolve(&self, doc: &QiDocument) -> Result<Vec<QiElementId>> {
        match self {
            QiTarget::Selector(expr) => {
                let selector = QiSelector::parse(expr)?;
                Ok(doc.select(&selector))
            }
            QiTarget::Elements(ids) => Ok(ids
                .iter()
                .copied()
                .filter(|id| id.0 < doc.len())
                .collect()),
        }
    }
}

impl From<&str> for QiTarget {
    fn from(expr: &str) -> Self {
        QiTarget::Selector(expr.to_string())
    }
}

impl From<String> for QiTarget {
    fn from(expr: String) -> Self {
        QiTarget::Selector(expr)
    }
}

impl From<QiElementId> for QiTarget {
    fn from(id: QiElementId) -> Self {
        QiTarget::Elements(vec![id])
    }
}

impl From<Vec<QiElementId>> for QiTarget {
    fn from(ids: Vec<QiElementId>) -> Self {
        QiTarget::Elements(ids)
    }
}
