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

use serde_json::{json, Value};

use crate::element::{QiDocument, QiElementId};
use crate::plugin::{QiPluginDetail, QiScope};
use crate::registry::QiPluginRegistry;
use crate::selector::QiSelector;

/// Name of the built-in text color plugin.
pub const TEXT_COLOR: &str = "color.text";

/// Name of the built-in background color plugin.
pub const BACKGROUND_COLOR: &str = "color.background";

/// Elements a color handler should paint: the narrowed target when scope
/// resolution produced one, otherwise the container's paragraph
/// descendants.
fn paint_targets(doc: &QiDocument, scope: &QiScope) -> Vec<QiElementId> {
    if let Some(target) = &scope.target {
        return target.clone();
    }
    let Some(container) = scope.container else {
        return Vec::new();
    };
    match QiSelector::parse("p") {
        Ok(selector) => doc.select_within(container, &selector),
        Err(_) => Vec::new(),
    }
}

/// Detail of the text color plugin: paints the `color` style property of
/// every paragraph in scope, skipping `.skip-color` elements.
pub fn text_color() -> QiPluginDetail {
    QiPluginDetail::new()
        .handler(|doc, scope, options| {
            let color = options
                .get("color")
                .and_then(Value::as_str)
                .unwrap_or("red")
                .to_string();
            for id in paint_targets(doc, scope) {
                doc.set_style(id, "color", color.clone());
            }
            true
        })
        .default_options(json!({"color": "red"}))
        .selector("p")
        .except_selector(".skip-color")
}

/// Detail of the background color plugin: paints the `background-color`
/// style property of every paragraph in scope.
pub fn background_color() -> QiPluginDetail {
    QiPluginDetail::new()
        .handler(|doc, scope, options| {
            let color = options
                .get("background")
                .and_then(Value::as_str)
                .unwrap_or("blue")
                .to_string();
            for id in paint_targets(doc, scope) {
                doc.set_style(id, "background-color", color.clone());
            }
            true
        })
        .default_options(json!({"background": "blue"}))
        .selector("p")
}

/// Register both built-in color plugins, ignoring collisions with details
/// a caller registered earlier under the same names.
pub fn register_builtins(registry: &mut QiPluginRegistry) {
    registry.register(TEXT_COLOR, text_color());
    registry.register(BACKGROUND_COLOR, background_color());
}
