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

//! # Qi Selector Module
//!
//! This module implements the small selector language Qi uses to address
//! elements: a tag name, `.class`, `#id`, compounds of those
//! (`p.note#intro`), and comma-separated alternation (`p, .hint`).
//!
//! Plugin declarations keep their selectors as plain strings; parsing
//! happens at dispatch time so that a malformed selector degrades into a
//! skipped plugin instead of poisoning the registry.

use std::sync::OnceLock;

use regex::Regex;

use crate::element::QiElement;
use crate::errors::{QiError, Result};

/// A single compound selector: every declared part must match the element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QiCompoundSelector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl QiCompoundSelector {
    /// Check whether an element satisfies all parts of this compound.
    pub fn matches(&self, element: &QiElement) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes
            .iter()
            .all(|class| element.classes.iter().any(|c| c == class))
    }
}

/// Parsed selector expression: a non-empty list of compound alternatives.
///
/// An element matches when any alternative matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QiSelector {
    alternatives: Vec<QiCompoundSelector>,
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^-?[A-Za-z_][A-Za-z0-9_-]*$").expect("static identifier pattern")
    })
}

fn validate_identifier(token: &str, source: &str) -> Result<String> {
    if identifier_pattern().is_match(token) {
        Ok(token.to_string())
    } else {
        Err(QiError::selector(format!(
            "invalid identifier '{}' in selector '{}'",
            token, source
        )))
    }
}

impl QiSelector {
    /// Parse a selector expression.
    ///
    /// Returns a selector error when the expression is empty or contains a
    /// token that is not a valid identifier.
    pub fn parse(input: &str) -> Result<Self> {
        let mut alternatives = Vec::new();

        for part in input.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(QiError::selector(format!(
                    "empty alternative in selector '{}'",
                    input
                )));
            }
            alternatives.push(parse_compound(part, input)?);
        }

        if alternatives.is_empty() {
            return Err(QiError::selector("empty selector expression"));
        }

        Ok(QiSelector { alternatives })
    }

    /// Check whether an element matches any alternative of this selector.
    pub fn matches(&self, element: &QiElement) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(element))
    }

    /// The parsed alternatives, in source order.
    pub fn alternatives(&self) -> &[QiCompoundSelector] {
        &self.alternatives
    }
}

fn parse_compound(part: &str, source: &str) -> Result<QiCompoundSelector> {
    let mut compound = QiCompoundSelector {
        tag: None,
        id: None,
        classes: Vec::new(),
    };

    let mut rest = part;

    // Leading bare token is a tag name.
    if !rest.starts_with('.') && !rest.starts_with('#') {
        let end = rest
            .find(|c| c == '.' || c == '#')
            .unwrap_or(rest.len());
        compound.tag = Some(validate_identifier(&rest[..end], source)?);
        rest = &rest[end..];
    }

    while let Some(marker) = rest.chars().next() {
        let body = &rest[1..];
        let end = body
            .find(|c| c == '.' || c == '#')
            .unwrap_or(body.len());
        let token = validate_identifier(&body[..end], source)?;

        match marker {
            '.' => compound.classes.push(token),
            '#' => {
                if compound.id.is_some() {
                    return Err(QiError::selector(format!(
                        "multiple id tokens in selector '{}'",
                        source
                    )));
                }
                compound.id = Some(token);
            }
            _ => {
                return Err(QiError::selector(format!(
                    "unexpected token '{}' in selector '{}'",
                    marker, source
                )))
            }
        }

        rest = &body[end..];
    }

    Ok(compound)
}
