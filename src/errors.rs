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

//! # Qi Error Module
//!
//! This module defines the error types and utilities used throughout the Qi
//! runtime for consistent error handling and reporting.
//!
//! ## Error Handling Philosophy
//!
//! Qi deliberately favors silent skip over hard failure: unknown plugin names
//! in a batch apply, empty container resolutions, empty narrowed scopes, and
//! exhausted apply budgets are all quiet no-ops. The single hard failure is
//! applying an unregistered plugin through the explicit single-target path,
//! which surfaces as [`QiError::UnregisteredPlugin`].
//!
//! A handler reporting failure is a normal, recorded outcome — it never
//! becomes a `QiError`.
//!
//! ## Error Categories
//!
//! - **Selector**: Malformed selector expressions
//! - **Validation**: Input validation failures
//! - **UnregisteredPlugin**: Single-target apply of an unknown plugin
//! - **Serde**: Serialization/deserialization errors
//! - **Internal**: Unexpected internal failures

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout Qi Core.
///
/// This is a type alias for `std::result::Result<T, QiError>` that provides
/// a more concise way to write function signatures that return Qi errors.
pub type Result<T> = std::result::Result<T, QiError>;

/// Canonical error enumeration for Qi Core.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum QiError {
    /// Errors caused by selector expressions that cannot be parsed.
    #[error("selector error: {message}")]
    Selector { message: String },

    /// Validation errors triggered by invalid parameters or inputs.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Raised when the single-target apply path names an unknown plugin.
    #[error("apply an unregistered plugin ({plugin})")]
    UnregisteredPlugin { plugin: String },

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for QiError {
    fn from(err: serde_json::Error) -> Self {
        QiError::Serde(err.to_string())
    }
}

impl QiError {
    /// Helper to construct selector errors.
    pub fn selector<T: Into<String>>(message: T) -> Self {
        QiError::Selector {
            message: message.into(),
        }
    }

    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        QiError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct the unregistered-plugin error.
    pub fn unregistered(plugin: impl Into<String>) -> Self {
        QiError::UnregisteredPlugin {
            plugin: plugin.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        QiError::Internal(message.into())
    }
}
