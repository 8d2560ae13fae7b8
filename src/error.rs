// Copyright 2026 The Riverql Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error kinds shared by every layer of the engine.
//!
//! Message text is part of the contract: several tests compare
//! `to_string()` output literally, so existing wording must not drift.

use std::fmt;

pub type Result<T> = std::result::Result<T, EngineError>;

/// The single error type that crosses executor, planner and processor
/// boundaries. Runtime errors are carried the same way inside
/// [`crate::processor::Message::Error`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum EngineError {
    /// Unknown data type name, function name, database or table.
    #[error("{0}")]
    NotFound(String),

    /// Arity/type mismatch caught before any logic runs.
    #[error("{0}")]
    Validation(String),

    /// Malformed plan: missing child, unbuilt node, unknown variant.
    #[error("{0}")]
    Plan(String),

    /// An operation unsupported by its target, e.g. writing to a
    /// read-only storage.
    #[error("{0}")]
    Unsupported(String),

    /// Anything else, wrapped with its original message preserved.
    #[error("{0}")]
    Other(String),
}

impl EngineError {
    pub fn data_type_not_found(name: &str) -> Self {
        EngineError::NotFound(format!("Couldn't get the data type:{name}"))
    }

    pub fn function_not_found(name: &str) -> Self {
        EngineError::NotFound(format!("function not found: {name}"))
    }

    pub fn database_not_found(name: &str) -> Self {
        EngineError::NotFound(format!("database:{name} doesn't exists"))
    }

    pub fn table_not_found(db: &str, table: &str) -> Self {
        EngineError::NotFound(format!("table:{db}.{table} doesn't exists"))
    }

    pub fn no_output_stream() -> Self {
        EngineError::Unsupported("Couldn't find outputstream".to_string())
    }
}

impl From<anyhow::Error> for EngineError {
    fn from(e: anyhow::Error) -> Self {
        EngineError::Other(e.to_string())
    }
}

impl From<sqlparser::parser::ParserError> for EngineError {
    fn from(e: sqlparser::parser::ParserError) -> Self {
        EngineError::Plan(e.to_string())
    }
}

/// Helper used by binder/planner code to report a malformed plan with
/// consistent formatting, akin to the teacher's `bail!`-style helpers.
pub fn plan_err(msg: impl fmt::Display) -> EngineError {
    EngineError::Plan(msg.to_string())
}
