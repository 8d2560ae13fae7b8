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

//! Scalar data types (C1). New variants are added by registration in
//! [`data_type_factory`] only — no caller code changes.

use crate::error::{EngineError, Result};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    String,
    Int32,
    UInt32,
    UInt64,
}

impl DataType {
    pub fn name(&self) -> &'static str {
        match self {
            DataType::String => "String",
            DataType::Int32 => "Int32",
            DataType::UInt32 => "UInt32",
            DataType::UInt64 => "UInt64",
        }
    }

    /// The zero value used to seed builders/aggregate accumulators.
    pub fn zero(&self) -> Value {
        match self {
            DataType::String => Value::String(String::new()),
            DataType::Int32 | DataType::UInt32 | DataType::UInt64 => Value::Int(0),
        }
    }

    /// Whether `value` can be stored in a column of this type, following
    /// the batch writer's coercion rules (spec §4.3): integers are
    /// interchangeable across the integer-backed variants, strings only
    /// coerce to `String`.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (DataType::String, Value::String(_)) => true,
            (DataType::Int32 | DataType::UInt32 | DataType::UInt64, Value::Int(_)) => true,
            _ => false,
        }
    }
}

/// `data_type_factory(name) -> DataType | error`. Lookup is first exact,
/// then upper-cased (spec §4.1).
pub fn data_type_factory(name: &str) -> Result<DataType> {
    lookup(name).or_else(|| lookup(&name.to_uppercase())).ok_or_else(|| EngineError::data_type_not_found(name))
}

fn lookup(name: &str) -> Option<DataType> {
    match name {
        "String" | "STRING" => Some(DataType::String),
        "Int32" | "INT32" => Some(DataType::Int32),
        "UInt32" | "UINT32" => Some(DataType::UInt32),
        "UInt64" | "UINT64" => Some(DataType::UInt64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_case_lookup() {
        assert_eq!(data_type_factory("Int32").unwrap(), DataType::Int32);
    }

    #[test]
    fn upper_cased_fallback_has_equal_name() {
        // "uint64" has no exact-case entry; it resolves via the
        // upper-cased fallback to the same type as the exact spelling.
        let via_fallback = data_type_factory("uint64").unwrap();
        let exact_variant = data_type_factory("UInt64").unwrap();
        assert_eq!(via_fallback.name(), exact_variant.name());
    }

    #[test]
    fn unknown_type_error_message() {
        let err = data_type_factory("Nope").unwrap_err();
        assert_eq!(err.to_string(), "Couldn't get the data type:Nope");
    }
}
