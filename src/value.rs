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

//! A dynamic scalar used outside columnar blocks: constants, function
//! arguments and function results (C2). Values are immutable after
//! construction and compared structurally.

use std::fmt;

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    String(String),
    Slice(Vec<Value>),
}

impl Value {
    pub fn make_int(i: i64) -> Value {
        Value::Int(i)
    }

    pub fn make_string(s: impl Into<String>) -> Value {
        Value::String(s.into())
    }

    pub fn make_slice(vs: impl IntoIterator<Item = Value>) -> Value {
        Value::Slice(vs.into_iter().collect())
    }

    pub fn as_int(&self) -> Result<i64> {
        match self {
            Value::Int(i) => Ok(*i),
            other => Err(EngineError::Validation(format!(
                "cannot convert {other} to int"
            ))),
        }
    }

    pub fn as_string(&self) -> Result<&str> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(EngineError::Validation(format!(
                "cannot convert {other} to string"
            ))),
        }
    }

    pub fn as_slice(&self) -> Result<&[Value]> {
        match self {
            Value::Slice(vs) => Ok(vs),
            other => Err(EngineError::Validation(format!(
                "cannot convert {other} to slice"
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Slice(vs) => write!(f, "[{}]", vs.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")),
        }
    }
}

/// Values that can be inferred into a [`Value`] without an explicit
/// constructor call — covers literal ints/strings plugged in from the
/// binder or from tests.
pub trait ToValue {
    fn to_value(&self) -> Result<Value>;
}

impl ToValue for i64 {
    fn to_value(&self) -> Result<Value> {
        Ok(Value::Int(*self))
    }
}

impl ToValue for i32 {
    fn to_value(&self) -> Result<Value> {
        Ok(Value::Int(*self as i64))
    }
}

impl ToValue for &str {
    fn to_value(&self) -> Result<Value> {
        Ok(Value::String((*self).to_string()))
    }
}

impl ToValue for String {
    fn to_value(&self) -> Result<Value> {
        Ok(Value::String(self.clone()))
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Result<Value> {
        Ok(self.clone())
    }
}

pub fn to_value(source: &impl ToValue) -> Result<Value> {
    source.to_value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_round_trip() {
        assert_eq!(Value::make_int(4).as_int().unwrap(), 4);
        assert_eq!(Value::make_string("a").as_string().unwrap(), "a");
        let slice = Value::make_slice([Value::make_int(1), Value::make_int(2)]);
        assert_eq!(slice.as_slice().unwrap().len(), 2);
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(Value::make_int(1), Value::make_int(1));
        assert_ne!(Value::make_int(1), Value::make_int(2));
    }

    #[test]
    fn wrong_accessor_fails() {
        assert!(Value::make_int(1).as_string().is_err());
    }
}
