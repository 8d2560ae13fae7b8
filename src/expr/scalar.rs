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

//! Built-in scalar functions: arithmetic and comparison operators.
//! Booleans are represented as `Value::Int(0|1)` — the value model has
//! no dedicated boolean variant.

use crate::error::{EngineError, Result};
use crate::value::Value;

use super::{Arity, Function, Logic};

struct BinaryIntOp {
    apply: fn(i64, i64) -> Result<Value>,
}

impl Logic for BinaryIntOp {
    fn call(&self, args: &[Value]) -> Result<Value> {
        let lhs = args[0].as_int()?;
        let rhs = args[1].as_int()?;
        (self.apply)(lhs, rhs)
    }
}

fn binary(name: &'static str, apply: fn(i64, i64) -> Result<Value>) -> Function {
    Function {
        name,
        validator: Box::new(Arity(2)),
        logic: Box::new(BinaryIntOp { apply }),
    }
}

pub fn plus() -> Function {
    binary("+", |a, b| Ok(Value::make_int(a + b)))
}

pub fn minus() -> Function {
    binary("-", |a, b| Ok(Value::make_int(a - b)))
}

pub fn multiply() -> Function {
    binary("*", |a, b| Ok(Value::make_int(a * b)))
}

pub fn divide() -> Function {
    binary("/", |a, b| {
        if b == 0 {
            return Err(EngineError::Validation("division by zero".to_string()));
        }
        Ok(Value::make_int(a / b))
    })
}

fn boolean(v: bool) -> Value {
    Value::make_int(if v { 1 } else { 0 })
}

pub fn eq() -> Function {
    binary("=", |a, b| Ok(boolean(a == b)))
}

pub fn neq() -> Function {
    binary("<>", |a, b| Ok(boolean(a != b)))
}

pub fn lt() -> Function {
    binary("<", |a, b| Ok(boolean(a < b)))
}

pub fn lte() -> Function {
    binary("<=", |a, b| Ok(boolean(a <= b)))
}

pub fn gt() -> Function {
    binary(">", |a, b| Ok(boolean(a > b)))
}

pub fn gte() -> Function {
    binary(">=", |a, b| Ok(boolean(a >= b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divide_by_zero_is_a_validation_error() {
        let f = divide();
        let err = f.logic.call(&[Value::make_int(1), Value::make_int(0)]).unwrap_err();
        assert_eq!(err.to_string(), "division by zero");
    }

    #[test]
    fn comparisons_return_boolean_ints() {
        let f = lt();
        assert_eq!(f.logic.call(&[Value::make_int(1), Value::make_int(2)]).unwrap(), Value::make_int(1));
        assert_eq!(f.logic.call(&[Value::make_int(2), Value::make_int(1)]).unwrap(), Value::make_int(0));
    }
}
