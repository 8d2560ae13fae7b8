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

//! Named scalar/table-valued functions (C5): a validator checks arity
//! and argument types before any logic runs; logic is pure.

pub mod eval;
mod scalar;
mod table_valued;

use crate::error::{EngineError, Result};
use crate::value::Value;

pub trait Validator: Send + Sync {
    fn validate(&self, args: &[Value]) -> Result<()>;
}

pub trait Logic: Send + Sync {
    fn call(&self, args: &[Value]) -> Result<Value>;
}

/// A registered function: its validator runs before `logic`, exactly as
/// spec §4.5 requires.
pub struct Function {
    pub name: &'static str,
    pub validator: Box<dyn Validator>,
    pub logic: Box<dyn Logic>,
}

impl Function {
    pub fn validate_and_call(&self, args: &[Value]) -> Result<Value> {
        self.validator.validate(args)?;
        self.logic.call(args)
    }
}

/// Validates exact arity; per-argument compatibility is left to `logic`
/// callers that already know their own argument shapes, matching the
/// lightweight validators the original registry used.
pub struct Arity(pub usize);

impl Validator for Arity {
    fn validate(&self, args: &[Value]) -> Result<()> {
        if args.len() != self.0 {
            return Err(EngineError::Validation(format!(
                "expected {} argument(s), got {}",
                self.0,
                args.len()
            )));
        }
        Ok(())
    }
}

/// Validates a minimum arity — used by the variadic table-valued
/// functions.
pub struct MinArity(pub usize);

impl Validator for MinArity {
    fn validate(&self, args: &[Value]) -> Result<()> {
        if args.len() < self.0 {
            return Err(EngineError::Validation(format!(
                "expected at least {} argument(s), got {}",
                self.0,
                args.len()
            )));
        }
        Ok(())
    }
}

/// `function_factory(name) -> Function | error`. Lookup is
/// case-insensitive, matching the original registry's `ToUpper`
/// dispatch for table-valued functions.
pub fn function_factory(name: &str) -> Result<Function> {
    let upper = name.to_uppercase();
    match upper.as_str() {
        "+" => Ok(scalar::plus()),
        "-" => Ok(scalar::minus()),
        "*" => Ok(scalar::multiply()),
        "/" => Ok(scalar::divide()),
        "=" => Ok(scalar::eq()),
        "<>" | "!=" => Ok(scalar::neq()),
        "<" => Ok(scalar::lt()),
        "<=" => Ok(scalar::lte()),
        ">" => Ok(scalar::gt()),
        ">=" => Ok(scalar::gte()),
        "RANGE" => Ok(table_valued::range()),
        "RANGETABLE" => Ok(table_valued::range_table()),
        "RANDTABLE" => Ok(table_valued::rand_table()),
        _ => Err(EngineError::function_not_found(name)),
    }
}

/// Table-valued function names recognized by the executor factory when
/// it builds the output schema (spec §4.7).
pub fn is_table_valued(name: &str) -> bool {
    matches!(name.to_uppercase().as_str(), "RANGE" | "RANGETABLE" | "RANDTABLE")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_function_errors() {
        let err = function_factory("nope").unwrap_err();
        assert_eq!(err.to_string(), "function not found: nope");
    }

    #[test]
    fn plus_validates_arity_before_running_logic() {
        let f = function_factory("+").unwrap();
        let err = f.validate_and_call(&[Value::make_int(1)]).unwrap_err();
        assert!(err.to_string().contains("expected 2 argument"));
    }

    #[test]
    fn plus_adds_integers() {
        let f = function_factory("+").unwrap();
        let result = f.validate_and_call(&[Value::make_int(1), Value::make_int(2)]).unwrap();
        assert_eq!(result, Value::make_int(3));
    }
}
