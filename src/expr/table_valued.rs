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

//! Table-valued functions. Each returns a `Value::Slice` of rows, where
//! every row is itself a `Value::Slice` of per-column values — the shape
//! the executor factory chunks directly into [`crate::array::BatchWriter`]
//! calls (spec §4.7).

use crate::error::Result;
use crate::types::{data_type_factory, DataType};
use crate::value::Value;

use super::{Arity, Function, Logic, MinArity};

struct Range;

impl Logic for Range {
    fn call(&self, args: &[Value]) -> Result<Value> {
        let n = args[0].as_int()?;
        let rows = (0..n).map(|k| Value::make_slice([Value::make_int(k)]));
        Ok(Value::make_slice(rows))
    }
}

pub fn range() -> Function {
    Function {
        name: "RANGE",
        validator: Box::new(Arity(1)),
        logic: Box::new(Range),
    }
}

/// Shared row generator for `RANGETABLE`/`RANDTABLE`: `args[0]` is the
/// row count, `args[1..]` are one data-type name per output column
/// (resolving Open Question (b): index 0 of the constant list is the
/// row-count driver, not a column — see DESIGN.md).
fn generate_rows(args: &[Value], fill: fn(i64, &DataType) -> Value) -> Result<Value> {
    let n = args[0].as_int()?;
    let col_types: Vec<DataType> = args[1..]
        .iter()
        .map(|v| data_type_factory(v.as_string()?))
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::with_capacity(n.max(0) as usize);
    for k in 0..n {
        let row: Vec<Value> = col_types.iter().map(|dt| fill(k, dt)).collect();
        rows.push(Value::make_slice(row));
    }
    Ok(Value::make_slice(rows))
}

struct RangeTable;

impl Logic for RangeTable {
    fn call(&self, args: &[Value]) -> Result<Value> {
        generate_rows(args, |k, dt| match dt {
            DataType::String => Value::make_string(k.to_string()),
            DataType::Int32 | DataType::UInt32 | DataType::UInt64 => Value::make_int(k),
        })
    }
}

pub fn range_table() -> Function {
    Function {
        name: "RANGETABLE",
        validator: Box::new(MinArity(2)),
        logic: Box::new(RangeTable),
    }
}

/// Deterministic, hash-derived fill so repeated calls with the same
/// arguments produce the same output — `logic` must stay pure (spec
/// §4.5), so this stands in for true entropy.
fn pseudo_random(seed: i64) -> i64 {
    let mut x = seed.wrapping_mul(0x2545_F491_4F6C_DD1D) ^ 0x9E37_79B9_7F4A_7C15;
    x ^= x >> 33;
    x = x.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    x ^= x >> 33;
    x.abs()
}

struct RandTable;

impl Logic for RandTable {
    fn call(&self, args: &[Value]) -> Result<Value> {
        generate_rows(args, |k, dt| match dt {
            DataType::String => Value::make_string(pseudo_random(k).to_string()),
            DataType::Int32 | DataType::UInt32 | DataType::UInt64 => Value::make_int(pseudo_random(k)),
        })
    }
}

pub fn rand_table() -> Function {
    Function {
        name: "RANDTABLE",
        validator: Box::new(MinArity(2)),
        logic: Box::new(RandTable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_yields_zero_to_n_rows() {
        let result = range().logic.call(&[Value::make_int(5)]).unwrap();
        let rows = result.as_slice().unwrap();
        assert_eq!(rows.len(), 5);
        let ints: Vec<i64> = rows
            .iter()
            .map(|r| r.as_slice().unwrap()[0].as_int().unwrap())
            .collect();
        assert_eq!(ints, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn range_table_fills_the_sole_column_with_row_index() {
        let result = range_table()
            .logic
            .call(&[Value::make_int(3), Value::make_string("Int32")])
            .unwrap();
        let rows = result.as_slice().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].as_slice().unwrap()[0], Value::make_int(2));
    }

    #[test]
    fn range_table_fills_every_column_not_just_the_first() {
        let result = range_table()
            .logic
            .call(&[Value::make_int(2), Value::make_string("Int32"), Value::make_string("String")])
            .unwrap();
        let rows = result.as_slice().unwrap();
        let row1 = rows[1].as_slice().unwrap();
        assert_eq!(row1[0], Value::make_int(1));
        assert_eq!(row1[1], Value::make_string("1".to_string()));
    }

    #[test]
    fn rand_table_is_pure() {
        let args = [Value::make_int(4), Value::make_string("Int32")];
        let a = rand_table().logic.call(&args).unwrap();
        let b = rand_table().logic.call(&args).unwrap();
        assert_eq!(a, b);
    }
}
