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

//! Evaluates a scalar [`PlanNode`] expression against one row of a
//! [`DataBlock`] — the shared piece `FilterTransform`, `GroupByTransform`
//! and `OrderByTransform` all need to turn a bound expression into a
//! value (spec §4.7/§4.8).

use crate::array::DataBlock;
use crate::error::{plan_err, Result};
use crate::planner::PlanNode;
use crate::value::Value;

use super::function_factory;

pub fn eval_on_row(expr: &PlanNode, block: &DataBlock, row: usize) -> Result<Value> {
    match expr {
        PlanNode::Constant(v) => Ok(v.clone()),
        PlanNode::Variable(name) => block
            .column_by_name(name)
            .and_then(|c| c.get(row))
            .cloned()
            .ok_or_else(|| plan_err(format!("unknown column: {name}"))),
        PlanNode::FunctionExpression { name, args } => {
            let values = args
                .iter()
                .map(|a| eval_on_row(a, block, row))
                .collect::<Result<Vec<Value>>>()?;
            function_factory(name)?.validate_and_call(&values)
        }
        other => Err(plan_err(format!("cannot evaluate {} as a row expression", other.name()))),
    }
}

/// `true` unless the evaluated value is the integer zero — matches the
/// boolean-as-`Value::Int(0|1)` convention scalar comparisons use.
pub fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Int(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{BatchWriter, Column};
    use crate::types::DataType;

    fn block() -> DataBlock {
        let mut block = DataBlock::new(vec![Column::new("number", DataType::Int32)]);
        let mut writer = BatchWriter::new(block.columns());
        writer.write_row([Value::make_int(7)]).unwrap();
        block.write_batch(writer).unwrap();
        block
    }

    #[test]
    fn evaluates_a_variable_against_its_column() {
        let b = block();
        let v = eval_on_row(&PlanNode::Variable("number".to_string()), &b, 0).unwrap();
        assert_eq!(v, Value::make_int(7));
    }

    #[test]
    fn evaluates_a_function_expression_recursively() {
        let b = block();
        let expr = PlanNode::FunctionExpression {
            name: ">".to_string(),
            args: vec![PlanNode::Variable("number".to_string()), PlanNode::Constant(Value::make_int(3))],
        };
        let v = eval_on_row(&expr, &b, 0).unwrap();
        assert!(is_truthy(&v));
    }

    #[test]
    fn unknown_column_is_an_error() {
        let b = block();
        let err = eval_on_row(&PlanNode::Variable("ghost".to_string()), &b, 0).unwrap_err();
        assert!(err.to_string().contains("unknown column"));
    }
}
