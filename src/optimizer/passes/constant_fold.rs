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

//! Folds scalar function calls whose arguments are all constants into a
//! single [`PlanNode::Constant`]. Table-valued functions are left alone:
//! the executor factory still needs their argument shape.

use crate::error::Result;
use crate::expr::{function_factory, is_table_valued};
use crate::planner::{OrderKey, PlanNode};

use super::OptimizerPass;

pub struct ConstantFold;

impl OptimizerPass for ConstantFold {
    fn name(&self) -> &'static str {
        "ConstantFold"
    }

    fn apply(&self, plan: PlanNode) -> Result<PlanNode> {
        rewrite(plan)
    }
}

fn rewrite(plan: PlanNode) -> Result<PlanNode> {
    let plan = rewrite_children(plan)?;
    match plan {
        PlanNode::FunctionExpression { name, args } if !is_table_valued(&name) => {
            let all_constant = args.iter().all(|a| matches!(a, PlanNode::Constant(_)));
            if all_constant {
                let values = args
                    .iter()
                    .map(|a| match a {
                        PlanNode::Constant(v) => v.clone(),
                        _ => unreachable!(),
                    })
                    .collect::<Vec<_>>();
                if let Ok(function) = function_factory(&name) {
                    if let Ok(result) = function.validate_and_call(&values) {
                        return Ok(PlanNode::Constant(result));
                    }
                }
            }
            Ok(PlanNode::FunctionExpression { name, args })
        }
        other => Ok(other),
    }
}

fn rewrite_children(plan: PlanNode) -> Result<PlanNode> {
    Ok(match plan {
        PlanNode::FunctionExpression { name, args } => PlanNode::FunctionExpression {
            name,
            args: args.into_iter().map(rewrite).collect::<Result<_>>()?,
        },
        PlanNode::TableValuedFunction { name, args } => PlanNode::TableValuedFunction {
            name,
            args: args.into_iter().map(rewrite).collect::<Result<_>>()?,
        },
        PlanNode::Filter { input, predicate } => PlanNode::Filter {
            input: Box::new(rewrite(*input)?),
            predicate: Box::new(rewrite(*predicate)?),
        },
        PlanNode::GroupBy { input, keys, aggs } => PlanNode::GroupBy {
            input: Box::new(rewrite(*input)?),
            keys: keys.into_iter().map(rewrite).collect::<Result<_>>()?,
            aggs: aggs
                .into_iter()
                .map(|(f, e)| Ok((f, rewrite(e)?)))
                .collect::<Result<_>>()?,
        },
        PlanNode::OrderBy { input, keys } => PlanNode::OrderBy {
            input: Box::new(rewrite(*input)?),
            keys: keys
                .into_iter()
                .map(|k| {
                    Ok(OrderKey {
                        expr: rewrite(k.expr)?,
                        descending: k.descending,
                    })
                })
                .collect::<Result<_>>()?,
        },
        other => other,
    })
}
