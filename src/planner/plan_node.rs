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

//! The logical plan tree (C6): a tagged, immutable-after-`build` tree.
//! Every node can be walked, pretty-printed and rebuilt by the
//! optimizer passes, which return new trees rather than mutating in
//! place.

use itertools::Itertools;

use crate::error::{plan_err, Result};
use crate::expr::function_factory;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct OrderKey {
    pub expr: PlanNode,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanNode {
    Constant(Value),
    Variable(String),
    FunctionExpression {
        name: String,
        args: Vec<PlanNode>,
    },
    Scan {
        database: String,
        table: String,
        /// Caps the rows a storage's input stream yields; resolves the
        /// unbounded-`system.numbers` open question (spec §9a).
        row_limit: Option<usize>,
    },
    Filter {
        input: Box<PlanNode>,
        predicate: Box<PlanNode>,
    },
    GroupBy {
        input: Box<PlanNode>,
        keys: Vec<PlanNode>,
        aggs: Vec<(String, PlanNode)>,
    },
    OrderBy {
        input: Box<PlanNode>,
        keys: Vec<OrderKey>,
    },
    TableValuedFunction {
        name: String,
        args: Vec<PlanNode>,
    },
    Use {
        database: String,
    },
    CreateDatabase {
        name: String,
        if_not_exists: bool,
    },
    DropDatabase {
        name: String,
        if_exists: bool,
    },
}

impl PlanNode {
    /// Short kind tag, e.g. `"FunctionExpressionPlan"`.
    pub fn name(&self) -> &'static str {
        match self {
            PlanNode::Constant(_) => "ConstantPlan",
            PlanNode::Variable(_) => "VariablePlan",
            PlanNode::FunctionExpression { .. } => "FunctionExpressionPlan",
            PlanNode::Scan { .. } => "ScanPlan",
            PlanNode::Filter { .. } => "FilterPlan",
            PlanNode::GroupBy { .. } => "GroupByPlan",
            PlanNode::OrderBy { .. } => "OrderByPlan",
            PlanNode::TableValuedFunction { .. } => "TableValuedFunctionPlan",
            PlanNode::Use { .. } => "UsePlan",
            PlanNode::CreateDatabase { .. } => "CreateDatabasePlan",
            PlanNode::DropDatabase { .. } => "DropDatabasePlan",
        }
    }

    /// Direct children, in evaluation order.
    pub fn children(&self) -> Vec<&PlanNode> {
        match self {
            PlanNode::Constant(_) | PlanNode::Variable(_) | PlanNode::Scan { .. } | PlanNode::Use { .. } | PlanNode::CreateDatabase { .. } | PlanNode::DropDatabase { .. } => vec![],
            PlanNode::FunctionExpression { args, .. } => args.iter().collect(),
            PlanNode::TableValuedFunction { args, .. } => args.iter().collect(),
            PlanNode::Filter { input, predicate } => vec![input, predicate],
            PlanNode::GroupBy { input, keys, aggs } => {
                let mut c = vec![input.as_ref()];
                c.extend(keys.iter());
                c.extend(aggs.iter().map(|(_, e)| e));
                c
            }
            PlanNode::OrderBy { input, keys } => {
                let mut c = vec![input.as_ref()];
                c.extend(keys.iter().map(|k| &k.expr));
                c
            }
        }
    }

    /// Pre-order traversal. The visitor returns whether to recurse into
    /// this node's children; an `Err` aborts the whole walk.
    pub fn walk(&self, visitor: &mut impl FnMut(&PlanNode) -> Result<bool>) -> Result<()> {
        let recurse = visitor(self)?;
        if recurse {
            for child in self.children() {
                child.walk(visitor)?;
            }
        }
        Ok(())
    }

    /// Validate this node's shape — e.g. that a function expression
    /// names a registered function with an arity its validator accepts.
    /// Children are validated first (post-order), matching the "finalize
    /// after construction" contract in spec §3.
    pub fn build(self) -> Result<PlanNode> {
        match self {
            PlanNode::FunctionExpression { name, args } => {
                let args = args.into_iter().map(PlanNode::build).collect::<Result<Vec<_>>>()?;
                // Registration-only check: the function must exist.
                // Argument values aren't known until evaluation, so we
                // only confirm the name resolves here.
                function_factory(&name).map_err(|_| plan_err(format!("unknown function in plan: {name}")))?;
                Ok(PlanNode::FunctionExpression { name, args })
            }
            PlanNode::TableValuedFunction { name, args } => {
                let args = args.into_iter().map(PlanNode::build).collect::<Result<Vec<_>>>()?;
                function_factory(&name).map_err(|_| plan_err(format!("unknown function in plan: {name}")))?;
                Ok(PlanNode::TableValuedFunction { name, args })
            }
            PlanNode::Filter { input, predicate } => Ok(PlanNode::Filter {
                input: Box::new(input.build()?),
                predicate: Box::new(predicate.build()?),
            }),
            PlanNode::GroupBy { input, keys, aggs } => Ok(PlanNode::GroupBy {
                input: Box::new(input.build()?),
                keys: keys.into_iter().map(PlanNode::build).collect::<Result<_>>()?,
                aggs: aggs
                    .into_iter()
                    .map(|(f, e)| Ok((f, e.build()?)))
                    .collect::<Result<_>>()?,
            }),
            PlanNode::OrderBy { input, keys } => Ok(PlanNode::OrderBy {
                input: Box::new(input.build()?),
                keys: keys
                    .into_iter()
                    .map(|k| {
                        Ok(OrderKey {
                            expr: k.expr.build()?,
                            descending: k.descending,
                        })
                    })
                    .collect::<Result<_>>()?,
            }),
            other => Ok(other),
        }
    }

    /// Deterministic canonical form, used by tests.
    pub fn string(&self) -> String {
        match self {
            PlanNode::Constant(v) => format!("ConstantNode=<{v}>"),
            PlanNode::Variable(name) => format!("VariableNode=<{name}>"),
            PlanNode::FunctionExpression { name, args } => {
                let args_str = args.iter().map(PlanNode::string).join(" ");
                format!("FuncExpressionNode=(Func=[{name}], Args=[[{args_str}]])")
            }
            PlanNode::Scan { database, table, .. } => format!("ScanNode=(DB=[{database}], Table=[{table}])"),
            PlanNode::Filter { input, predicate } => {
                format!("FilterNode=(Input=[{}], Predicate=[{}])", input.string(), predicate.string())
            }
            PlanNode::GroupBy { input, keys, aggs } => format!(
                "GroupByNode=(Input=[{}], Keys=[{}], Aggs=[{}])",
                input.string(),
                keys.iter().map(PlanNode::string).join(" "),
                aggs.iter().map(|(f, e)| format!("{f}({})", e.string())).join(" ")
            ),
            PlanNode::OrderBy { input, keys } => format!(
                "OrderByNode=(Input=[{}], Keys=[{}])",
                input.string(),
                keys.iter()
                    .map(|k| format!("{}{}", k.expr.string(), if k.descending { " DESC" } else { "" }))
                    .join(" ")
            ),
            PlanNode::TableValuedFunction { name, args } => {
                let args_str = args.iter().map(PlanNode::string).join(" ");
                format!("TableValuedFunctionNode=(Func=[{name}], Args=[[{args_str}]])")
            }
            PlanNode::Use { database } => format!("UseNode=(DB=[{database}])"),
            PlanNode::CreateDatabase { name, if_not_exists } => {
                format!("CreateDatabaseNode(name={name}, if_not_exists={if_not_exists})")
            }
            PlanNode::DropDatabase { name, if_exists } => {
                format!("DropDatabaseNode(name={name}, if_exists={if_exists})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function_expression_plan() -> PlanNode {
        PlanNode::FunctionExpression {
            name: "+".to_string(),
            args: vec![PlanNode::Constant(Value::make_int(1)), PlanNode::Constant(Value::make_int(2))],
        }
    }

    #[test]
    fn function_expression_pretty_print_matches_spec_example() {
        let plan = function_expression_plan().build().unwrap();
        assert_eq!(
            plan.string(),
            "FuncExpressionNode=(Func=[+], Args=[[ConstantNode=<1> ConstantNode=<2>]])"
        );
    }

    #[test]
    fn build_rejects_unknown_function() {
        let plan = PlanNode::FunctionExpression {
            name: "nope".to_string(),
            args: vec![],
        };
        assert!(plan.build().is_err());
    }

    #[test]
    fn walk_visits_every_reachable_node_once_when_always_recursing() {
        let plan = function_expression_plan();
        let mut visited = Vec::new();
        plan.walk(&mut |n| {
            visited.push(n.name());
            Ok(true)
        })
        .unwrap();
        assert_eq!(visited, vec!["FunctionExpressionPlan", "ConstantPlan", "ConstantPlan"]);
    }

    #[test]
    fn walk_skips_subtree_when_visitor_declines_to_recurse() {
        let plan = function_expression_plan();
        let mut visited = Vec::new();
        plan.walk(&mut |n| {
            visited.push(n.name());
            Ok(false)
        })
        .unwrap();
        assert_eq!(visited, vec!["FunctionExpressionPlan"]);
    }
}
