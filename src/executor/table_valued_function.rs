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

//! `TableValuedFunctionExecutor`: walks the plan to collect positional
//! `constants` and named `variables`, resolves and invokes the function,
//! builds the output schema, and chunks the resulting value slice into
//! blocks (spec §4.7).
//!
//! Column naming for `RANGETABLE`/`RANDTABLE` follows the original's own
//! loop literally: for `i` in `1..constants.len()`, column `i - 1` is
//! named `variables[i]` and typed `constants[i]` (`constants[0]` is the
//! row count, `variables[0]` an unused leading placeholder) — see
//! DESIGN.md.

use std::sync::Arc;

use crate::array::{BatchWriter, Column, DataBlock};
use crate::error::{plan_err, Result};
use crate::expr::function_factory;
use crate::planner::PlanNode;
use crate::processor::{spawn_source, Processor};
use crate::types::data_type_factory;
use crate::value::Value;

use super::{Executor, ExecutorContext};

pub struct TableValuedFunctionExecutor {
    ctx: Arc<ExecutorContext>,
    plan: PlanNode,
}

impl TableValuedFunctionExecutor {
    pub fn new(ctx: Arc<ExecutorContext>, plan: PlanNode) -> TableValuedFunctionExecutor {
        TableValuedFunctionExecutor { ctx, plan }
    }
}

impl Executor for TableValuedFunctionExecutor {
    fn string(&self) -> String {
        "TableValuedFunctionExecutor".to_string()
    }

    fn execute(&self) -> Result<Option<Processor>> {
        let (name, _args) = match &self.plan {
            PlanNode::TableValuedFunction { name, args } => (name.clone(), args),
            other => return Err(plan_err(format!("not a table-valued function plan: {}", other.name()))),
        };

        let mut constants = Vec::new();
        let mut variables = Vec::new();
        self.plan.walk(&mut |node| {
            match node {
                PlanNode::Constant(v) => constants.push(v.clone()),
                PlanNode::Variable(v) => variables.push(Value::make_string(v.clone())),
                _ => {}
            }
            Ok(true)
        })?;

        let function = function_factory(&name)?;
        let result = function.validate_and_call(&constants)?;

        let columns = output_columns(&name, &constants, &variables)?;

        let rows = result.as_slice()?;
        let mut block = DataBlock::new(columns);
        let mut writer = BatchWriter::new(block.columns());
        for row in rows {
            writer.write_row(row.as_slice()?.iter().cloned())?;
        }
        block.write_batch(writer)?;

        let chunks = block.split(self.ctx.config.default_block_size.max(1));
        let stream = Box::new(crate::array::OneBlockInputStream::new(chunks));
        Ok(Some(spawn_source("DataSourceTransform", stream, self.ctx.cancel.clone())))
    }
}

fn output_columns(name: &str, constants: &[Value], variables: &[Value]) -> Result<Vec<Column>> {
    match name.to_uppercase().as_str() {
        "RANGE" => Ok(vec![Column::new("i", crate::types::DataType::Int32)]),
        "RANGETABLE" | "RANDTABLE" => {
            let mut columns = Vec::with_capacity(constants.len().saturating_sub(1));
            for i in 1..constants.len() {
                let variable = variables.get(i).ok_or_else(|| {
                    plan_err(format!("{name} requires a column name for each type argument"))
                })?;
                let column_name = variable.as_string()?.to_string();
                let data_type = data_type_factory(constants[i].as_string()?)?;
                columns.push(Column::new(column_name, data_type));
            }
            Ok(columns)
        }
        other => Err(plan_err(format!("unknown table-valued function: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DefaultSession;
    use crate::config::ServerConfig;
    use crate::processor::collect_blocks;

    fn context(block_size: usize) -> Arc<ExecutorContext> {
        let session = Arc::new(DefaultSession::new(ServerConfig::default()));
        let catalog = session.catalog().clone();
        Arc::new(ExecutorContext::new(
            session,
            catalog,
            ServerConfig {
                default_block_size: block_size,
                ..ServerConfig::default()
            },
        ))
    }

    #[tokio::test]
    async fn range_yields_a_single_int32_column() {
        let ctx = context(65536);
        let plan = PlanNode::TableValuedFunction {
            name: "RANGE".to_string(),
            args: vec![PlanNode::Constant(Value::make_int(5))],
        };
        let executor = TableValuedFunctionExecutor::new(ctx, plan);
        let processor = executor.execute().unwrap().unwrap();
        let blocks = collect_blocks(processor).await.unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].column_by_name("i").unwrap().len(), 5);
    }

    #[tokio::test]
    async fn range_is_chunked_to_the_configured_block_size() {
        let ctx = context(2);
        let plan = PlanNode::TableValuedFunction {
            name: "RANGE".to_string(),
            args: vec![PlanNode::Constant(Value::make_int(5))],
        };
        let executor = TableValuedFunctionExecutor::new(ctx, plan);
        let processor = executor.execute().unwrap().unwrap();
        let blocks = collect_blocks(processor).await.unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[2].num_rows(), 1);
    }

    #[tokio::test]
    async fn rangetable_names_columns_from_the_variable_list() {
        let ctx = context(65536);
        let plan = PlanNode::TableValuedFunction {
            name: "RANGETABLE".to_string(),
            args: vec![
                PlanNode::Constant(Value::make_int(3)),
                PlanNode::Variable("unused".to_string()),
                PlanNode::Variable("n".to_string()),
                PlanNode::Constant(Value::make_string("Int32")),
            ],
        };
        let executor = TableValuedFunctionExecutor::new(ctx, plan);
        let processor = executor.execute().unwrap().unwrap();
        let blocks = collect_blocks(processor).await.unwrap();
        let total_rows: usize = blocks.iter().map(|b| b.num_rows()).sum();
        assert_eq!(total_rows, 3);
        assert!(blocks[0].column_by_name("n").is_some());
        assert!(blocks[0].column_by_name("unused").is_none());
    }

    #[tokio::test]
    async fn rangetable_rejects_a_type_argument_with_no_matching_column_name() {
        let ctx = context(65536);
        let plan = PlanNode::TableValuedFunction {
            name: "RANGETABLE".to_string(),
            args: vec![
                PlanNode::Constant(Value::make_int(3)),
                PlanNode::Variable("n".to_string()),
                PlanNode::Constant(Value::make_string("Int32")),
                PlanNode::Constant(Value::make_string("UInt64")),
            ],
        };
        let executor = TableValuedFunctionExecutor::new(ctx, plan);
        let err = executor.execute().unwrap_err();
        assert!(err.to_string().contains("requires a column name"));
    }
}
