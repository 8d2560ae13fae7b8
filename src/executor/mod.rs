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

//! `executor_factory(ctx, plan) -> Executor | error` (C8): lowers a
//! logical plan node to a runnable transform pipeline. DDL executors
//! mutate the catalog/session directly and return no processor; every
//! other variant builds one via `src/processor`.

mod ddl;
mod scan;
mod table_valued_function;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::catalog::{Catalog, Session};
use crate::config::ServerConfig;
use crate::error::{plan_err, Result};
use crate::planner::PlanNode;
use crate::processor::Processor;

/// Everything an executor needs besides the plan node itself: the
/// active session, the catalog it resolves storages through, the
/// effective config, and the cancellation signal every transform built
/// under it shares (spec §5's "Cancellation" rule).
pub struct ExecutorContext {
    pub session: Arc<dyn Session>,
    pub catalog: Arc<Catalog>,
    pub config: ServerConfig,
    pub cancel: CancellationToken,
}

impl ExecutorContext {
    pub fn new(session: Arc<dyn Session>, catalog: Arc<Catalog>, config: ServerConfig) -> ExecutorContext {
        ExecutorContext {
            session,
            catalog,
            config,
            cancel: CancellationToken::new(),
        }
    }
}

/// A lowered plan node. `execute()` builds (and spawns) its transform
/// pipeline; DDL variants return `Ok(None)` — "the TCP layer treats a
/// nil sink as 'no rows to send, send end-of-stream'" (spec §4.7).
pub trait Executor: Send {
    fn string(&self) -> String;

    fn execute(&self) -> Result<Option<Processor>>;
}

pub fn executor_factory(ctx: Arc<ExecutorContext>, plan: PlanNode) -> Result<Box<dyn Executor>> {
    tracing::debug!(plan = plan.name(), "executor_factory dispatching");
    match plan {
        PlanNode::CreateDatabase { name, if_not_exists } => Ok(Box::new(ddl::CreateDatabaseExecutor::new(ctx, name, if_not_exists))),
        PlanNode::DropDatabase { name, if_exists } => Ok(Box::new(ddl::DropDatabaseExecutor::new(ctx, name, if_exists))),
        PlanNode::Use { database } => Ok(Box::new(ddl::UseExecutor::new(ctx, database))),
        PlanNode::Scan { database, table, row_limit } => Ok(Box::new(scan::ScanExecutor::new(ctx, database, table, row_limit))),
        PlanNode::TableValuedFunction { name, args } => Ok(Box::new(table_valued_function::TableValuedFunctionExecutor::new(
            ctx,
            PlanNode::TableValuedFunction { name, args },
        ))),
        PlanNode::Filter { input, predicate } => Ok(Box::new(FilterExecutor {
            ctx: ctx.clone(),
            input: executor_factory(ctx, *input)?,
            predicate: *predicate,
        })),
        PlanNode::GroupBy { input, keys, aggs } => Ok(Box::new(GroupByExecutor {
            ctx: ctx.clone(),
            input: executor_factory(ctx, *input)?,
            keys,
            aggs,
        })),
        PlanNode::OrderBy { input, keys } => Ok(Box::new(OrderByExecutor {
            ctx: ctx.clone(),
            input: executor_factory(ctx, *input)?,
            keys,
        })),
        other => Err(plan_err(format!("{} cannot be the root of a pipeline", other.name()))),
    }
}

struct FilterExecutor {
    ctx: Arc<ExecutorContext>,
    input: Box<dyn Executor>,
    predicate: PlanNode,
}

impl Executor for FilterExecutor {
    fn string(&self) -> String {
        "FilterExecutor".to_string()
    }

    fn execute(&self) -> Result<Option<Processor>> {
        let upstream = self
            .input
            .execute()?
            .ok_or_else(|| plan_err("FilterExecutor requires an upstream processor"))?;
        Ok(Some(crate::processor::spawn_filter(
            "FilterTransform",
            upstream.output,
            self.predicate.clone(),
            self.ctx.cancel.clone(),
        )))
    }
}

struct GroupByExecutor {
    ctx: Arc<ExecutorContext>,
    input: Box<dyn Executor>,
    keys: Vec<PlanNode>,
    aggs: Vec<(String, PlanNode)>,
}

impl Executor for GroupByExecutor {
    fn string(&self) -> String {
        "GroupByExecutor".to_string()
    }

    fn execute(&self) -> Result<Option<Processor>> {
        let upstream = self
            .input
            .execute()?
            .ok_or_else(|| plan_err("GroupByExecutor requires an upstream processor"))?;
        Ok(Some(crate::processor::spawn_group_by(
            "GroupByTransform",
            upstream.output,
            self.keys.clone(),
            self.aggs.clone(),
            self.ctx.cancel.clone(),
        )))
    }
}

struct OrderByExecutor {
    ctx: Arc<ExecutorContext>,
    input: Box<dyn Executor>,
    keys: Vec<crate::planner::OrderKey>,
}

impl Executor for OrderByExecutor {
    fn string(&self) -> String {
        "OrderByExecutor".to_string()
    }

    fn execute(&self) -> Result<Option<Processor>> {
        let upstream = self
            .input
            .execute()?
            .ok_or_else(|| plan_err("OrderByExecutor requires an upstream processor"))?;
        Ok(Some(crate::processor::spawn_order_by(
            "OrderByTransform",
            upstream.output,
            self.keys.clone(),
            self.ctx.config.default_block_size,
            self.ctx.cancel.clone(),
        )))
    }
}
