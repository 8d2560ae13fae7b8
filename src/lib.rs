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

//! A column-oriented SQL query execution core: `sql text -> plan tree ->
//! optimized plan -> executor pipeline -> data blocks`. The wire
//! protocol that drives it is an external collaborator (spec §1); this
//! crate owns everything from `plan_factory` down to
//! [`processor::collect_blocks`].

pub mod array;
pub mod catalog;
pub mod config;
pub mod error;
pub mod executor;
pub mod expr;
pub mod optimizer;
pub mod planner;
pub mod processor;
pub mod storage;
pub mod types;
pub mod value;

use std::sync::Arc;

use catalog::Session;
use error::Result;

/// Runs one statement end to end: parse, optimize, lower to a pipeline,
/// drain it. This is the same sequence `src/bin/server.rs`'s REPL
/// driver and the integration tests under `tests/` both call through.
pub async fn run_query(session: Arc<dyn Session>, catalog: Arc<catalog::Catalog>, sql: &str) -> Result<Vec<array::DataBlock>> {
    let plan = planner::plan_factory(sql)?;
    let plan = optimizer::optimize(plan, &optimizer::default_optimizers())?;
    let config = session.config();
    let ctx = Arc::new(executor::ExecutorContext::new(session, catalog, config));
    let executor = executor::executor_factory(ctx, plan)?;
    match executor.execute()? {
        Some(processor) => processor::collect_blocks(processor).await,
        None => Ok(Vec::new()),
    }
}
