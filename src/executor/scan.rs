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

//! `ScanExecutor`: resolves `(database, table)` through the catalog and
//! wraps the storage's input stream in a `DataSourceTransform`.

use std::sync::Arc;

use crate::error::Result;
use crate::planner::PlanNode;
use crate::processor::{spawn_source, Processor};

use super::{Executor, ExecutorContext};

pub struct ScanExecutor {
    ctx: Arc<ExecutorContext>,
    database: String,
    table: String,
    row_limit: Option<usize>,
}

impl ScanExecutor {
    pub fn new(ctx: Arc<ExecutorContext>, database: String, table: String, row_limit: Option<usize>) -> ScanExecutor {
        ScanExecutor { ctx, database, table, row_limit }
    }
}

impl Executor for ScanExecutor {
    fn string(&self) -> String {
        "ScanExecutor".to_string()
    }

    fn execute(&self) -> Result<Option<Processor>> {
        let storage = self.ctx.catalog.lookup_storage(&self.database, &self.table)?;
        let scan = PlanNode::Scan {
            database: self.database.clone(),
            table: self.table.clone(),
            row_limit: self.row_limit,
        };
        let stream = storage.get_input_stream(self.ctx.session.as_ref(), &scan)?;
        Ok(Some(spawn_source("DataSourceTransform", stream, self.ctx.cancel.clone())))
    }
}
