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

//! `CreateDatabaseExecutor`, `DropDatabaseExecutor`, `UseExecutor`: each
//! mutates the catalog/session synchronously and returns no processor
//! (spec §4.7, spec §8 scenario 3).

use std::sync::Arc;

use crate::error::Result;
use crate::processor::Processor;

use super::{Executor, ExecutorContext};

pub struct CreateDatabaseExecutor {
    ctx: Arc<ExecutorContext>,
    name: String,
    if_not_exists: bool,
}

impl CreateDatabaseExecutor {
    pub fn new(ctx: Arc<ExecutorContext>, name: String, if_not_exists: bool) -> CreateDatabaseExecutor {
        CreateDatabaseExecutor { ctx, name, if_not_exists }
    }
}

impl Executor for CreateDatabaseExecutor {
    fn string(&self) -> String {
        "CreateDatabaseExecutor".to_string()
    }

    fn execute(&self) -> Result<Option<Processor>> {
        self.ctx.catalog.create_database(&self.name, self.if_not_exists)?;
        Ok(None)
    }
}

pub struct DropDatabaseExecutor {
    ctx: Arc<ExecutorContext>,
    name: String,
    if_exists: bool,
}

impl DropDatabaseExecutor {
    pub fn new(ctx: Arc<ExecutorContext>, name: String, if_exists: bool) -> DropDatabaseExecutor {
        DropDatabaseExecutor { ctx, name, if_exists }
    }
}

impl Executor for DropDatabaseExecutor {
    fn string(&self) -> String {
        format!(
            "DropDatabaseExecutor({}\n)\n",
            crate::planner::PlanNode::DropDatabase {
                name: self.name.clone(),
                if_exists: self.if_exists,
            }
            .string()
        )
    }

    fn execute(&self) -> Result<Option<Processor>> {
        self.ctx.catalog.drop_database(&self.name, self.if_exists)?;
        Ok(None)
    }
}

pub struct UseExecutor {
    ctx: Arc<ExecutorContext>,
    database: String,
}

impl UseExecutor {
    pub fn new(ctx: Arc<ExecutorContext>, database: String) -> UseExecutor {
        UseExecutor { ctx, database }
    }
}

impl Executor for UseExecutor {
    fn string(&self) -> String {
        "UseExecutor".to_string()
    }

    fn execute(&self) -> Result<Option<Processor>> {
        self.ctx.session.use_database(&self.database)?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DefaultSession;
    use crate::config::ServerConfig;

    fn context() -> Arc<ExecutorContext> {
        let session = Arc::new(DefaultSession::new(ServerConfig::default()));
        let catalog = session.catalog().clone();
        Arc::new(ExecutorContext::new(session, catalog, ServerConfig::default()))
    }

    #[test]
    fn create_database_executor_creates_and_describes_itself() {
        let ctx = context();
        let executor = CreateDatabaseExecutor::new(ctx.clone(), "db1".to_string(), false);
        assert_eq!(executor.string(), "CreateDatabaseExecutor");
        assert!(executor.execute().unwrap().is_none());
        assert!(ctx.catalog.database_exists("db1"));
    }

    #[test]
    fn use_executor_switches_the_session_database() {
        let ctx = context();
        ctx.catalog.create_database("db1", false).unwrap();
        let executor = UseExecutor::new(ctx.clone(), "db1".to_string());
        assert_eq!(executor.string(), "UseExecutor");
        assert!(executor.execute().unwrap().is_none());
        assert_eq!(ctx.session.current_database(), "db1");
    }

    #[test]
    fn use_executor_rejects_missing_database() {
        let ctx = context();
        let executor = UseExecutor::new(ctx, "ghost".to_string());
        let err = executor.execute().unwrap_err();
        assert_eq!(err.to_string(), "database:ghost doesn't exists");
    }

    #[test]
    fn drop_database_executor_drops_and_describes_itself() {
        let ctx = context();
        ctx.catalog.create_database("db1", false).unwrap();
        let executor = DropDatabaseExecutor::new(ctx.clone(), "db1".to_string(), false);
        assert_eq!(executor.string(), "DropDatabaseExecutor(DropDatabaseNode(name=db1, if_exists=false)\n)\n");
        assert!(executor.execute().unwrap().is_none());
        assert!(!ctx.catalog.database_exists("db1"));
    }
}
