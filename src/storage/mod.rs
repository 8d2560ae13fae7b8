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

//! The storage collaborator interface (spec §6) plus the two built-in
//! read-only system tables (spec §4.9).

mod system_numbers;
mod system_tables;

pub use system_numbers::SystemNumbersStorage;
pub use system_tables::{SystemTablesStorage, TableInfo};

use crate::array::{BlockInputStream, BlockOutputStream, Column};
use crate::catalog::Session;
use crate::error::Result;
use crate::planner::PlanNode;

/// A table the catalog can hand the executor factory a stream for.
/// Read-only storages reject `get_output_stream` with "Couldn't find
/// outputstream" (spec §4.9).
pub trait Storage: Send + Sync {
    fn name(&self) -> &str;

    /// Short engine tag shown in `system.tables`, e.g. `"SystemNumbers"`.
    fn engine(&self) -> &'static str {
        "Unknown"
    }

    fn columns(&self) -> Vec<Column>;

    fn get_input_stream(&self, session: &dyn Session, scan: &PlanNode) -> Result<Box<dyn BlockInputStream>>;

    fn get_output_stream(&self, session: &dyn Session, scan: &PlanNode) -> Result<Box<dyn BlockOutputStream>>;
}
