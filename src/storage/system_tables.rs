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

//! `system.tables`: a read-only listing of every known table, schema
//! `{name: String, database: String, engine: String}` (spec §4.9). The
//! catalog supplies the listing through a fill callback at construction
//! time, mirroring the original `tablesFillFunc` hook.

use crate::array::{BatchWriter, BlockInputStream, BlockOutputStream, Column, DataBlock, NativeBlockInputStream};
use crate::catalog::Session;
use crate::error::{EngineError, Result};
use crate::planner::PlanNode;
use crate::storage::Storage;
use crate::types::DataType;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct TableInfo {
    pub name: String,
    pub database: String,
    pub engine: String,
}

pub struct SystemTablesStorage {
    fill: Box<dyn Fn() -> Vec<TableInfo> + Send + Sync>,
}

impl SystemTablesStorage {
    pub fn new(fill: impl Fn() -> Vec<TableInfo> + Send + Sync + 'static) -> SystemTablesStorage {
        SystemTablesStorage { fill: Box::new(fill) }
    }
}

impl Storage for SystemTablesStorage {
    fn name(&self) -> &str {
        "tables"
    }

    fn engine(&self) -> &'static str {
        "SystemTables"
    }

    fn columns(&self) -> Vec<Column> {
        vec![
            Column::new("name", DataType::String),
            Column::new("database", DataType::String),
            Column::new("engine", DataType::String),
        ]
    }

    fn get_input_stream(&self, _session: &dyn Session, _scan: &PlanNode) -> Result<Box<dyn BlockInputStream>> {
        let mut block = DataBlock::new(self.columns());
        let mut writer = BatchWriter::new(block.columns());
        for info in (self.fill)() {
            writer.write_row([
                Value::make_string(info.name),
                Value::make_string(info.database),
                Value::make_string(info.engine),
            ])?;
        }
        block.write_batch(writer)?;

        let mut stream = NativeBlockInputStream::new();
        stream.insert(block)?;
        Ok(Box::new(stream))
    }

    fn get_output_stream(&self, _session: &dyn Session, _scan: &PlanNode) -> Result<Box<dyn BlockOutputStream>> {
        Err(EngineError::no_output_stream())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DefaultSession;

    fn scan() -> PlanNode {
        PlanNode::Scan {
            database: "system".to_string(),
            table: "tables".to_string(),
            row_limit: None,
        }
    }

    #[test]
    fn materializes_one_block_from_the_fill_callback() {
        let storage = SystemTablesStorage::new(|| {
            vec![
                TableInfo {
                    name: "numbers".to_string(),
                    database: "system".to_string(),
                    engine: "SystemNumbers".to_string(),
                },
                TableInfo {
                    name: "tables".to_string(),
                    database: "system".to_string(),
                    engine: "SystemTables".to_string(),
                },
            ]
        });
        let session = DefaultSession::new(Default::default());
        let mut stream = storage.get_input_stream(&session, &scan()).unwrap();

        let block = stream.read().unwrap().unwrap();
        assert_eq!(block.num_rows(), 2);
        assert_eq!(block.column_by_name("name").unwrap().get(0).unwrap(), &Value::make_string("numbers"));
        assert!(stream.read().unwrap().is_none());
    }

    #[test]
    fn empty_catalog_yields_a_zero_row_block() {
        let storage = SystemTablesStorage::new(Vec::new);
        let session = DefaultSession::new(Default::default());
        let mut stream = storage.get_input_stream(&session, &scan()).unwrap();
        let block = stream.read().unwrap().unwrap();
        assert_eq!(block.num_rows(), 0);
    }

    #[test]
    fn is_read_only() {
        let storage = SystemTablesStorage::new(Vec::new);
        let session = DefaultSession::new(Default::default());
        let err = storage.get_output_stream(&session, &scan()).unwrap_err();
        assert_eq!(err.to_string(), "Couldn't find outputstream");
    }
}
