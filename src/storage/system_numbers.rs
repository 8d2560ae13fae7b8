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

//! `system.numbers`: an infinite counter table, schema `{number:
//! UInt64}`. Row `k` of block `b` equals `b * block_size + k`, wrapping
//! on overflow (spec §4.9). Genuinely unbounded unless the scan plan
//! carries a `row_limit` — see spec §9 Open Question (a).

use crate::array::{BatchWriter, BlockInputStream, Column, DataBlock};
use crate::catalog::Session;
use crate::error::{EngineError, Result};
use crate::planner::PlanNode;
use crate::storage::Storage;
use crate::types::DataType;
use crate::value::Value;

pub struct SystemNumbersStorage {
    block_size: usize,
}

impl SystemNumbersStorage {
    pub fn new(block_size: usize) -> SystemNumbersStorage {
        SystemNumbersStorage { block_size }
    }
}

impl Storage for SystemNumbersStorage {
    fn name(&self) -> &str {
        "numbers"
    }

    fn engine(&self) -> &'static str {
        "SystemNumbers"
    }

    fn columns(&self) -> Vec<Column> {
        vec![Column::new("number", DataType::UInt64)]
    }

    fn get_input_stream(&self, _session: &dyn Session, scan: &PlanNode) -> Result<Box<dyn BlockInputStream>> {
        let row_limit = match scan {
            PlanNode::Scan { row_limit, .. } => *row_limit,
            _ => None,
        };
        Ok(Box::new(SystemNumbersInputStream {
            columns: self.columns(),
            block_size: self.block_size,
            current: 0,
            emitted: 0,
            limit: row_limit.map(|l| l as u64),
        }))
    }

    fn get_output_stream(
        &self,
        _session: &dyn Session,
        _scan: &PlanNode,
    ) -> Result<Box<dyn crate::array::BlockOutputStream>> {
        Err(EngineError::no_output_stream())
    }
}

struct SystemNumbersInputStream {
    columns: Vec<Column>,
    block_size: usize,
    current: u64,
    emitted: u64,
    limit: Option<u64>,
}

impl BlockInputStream for SystemNumbersInputStream {
    fn name(&self) -> &'static str {
        "SystemNumbersBlockInputStream"
    }

    fn read(&mut self) -> Result<Option<DataBlock>> {
        let mut block = DataBlock::new(self.columns.clone());
        let mut writer = BatchWriter::new(block.columns());

        let mut rows = 0;
        while rows < self.block_size {
            if let Some(limit) = self.limit {
                if self.emitted >= limit {
                    break;
                }
            }
            writer.write_row([Value::make_int(self.current as i64)])?;
            self.current = self.current.wrapping_add(1);
            self.emitted += 1;
            rows += 1;
        }

        if rows == 0 {
            return Ok(None);
        }
        block.write_batch(writer)?;
        Ok(Some(block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DefaultSession;

    #[test]
    fn two_blocks_at_block_size_four() {
        let storage = SystemNumbersStorage::new(4);
        let session = DefaultSession::new(Default::default());
        let scan = PlanNode::Scan {
            database: "system".to_string(),
            table: "numbers".to_string(),
            row_limit: None,
        };
        let mut stream = storage.get_input_stream(&session, &scan).unwrap();

        let first = stream.read().unwrap().unwrap();
        let firsts: Vec<i64> = first.column(0).unwrap().values().iter().map(|v| v.as_int().unwrap()).collect();
        assert_eq!(firsts, vec![0, 1, 2, 3]);

        let second = stream.read().unwrap().unwrap();
        let seconds: Vec<i64> = second.column(0).unwrap().values().iter().map(|v| v.as_int().unwrap()).collect();
        assert_eq!(seconds, vec![4, 5, 6, 7]);
    }

    #[test]
    fn row_limit_terminates_the_stream() {
        let storage = SystemNumbersStorage::new(4);
        let session = DefaultSession::new(Default::default());
        let scan = PlanNode::Scan {
            database: "system".to_string(),
            table: "numbers".to_string(),
            row_limit: Some(5),
        };
        let mut stream = storage.get_input_stream(&session, &scan).unwrap();
        let mut total = 0;
        while let Some(block) = stream.read().unwrap() {
            total += block.num_rows();
        }
        assert_eq!(total, 5);
    }

    #[test]
    fn read_only_storage_has_no_output_stream() {
        let storage = SystemNumbersStorage::new(4);
        let session = DefaultSession::new(Default::default());
        let scan = PlanNode::Scan {
            database: "system".to_string(),
            table: "numbers".to_string(),
            row_limit: None,
        };
        let err = storage.get_output_stream(&session, &scan).unwrap_err();
        assert_eq!(err.to_string(), "Couldn't find outputstream");
    }
}
