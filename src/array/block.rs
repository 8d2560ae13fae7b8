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

//! The columnar batch unit that flows through the pipeline (C3).
//!
//! A block's schema is immutable once created; rows are appended only
//! through a [`BatchWriter`], and only atomically via [`DataBlock::write_batch`].

use crate::array::column::Column;
use crate::error::{EngineError, Result};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct DataBlock {
    columns: Vec<Column>,
}

impl DataBlock {
    /// A fresh block with the given schema and zero rows.
    pub fn new(columns: Vec<Column>) -> DataBlock {
        DataBlock {
            columns: columns.into_iter().map(|c| c.empty_like()).collect(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, idx: usize) -> Option<&Column> {
        self.columns.get(idx)
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Same schema, zero rows — matches spec's `clone` operation.
    pub fn clone_empty(&self) -> DataBlock {
        DataBlock::new(self.columns.clone())
    }

    /// Append the rows staged in `writer`, atomically: either every row
    /// lands or the block is left unchanged.
    pub fn write_batch(&mut self, writer: BatchWriter) -> Result<()> {
        writer.validate_against(&self.columns)?;
        for (col, staged) in self.columns.iter_mut().zip(writer.rows_by_column.into_iter()) {
            for value in staged {
                col.push(value);
            }
        }
        Ok(())
    }

    /// Partition rows into blocks of up to `n` rows, preserving schema
    /// and row order. Yields zero blocks for an empty block.
    pub fn split(&self, n: usize) -> Vec<DataBlock> {
        assert!(n > 0, "split size must be positive");
        let total = self.num_rows();
        if total == 0 {
            return Vec::new();
        }
        let mut out = Vec::with_capacity((total + n - 1) / n);
        let mut start = 0;
        while start < total {
            let end = (start + n).min(total);
            let rows: Vec<usize> = (start..end).collect();
            let mut cols = Vec::with_capacity(self.columns.len());
            for col in &self.columns {
                let mut new_col = col.empty_like();
                new_col.extend_from(col, &rows);
                cols.push(new_col);
            }
            out.push(DataBlock { columns: cols });
            start = end;
        }
        out
    }
}

/// A staging buffer bound to a block's schema (C3). Rows are validated
/// for arity and per-column type compatibility as they're written.
pub struct BatchWriter {
    schema: Vec<(String, crate::types::DataType)>,
    rows_by_column: Vec<Vec<Value>>,
    arity: Option<usize>,
}

impl BatchWriter {
    pub fn new(columns: &[Column]) -> BatchWriter {
        BatchWriter {
            schema: columns.iter().map(|c| (c.name.clone(), c.data_type)).collect(),
            rows_by_column: vec![Vec::new(); columns.len()],
            arity: None,
        }
    }

    /// Append one row, checking arity and per-column type compatibility.
    pub fn write_row(&mut self, values: impl IntoIterator<Item = Value>) -> Result<()> {
        let values: Vec<Value> = values.into_iter().collect();
        match self.arity {
            Some(n) if n != values.len() => {
                return Err(EngineError::Validation(format!(
                    "row arity mismatch: expected {n}, got {}",
                    values.len()
                )))
            }
            None if values.len() != self.schema.len() => {
                return Err(EngineError::Validation(format!(
                    "row arity mismatch: expected {}, got {}",
                    self.schema.len(),
                    values.len()
                )))
            }
            _ => {}
        }
        self.arity = Some(values.len());

        for ((_, data_type), value) in self.schema.iter().zip(values.iter()) {
            if !data_type.accepts(value) {
                return Err(EngineError::Validation(format!(
                    "value {value} is not compatible with column type {}",
                    data_type.name()
                )));
            }
        }

        for (col_rows, value) in self.rows_by_column.iter_mut().zip(values.into_iter()) {
            col_rows.push(value);
        }
        Ok(())
    }

    fn validate_against(&self, columns: &[Column]) -> Result<()> {
        if columns.len() != self.schema.len() {
            return Err(EngineError::Validation(
                "batch writer schema does not match block schema".to_string(),
            ));
        }
        for (col, (name, data_type)) in columns.iter().zip(self.schema.iter()) {
            if col.name() != name || &col.data_type != data_type {
                return Err(EngineError::Validation(
                    "batch writer schema does not match block schema".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    fn schema() -> Vec<Column> {
        vec![
            Column::new("i", DataType::Int32),
            Column::new("s", DataType::String),
        ]
    }

    #[test]
    fn fresh_block_has_zero_rows() {
        let block = DataBlock::new(schema());
        assert_eq!(block.num_rows(), 0);
        assert_eq!(block.num_columns(), 2);
    }

    #[test]
    fn write_batch_is_atomic_on_arity_mismatch() {
        let mut writer = BatchWriter::new(&schema());
        assert!(writer.write_row([Value::make_int(1), Value::make_string("a")]).is_ok());
        let err = writer.write_row([Value::make_int(2)]);
        assert!(err.is_err());
    }

    #[test]
    fn write_batch_rejects_type_mismatch() {
        let mut writer = BatchWriter::new(&schema());
        let err = writer.write_row([Value::make_string("nope"), Value::make_string("a")]);
        assert!(err.is_err());
    }

    #[test]
    fn write_batch_appends_rows_in_order() {
        let mut block = DataBlock::new(schema());
        let mut writer = BatchWriter::new(block.columns());
        writer.write_row([Value::make_int(1), Value::make_string("a")]).unwrap();
        writer.write_row([Value::make_int(2), Value::make_string("b")]).unwrap();
        block.write_batch(writer).unwrap();
        assert_eq!(block.num_rows(), 2);
        assert_eq!(block.column(0).unwrap().get(1).unwrap(), &Value::make_int(2));
    }

    #[test]
    fn split_preserves_row_count_and_order() {
        let mut block = DataBlock::new(schema());
        let mut writer = BatchWriter::new(block.columns());
        for i in 0..7 {
            writer.write_row([Value::make_int(i), Value::make_string(i.to_string())]).unwrap();
        }
        block.write_batch(writer).unwrap();

        let chunks = block.split(3);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].num_rows(), 3);
        assert_eq!(chunks[1].num_rows(), 3);
        assert_eq!(chunks[2].num_rows(), 1);

        let recombined: Vec<i64> = chunks
            .iter()
            .flat_map(|b| b.column(0).unwrap().values().iter().map(|v| v.as_int().unwrap()))
            .collect();
        assert_eq!(recombined, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn split_of_empty_block_yields_no_chunks() {
        let block = DataBlock::new(schema());
        assert!(block.split(4).is_empty());
    }
}
