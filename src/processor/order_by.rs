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

//! `OrderByTransform`: buffers every upstream block, sorts the
//! concatenation by the key list (direction per key), and re-splits the
//! result to `DefaultBlockSize` (spec §4.7).

use std::cmp::Ordering;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::array::{BatchWriter, DataBlock};
use crate::error::{plan_err, Result};
use crate::expr::eval::eval_on_row;
use crate::planner::OrderKey;
use crate::value::Value;

use super::{Message, Processor, Receiver, CHANNEL_CAPACITY};

pub fn spawn_order_by(
    name: &'static str,
    mut upstream: Receiver,
    keys: Vec<OrderKey>,
    block_size: usize,
    cancel: CancellationToken,
) -> Processor {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    let handle = tokio::spawn(async move {
        let mut blocks = Vec::new();
        let mut cancelled = false;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => { cancelled = true; break; }
                message = upstream.recv() => {
                    match message {
                        Some(Message::Block(block)) => blocks.push(block),
                        Some(Message::Error(e)) => {
                            let _ = tx.send(Message::Error(e)).await;
                            return;
                        }
                        Some(Message::EndOfStream) | None => break,
                    }
                }
            }
        }

        if !cancelled {
            match sort_all(&blocks, &keys, block_size) {
                Ok(chunks) => {
                    for chunk in chunks {
                        if tx.send(Message::Block(chunk)).await.is_err() {
                            return;
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(Message::Error(e)).await;
                    return;
                }
            }
        }
        let _ = tx.send(Message::EndOfStream).await;
    });

    Processor { name, output: rx, handle }
}

fn sort_all(blocks: &[DataBlock], keys: &[OrderKey], block_size: usize) -> Result<Vec<DataBlock>> {
    let Some(schema) = blocks.first().map(DataBlock::clone_empty) else {
        return Ok(Vec::new());
    };

    let mut rows: Vec<(Vec<Value>, Vec<Value>)> = Vec::new();
    for block in blocks {
        for row in 0..block.num_rows() {
            let values: Vec<Value> = block.columns().iter().map(|c| c.get(row).cloned().unwrap()).collect();
            let sort_keys = keys.iter().map(|k| eval_on_row(&k.expr, block, row)).collect::<Result<Vec<_>>>()?;
            rows.push((values, sort_keys));
        }
    }

    let mut err = None;
    rows.sort_by(|a, b| match compare_keys(&a.1, &b.1, keys) {
        Ok(ordering) => ordering,
        Err(e) => {
            err.get_or_insert(e);
            Ordering::Equal
        }
    });
    if let Some(e) = err {
        return Err(e);
    }

    let mut sorted = schema;
    let mut writer = BatchWriter::new(sorted.columns());
    for (values, _) in rows {
        writer.write_row(values)?;
    }
    sorted.write_batch(writer)?;

    Ok(sorted.split(block_size.max(1)))
}

fn compare_keys(a: &[Value], b: &[Value], keys: &[OrderKey]) -> Result<Ordering> {
    for (idx, key) in keys.iter().enumerate() {
        let ordering = compare_value(&a[idx], &b[idx])?;
        let ordering = if key.descending { ordering.reverse() } else { ordering };
        if ordering != Ordering::Equal {
            return Ok(ordering);
        }
    }
    Ok(Ordering::Equal)
}

fn compare_value(a: &Value, b: &Value) -> Result<Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(x.cmp(y)),
        (Value::String(x), Value::String(y)) => Ok(x.cmp(y)),
        _ => Err(plan_err("cannot compare values of different or unsupported types")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::Column;
    use crate::planner::PlanNode;
    use crate::types::DataType;

    fn block_with(numbers: &[i64]) -> DataBlock {
        let mut block = DataBlock::new(vec![Column::new("number", DataType::Int32)]);
        let mut writer = BatchWriter::new(block.columns());
        for &n in numbers {
            writer.write_row([Value::make_int(n)]).unwrap();
        }
        block.write_batch(writer).unwrap();
        block
    }

    #[test]
    fn sorts_ascending_by_default() {
        let keys = vec![OrderKey {
            expr: PlanNode::Variable("number".to_string()),
            descending: false,
        }];
        let chunks = sort_all(&[block_with(&[3, 1, 2])], &keys, 64).unwrap();
        assert_eq!(chunks.len(), 1);
        let ordered: Vec<i64> = chunks[0].column(0).unwrap().values().iter().map(|v| v.as_int().unwrap()).collect();
        assert_eq!(ordered, vec![1, 2, 3]);
    }

    #[test]
    fn sorts_descending_when_requested() {
        let keys = vec![OrderKey {
            expr: PlanNode::Variable("number".to_string()),
            descending: true,
        }];
        let chunks = sort_all(&[block_with(&[3, 1, 2])], &keys, 64).unwrap();
        let ordered: Vec<i64> = chunks[0].column(0).unwrap().values().iter().map(|v| v.as_int().unwrap()).collect();
        assert_eq!(ordered, vec![3, 2, 1]);
    }

    #[test]
    fn splits_into_default_block_size_chunks() {
        let keys = vec![OrderKey {
            expr: PlanNode::Variable("number".to_string()),
            descending: false,
        }];
        let chunks = sort_all(&[block_with(&[5, 4, 3, 2, 1])], &keys, 2).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].num_rows(), 2);
        assert_eq!(chunks[2].num_rows(), 1);
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        let keys = vec![OrderKey {
            expr: PlanNode::Variable("number".to_string()),
            descending: false,
        }];
        let chunks = sort_all(&[], &keys, 64).unwrap();
        assert!(chunks.is_empty());
    }
}
