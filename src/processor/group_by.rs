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

//! `GroupByTransform`: partitions inbound rows by the key expressions,
//! maintains per-group aggregate state, and emits a single result block
//! once upstream reaches end-of-stream (spec §4.7).
//!
//! Aggregate names (`COUNT`, `SUM`, `MIN`, `MAX`, `AVG`) are resolved
//! here rather than through [`crate::expr::function_factory`]: the
//! function registry (C5) is defined for pure, stateless row functions,
//! while an aggregate needs incremental per-group state across rows.

use std::collections::HashMap;

use itertools::Itertools;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::array::{BatchWriter, Column, DataBlock};
use crate::error::{EngineError, Result};
use crate::expr::eval::eval_on_row;
use crate::planner::PlanNode;
use crate::types::DataType;
use crate::value::Value;

use super::{Message, Processor, Receiver, CHANNEL_CAPACITY};

#[derive(Debug, Clone, Copy)]
enum AggKind {
    Count,
    Sum,
    Min,
    Max,
    Avg,
}

fn agg_kind(name: &str) -> Result<AggKind> {
    match name.to_uppercase().as_str() {
        "COUNT" => Ok(AggKind::Count),
        "SUM" => Ok(AggKind::Sum),
        "MIN" => Ok(AggKind::Min),
        "MAX" => Ok(AggKind::Max),
        "AVG" => Ok(AggKind::Avg),
        _ => Err(EngineError::function_not_found(name)),
    }
}

#[derive(Default, Clone, Copy)]
struct AggState {
    count: i64,
    sum: i64,
    min: i64,
    max: i64,
    initialized: bool,
}

impl AggState {
    fn update(&mut self, v: i64) {
        self.count += 1;
        self.sum += v;
        if !self.initialized {
            self.min = v;
            self.max = v;
            self.initialized = true;
        } else {
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        }
    }

    fn finalize(&self, kind: AggKind) -> i64 {
        match kind {
            AggKind::Count => self.count,
            AggKind::Sum => self.sum,
            AggKind::Min => self.min,
            AggKind::Max => self.max,
            AggKind::Avg => {
                if self.count == 0 {
                    0
                } else {
                    self.sum / self.count
                }
            }
        }
    }
}

struct GroupEntry {
    key_values: Vec<Value>,
    states: Vec<AggState>,
}

pub fn spawn_group_by(
    name: &'static str,
    mut upstream: Receiver,
    keys: Vec<PlanNode>,
    aggs: Vec<(String, PlanNode)>,
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
            match aggregate(&blocks, &keys, &aggs) {
                Ok(block) => {
                    if tx.send(Message::Block(block)).await.is_err() {
                        return;
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

fn key_name(key: &PlanNode, idx: usize) -> String {
    match key {
        PlanNode::Variable(name) => name.clone(),
        other => format!("{}_{idx}", other.name()),
    }
}

fn value_data_type(value: &Value) -> DataType {
    match value {
        Value::String(_) => DataType::String,
        _ => DataType::Int32,
    }
}

fn aggregate(blocks: &[DataBlock], keys: &[PlanNode], aggs: &[(String, PlanNode)]) -> Result<DataBlock> {
    let kinds = aggs.iter().map(|(name, _)| agg_kind(name)).collect::<Result<Vec<_>>>()?;

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<GroupEntry> = Vec::new();

    for block in blocks {
        for row in 0..block.num_rows() {
            let key_values = keys.iter().map(|k| eval_on_row(k, block, row)).collect::<Result<Vec<_>>>()?;
            let key_str = key_values.iter().map(|v| v.to_string()).join("\u{1}");
            let group_idx = *index.entry(key_str).or_insert_with(|| {
                groups.push(GroupEntry {
                    key_values: key_values.clone(),
                    states: vec![AggState::default(); aggs.len()],
                });
                groups.len() - 1
            });

            for (agg_idx, (_, expr)) in aggs.iter().enumerate() {
                let v = eval_on_row(expr, block, row)?.as_int()?;
                groups[group_idx].states[agg_idx].update(v);
            }
        }
    }

    let mut columns: Vec<Column> = keys
        .iter()
        .enumerate()
        .map(|(idx, k)| {
            let data_type = groups.first().map(|g| value_data_type(&g.key_values[idx])).unwrap_or(DataType::Int32);
            Column::new(key_name(k, idx), data_type)
        })
        .collect();
    for (name, _) in aggs {
        columns.push(Column::new(name.to_lowercase(), DataType::Int32));
    }

    let mut block = DataBlock::new(columns);
    let mut writer = BatchWriter::new(block.columns());
    for group in &groups {
        let mut row = group.key_values.clone();
        for (state, kind) in group.states.iter().zip(kinds.iter()) {
            row.push(Value::make_int(state.finalize(*kind)));
        }
        writer.write_row(row)?;
    }
    block.write_batch(writer)?;
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::Column as Col;

    fn block_with(pairs: &[(i64, i64)]) -> DataBlock {
        let mut block = DataBlock::new(vec![Col::new("category", DataType::Int32), Col::new("amount", DataType::Int32)]);
        let mut writer = BatchWriter::new(block.columns());
        for &(c, a) in pairs {
            writer.write_row([Value::make_int(c), Value::make_int(a)]).unwrap();
        }
        block.write_batch(writer).unwrap();
        block
    }

    #[test]
    fn sums_amounts_per_category() {
        let block = block_with(&[(1, 10), (1, 20), (2, 5)]);
        let keys = vec![PlanNode::Variable("category".to_string())];
        let aggs = vec![("SUM".to_string(), PlanNode::Variable("amount".to_string()))];

        let result = aggregate(&[block], &keys, &aggs).unwrap();
        assert_eq!(result.num_rows(), 2);

        let categories: Vec<i64> = result.column(0).unwrap().values().iter().map(|v| v.as_int().unwrap()).collect();
        let sums: Vec<i64> = result.column(1).unwrap().values().iter().map(|v| v.as_int().unwrap()).collect();
        let by_category: HashMap<i64, i64> = categories.into_iter().zip(sums).collect();
        assert_eq!(by_category[&1], 30);
        assert_eq!(by_category[&2], 5);
    }

    #[test]
    fn count_counts_rows_per_group() {
        let block = block_with(&[(1, 10), (1, 20), (2, 5)]);
        let keys = vec![PlanNode::Variable("category".to_string())];
        let aggs = vec![("COUNT".to_string(), PlanNode::Variable("amount".to_string()))];
        let result = aggregate(&[block], &keys, &aggs).unwrap();
        let counts: Vec<i64> = result.column(1).unwrap().values().iter().map(|v| v.as_int().unwrap()).collect();
        assert_eq!(counts.iter().sum::<i64>(), 3);
    }

    #[test]
    fn unknown_aggregate_name_errors() {
        let keys = vec![PlanNode::Variable("category".to_string())];
        let aggs = vec![("NOPE".to_string(), PlanNode::Variable("amount".to_string()))];
        assert!(aggregate(&[], &keys, &aggs).is_err());
    }
}
