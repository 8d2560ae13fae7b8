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

//! `FilterTransform`: evaluates a predicate per row, forwarding a block
//! with only the rows that passed.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::array::{BatchWriter, DataBlock};
use crate::expr::eval::{eval_on_row, is_truthy};
use crate::planner::PlanNode;

use super::{Message, Processor, Receiver, CHANNEL_CAPACITY};

pub fn spawn_filter(name: &'static str, mut upstream: Receiver, predicate: PlanNode, cancel: CancellationToken) -> Processor {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    let handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                message = upstream.recv() => {
                    match message {
                        Some(Message::Block(block)) => match filter_block(&block, &predicate) {
                            Ok(filtered) => {
                                if tx.send(Message::Block(filtered)).await.is_err() {
                                    return;
                                }
                            }
                            Err(e) => {
                                let _ = tx.send(Message::Error(e)).await;
                                return;
                            }
                        },
                        Some(Message::Error(e)) => {
                            let _ = tx.send(Message::Error(e)).await;
                            return;
                        }
                        Some(Message::EndOfStream) | None => break,
                    }
                }
            }
        }
        let _ = tx.send(Message::EndOfStream).await;
    });

    Processor { name, output: rx, handle }
}

fn filter_block(block: &DataBlock, predicate: &PlanNode) -> crate::error::Result<DataBlock> {
    let mut out = block.clone_empty();
    let mut writer = BatchWriter::new(out.columns());
    for row in 0..block.num_rows() {
        let keep = is_truthy(&eval_on_row(predicate, block, row)?);
        if keep {
            let values = block.columns().iter().map(|c| c.get(row).cloned().unwrap());
            writer.write_row(values)?;
        }
    }
    out.write_batch(writer)?;
    Ok(out)
}
