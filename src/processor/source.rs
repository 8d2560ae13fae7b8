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

//! `DataSourceTransform`: wraps a [`BlockInputStream`] and pushes blocks
//! until it's exhausted, then emits end-of-stream (spec §4.8).

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::array::BlockInputStream;

use super::{Message, Processor, CHANNEL_CAPACITY};

pub fn spawn_source(name: &'static str, mut stream: Box<dyn BlockInputStream>, cancel: CancellationToken) -> Processor {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    let handle = tokio::spawn(async move {
        loop {
            if cancel.is_cancelled() {
                break;
            }
            match stream.read() {
                Ok(Some(block)) => {
                    tracing::trace!(transform = name, rows = block.num_rows(), "emitting block");
                    if tx.send(Message::Block(block)).await.is_err() {
                        return;
                    }
                }
                Ok(None) => break,
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
