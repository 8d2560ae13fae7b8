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

//! The channel-connected push pipeline of data blocks (C9). Every
//! transform is one task reading an (optional) upstream channel and
//! writing a downstream one; the contract in spec §4.8 governs all of
//! them: exactly one `EndOfStream`, errors forward-and-terminate, no
//! retained block references, and cooperative cancellation.

mod filter;
mod group_by;
mod order_by;
mod source;

pub use filter::spawn_filter;
pub use group_by::spawn_group_by;
pub use order_by::spawn_order_by;
pub use source::spawn_source;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::array::DataBlock;
use crate::error::EngineError;

/// Bound on every transform's output channel — this is the mechanism
/// spec §5 calls "inherent backpressure".
pub const CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
pub enum Message {
    Block(DataBlock),
    Error(EngineError),
    EndOfStream,
}

pub type Sender = mpsc::Sender<Message>;
pub type Receiver = mpsc::Receiver<Message>;

/// A running transform: its name, its output channel, and a handle to
/// the task driving it. Dropping the `Processor` without awaiting
/// `handle` simply detaches the task; callers that need the task to
/// finish (e.g. for cancellation) can `.await` it.
pub struct Processor {
    pub name: &'static str,
    pub output: Receiver,
    pub handle: JoinHandle<()>,
}

/// Drains `output` to completion, returning every block in order. Used
/// by tests and by the minimal REPL driver in `src/bin/server.rs` in
/// place of a real wire protocol.
pub async fn collect_blocks(mut processor: Processor) -> Result<Vec<DataBlock>, EngineError> {
    let mut blocks = Vec::new();
    while let Some(message) = processor.output.recv().await {
        match message {
            Message::Block(block) => blocks.push(block),
            Message::Error(e) => return Err(e),
            Message::EndOfStream => break,
        }
    }
    let _ = processor.handle.await;
    Ok(blocks)
}
