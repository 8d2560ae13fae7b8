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

//! Pull-based block streams (C4). `read()` returns `Ok(None)` to signal
//! end-of-stream; readers must treat that as terminal.

use std::collections::VecDeque;

use crate::array::block::DataBlock;
use crate::error::{EngineError, Result};

pub trait BlockInputStream: Send {
    fn name(&self) -> &'static str;

    /// Pull the next block. `Ok(None)` means end-of-stream.
    fn read(&mut self) -> Result<Option<DataBlock>>;
}

pub trait BlockOutputStream: Send {
    fn write(&mut self, block: DataBlock) -> Result<()>;

    fn close(&mut self);
}

/// Yields the given blocks in order, then end-of-stream.
pub struct OneBlockInputStream {
    blocks: VecDeque<DataBlock>,
}

impl OneBlockInputStream {
    pub fn new(blocks: impl IntoIterator<Item = DataBlock>) -> OneBlockInputStream {
        OneBlockInputStream {
            blocks: blocks.into_iter().collect(),
        }
    }
}

impl BlockInputStream for OneBlockInputStream {
    fn name(&self) -> &'static str {
        "OneBlockInputStream"
    }

    fn read(&mut self) -> Result<Option<DataBlock>> {
        Ok(self.blocks.pop_front())
    }
}

/// Accepts `insert` calls up front and yields inserted blocks in
/// insertion order, then end-of-stream. Used by storages (e.g.
/// `system.tables`) that materialize their whole result eagerly.
#[derive(Default)]
pub struct NativeBlockInputStream {
    blocks: VecDeque<DataBlock>,
    closed_for_insert: bool,
}

impl NativeBlockInputStream {
    pub fn new() -> NativeBlockInputStream {
        NativeBlockInputStream::default()
    }

    pub fn insert(&mut self, block: DataBlock) -> Result<()> {
        if self.closed_for_insert {
            return Err(EngineError::Unsupported(
                "cannot insert into a stream that has started reading".to_string(),
            ));
        }
        self.blocks.push_back(block);
        Ok(())
    }
}

impl BlockInputStream for NativeBlockInputStream {
    fn name(&self) -> &'static str {
        "NativeBlockInputStream"
    }

    fn read(&mut self) -> Result<Option<DataBlock>> {
        self.closed_for_insert = true;
        Ok(self.blocks.pop_front())
    }
}

/// An output stream that buffers written blocks in memory and rejects
/// writes after close — the collaborator-facing sink shape named in
/// spec §4.4, used by tests that need to observe what a writable
/// storage received.
#[derive(Default)]
pub struct MemoryBlockOutputStream {
    closed: bool,
    pub written: Vec<DataBlock>,
}

impl MemoryBlockOutputStream {
    pub fn new() -> MemoryBlockOutputStream {
        MemoryBlockOutputStream::default()
    }
}

impl BlockOutputStream for MemoryBlockOutputStream {
    fn write(&mut self, block: DataBlock) -> Result<()> {
        if self.closed {
            return Err(EngineError::Unsupported("write after close".to_string()));
        }
        self.written.push(block);
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
