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

//! The only configuration surface the core reads (spec §6): the block
//! chunking unit and whether exceptions carry a text stack trace.

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub default_block_size: usize,
    pub calculate_text_stack_trace: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            default_block_size: 65536,
            calculate_text_stack_trace: false,
        }
    }
}

/// Top-level config document, namespaced the way the teacher's
/// `risingwave_common::config` structures its `[server]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
}

impl Config {
    pub fn load_from_str(text: &str) -> Result<Config> {
        let cfg: Config = toml::from_str(text)
            .map_err(|e| crate::error::EngineError::Other(format!("invalid config: {e}")))?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_spec_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.server.default_block_size, 65536);
        assert!(!cfg.server.calculate_text_stack_trace);
    }

    #[test]
    fn loads_partial_overrides() {
        let cfg = Config::load_from_str(
            r#"
            [server]
            default_block_size = 4
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.default_block_size, 4);
        assert!(!cfg.server.calculate_text_stack_trace);
    }
}
