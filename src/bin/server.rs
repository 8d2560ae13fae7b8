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

//! A minimal line-at-a-time SQL driver over stdin/stdout, standing in
//! for the real wire protocol the engine is built to sit behind (spec
//! §1 names it an external collaborator, out of scope here). Reads one
//! statement per line, runs it through [`riverql::run_query`], and
//! prints the resulting blocks.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use riverql::catalog::{Catalog, DefaultSession, Session};
use riverql::config::Config;

#[derive(Parser, Debug)]
#[command(name = "riverql-server", about = "Column-oriented SQL query execution core")]
struct Opts {
    /// Path to a TOML config file; falls back to built-in defaults.
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let opts = Opts::parse();
    let config = match &opts.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Config::load_from_str(&text)?
        }
        None => Config::default(),
    };

    tracing::info!(default_block_size = config.server.default_block_size, "starting riverql-server");

    let session = Arc::new(DefaultSession::new(config.server));
    let catalog = session.catalog().clone();
    let session: Arc<dyn Session> = session;
    run_repl(session, catalog).await
}

async fn run_repl(session: Arc<dyn Session>, catalog: Arc<Catalog>) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        let sql = line.trim();
        if sql.is_empty() {
            continue;
        }

        match riverql::run_query(session.clone(), catalog.clone(), sql).await {
            Ok(blocks) => print_blocks(&mut stdout, &blocks)?,
            Err(e) => writeln!(stdout, "error: {e}")?,
        }
        stdout.flush()?;
    }

    Ok(())
}

fn print_blocks(out: &mut impl Write, blocks: &[riverql::array::DataBlock]) -> io::Result<()> {
    let Some(first) = blocks.first() else {
        return writeln!(out, "ok");
    };
    let header: Vec<&str> = first.columns().iter().map(|c| c.name.as_str()).collect();
    writeln!(out, "{}", header.join("\t"))?;

    for block in blocks {
        for row in 0..block.num_rows() {
            let values: Vec<String> = block.columns().iter().map(|c| c.get(row).unwrap().to_string()).collect();
            writeln!(out, "{}", values.join("\t"))?;
        }
    }
    Ok(())
}
