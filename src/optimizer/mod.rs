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

//! The ordered list of plan-to-plan rewrite passes (C7).

pub mod passes;

pub use passes::OptimizerPass;

use crate::error::Result;
use crate::planner::PlanNode;

/// Applies each pass in order. Unknown/experimental passes are opt-in —
/// callers build their own list and pass it in rather than reaching
/// into a global registry.
pub fn optimize(plan: PlanNode, passes: &[Box<dyn OptimizerPass>]) -> Result<PlanNode> {
    let mut plan = plan;
    for pass in passes {
        tracing::debug!(pass = pass.name(), "optimizer pass running");
        plan = pass.apply(plan)?;
    }
    Ok(plan)
}

/// The passes applied unless a caller opts into something else.
pub fn default_optimizers() -> Vec<Box<dyn OptimizerPass>> {
    vec![Box::new(passes::ConstantFold)]
}
