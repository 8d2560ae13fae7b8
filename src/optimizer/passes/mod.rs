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

mod constant_fold;

pub use constant_fold::ConstantFold;

use crate::error::Result;
use crate::planner::PlanNode;

/// A plan-to-plan rewrite that must preserve semantic equivalence. Each
/// pass either returns its input unchanged or a new tree — it never
/// mutates the tree shape observable by siblings (spec §4.6).
pub trait OptimizerPass: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, plan: PlanNode) -> Result<PlanNode>;
}
