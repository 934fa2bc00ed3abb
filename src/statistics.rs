// Copyright 2020 by Michael Thies <mail@mhthies.de>
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use this file except in compliance with
// the License. You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

//! Per-run allocation metrics (§4.5), the unit the statistics collector averages over.

use crate::allocator::AllocationResult;
use crate::{Course, Room};
use serde::Serialize;
use std::fmt;

/// Metrics describing one completed allocation run against the courses it was computed over.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationStatistics {
    pub strategy_name: String,
    pub satisfaction_rate: f64,
    pub first_choice_rate: f64,
    pub high_rank_rate: f64,
    pub unallocated_rate: f64,
    pub average_choice: f64,
    pub num_allocation_steps: usize,
}

impl AllocationStatistics {
    /// Compute all six metrics of §4.5 from a completed allocation result.
    ///
    /// `strategy_name` tags the record for the statistics collector (§4.6); it plays no part in
    /// the computation itself.
    pub fn calculate(
        strategy_name: impl Into<String>,
        result: &AllocationResult,
        courses: &[Course],
        rooms: &[Room],
    ) -> AllocationStatistics {
        let total = courses.len();
        let placed = result.placed_count();
        let unplaced = result.unplaceable.len();
        debug_assert_eq!(placed + unplaced, total, "completion property violated");

        let ranks: Vec<usize> = (0..total)
            .filter_map(|course_index| result.rank_of(course_index, courses, rooms))
            .collect();

        let first_choice = ranks.iter().filter(|&&rank| rank == 0).count();
        let high_rank = ranks.iter().filter(|&&rank| rank + 1 >= 4).count();
        let average_choice = if ranks.is_empty() {
            0.0
        } else {
            // Ranks are reported 1-indexed, matching the preference list position a course was
            // actually matched at.
            ranks.iter().map(|&rank| (rank + 1) as f64).sum::<f64>() / ranks.len() as f64
        };

        AllocationStatistics {
            strategy_name: strategy_name.into(),
            satisfaction_rate: rate(placed, total),
            first_choice_rate: rate(first_choice, total),
            high_rank_rate: rate(high_rank, total),
            unallocated_rate: rate(unplaced, total),
            average_choice,
            num_allocation_steps: result.trace.len(),
        }
    }
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

impl fmt::Display for AllocationStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<24} satisfaction={:>6.2}% first-choice={:>6.2}% high-rank={:>6.2}% \
             unallocated={:>6.2}% avg-choice={:>5.2} steps={}",
            self.strategy_name,
            self.satisfaction_rate * 100.0,
            self.first_choice_rate * 100.0,
            self.high_rank_rate * 100.0,
            self.unallocated_rate * 100.0,
            self.average_choice,
            self.num_allocation_steps,
        )
    }
}
