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

//! Preference-generation strategies (§4.2).
//!
//! The historical implementation modeled strategies as a class hierarchy; here they are a single
//! tagged `enum` with one capability (`generate_preferences`), per the redesign note in §9: the
//! set of strategies is closed and small, so a hand-rolled trait hierarchy would buy nothing a
//! `match` doesn't already give us. The random source is always an explicit `&mut StdRng`
//! parameter, never a field, so a strategy value is `Clone`-able, `Send`, and trivially reusable
//! across trials with a different seed each time.

use crate::{Course, Room, RoomType};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Precomputed per-room-type statistics, built once per room list and shared across strategy
/// invocations within a trial.
#[derive(Debug, Clone)]
pub struct RoomTypeStats {
    median_capacity: HashMap<RoomType, f64>,
    max_capacity: HashMap<RoomType, u32>,
}

impl RoomTypeStats {
    /// Precompute median and maximum capacity for every room type that has at least one room.
    /// Types with no rooms at all are absent from both maps — there is nothing to compute a
    /// median or maximum over.
    pub fn compute(rooms: &[Room]) -> RoomTypeStats {
        let mut by_type: HashMap<RoomType, Vec<u32>> = HashMap::new();
        for room in rooms {
            by_type.entry(room.room_type).or_default().push(room.capacity);
        }

        let mut median_capacity = HashMap::new();
        let mut max_capacity = HashMap::new();
        for (room_type, mut capacities) in by_type {
            capacities.sort_unstable();
            let n = capacities.len();
            let median = if n % 2 == 1 {
                capacities[n / 2] as f64
            } else {
                (capacities[n / 2 - 1] as f64 + capacities[n / 2] as f64) / 2.0
            };
            median_capacity.insert(room_type, median);
            max_capacity.insert(room_type, *capacities.last().unwrap());
        }

        RoomTypeStats {
            median_capacity,
            max_capacity,
        }
    }

    pub fn median(&self, room_type: RoomType) -> Option<f64> {
        self.median_capacity.get(&room_type).copied()
    }

    pub fn max(&self, room_type: RoomType) -> Option<u32> {
        self.max_capacity.get(&room_type).copied()
    }
}

/// A fixed, survey-derived desirability score per room type, used by the satisfaction-weighted
/// strategy. Values are illustrative (no real survey backs this crate) but stable across runs.
fn survey_score(room_type: RoomType) -> f64 {
    match room_type {
        RoomType::Lecture => 0.60,
        RoomType::Seminar => 0.80,
        RoomType::Workshop => 0.90,
        RoomType::Laboratory => 0.50,
        RoomType::Studio => 0.70,
        RoomType::Conference => 0.75,
        RoomType::Computer => 0.65,
        RoomType::Auditorium => 0.55,
        RoomType::Meeting => 0.60,
        RoomType::Outdoor => 0.40,
    }
}

/// Default slack added to a course's cohort size before comparing it against room-type medians
/// in the size-based strategy.
pub const DEFAULT_SLACK: i64 = 10;
/// Default softmax temperature for the satisfaction-weighted strategy.
pub const DEFAULT_TEMPERATURE: f64 = 2.0;

/// A preference-generation strategy, tagged by its construction parameters (§9).
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Shuffle all ten room types and take the first `k`. Ignores course size entirely.
    UniformRandom { k: usize },
    /// Sort room types by how closely their median capacity matches `cohort_size + slack`, take
    /// the first `k`. Not filtered by feasibility — a type with no room big enough can still
    /// appear.
    SizeBased { k: usize, slack: i64 },
    /// Filter to room types with a room big enough for the cohort, shuffle, take the first `k`.
    /// Falls back to an unfiltered shuffle if no type is big enough for anyone.
    SmartRandom { k: usize },
    /// Filter to room types with a room big enough for the cohort, then sample `k` of them
    /// without replacement, weighted by a softmax over fixed survey scores.
    SatisfactionWeighted { k: usize, temperature: f64 },
}

impl Strategy {
    /// The identifier exposed to the statistics layer, of the form `<name>_<k>`.
    pub fn identifier(&self) -> String {
        match self {
            Strategy::UniformRandom { k } => format!("uniform_random_{}", k),
            Strategy::SizeBased { k, .. } => format!("size_based_{}", k),
            Strategy::SmartRandom { k } => format!("smart_random_{}", k),
            Strategy::SatisfactionWeighted { k, .. } => format!("satisfaction_weighted_{}", k),
        }
    }

    /// Generate a duplicate-free, length-at-most-`k` ordered list of room types for `course`.
    pub fn generate_preferences(
        &self,
        course: &Course,
        stats: &RoomTypeStats,
        rng: &mut StdRng,
    ) -> Vec<RoomType> {
        match self {
            Strategy::UniformRandom { k } => uniform_random(*k, rng),
            Strategy::SizeBased { k, slack } => size_based(*k, *slack, course, stats),
            Strategy::SmartRandom { k } => smart_random(*k, course, stats, rng),
            Strategy::SatisfactionWeighted { k, temperature } => {
                satisfaction_weighted(*k, *temperature, course, stats, rng)
            }
        }
    }
}

fn uniform_random(k: usize, rng: &mut StdRng) -> Vec<RoomType> {
    let mut types = RoomType::ALL.to_vec();
    types.shuffle(rng);
    types.truncate(k);
    types
}

fn size_based(k: usize, slack: i64, course: &Course, stats: &RoomTypeStats) -> Vec<RoomType> {
    let target = course.cohort_size as f64 + slack as f64;
    let mut candidates: Vec<(usize, RoomType, f64)> = RoomType::ALL
        .iter()
        .enumerate()
        .filter_map(|(enum_index, &room_type)| {
            stats
                .median(room_type)
                .map(|median| (enum_index, room_type, (median - target).abs()))
        })
        .collect();
    // Stable sort by distance; ties keep RoomType::ALL enumeration order since `enum_index` is
    // the secondary key and the sort is stable on the input order already.
    candidates.sort_by(|a, b| {
        a.2.partial_cmp(&b.2)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    candidates
        .into_iter()
        .take(k)
        .map(|(_, room_type, _)| room_type)
        .collect()
}

fn feasible_types(course: &Course, stats: &RoomTypeStats) -> Vec<RoomType> {
    RoomType::ALL
        .iter()
        .copied()
        .filter(|&room_type| stats.max(room_type).map_or(false, |max| max >= course.cohort_size))
        .collect()
}

fn smart_random(k: usize, course: &Course, stats: &RoomTypeStats, rng: &mut StdRng) -> Vec<RoomType> {
    let mut filtered = feasible_types(course, stats);
    if filtered.is_empty() {
        return uniform_random(k, rng);
    }
    filtered.shuffle(rng);
    filtered.truncate(k);
    filtered
}

fn satisfaction_weighted(
    k: usize,
    temperature: f64,
    course: &Course,
    stats: &RoomTypeStats,
    rng: &mut StdRng,
) -> Vec<RoomType> {
    let filtered = feasible_types(course, stats);
    if filtered.is_empty() {
        return Vec::new();
    }

    let raw: Vec<f64> = filtered
        .iter()
        .map(|&t| (survey_score(t) * temperature).exp())
        .collect();
    let max_raw = raw.iter().cloned().fold(f64::MIN, f64::max);
    let mut weights: Vec<f64> = raw.iter().map(|w| w / max_raw).collect();
    let mut pool = filtered;

    let mut result = Vec::with_capacity(k.min(pool.len()));
    while !pool.is_empty() && result.len() < k {
        let total: f64 = weights.iter().sum();
        let mut draw = rng.gen_range(0.0..total);
        let mut chosen = pool.len() - 1;
        for (index, &weight) in weights.iter().enumerate() {
            if draw < weight {
                chosen = index;
                break;
            }
            draw -= weight;
        }
        result.push(pool.remove(chosen));
        weights.remove(chosen);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rooms_for_scenario_e() -> Vec<Room> {
        // T1 (Lecture) median 80, T2 (Seminar) median 30.
        vec![
            Room::new("L1", 70, RoomType::Lecture),
            Room::new("L2", 80, RoomType::Lecture),
            Room::new("L3", 90, RoomType::Lecture),
            Room::new("S1", 20, RoomType::Seminar),
            Room::new("S2", 30, RoomType::Seminar),
            Room::new("S3", 40, RoomType::Seminar),
        ]
    }

    // Scenario E — size-based strategy.
    #[test]
    fn scenario_e_size_based_prefers_closer_median() {
        let rooms = rooms_for_scenario_e();
        let stats = RoomTypeStats::compute(&rooms);
        assert_eq!(stats.median(RoomType::Lecture), Some(80.0));
        assert_eq!(stats.median(RoomType::Seminar), Some(30.0));

        let course = Course::new("C1", 25, vec![]);
        let strategy = Strategy::SizeBased { k: 2, slack: 10 };
        let prefs = size_based_prefs(&strategy, &course, &stats);
        let seminar_pos = prefs.iter().position(|&t| t == RoomType::Seminar).unwrap();
        let lecture_pos = prefs.iter().position(|&t| t == RoomType::Lecture).unwrap();
        assert!(seminar_pos < lecture_pos);
    }

    fn size_based_prefs(strategy: &Strategy, course: &Course, stats: &RoomTypeStats) -> Vec<RoomType> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        strategy.generate_preferences(course, stats, &mut rng)
    }

    #[test]
    fn uniform_random_ignores_size_and_respects_k() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let stats = RoomTypeStats::compute(&rooms_for_scenario_e());
        let course = Course::new("C1", 1000, vec![]);
        let strategy = Strategy::UniformRandom { k: 4 };
        let prefs = strategy.generate_preferences(&course, &stats, &mut rng);
        assert_eq!(prefs.len(), 4);
        let unique: std::collections::HashSet<_> = prefs.iter().collect();
        assert_eq!(unique.len(), prefs.len());
    }

    #[test]
    fn smart_random_filters_infeasible_types() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let stats = RoomTypeStats::compute(&rooms_for_scenario_e());
        let course = Course::new("C1", 35, vec![]); // only Lecture (max 90) fits
        let strategy = Strategy::SmartRandom { k: 5 };
        let prefs = strategy.generate_preferences(&course, &stats, &mut rng);
        assert_eq!(prefs, vec![RoomType::Lecture]);
    }

    #[test]
    fn smart_random_falls_back_when_nothing_fits() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let stats = RoomTypeStats::compute(&rooms_for_scenario_e());
        let course = Course::new("C1", 1_000_000, vec![]);
        let strategy = Strategy::SmartRandom { k: 3 };
        let prefs = strategy.generate_preferences(&course, &stats, &mut rng);
        assert_eq!(prefs.len(), 3);
    }

    #[test]
    fn satisfaction_weighted_respects_k_and_feasibility() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let stats = RoomTypeStats::compute(&rooms_for_scenario_e());
        let course = Course::new("C1", 25, vec![]);
        let strategy = Strategy::SatisfactionWeighted {
            k: 2,
            temperature: DEFAULT_TEMPERATURE,
        };
        let prefs = strategy.generate_preferences(&course, &stats, &mut rng);
        assert_eq!(prefs.len(), 2);
        for room_type in &prefs {
            assert!(stats.max(*room_type).unwrap() >= course.cohort_size);
        }
    }

    #[test]
    fn identifiers_embed_strategy_name_and_k() {
        assert_eq!(Strategy::UniformRandom { k: 5 }.identifier(), "uniform_random_5");
        assert_eq!(
            Strategy::SizeBased { k: 3, slack: 10 }.identifier(),
            "size_based_3"
        );
        assert_eq!(Strategy::SmartRandom { k: 5 }.identifier(), "smart_random_5");
        assert_eq!(
            Strategy::SatisfactionWeighted {
                k: 5,
                temperature: 2.0
            }
            .identifier(),
            "satisfaction_weighted_5"
        );
    }
}
