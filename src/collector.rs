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

//! Statistics collector (§4.6): drives the simulator and allocator over every registered strategy,
//! `numSimulations` times each, and reports per-strategy averages.
//!
//! The collector is deliberately single-threaded (§5): the dominant cost of one trial is a
//! handful of proposal rounds over a few hundred courses, which doesn't amortize thread-pool
//! setup, and a plain sequential loop makes trial ordering (and therefore the exact sequence of
//! per-trial seeds) trivial to audit and reproduce.

use crate::allocator::allocate;
use crate::simulator::{generate_courses, SimulationParams};
use crate::statistics::AllocationStatistics;
use crate::strategy::Strategy;
use crate::{InputError, Room};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Configuration of a collector run (§6: "Configuration of the collector").
#[derive(Debug, Clone, Copy)]
pub struct CollectorConfig {
    pub num_simulations: u32,
    pub simulation: SimulationParams,
    /// Base seed. If `None`, a fresh seed is drawn from OS entropy once per collector run (trials
    /// remain mutually distinct but are not reproducible across process invocations).
    pub seed: Option<u64>,
}

/// Per-strategy averages over all trials run for that strategy.
#[derive(Debug, Clone)]
pub struct StrategyAverages {
    pub strategy_name: String,
    pub num_trials: usize,
    pub mean_satisfaction_rate: f64,
    pub mean_first_choice_rate: f64,
    pub mean_high_rank_rate: f64,
    pub mean_unallocated_rate: f64,
    pub mean_average_choice: f64,
    pub mean_num_allocation_steps: f64,
}

/// Drives `strategies` over `config.num_simulations` seeded trials each against `rooms`, and
/// returns both the raw per-trial records and the per-strategy averages.
///
/// Returns `Err` as soon as any trial's allocation fails input validation (e.g. the room list
/// itself is malformed); no partial statistics are returned in that case.
pub fn run(
    rooms: &[Room],
    strategies: &[Strategy],
    config: &CollectorConfig,
) -> Result<(Vec<AllocationStatistics>, Vec<StrategyAverages>), InputError> {
    let base_seed = config.seed.unwrap_or_else(|| rand::random());
    let mut records = Vec::with_capacity(strategies.len() * config.num_simulations as usize);

    for strategy in strategies {
        let identifier = strategy.identifier();
        for trial in 0..config.num_simulations {
            let trial_seed = derive_trial_seed(base_seed, trial, &identifier);
            let mut rng = StdRng::seed_from_u64(trial_seed);
            let courses = generate_courses(config.simulation, strategy, rooms, &mut rng);
            let result = allocate(rooms, &courses)?;
            let stats = AllocationStatistics::calculate(identifier.clone(), &result, &courses, rooms);
            info!(
                "Trial {} of strategy {}: {}",
                trial, identifier, stats
            );
            records.push(stats);
        }
    }

    let averages = average_by_strategy(&records);
    Ok((records, averages))
}

/// Derive a per-trial seed from the collector's base seed, the trial index and the strategy
/// identifier, so that every (strategy, trial) pair gets an independent, reproducible seed.
fn derive_trial_seed(base_seed: u64, trial: u32, identifier: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    base_seed.hash(&mut hasher);
    trial.hash(&mut hasher);
    identifier.hash(&mut hasher);
    hasher.finish()
}

fn average_by_strategy(records: &[AllocationStatistics]) -> Vec<StrategyAverages> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: std::collections::HashMap<String, Vec<&AllocationStatistics>> =
        std::collections::HashMap::new();
    for record in records {
        groups
            .entry(record.strategy_name.clone())
            .or_insert_with(|| {
                order.push(record.strategy_name.clone());
                Vec::new()
            })
            .push(record);
    }

    order
        .into_iter()
        .map(|name| {
            let group = &groups[&name];
            let n = group.len() as f64;
            StrategyAverages {
                strategy_name: name,
                num_trials: group.len(),
                mean_satisfaction_rate: group.iter().map(|r| r.satisfaction_rate).sum::<f64>() / n,
                mean_first_choice_rate: group.iter().map(|r| r.first_choice_rate).sum::<f64>() / n,
                mean_high_rank_rate: group.iter().map(|r| r.high_rank_rate).sum::<f64>() / n,
                mean_unallocated_rate: group.iter().map(|r| r.unallocated_rate).sum::<f64>() / n,
                mean_average_choice: group.iter().map(|r| r.average_choice).sum::<f64>() / n,
                mean_num_allocation_steps: group
                    .iter()
                    .map(|r| r.num_allocation_steps as f64)
                    .sum::<f64>()
                    / n,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RoomType;

    fn sample_rooms() -> Vec<Room> {
        vec![
            Room::new("L1", 80, RoomType::Lecture),
            Room::new("L2", 60, RoomType::Lecture),
            Room::new("S1", 30, RoomType::Seminar),
            Room::new("S2", 40, RoomType::Seminar),
        ]
    }

    // Scenario F — determinism.
    #[test]
    fn scenario_f_determinism() {
        let config = CollectorConfig {
            num_simulations: 3,
            simulation: SimulationParams {
                num_courses: 20,
                min_size: 5,
                max_size: 70,
                change_size: 30,
            },
            seed: Some(215815),
        };
        let strategies = vec![
            Strategy::SmartRandom { k: 5 },
            Strategy::SizeBased { k: 5, slack: 10 },
        ];
        let rooms = sample_rooms();

        let (records_a, averages_a) = run(&rooms, &strategies, &config).unwrap();
        let (records_b, averages_b) = run(&rooms, &strategies, &config).unwrap();

        assert_eq!(records_a.len(), records_b.len());
        for (a, b) in records_a.iter().zip(records_b.iter()) {
            assert_eq!(a.strategy_name, b.strategy_name);
            assert_eq!(a.satisfaction_rate, b.satisfaction_rate);
            assert_eq!(a.first_choice_rate, b.first_choice_rate);
            assert_eq!(a.high_rank_rate, b.high_rank_rate);
            assert_eq!(a.unallocated_rate, b.unallocated_rate);
            assert_eq!(a.average_choice, b.average_choice);
            assert_eq!(a.num_allocation_steps, b.num_allocation_steps);
        }
        assert_eq!(averages_a.len(), averages_b.len());
        for (a, b) in averages_a.iter().zip(averages_b.iter()) {
            assert_eq!(a.mean_satisfaction_rate, b.mean_satisfaction_rate);
        }
    }

    #[test]
    fn collects_one_record_per_strategy_per_trial() {
        let config = CollectorConfig {
            num_simulations: 4,
            simulation: SimulationParams {
                num_courses: 10,
                min_size: 5,
                max_size: 50,
                change_size: 20,
            },
            seed: Some(1),
        };
        let strategies = vec![
            Strategy::UniformRandom { k: 5 },
            Strategy::SmartRandom { k: 5 },
            Strategy::SatisfactionWeighted {
                k: 5,
                temperature: 2.0,
            },
        ];
        let (records, averages) = run(&sample_rooms(), &strategies, &config).unwrap();
        assert_eq!(records.len(), 3 * 4);
        assert_eq!(averages.len(), 3);
        for avg in &averages {
            assert_eq!(avg.num_trials, 4);
        }
    }

    #[test]
    fn averages_are_computed_over_all_trials_for_the_strategy() {
        use assert_float_eq::*;

        let config = CollectorConfig {
            num_simulations: 3,
            simulation: SimulationParams {
                num_courses: 6,
                min_size: 5,
                max_size: 40,
                change_size: 20,
            },
            seed: Some(42),
        };
        let strategies = vec![Strategy::UniformRandom { k: 5 }];
        let (records, averages) = run(&sample_rooms(), &strategies, &config).unwrap();

        let expected: f64 =
            records.iter().map(|r| r.satisfaction_rate).sum::<f64>() / records.len() as f64;
        assert_f64_near!(averages[0].mean_satisfaction_rate, expected);
    }

    #[test]
    fn propagates_input_validation_failures() {
        let config = CollectorConfig {
            num_simulations: 1,
            simulation: SimulationParams {
                num_courses: 5,
                min_size: 5,
                max_size: 20,
                change_size: 10,
            },
            seed: Some(1),
        };
        let strategies = vec![Strategy::UniformRandom { k: 5 }];
        let result = run(&[], &strategies, &config);
        assert_eq!(result.unwrap_err(), InputError::EmptyRoomList);
    }
}
