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

//! Synthetic course generator (§4.3), used by the statistics collector to exercise strategies and
//! the allocator over randomized, reproducible problem instances.

use crate::strategy::{RoomTypeStats, Strategy};
use crate::{Course, Room};
use rand::rngs::StdRng;
use rand::Rng;

/// Ten-letter alphabet course name prefixes are drawn from, mirroring a typical timetable's
/// department-code convention.
const NAME_PREFIXES: [&str; 10] = [
    "AB", "BI", "CH", "CS", "EC", "GE", "HI", "MA", "PH", "PS",
];

/// Parameters controlling synthetic course generation.
#[derive(Debug, Clone, Copy)]
pub struct SimulationParams {
    pub num_courses: u32,
    pub min_size: u32,
    pub max_size: u32,
    pub change_size: u32,
}

/// Generate `params.num_courses` distinct synthetic courses, using `strategy` to populate each
/// course's preference list against the per-type statistics of `rooms`.
///
/// For each course, a uniform draw decides whether its cohort size comes from the "common" range
/// `[min_size, change_size)` (90% of the time) or the "rare" range `[change_size, max_size]`
/// (10% of the time), per §4.3. Names are `<PREFIX><NUM>` with `PREFIX` drawn from a fixed
/// ten-entry alphabet and `NUM` from `[300, 500)`; the `(prefix, num)` pair is retried on
/// collision so the returned courses always have distinct names.
pub fn generate_courses(
    params: SimulationParams,
    strategy: &Strategy,
    rooms: &[Room],
    rng: &mut StdRng,
) -> Vec<Course> {
    let stats = RoomTypeStats::compute(rooms);
    let mut used_names = std::collections::HashSet::new();
    let mut courses = Vec::with_capacity(params.num_courses as usize);

    for _ in 0..params.num_courses {
        let name = loop {
            let prefix = NAME_PREFIXES[rng.gen_range(0..NAME_PREFIXES.len())];
            let num = rng.gen_range(300..500);
            let candidate = format!("{}{}", prefix, num);
            if used_names.insert(candidate.clone()) {
                break candidate;
            }
        };

        let cohort_size = if rng.gen_range(0.0..1.0) < 0.9 {
            rng.gen_range(params.min_size..=params.change_size.max(params.min_size))
        } else {
            rng.gen_range(params.change_size..=params.max_size.max(params.change_size))
        };

        let mut course = Course::new(name, cohort_size, Vec::new());
        course.preferences = strategy.generate_preferences(&course, &stats, rng);
        courses.push(course);
    }

    courses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RoomType;
    use rand::SeedableRng;

    fn sample_rooms() -> Vec<Room> {
        vec![
            Room::new("L1", 80, RoomType::Lecture),
            Room::new("S1", 30, RoomType::Seminar),
        ]
    }

    #[test]
    fn generates_the_requested_number_of_distinct_courses() {
        let mut rng = StdRng::seed_from_u64(123);
        let params = SimulationParams {
            num_courses: 50,
            min_size: 10,
            max_size: 100,
            change_size: 40,
        };
        let strategy = Strategy::SmartRandom { k: 5 };
        let courses = generate_courses(params, &strategy, &sample_rooms(), &mut rng);
        assert_eq!(courses.len(), 50);
        let names: std::collections::HashSet<_> = courses.iter().map(|c| &c.name).collect();
        assert_eq!(names.len(), 50);
        for course in &courses {
            assert!(course.cohort_size >= 10 && course.cohort_size <= 100);
        }
    }

    #[test]
    fn is_deterministic_given_a_fixed_seed() {
        let params = SimulationParams {
            num_courses: 20,
            min_size: 5,
            max_size: 60,
            change_size: 25,
        };
        let strategy = Strategy::SizeBased { k: 5, slack: 10 };
        let rooms = sample_rooms();

        let mut rng_a = StdRng::seed_from_u64(999);
        let courses_a = generate_courses(params, &strategy, &rooms, &mut rng_a);
        let mut rng_b = StdRng::seed_from_u64(999);
        let courses_b = generate_courses(params, &strategy, &rooms, &mut rng_b);

        let names_a: Vec<&str> = courses_a.iter().map(|c| c.name.as_str()).collect();
        let names_b: Vec<&str> = courses_b.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names_a, names_b);
        let sizes_a: Vec<u32> = courses_a.iter().map(|c| c.cohort_size).collect();
        let sizes_b: Vec<u32> = courses_b.iter().map(|c| c.cohort_size).collect();
        assert_eq!(sizes_a, sizes_b);
    }
}
