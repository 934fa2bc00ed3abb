// Copyright 2020 by Michael Thies <mail@mhthies.de>, Gabriel Guckenbiehl <gabriel.guckenbiehl@gmx.de>
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use this file except in compliance with
// the License. You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

//! The type-based deferred-acceptance matcher (§4.4 — the subtle engineering core of this crate).
//!
//! Rooms and courses are owned by the caller (as `&[Room]`/`&[Course]` slices); the allocator
//! never mutates them. All run-local mutable state — who occupies which room, how far each course
//! has advanced through its preference list — lives in tables built and torn down for the
//! duration of a single [`allocate`] call, indexed in parallel to the caller's slices. A room's
//! occupant and a course's assigned room are therefore always in lock-step by construction; there
//! is no cyclic room&harr;course reference to keep consistent.

use crate::fit::fit;
use crate::{validate, Course, InputError, Room, RoomType};
use log::{debug, info};
use std::collections::HashMap;

/// One event in the allocator's step trace: a course either claimed a previously empty room, or
/// displaced another course's occupancy of a room of the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent {
    /// `course_index` was installed in `room_index`, which had no occupant this round.
    Assigned {
        course_index: usize,
        room_index: usize,
    },
    /// `course_index` was installed in `room_index`, displacing whichever course had occupied it
    /// earlier in this same round.
    Displaced {
        course_index: usize,
        room_index: usize,
    },
}

/// The result of a completed allocation run.
#[derive(Debug, Clone)]
pub struct AllocationResult {
    /// Indexed by course: the room it ended up in, or `None` if unplaceable.
    pub course_room: Vec<Option<usize>>,
    /// Indexed by room: the course occupying it, or `None` if vacant.
    pub room_course: Vec<Option<usize>>,
    /// Indices (into the courses slice) of courses that exhausted their preference list without
    /// being placed.
    pub unplaceable: Vec<usize>,
    /// The ordered sequence of assignment/displacement events across all rounds.
    pub trace: Vec<TraceEvent>,
}

impl AllocationResult {
    /// Number of courses that ended up with a room.
    pub fn placed_count(&self) -> usize {
        self.course_room.iter().filter(|r| r.is_some()).count()
    }

    /// The 0-indexed rank (position in its preference list) at which a placed course was
    /// matched against `rooms`, or `None` if the course was not placed.
    ///
    /// The assigned room's type is guaranteed (by construction of the allocator) to appear in
    /// the course's preference list, since a course only ever proposes to types it lists.
    pub fn rank_of(&self, course_index: usize, courses: &[Course], rooms: &[Room]) -> Option<usize> {
        let room_index = self.course_room[course_index]?;
        let room_type = rooms[room_index].room_type;
        courses[course_index]
            .preferences
            .iter()
            .position(|&t| t == room_type)
    }
}

/// Run the type-based deferred-acceptance matcher over `rooms` and `courses` (§4.4).
///
/// Returns `Err` if the input violates one of the entry preconditions of §7 (empty room list,
/// non-positive capacity/cohort size, duplicate names, duplicate preferences). An empty
/// preference list is *not* an error: such a course is simply unplaceable from round one.
pub fn allocate(rooms: &[Room], courses: &[Course]) -> Result<AllocationResult, InputError> {
    validate(rooms, courses)?;

    let mut rooms_by_type: HashMap<RoomType, Vec<usize>> = HashMap::new();
    for (index, room) in rooms.iter().enumerate() {
        rooms_by_type.entry(room.room_type).or_default().push(index);
    }
    for group in rooms_by_type.values_mut() {
        group.sort_by_key(|&index| rooms[index].capacity);
    }

    let mut course_room: Vec<Option<usize>> = vec![None; courses.len()];
    let mut room_course: Vec<Option<usize>> = vec![None; rooms.len()];
    let mut choice_cursor: Vec<usize> = vec![0; courses.len()];
    let mut unplaceable: Vec<usize> = Vec::new();
    let mut trace: Vec<TraceEvent> = Vec::new();

    let mut unmatched: Vec<usize> = (0..courses.len()).collect();
    let mut round = 0u32;

    while !unmatched.is_empty() {
        round += 1;
        debug!(
            "Round {}: {} course(s) proposing",
            round,
            unmatched.len()
        );

        let mut proposals: HashMap<RoomType, Vec<usize>> = HashMap::new();
        for course_index in unmatched.drain(..) {
            if course_room[course_index].is_some() {
                // Already placed in an earlier step of this same round; nothing to do.
                continue;
            }
            if choice_cursor[course_index] >= courses[course_index].preferences.len() {
                debug!(
                    "Course {:?} exhausted its preference list; marking unplaceable",
                    courses[course_index].name
                );
                unplaceable.push(course_index);
                continue;
            }
            let room_type = courses[course_index].preferences[choice_cursor[course_index]];
            choice_cursor[course_index] += 1;
            proposals.entry(room_type).or_default().push(course_index);
        }

        // Iterate proposal groups in the fixed RoomType::ALL order, not hash map order, so that
        // the trace (and hence the whole run) is reproducible across platforms for a fixed seed.
        for &room_type in RoomType::ALL.iter() {
            let proposers = match proposals.remove(&room_type) {
                Some(proposers) => proposers,
                None => continue,
            };
            let empty = Vec::new();
            let rooms_of_type = rooms_by_type.get(&room_type).unwrap_or(&empty);
            let displaced = process_type_proposals(
                rooms_of_type,
                proposers,
                rooms,
                courses,
                &mut course_room,
                &mut room_course,
                &mut trace,
            );
            unmatched.extend(displaced);
        }
    }

    info!(
        "Allocation finished after {} round(s): {} placed, {} unplaceable, {} trace events",
        round,
        course_room.iter().filter(|r| r.is_some()).count(),
        unplaceable.len(),
        trace.len()
    );

    Ok(AllocationResult {
        course_room,
        room_course,
        unplaceable,
        trace,
    })
}

/// Process all proposals for a single room type: form the candidate pool (proposers plus current
/// occupants of this type's rooms), vacate those rooms, then greedily assign each room (ascending
/// capacity order) to its best-fitting remaining candidate. Returns the candidates that could not
/// be (re-)installed, to be requeued for the next round.
fn process_type_proposals(
    rooms_of_type: &[usize],
    proposers: Vec<usize>,
    rooms: &[Room],
    courses: &[Course],
    course_room: &mut [Option<usize>],
    room_course: &mut [Option<usize>],
    trace: &mut Vec<TraceEvent>,
) -> Vec<usize> {
    let mut had_prior_occupant = vec![false; rooms_of_type.len()];
    let mut candidates: Vec<usize> = proposers;

    for (slot, &room_index) in rooms_of_type.iter().enumerate() {
        if let Some(occupant) = room_course[room_index].take() {
            had_prior_occupant[slot] = true;
            course_room[occupant] = None;
            candidates.push(occupant);
        }
    }

    for (slot, &room_index) in rooms_of_type.iter().enumerate() {
        let mut best: Option<usize> = None; // position within `candidates`
        for (pos, &candidate) in candidates.iter().enumerate() {
            let Some(score) = fit(&rooms[room_index], &courses[candidate]) else {
                continue;
            };
            best = Some(match best {
                None => pos,
                Some(best_pos) => {
                    let best_score = fit(&rooms[room_index], &courses[candidates[best_pos]])
                        .expect("previously selected best candidate must still fit");
                    if score < best_score
                        || (score == best_score
                            && courses[candidate].name < courses[candidates[best_pos]].name)
                    {
                        pos
                    } else {
                        best_pos
                    }
                }
            });
        }

        if let Some(pos) = best {
            let winner = candidates.remove(pos);
            room_course[room_index] = Some(winner);
            course_room[winner] = Some(room_index);
            trace.push(if had_prior_occupant[slot] {
                TraceEvent::Displaced {
                    course_index: winner,
                    room_index,
                }
            } else {
                TraceEvent::Assigned {
                    course_index: winner,
                    room_index,
                }
            });
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Course, Room, RoomType};

    // Scenario A — trivial fit.
    #[test]
    fn scenario_a_trivial_fit() {
        let rooms = vec![Room::new("R1", 40, RoomType::Lecture)];
        let courses = vec![Course::new("C1", 30, vec![RoomType::Lecture])];
        let result = allocate(&rooms, &courses).unwrap();
        assert_eq!(result.course_room, vec![Some(0)]);
        assert!(result.unplaceable.is_empty());
        assert_eq!(result.trace.len(), 1);
        assert_eq!(
            result.trace[0],
            TraceEvent::Assigned {
                course_index: 0,
                room_index: 0
            }
        );
    }

    // Scenario B — displacement.
    #[test]
    fn scenario_b_displacement() {
        let rooms = vec![Room::new("R1", 50, RoomType::Lecture)];
        let courses = vec![
            Course::new("C1", 40, vec![RoomType::Lecture]),
            Course::new("C2", 45, vec![RoomType::Lecture]),
        ];
        let result = allocate(&rooms, &courses).unwrap();
        assert_eq!(result.course_room[0], None);
        assert_eq!(result.course_room[1], Some(0));
        assert_eq!(result.unplaceable, vec![0]);
    }

    // Scenario C — secondary choice.
    #[test]
    fn scenario_c_secondary_choice() {
        let rooms = vec![
            Room::new("R1", 50, RoomType::Lecture),
            Room::new("R2", 60, RoomType::Seminar),
        ];
        let courses = vec![
            Course::new("C1", 40, vec![RoomType::Lecture, RoomType::Seminar]),
            Course::new("C2", 45, vec![RoomType::Lecture, RoomType::Seminar]),
        ];
        let result = allocate(&rooms, &courses).unwrap();
        assert_eq!(result.course_room[0], Some(1));
        assert_eq!(result.course_room[1], Some(0));
        assert!(result.unplaceable.is_empty());
    }

    // Scenario D — overspill.
    #[test]
    fn scenario_d_overspill() {
        let rooms = vec![Room::new("R1", 30, RoomType::Lecture)];
        let courses = vec![Course::new("C1", 50, vec![RoomType::Lecture])];
        let result = allocate(&rooms, &courses).unwrap();
        assert_eq!(result.course_room, vec![None]);
        assert_eq!(result.unplaceable, vec![0]);
    }

    #[test]
    fn empty_preferences_are_immediately_unplaceable() {
        let rooms = vec![Room::new("R1", 30, RoomType::Lecture)];
        let courses = vec![Course::new("C1", 10, vec![])];
        let result = allocate(&rooms, &courses).unwrap();
        assert_eq!(result.unplaceable, vec![0]);
        assert!(result.trace.is_empty());
    }

    #[test]
    fn rejects_invalid_input() {
        let rooms: Vec<Room> = vec![];
        let courses = vec![Course::new("C1", 10, vec![RoomType::Lecture])];
        assert_eq!(allocate(&rooms, &courses), Err(InputError::EmptyRoomList));
    }

    #[test]
    fn ties_are_broken_by_course_name() {
        // Two courses with identical fit scores; "Aaa" must win over "Zzz" lexicographically.
        let rooms = vec![Room::new("R1", 50, RoomType::Lecture)];
        let courses = vec![
            Course::new("Zzz", 40, vec![RoomType::Lecture]),
            Course::new("Aaa", 40, vec![RoomType::Lecture]),
        ];
        let result = allocate(&rooms, &courses).unwrap();
        assert_eq!(result.course_room[1], Some(0));
        assert_eq!(result.course_room[0], None);
    }

    #[test]
    fn no_room_of_requested_type_falls_through_to_next_choice() {
        let rooms = vec![Room::new("R1", 50, RoomType::Seminar)];
        let courses = vec![Course::new(
            "C1",
            10,
            vec![RoomType::Lecture, RoomType::Seminar],
        )];
        let result = allocate(&rooms, &courses).unwrap();
        assert_eq!(result.course_room, vec![Some(0)]);
        assert_eq!(result.trace.len(), 1);
    }

    #[test]
    fn determinism_across_repeated_runs() {
        let rooms = vec![
            Room::new("R1", 50, RoomType::Lecture),
            Room::new("R2", 30, RoomType::Lecture),
            Room::new("R3", 60, RoomType::Seminar),
        ];
        let courses: Vec<Course> = (0..12)
            .map(|i| {
                Course::new(
                    format!("C{:02}", i),
                    10 + (i % 5) as u32 * 5,
                    vec![RoomType::Lecture, RoomType::Seminar],
                )
            })
            .collect();
        let first = allocate(&rooms, &courses).unwrap();
        let second = allocate(&rooms, &courses).unwrap();
        assert_eq!(first.course_room, second.course_room);
        assert_eq!(first.trace.len(), second.trace.len());
    }

    #[test]
    fn room_and_course_uniqueness_hold_over_random_instances() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        for seed in 0..20u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let num_rooms = rng.gen_range(1..8);
            let rooms: Vec<Room> = (0..num_rooms)
                .map(|i| {
                    Room::new(
                        format!("R{}", i),
                        rng.gen_range(5..60),
                        RoomType::ALL[rng.gen_range(0..RoomType::ALL.len())],
                    )
                })
                .collect();
            let num_courses = rng.gen_range(1..15);
            let courses: Vec<Course> = (0..num_courses)
                .map(|i| {
                    let mut types = RoomType::ALL.to_vec();
                    use rand::seq::SliceRandom;
                    types.shuffle(&mut rng);
                    let k = rng.gen_range(1..=RoomType::ALL.len());
                    Course::new(format!("C{}", i), rng.gen_range(1..40), types[..k].to_vec())
                })
                .collect();

            let result = allocate(&rooms, &courses).unwrap();

            let mut seen_rooms = std::collections::HashSet::new();
            for room_index in result.course_room.iter().flatten() {
                assert!(
                    seen_rooms.insert(*room_index),
                    "room {} occupied by more than one course (seed {})",
                    room_index,
                    seed
                );
            }
            assert_eq!(
                result.placed_count() + result.unplaceable.len(),
                courses.len(),
                "completion property violated (seed {})",
                seed
            );
            for (course_index, room_index) in result.course_room.iter().enumerate() {
                if let Some(room_index) = room_index {
                    assert!(
                        rooms[*room_index].capacity >= courses[course_index].cohort_size,
                        "capacity feasibility violated (seed {})",
                        seed
                    );
                    assert!(
                        courses[course_index]
                            .preferences
                            .contains(&rooms[*room_index].room_type),
                        "type feasibility violated (seed {})",
                        seed
                    );
                }
            }
        }
    }
}
