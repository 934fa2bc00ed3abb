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

//! Writes the allocator's export record and the statistics records as JSON (§6), and renders an
//! allocation as a human-readable, grouped-by-room report for terminal output.

use crate::allocator::AllocationResult;
use crate::statistics::AllocationStatistics;
use crate::{CarrierError, Course, Room, RoomType};
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, Serialize)]
struct CourseRef {
    name: String,
    size: u32,
}

#[derive(Debug, Clone, Serialize)]
struct RoomRecord {
    name: String,
    capacity: u32,
    #[serde(rename = "type")]
    room_type: RoomType,
    course: Option<CourseRef>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct AllocationExport {
    rooms: Vec<RoomRecord>,
    unallocated_courses: Vec<CourseRef>,
}

/// Serialize the allocation export record of §6 to `writer`.
pub fn write_allocation<W: std::io::Write>(
    writer: W,
    result: &AllocationResult,
    rooms: &[Room],
    courses: &[Course],
) -> Result<(), CarrierError> {
    let room_records = rooms
        .iter()
        .enumerate()
        .map(|(room_index, room)| RoomRecord {
            name: room.name.clone(),
            capacity: room.capacity,
            room_type: room.room_type,
            course: result.room_course[room_index].map(|course_index| CourseRef {
                name: courses[course_index].name.clone(),
                size: courses[course_index].cohort_size,
            }),
        })
        .collect();

    let unallocated_courses = result
        .unplaceable
        .iter()
        .map(|&course_index| CourseRef {
            name: courses[course_index].name.clone(),
            size: courses[course_index].cohort_size,
        })
        .collect();

    let export = AllocationExport {
        rooms: room_records,
        unallocated_courses,
    };
    serde_json::to_writer_pretty(writer, &export)?;
    Ok(())
}

/// Serialize a sequence of per-trial statistics records (§6) to `writer` as a JSON array.
pub fn write_statistics<W: std::io::Write>(
    writer: W,
    records: &[AllocationStatistics],
) -> Result<(), CarrierError> {
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}

/// Render an allocation result as an indented, grouped-by-room-type text report, in the spirit of
/// a course roster printout.
pub fn format_allocation(result: &AllocationResult, rooms: &[Room], courses: &[Course]) -> String {
    let mut output = String::new();
    for &room_type in RoomType::ALL.iter() {
        let rooms_of_type: Vec<usize> = rooms
            .iter()
            .enumerate()
            .filter(|(_, room)| room.room_type == room_type)
            .map(|(index, _)| index)
            .collect();
        if rooms_of_type.is_empty() {
            continue;
        }
        writeln!(output, "===== {} =====", room_type).unwrap();
        for room_index in rooms_of_type {
            let room = &rooms[room_index];
            match result.room_course[room_index] {
                Some(course_index) => {
                    let course = &courses[course_index];
                    writeln!(
                        output,
                        "  {} (cap {}): {} ({} participants)",
                        room.name, room.capacity, course.name, course.cohort_size
                    )
                    .unwrap();
                }
                None => {
                    writeln!(output, "  {} (cap {}): <empty>", room.name, room.capacity).unwrap();
                }
            }
        }
    }

    if !result.unplaceable.is_empty() {
        writeln!(output, "===== unallocated =====").unwrap();
        for &course_index in &result.unplaceable {
            let course = &courses[course_index];
            writeln!(output, "  {} ({} participants)", course.name, course.cohort_size).unwrap();
        }
    }

    output
}
