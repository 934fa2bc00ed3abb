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

//! Error categories for this crate (§7 of the design spec).
//!
//! [`InputError`] covers the "fail fast at entry" class of problems with a rooms/courses list.
//! [`CarrierError`] wraps that together with the I/O- and format-level failures that can occur
//! while loading or writing one of the two carrier formats (§6).

use std::fmt;

/// A rooms/courses list violates one of the allocator's entry preconditions.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    /// A room's capacity is not a positive integer.
    NonPositiveCapacity { room: String, capacity: i64 },
    /// A course's cohort size is not a positive integer.
    NonPositiveCohortSize { course: String, cohort_size: i64 },
    /// Two rooms share the same name.
    DuplicateRoomName(String),
    /// Two courses share the same name.
    DuplicateCourseName(String),
    /// A course's preference list contains the same room type twice.
    DuplicatePreference { course: String, room_type: String },
    /// A room or preference list referenced a tag outside the ten-member enumeration.
    UnknownRoomType { context: String, tag: String },
    /// The room list is empty.
    EmptyRoomList,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::NonPositiveCapacity { room, capacity } => write!(
                f,
                "room {:?} has non-positive capacity {}",
                room, capacity
            ),
            InputError::NonPositiveCohortSize {
                course,
                cohort_size,
            } => write!(
                f,
                "course {:?} has non-positive cohort size {}",
                course, cohort_size
            ),
            InputError::DuplicateRoomName(name) => write!(f, "duplicate room name {:?}", name),
            InputError::DuplicateCourseName(name) => {
                write!(f, "duplicate course name {:?}", name)
            }
            InputError::DuplicatePreference { course, room_type } => write!(
                f,
                "course {:?} lists room type {:?} more than once in its preferences",
                course, room_type
            ),
            InputError::UnknownRoomType { context, tag } => {
                write!(f, "{} references unknown room type {:?}", context, tag)
            }
            InputError::EmptyRoomList => write!(f, "room list is empty"),
        }
    }
}

impl std::error::Error for InputError {}

/// An error from loading or writing one of the carrier formats (§6).
#[derive(Debug)]
pub enum CarrierError {
    /// Failed to read or write the underlying stream.
    Io(std::io::Error),
    /// A CSV row (rooms table) was malformed.
    Csv { line: u64, message: String },
    /// The JSON document (course list, export, statistics) was malformed.
    Json(serde_json::Error),
    /// The loaded entities violated an [`InputError`] precondition.
    Input(InputError),
}

impl fmt::Display for CarrierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarrierError::Io(e) => write!(f, "I/O error: {}", e),
            CarrierError::Csv { line, message } => {
                write!(f, "malformed rooms row at line {}: {}", line, message)
            }
            CarrierError::Json(e) => write!(f, "malformed JSON: {}", e),
            CarrierError::Input(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CarrierError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CarrierError::Io(e) => Some(e),
            CarrierError::Json(e) => Some(e),
            CarrierError::Input(e) => Some(e),
            CarrierError::Csv { .. } => None,
        }
    }
}

impl From<std::io::Error> for CarrierError {
    fn from(e: std::io::Error) -> Self {
        CarrierError::Io(e)
    }
}

impl From<serde_json::Error> for CarrierError {
    fn from(e: serde_json::Error) -> Self {
        CarrierError::Json(e)
    }
}

impl From<InputError> for CarrierError {
    fn from(e: InputError) -> Self {
        CarrierError::Input(e)
    }
}

/// Validate a rooms/courses pair against the preconditions of §7, failing fast on the first
/// violation found (rooms are checked before courses, in list order).
pub fn validate(rooms: &[crate::Room], courses: &[crate::Course]) -> Result<(), InputError> {
    if rooms.is_empty() {
        return Err(InputError::EmptyRoomList);
    }

    let mut seen_rooms = std::collections::HashSet::new();
    for room in rooms {
        if room.capacity == 0 {
            return Err(InputError::NonPositiveCapacity {
                room: room.name.clone(),
                capacity: 0,
            });
        }
        if !seen_rooms.insert(room.name.as_str()) {
            return Err(InputError::DuplicateRoomName(room.name.clone()));
        }
    }

    let mut seen_courses = std::collections::HashSet::new();
    for course in courses {
        if course.cohort_size == 0 {
            return Err(InputError::NonPositiveCohortSize {
                course: course.name.clone(),
                cohort_size: 0,
            });
        }
        if !seen_courses.insert(course.name.as_str()) {
            return Err(InputError::DuplicateCourseName(course.name.clone()));
        }
        let mut seen_prefs = std::collections::HashSet::new();
        for room_type in course.preferences.iter() {
            if !seen_prefs.insert(*room_type) {
                return Err(InputError::DuplicatePreference {
                    course: course.name.clone(),
                    room_type: room_type.as_str().to_owned(),
                });
            }
        }
    }

    Ok(())
}
