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

//! Core entity types: rooms, courses and the closed room-type enumeration they are matched over.
//!
//! Rooms and courses are plain, immutable value types. All per-run mutable state (who currently
//! occupies a room, how far a course has advanced through its preference list) is kept by the
//! allocator in tables indexed in parallel to the caller's `&[Room]`/`&[Course]` slices, not on
//! these structs themselves — see [`crate::allocator`].

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One of the ten interchangeable room kinds a course can be matched into.
///
/// Preference is expressed over `RoomType`, never over individual rooms: two rooms of the same
/// type are equally good choices as far as a course's preference list is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomType {
    Lecture,
    Seminar,
    Workshop,
    Laboratory,
    Studio,
    Conference,
    Computer,
    Auditorium,
    Meeting,
    Outdoor,
}

impl RoomType {
    /// All ten room types, in a fixed enumeration order.
    ///
    /// This order is load-bearing: it is used as the tie-break for the size-based strategy
    /// (§4.2) and as the deterministic iteration order over proposal groups in the allocator
    /// (§4.4), so that two runs with identical seeds produce byte-identical traces regardless of
    /// hash map iteration order.
    pub const ALL: [RoomType; 10] = [
        RoomType::Lecture,
        RoomType::Seminar,
        RoomType::Workshop,
        RoomType::Laboratory,
        RoomType::Studio,
        RoomType::Conference,
        RoomType::Computer,
        RoomType::Auditorium,
        RoomType::Meeting,
        RoomType::Outdoor,
    ];

    /// Parse a room type from its carrier-format tag (case-insensitive).
    pub fn parse(tag: &str) -> Option<RoomType> {
        RoomType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(tag))
    }

    /// The tag string used in carrier formats (CSV room type column, JSON preference entries).
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Lecture => "lecture",
            RoomType::Seminar => "seminar",
            RoomType::Workshop => "workshop",
            RoomType::Laboratory => "laboratory",
            RoomType::Studio => "studio",
            RoomType::Conference => "conference",
            RoomType::Computer => "computer",
            RoomType::Auditorium => "auditorium",
            RoomType::Meeting => "meeting",
            RoomType::Outdoor => "outdoor",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Serialized as its lowercase tag string (`"lecture"`, `"seminar"`, ...) rather than the derived
// PascalCase variant name, so the same tag vocabulary is shared by the CSV rooms table, the JSON
// course list and the JSON exports (§6).
impl Serialize for RoomType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RoomType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        RoomType::parse(&tag).ok_or_else(|| D::Error::custom(format!("unknown room type {:?}", tag)))
    }
}

/// A physical room: a stable name, a seating capacity and a single type tag.
///
/// Rooms are immutable once constructed. The allocator tracks which course (if any) currently
/// occupies a room in its own state tables (see [`crate::allocator::AllocationResult`]), keyed by
/// the room's position in the caller's room slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub capacity: u32,
    #[serde(rename = "type")]
    pub room_type: RoomType,
}

impl Room {
    pub fn new(name: impl Into<String>, capacity: u32, room_type: RoomType) -> Room {
        Room {
            name: name.into(),
            capacity,
            room_type,
        }
    }
}

/// An event course: a stable name, a cohort size and an ordered, duplicate-free list of
/// acceptable room types.
///
/// `duration_minutes` and `professor_id` are carried through from the course list input (§6) but
/// are never consulted by the matcher core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub name: String,
    pub cohort_size: u32,
    /// Absent in the course list input means "no preferences yet" rather than a parse error; such
    /// a course is simply unplaceable from round one (§7 EmptyPreferences).
    #[serde(default)]
    pub preferences: Vec<RoomType>,
    /// Not used by the matcher core; carried through from the input for downstream consumers.
    #[serde(default)]
    pub duration_minutes: u32,
    /// Not used by the matcher core; carried through from the input for downstream consumers.
    #[serde(default)]
    pub professor_id: String,
}

impl Course {
    pub fn new(name: impl Into<String>, cohort_size: u32, preferences: Vec<RoomType>) -> Course {
        Course {
            name: name.into(),
            cohort_size,
            preferences,
            duration_minutes: 0,
            professor_id: String::new(),
        }
    }
}
