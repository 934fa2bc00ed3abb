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

//! Capacity-only fit scoring between a room and a course (§4.1).

use crate::{Course, Room};

/// Score how well `course` fits `room`. Lower is better; `None` means the course does not fit at
/// all (the room's capacity is smaller than the cohort).
///
/// The "+infinity, unfittable" sentinel of the design spec is represented as `None` rather than a
/// floating point infinity, since both operands are non-negative integers and the subtraction is
/// exact: this keeps `fit` a total, panic-free function whose finite values form an exact
/// integer order.
pub fn fit(room: &Room, course: &Course) -> Option<u32> {
    room.capacity.checked_sub(course.cohort_size)
}
