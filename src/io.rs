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

//! Carrier I/O (§4.7): loaders and writers for the two input formats and the two output record
//! shapes. The core stays carrier-agnostic; everything that touches a byte stream lives here.

pub mod courses;
pub mod export;
pub mod rooms;

pub use export::{format_allocation, write_allocation, write_statistics};
