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

//! A type-based, many-to-one deferred-acceptance matcher for assigning courses to rooms by
//! capacity and room type, plus the preference-generation strategies and statistics collector
//! used to evaluate it over randomized instances.

mod allocator;
mod collector;
mod error;
mod fit;
pub mod io;
mod simulator;
mod statistics;
mod strategy;
mod types;

pub use allocator::{allocate, AllocationResult, TraceEvent};
pub use collector::{run as run_collector, CollectorConfig, StrategyAverages};
pub use error::{validate, CarrierError, InputError};
pub use fit::fit;
pub use simulator::{generate_courses, SimulationParams};
pub use statistics::AllocationStatistics;
pub use strategy::{RoomTypeStats, Strategy, DEFAULT_SLACK, DEFAULT_TEMPERATURE};
pub use types::{Course, Room, RoomType};
