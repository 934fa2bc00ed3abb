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

//! Reads the semicolon-separated rooms table (§6): one room per data row, no header,
//! `name;capacity;type`.

use crate::{CarrierError, Room, RoomType};
use log::warn;

/// Parse the rooms table from `reader`.
///
/// The first malformed row (bad capacity, unknown type tag, wrong column count) is surfaced as
/// `CarrierError::Csv` carrying its 1-indexed line number; no rows after it are read.
pub fn read<R: std::io::Read>(reader: R) -> Result<Vec<Room>, CarrierError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rooms = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let line = index as u64 + 1;
        let record = record.map_err(|err| CarrierError::Csv {
            line,
            message: err.to_string(),
        })?;

        if record.len() != 3 {
            warn!("Rooms row {} has {} columns, expected 3", line, record.len());
            return Err(CarrierError::Csv {
                line,
                message: format!("expected 3 columns, found {}", record.len()),
            });
        }
        let name = record[0].to_string();
        let capacity: u32 = record[1].parse().map_err(|_| {
            warn!("Rooms row {} has non-numeric capacity {:?}", line, &record[1]);
            CarrierError::Csv {
                line,
                message: format!("invalid capacity {:?}", &record[1]),
            }
        })?;
        if capacity == 0 {
            return Err(CarrierError::Csv {
                line,
                message: format!("room {:?} has non-positive capacity", name),
            });
        }
        let room_type = RoomType::parse(&record[2]).ok_or_else(|| {
            warn!("Rooms row {} has unknown room type {:?}", line, &record[2]);
            CarrierError::Csv {
                line,
                message: format!("unknown room type {:?}", &record[2]),
            }
        })?;

        rooms.push(Room::new(name, capacity, room_type));
    }

    Ok(rooms)
}
