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

//! Reads and writes the JSON course list (§6): a plain array of [`Course`] objects, with
//! `preferences` defaulting to an empty list when the key is absent.

use crate::{CarrierError, Course};

pub fn read<R: std::io::Read>(reader: R) -> Result<Vec<Course>, CarrierError> {
    let courses: Vec<Course> = serde_json::from_reader(reader)?;
    Ok(courses)
}

pub fn write<W: std::io::Write>(writer: W, courses: &[Course]) -> Result<(), CarrierError> {
    serde_json::to_writer_pretty(writer, courses)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RoomType;

    #[test]
    fn reads_a_course_with_explicit_preferences() {
        let data = br#"[
            {"name": "CS101", "cohortSize": 25, "preferences": ["lecture", "seminar"]}
        ]"#;
        let courses = read(&data[..]).unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].name, "CS101");
        assert_eq!(courses[0].cohort_size, 25);
        assert_eq!(
            courses[0].preferences,
            vec![RoomType::Lecture, RoomType::Seminar]
        );
    }

    #[test]
    fn defaults_missing_preferences_to_empty() {
        let data = br#"[{"name": "CS101", "cohortSize": 25}]"#;
        let courses = read(&data[..]).unwrap();
        assert!(courses[0].preferences.is_empty());
    }

    #[test]
    fn carries_duration_and_professor_through() {
        let data = br#"[
            {"name": "CS101", "cohortSize": 25, "durationMinutes": 90, "professorId": "p-42"}
        ]"#;
        let courses = read(&data[..]).unwrap();
        assert_eq!(courses[0].duration_minutes, 90);
        assert_eq!(courses[0].professor_id, "p-42");
    }

    #[test]
    fn round_trips_through_write_and_read() {
        let original = vec![Course::new("CS101", 25, vec![RoomType::Lecture])];
        let mut buffer = Vec::new();
        write(&mut buffer, &original).unwrap();
        let reread = read(&buffer[..]).unwrap();
        assert_eq!(reread[0].name, original[0].name);
        assert_eq!(reread[0].preferences, original[0].preferences);
    }

    #[test]
    fn rejects_malformed_json() {
        let data = b"not json";
        assert!(matches!(read(&data[..]), Err(CarrierError::Json(_))));
    }
}
