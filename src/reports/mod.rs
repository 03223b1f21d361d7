//! Reports
//!
//! Turns flat query rows into response records.
//!
//! Decoding is per row and never aborts: a row that cannot be decoded is
//! recorded in [`Report::skipped`] and the remaining rows are still used.
//!
//! - [`professor_hours`]: one record per row
//! - [`room_schedules`]: rows grouped by `room_id`

mod types;

pub use types::{ProfessorHours, RoomSchedule, RoomSlot, ScheduleEntry};

use std::collections::HashMap;

use crate::db::{Row, RowError};

/// A row that failed to decode
#[derive(Debug)]
pub struct SkippedRow {
    /// Position of the row in the query result
    pub index: usize,
    pub error: RowError,
}

/// Decoded records plus the rows that were skipped
#[derive(Debug)]
pub struct Report<T> {
    pub items: Vec<T>,
    pub skipped: Vec<SkippedRow>,
}

impl<T> Report<T> {
    /// Log every skipped row at warn level
    pub fn log_skipped(&self, report: &str) {
        for skipped in &self.skipped {
            tracing::warn!(
                report,
                row = skipped.index,
                error = %skipped.error,
                "Failed to decode row, skipping"
            );
        }
    }
}

/// Decode each row with `decode`, skipping failures
pub fn decode_rows<T>(rows: &[Row], decode: impl Fn(&Row) -> Result<T, RowError>) -> Report<T> {
    let mut items = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        match decode(row) {
            Ok(item) => items.push(item),
            Err(error) => skipped.push(SkippedRow { index, error }),
        }
    }

    Report { items, skipped }
}

/// Build the professor hours report
pub fn professor_hours(rows: &[Row]) -> Report<ProfessorHours> {
    decode_rows(rows, ProfessorHours::from_row)
}

/// Build the room schedules report
pub fn room_schedules(rows: &[Row]) -> Report<RoomSchedule> {
    let Report { items, skipped } = decode_rows(rows, RoomSlot::from_row);

    Report {
        items: group_by_room(items),
        skipped,
    }
}

/// Group slots by `room_id`.
///
/// The first slot seen for a room fixes its `room_number` and
/// `building_name`; later copies are ignored. Rooms come out in the order
/// they were first seen and entries keep their input order.
pub fn group_by_room(slots: impl IntoIterator<Item = RoomSlot>) -> Vec<RoomSchedule> {
    let mut positions: HashMap<i64, usize> = HashMap::new();
    let mut rooms: Vec<RoomSchedule> = Vec::new();

    for slot in slots {
        let pos = *positions.entry(slot.room_id).or_insert_with(|| {
            rooms.push(RoomSchedule {
                room_id: slot.room_id,
                room_number: slot.room_number.clone(),
                building_name: slot.building_name.clone(),
                occupied: Vec::new(),
            });
            rooms.len() - 1
        });

        rooms[pos].occupied.push(slot.entry);
    }

    rooms
}
