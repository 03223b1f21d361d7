//! Report records
//!
//! Each record knows how to build itself from one positional [`Row`]; the
//! column order matches the statements in `queries/queries.sql`.

use serde::Serialize;

use crate::db::{Row, RowError};

/// Committed teaching hours for one professor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfessorHours {
    pub professor_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub committed_hours: f64,
}

impl ProfessorHours {
    /// Columns: `professor_id, first_name, last_name, committed_hours`
    pub fn from_row(row: &Row) -> Result<Self, RowError> {
        Ok(Self {
            professor_id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            committed_hours: row.get(3)?,
        })
    }
}

/// One occupied slot in a room
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub subject_code: String,
    pub subject_name: String,
}

/// All occupied slots of one room
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomSchedule {
    pub room_id: i64,
    pub room_number: String,
    pub building_name: String,
    #[serde(rename = "occupied_schedules")]
    pub occupied: Vec<ScheduleEntry>,
}

/// A decoded room-schedules row before grouping
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSlot {
    pub room_id: i64,
    pub room_number: String,
    pub building_name: String,
    pub entry: ScheduleEntry,
}

impl RoomSlot {
    /// Columns: `room_id, room_number, building_name, day_of_week,
    /// start_time, end_time, subject_code, subject_name`
    pub fn from_row(row: &Row) -> Result<Self, RowError> {
        Ok(Self {
            room_id: row.get(0)?,
            room_number: row.get(1)?,
            building_name: row.get(2)?,
            entry: ScheduleEntry {
                day_of_week: row.get(3)?,
                start_time: row.get(4)?,
                end_time: row.get(5)?,
                subject_code: row.get(6)?,
                subject_name: row.get(7)?,
            },
        })
    }
}
