use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// One contractor's attendance for one calendar day.
///
/// At most one row may exist per (contractor_id, date); the reconciler and
/// the schema's unique key both enforce it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    pub id: i64,
    pub contractor_id: i64,
    pub project_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub overtime_hours: f64,
    pub work_time: Option<String>,
    pub overtime_start_time: Option<NaiveTime>,
    pub overtime_end_time: Option<NaiveTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
