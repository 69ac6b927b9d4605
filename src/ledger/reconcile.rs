use crate::error::{ApiError, ApiResult};
use crate::ledger::overtime::round2;
use crate::model::attendance::AttendanceStatus;
use serde::Deserialize;
use utoipa::ToSchema;

/// One submitted row of a day's attendance sheet, exactly as the client
/// sends it. Incomplete rows are tolerated: the sheet UI posts every line,
/// filled in or not.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub contractor_id: Option<i64>,
    pub status: Option<AttendanceStatus>,
    #[serde(default)]
    pub overtime_hours: Option<f64>,
    #[serde(default)]
    pub work_time: Option<String>,
}

/// A normalized row ready to be written for one (contractor, date).
#[derive(Debug, Clone, PartialEq)]
pub struct DayRecord {
    pub contractor_id: i64,
    pub status: AttendanceStatus,
    pub overtime_hours: f64,
    pub work_time: Option<String>,
}

/// Turns a submitted batch into the canonical record set for one
/// (project, date).
///
/// Policy, in order:
/// - entries missing contractor id or status are dropped, not rejected;
/// - a negative overtime value fails the whole batch with a validation
///   error (nothing is clamped silently);
/// - duplicate contractor ids collapse to the last entry, keeping the
///   first entry's position, so the one-record-per-(contractor, date)
///   invariant holds before the database ever sees the batch.
pub fn normalize_batch(entries: Vec<AttendanceEntry>) -> ApiResult<Vec<DayRecord>> {
    let mut records: Vec<DayRecord> = Vec::with_capacity(entries.len());

    for entry in entries {
        let (Some(contractor_id), Some(status)) = (entry.contractor_id, entry.status) else {
            continue;
        };

        let overtime_hours = entry.overtime_hours.unwrap_or(0.0);
        if overtime_hours < 0.0 || !overtime_hours.is_finite() {
            return Err(ApiError::Validation(format!(
                "Overtime hours must be a non-negative number (contractor {contractor_id})"
            )));
        }

        let record = DayRecord {
            contractor_id,
            status,
            overtime_hours: round2(overtime_hours),
            work_time: entry.work_time,
        };

        match records
            .iter_mut()
            .find(|r| r.contractor_id == contractor_id)
        {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    Ok(records)
}
