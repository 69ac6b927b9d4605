use crate::ledger::overtime::round2;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::contractor::Contractor;
use crate::model::project::Project;
use chrono::{Duration, NaiveDate, NaiveTime};

/// Header block handed to the report serializer ahead of the summary rows.
#[derive(Debug, Clone)]
pub struct ReportHeader {
    pub project_name: String,
    pub project_description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub contractor_count: usize,
    pub exported_on: NaiveDate,
}

impl ReportHeader {
    pub fn new(
        project: &Project,
        start_date: NaiveDate,
        end_date: NaiveDate,
        contractor_count: usize,
        exported_on: NaiveDate,
    ) -> Self {
        Self {
            project_name: project.name.clone(),
            project_description: project.description.clone().unwrap_or_default(),
            start_date,
            end_date,
            contractor_count,
            exported_on,
        }
    }
}

/// One contractor's summary over an inclusive date range.
///
/// `cells` holds one label per day of the range, in order: the work-time
/// label (or "Present") for a present day, "Absent" for an absent day, and
/// an empty string when no record exists for that day. The distinction
/// between "no record" and "explicit absent" is deliberately kept visible.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub contractor_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub cells: Vec<String>,
    pub present_days: i64,
    pub total_overtime_hours: f64,
    pub overtime_start_time: Option<NaiveTime>,
    pub overtime_end_time: Option<NaiveTime>,
}

impl SummaryRow {
    pub fn total_including_overtime(&self) -> f64 {
        round2(self.present_days as f64 + self.total_overtime_hours)
    }
}

/// Every day of the inclusive range, oldest first. Empty when start > end.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut day = start;
    while day <= end {
        dates.push(day);
        day += Duration::days(1);
    }
    dates
}

/// Summarizes attendance per contractor over `start..=end`.
///
/// Rows come out in the order the contractors are given (the store orders
/// them by name). The surfaced overtime window is the one from the
/// chronologically latest record in range with nonzero overtime hours;
/// ties on the date fall to the highest record id.
pub fn summarize(
    contractors: &[Contractor],
    records: &[AttendanceRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<SummaryRow> {
    let dates = date_range(start, end);

    contractors
        .iter()
        .map(|contractor| {
            let mine: Vec<&AttendanceRecord> = records
                .iter()
                .filter(|r| r.contractor_id == contractor.id && r.date >= start && r.date <= end)
                .collect();

            let cells = dates
                .iter()
                .map(|date| match mine.iter().find(|r| r.date == *date) {
                    Some(r) if r.status == AttendanceStatus::Present => r
                        .work_time
                        .clone()
                        .unwrap_or_else(|| "Present".to_string()),
                    Some(_) => "Absent".to_string(),
                    None => String::new(),
                })
                .collect();

            let present_days = mine
                .iter()
                .filter(|r| r.status == AttendanceStatus::Present)
                .count() as i64;

            let total_overtime_hours =
                round2(mine.iter().map(|r| r.overtime_hours).sum::<f64>());

            let representative = mine
                .iter()
                .filter(|r| r.overtime_hours > 0.0)
                .max_by_key(|r| (r.date, r.id));

            SummaryRow {
                contractor_id: contractor.id,
                name: contractor.name.clone(),
                email: contractor.email.clone(),
                phone: contractor.phone.clone(),
                cells,
                present_days,
                total_overtime_hours,
                overtime_start_time: representative.and_then(|r| r.overtime_start_time),
                overtime_end_time: representative.and_then(|r| r.overtime_end_time),
            }
        })
        .collect()
}
