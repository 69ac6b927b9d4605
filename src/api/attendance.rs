use crate::{
    ledger::{overtime::OvertimeWindow, reconcile},
    model::{attendance::AttendanceRecord, contractor::Contractor},
    store,
};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use utoipa::ToSchema;

#[derive(Deserialize)]
pub struct DaySheetQuery {
    pub project_id: i64,
    pub date: NaiveDate,
}

#[derive(Serialize, ToSchema)]
pub struct DaySheetRow {
    pub contractor: Contractor,
    pub attendance: Option<AttendanceRecord>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveAttendanceReq {
    pub project_id: i64,
    #[schema(example = "2024-01-15", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub attendance_records: Vec<reconcile::AttendanceEntry>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeReq {
    pub contractor_id: i64,
    pub project_id: i64,
    #[schema(example = "2024-01-15", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "18:00")]
    pub start_time: String,
    #[schema(example = "20:30")]
    pub end_time: String,
}

/// Day sheet: every contractor of the project with its record for the date,
/// or null where none exists
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(
        ("project_id", Query, description = "Project ID"),
        ("date", Query, description = "Calendar date, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Day sheet", body = [DaySheetRow]),
        (status = 400, description = "Missing project_id or date"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn day_sheet(
    pool: web::Data<SqlitePool>,
    query: web::Query<DaySheetQuery>,
) -> actix_web::Result<impl Responder> {
    let contractors = store::contractors_by_project(pool.get_ref(), query.project_id).await?;
    let mut records = store::attendance_for_date(pool.get_ref(), query.project_id, query.date).await?;

    let rows: Vec<DaySheetRow> = contractors
        .into_iter()
        .map(|contractor| {
            let attendance = records
                .iter()
                .position(|r| r.contractor_id == contractor.id)
                .map(|i| records.swap_remove(i));
            DaySheetRow {
                contractor,
                attendance,
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({ "attendance": rows })))
}

/// Save a day's attendance sheet: full replacement of the (project, date)
/// record set with the submitted batch
#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    request_body = SaveAttendanceReq,
    responses(
        (status = 200, description = "Attendance saved successfully"),
        (status = 400, description = "Missing fields or negative overtime"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn save_attendance(
    pool: web::Data<SqlitePool>,
    payload: web::Json<SaveAttendanceReq>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();

    let records = reconcile::normalize_batch(payload.attendance_records)?;
    store::replace_attendance_for_date(pool.get_ref(), payload.project_id, payload.date, &records)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Attendance saved successfully",
        "saved": records.len()
    })))
}

/// Record an overtime window against an existing attendance record; hours
/// are derived from the window, with overnight windows wrapping to the next day
#[utoipa::path(
    put,
    path = "/api/v1/attendance/overtime",
    request_body = OvertimeReq,
    responses(
        (status = 200, description = "Overtime updated successfully"),
        (status = 400, description = "Invalid time of day"),
        (status = 404, description = "Attendance record not found"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn update_overtime(
    pool: web::Data<SqlitePool>,
    payload: web::Json<OvertimeReq>,
) -> actix_web::Result<impl Responder> {
    let window = OvertimeWindow::parse(&payload.start_time, &payload.end_time)?;
    let overtime_hours = window.hours();

    store::patch_overtime(
        pool.get_ref(),
        payload.contractor_id,
        payload.project_id,
        payload.date,
        window.start,
        window.end,
        overtime_hours,
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "overtimeHours": overtime_hours,
        "message": "Overtime updated successfully"
    })))
}
