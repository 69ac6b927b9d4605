use crate::{
    error::ApiError,
    ledger::aggregate::{self, ReportHeader, SummaryRow},
    store,
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;

#[derive(Deserialize)]
pub struct ExportQuery {
    pub project_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Date-range attendance export as a CSV download: project header block,
/// then one row per contractor with per-day cells and totals
#[utoipa::path(
    get,
    path = "/api/v1/export/attendance",
    params(
        ("project_id", Query, description = "Project ID"),
        ("start_date", Query, description = "Range start, YYYY-MM-DD, inclusive"),
        ("end_date", Query, description = "Range end, YYYY-MM-DD, inclusive")
    ),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv"),
        (status = 400, description = "Missing or inverted date range"),
        (status = 404, description = "Project not found"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Export"
)]
pub async fn export_attendance(
    pool: web::Data<SqlitePool>,
    query: web::Query<ExportQuery>,
) -> actix_web::Result<impl Responder> {
    if query.start_date > query.end_date {
        return Err(
            ApiError::Validation("Start date must not be after end date".into()).into(),
        );
    }

    let project = store::project_by_id(pool.get_ref(), query.project_id)
        .await?
        .ok_or_else(|| ApiError::RecordNotFound("Project not found".into()))?;

    let contractors = store::contractors_by_project(pool.get_ref(), query.project_id).await?;
    let records = store::attendance_in_range(
        pool.get_ref(),
        query.project_id,
        query.start_date,
        query.end_date,
    )
    .await?;

    let rows = aggregate::summarize(&contractors, &records, query.start_date, query.end_date);
    let header = ReportHeader::new(
        &project,
        query.start_date,
        query.end_date,
        contractors.len(),
        Utc::now().date_naive(),
    );

    let body = write_csv(&header, &rows).map_err(ErrorInternalServerError)?;

    let filename = format!(
        "{}_attendance_{}_to_{}.csv",
        sanitize_filename(&project.name),
        query.start_date,
        query.end_date
    );

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(body))
}

/// The serialization sink: summary rows in, CSV bytes out.
fn write_csv(header: &ReportHeader, rows: &[SummaryRow]) -> Result<Vec<u8>, csv::Error> {
    let mut buf = Vec::new();
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(&mut buf);

    wtr.write_record(["Project Name", &header.project_name])?;
    wtr.write_record(["Project Description", &header.project_description])?;
    wtr.write_record([
        "Export Date Range",
        &format!("{} to {}", header.start_date, header.end_date),
    ])?;
    wtr.write_record(["Total Contractors", &header.contractor_count.to_string()])?;
    wtr.write_record(["Export Date", &header.exported_on.to_string()])?;
    wtr.write_record([""])?;

    let dates = aggregate::date_range(header.start_date, header.end_date);
    let mut columns = vec![
        "Contractor Name".to_string(),
        "Email".to_string(),
        "Phone".to_string(),
    ];
    columns.extend(dates.iter().map(|d| d.to_string()));
    columns.extend([
        "Total Present Days".to_string(),
        "Total Overtime Hours".to_string(),
        "Total Including Overtime".to_string(),
        "Overtime Start".to_string(),
        "Overtime End".to_string(),
    ]);
    wtr.write_record(&columns)?;

    for row in rows {
        let mut fields = vec![
            row.name.clone(),
            row.email.clone().unwrap_or_default(),
            row.phone.clone().unwrap_or_default(),
        ];
        fields.extend(row.cells.iter().cloned());
        fields.push(row.present_days.to_string());
        fields.push(format!("{:.2}", row.total_overtime_hours));
        fields.push(format!("{:.2}", row.total_including_overtime()));
        fields.push(
            row.overtime_start_time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
        );
        fields.push(
            row.overtime_end_time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
        );
        wtr.write_record(&fields)?;
    }

    wtr.flush()?;
    drop(wtr);
    Ok(buf)
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
