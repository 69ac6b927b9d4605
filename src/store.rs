//! Storage collaborator over a pooled SQLite handle.
//!
//! Everything the ledger needs from persistence lives here behind a narrow
//! set of functions, so the handlers and tests never assemble SQL for the
//! attendance invariants themselves. Replacement of a day's records runs in
//! one transaction: two concurrent saves for the same (project, date) are
//! serialized by the database writer lock and a batch either lands whole or
//! not at all.

use chrono::{NaiveDate, NaiveTime};
use sqlx::SqlitePool;
use sqlx::error::ErrorKind;

use crate::error::{ApiError, ApiResult};
use crate::ledger::reconcile::DayRecord;
use crate::model::attendance::AttendanceRecord;
use crate::model::contractor::Contractor;
use crate::model::project::{Project, ProjectStatus, ProjectSummary};
use crate::utils::slug::generate_slug;

const PROJECT_COLS: &str = "id, name, slug, description, status, created_at, updated_at";
const CONTRACTOR_COLS: &str = "id, project_id, name, email, phone, created_at";
const ATTENDANCE_COLS: &str = "id, contractor_id, project_id, date, status, overtime_hours, \
     work_time, overtime_start_time, overtime_end_time, created_at, updated_at";

// ---------- projects ----------

pub async fn list_projects(pool: &SqlitePool) -> ApiResult<Vec<ProjectSummary>> {
    let rows = sqlx::query_as::<_, ProjectSummary>(
        "SELECT p.*, COUNT(c.id) AS contractor_count
         FROM projects p
         LEFT JOIN contractors c ON c.project_id = p.id
         GROUP BY p.id
         ORDER BY p.created_at DESC, p.id DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn project_by_id(pool: &SqlitePool, project_id: i64) -> ApiResult<Option<Project>> {
    let project = sqlx::query_as::<_, Project>(&format!(
        "SELECT {PROJECT_COLS} FROM projects WHERE id = ?"
    ))
    .bind(project_id)
    .fetch_optional(pool)
    .await?;
    Ok(project)
}

pub async fn project_by_slug(pool: &SqlitePool, slug: &str) -> ApiResult<Option<Project>> {
    let project = sqlx::query_as::<_, Project>(&format!(
        "SELECT {PROJECT_COLS} FROM projects WHERE slug = ?"
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    Ok(project)
}

/// Slug for a new project: derived from the name, suffixed -1, -2, ... until
/// it no longer collides.
pub async fn unique_slug(pool: &SqlitePool, name: &str) -> ApiResult<String> {
    let base = match generate_slug(name) {
        s if s.is_empty() => "project".to_string(),
        s => s,
    };

    let mut slug = base.clone();
    let mut counter = 1;
    loop {
        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM projects WHERE slug = ? LIMIT 1)")
                .bind(&slug)
                .fetch_one(pool)
                .await?;
        if !taken {
            return Ok(slug);
        }
        slug = format!("{base}-{counter}");
        counter += 1;
    }
}

pub async fn create_project(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
    status: ProjectStatus,
) -> ApiResult<Project> {
    let slug = unique_slug(pool, name).await?;

    let project = sqlx::query_as::<_, Project>(&format!(
        "INSERT INTO projects (name, slug, description, status)
         VALUES (?, ?, ?, ?)
         RETURNING {PROJECT_COLS}"
    ))
    .bind(name)
    .bind(&slug)
    .bind(description)
    .bind(status)
    .fetch_one(pool)
    .await?;

    Ok(project)
}

/// Updates name/description/status in place; the slug is stable after
/// creation so bookmarked attendance URLs keep working.
pub async fn update_project(
    pool: &SqlitePool,
    project_id: i64,
    name: &str,
    description: Option<&str>,
    status: ProjectStatus,
) -> ApiResult<Option<Project>> {
    let project = sqlx::query_as::<_, Project>(&format!(
        "UPDATE projects
         SET name = ?, description = ?, status = ?, updated_at = CURRENT_TIMESTAMP
         WHERE id = ?
         RETURNING {PROJECT_COLS}"
    ))
    .bind(name)
    .bind(description)
    .bind(status)
    .bind(project_id)
    .fetch_optional(pool)
    .await?;

    Ok(project)
}

pub async fn delete_project(pool: &SqlitePool, project_id: i64) -> ApiResult<bool> {
    let result = sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(project_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ---------- contractors ----------

pub async fn contractors_by_project(
    pool: &SqlitePool,
    project_id: i64,
) -> ApiResult<Vec<Contractor>> {
    let rows = sqlx::query_as::<_, Contractor>(&format!(
        "SELECT {CONTRACTOR_COLS} FROM contractors WHERE project_id = ? ORDER BY name"
    ))
    .bind(project_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create_contractor(
    pool: &SqlitePool,
    project_id: i64,
    name: &str,
    email: Option<&str>,
    phone: Option<&str>,
) -> ApiResult<Contractor> {
    sqlx::query_as::<_, Contractor>(&format!(
        "INSERT INTO contractors (project_id, name, email, phone)
         VALUES (?, ?, ?, ?)
         RETURNING {CONTRACTOR_COLS}"
    ))
    .bind(project_id)
    .bind(name)
    .bind(email)
    .bind(phone)
    .fetch_one(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if matches!(db.kind(), ErrorKind::ForeignKeyViolation) => {
            ApiError::RecordNotFound("Project not found".into())
        }
        _ => ApiError::Storage(e),
    })
}

pub async fn update_contractor(
    pool: &SqlitePool,
    contractor_id: i64,
    name: &str,
    email: Option<&str>,
    phone: Option<&str>,
) -> ApiResult<Option<Contractor>> {
    let contractor = sqlx::query_as::<_, Contractor>(&format!(
        "UPDATE contractors SET name = ?, email = ?, phone = ?
         WHERE id = ?
         RETURNING {CONTRACTOR_COLS}"
    ))
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(contractor_id)
    .fetch_optional(pool)
    .await?;

    Ok(contractor)
}

pub async fn delete_contractor(pool: &SqlitePool, contractor_id: i64) -> ApiResult<bool> {
    let result = sqlx::query("DELETE FROM contractors WHERE id = ?")
        .bind(contractor_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ---------- attendance ----------

pub async fn attendance_for_date(
    pool: &SqlitePool,
    project_id: i64,
    date: NaiveDate,
) -> ApiResult<Vec<AttendanceRecord>> {
    let rows = sqlx::query_as::<_, AttendanceRecord>(&format!(
        "SELECT {ATTENDANCE_COLS} FROM attendance WHERE project_id = ? AND date = ?"
    ))
    .bind(project_id)
    .bind(date)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn attendance_in_range(
    pool: &SqlitePool,
    project_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> ApiResult<Vec<AttendanceRecord>> {
    let rows = sqlx::query_as::<_, AttendanceRecord>(&format!(
        "SELECT {ATTENDANCE_COLS} FROM attendance
         WHERE project_id = ? AND date BETWEEN ? AND ?
         ORDER BY date, id"
    ))
    .bind(project_id)
    .bind(start_date)
    .bind(end_date)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Replaces the whole record set for one (project, date) with the given
/// batch. Delete and inserts share one transaction; on any failure the
/// previous day's records survive untouched.
pub async fn replace_attendance_for_date(
    pool: &SqlitePool,
    project_id: i64,
    date: NaiveDate,
    records: &[DayRecord],
) -> ApiResult<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM attendance WHERE project_id = ? AND date = ?")
        .bind(project_id)
        .bind(date)
        .execute(&mut *tx)
        .await?;

    for record in records {
        sqlx::query(
            "INSERT INTO attendance
             (contractor_id, project_id, date, status, overtime_hours, work_time)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(record.contractor_id)
        .bind(project_id)
        .bind(date)
        .bind(record.status)
        .bind(record.overtime_hours)
        .bind(&record.work_time)
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if matches!(db.kind(), ErrorKind::ForeignKeyViolation) => {
                ApiError::Validation(format!(
                    "Unknown contractor or project in batch (contractor {})",
                    record.contractor_id
                ))
            }
            _ => ApiError::Storage(e),
        })?;
    }

    tx.commit().await?;
    Ok(())
}

/// Attaches an overtime window and its derived hours to an existing record.
/// Overtime cannot be recorded before attendance is marked: zero matched
/// rows means `RecordNotFound` and storage is left as it was.
pub async fn patch_overtime(
    pool: &SqlitePool,
    contractor_id: i64,
    project_id: i64,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    overtime_hours: f64,
) -> ApiResult<()> {
    let result = sqlx::query(
        "UPDATE attendance
         SET overtime_start_time = ?, overtime_end_time = ?, overtime_hours = ?,
             updated_at = CURRENT_TIMESTAMP
         WHERE contractor_id = ? AND project_id = ? AND date = ?",
    )
    .bind(start_time)
    .bind(end_time)
    .bind(overtime_hours)
    .bind(contractor_id)
    .bind(project_id)
    .bind(date)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::RecordNotFound(
            "Attendance record not found".into(),
        ));
    }

    Ok(())
}
