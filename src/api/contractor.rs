use crate::{error::ApiError, store};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct ContractorReq {
    #[schema(example = "Jane Smith")]
    pub name: String,
    #[schema(example = "jane@crew.example", format = "email")]
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// List a project's contractors in name order
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}/contractors",
    params(("id", Path, description = "Project ID")),
    responses(
        (status = 200, description = "Contractor list"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Contractor"
)]
pub async fn list_contractors(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let project_id = path.into_inner();
    let contractors = store::contractors_by_project(pool.get_ref(), project_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "contractors": contractors })))
}

/// Register a contractor under a project
#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/contractors",
    params(("id", Path, description = "Project ID")),
    request_body = ContractorReq,
    responses(
        (status = 201, description = "Contractor added"),
        (status = 400, description = "Contractor name is required"),
        (status = 404, description = "Project not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Contractor"
)]
pub async fn create_contractor(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<ContractorReq>,
) -> actix_web::Result<impl Responder> {
    let project_id = path.into_inner();

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Contractor name is required".into()).into());
    }

    let contractor = store::create_contractor(
        pool.get_ref(),
        project_id,
        name,
        payload.email.as_deref(),
        payload.phone.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Contractor added successfully",
        "contractor": contractor
    })))
}

/// Update a contractor's details
#[utoipa::path(
    put,
    path = "/api/v1/contractors/{id}",
    params(("id", Path, description = "Contractor ID")),
    request_body = ContractorReq,
    responses(
        (status = 200, description = "Contractor updated"),
        (status = 400, description = "Contractor name is required"),
        (status = 404, description = "Contractor not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Contractor"
)]
pub async fn update_contractor(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<ContractorReq>,
) -> actix_web::Result<impl Responder> {
    let contractor_id = path.into_inner();

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Contractor name is required".into()).into());
    }

    let contractor = store::update_contractor(
        pool.get_ref(),
        contractor_id,
        name,
        payload.email.as_deref(),
        payload.phone.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::RecordNotFound("Contractor not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Contractor updated successfully",
        "contractor": contractor
    })))
}

/// Remove a contractor; attendance records cascade away with them
#[utoipa::path(
    delete,
    path = "/api/v1/contractors/{id}",
    params(("id", Path, description = "Contractor ID")),
    responses(
        (status = 200, description = "Contractor deleted"),
        (status = 404, description = "Contractor not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Contractor"
)]
pub async fn delete_contractor(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let contractor_id = path.into_inner();

    if !store::delete_contractor(pool.get_ref(), contractor_id).await? {
        return Err(ApiError::RecordNotFound("Contractor not found".into()).into());
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Contractor deleted successfully"
    })))
}
