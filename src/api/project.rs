use crate::{
    auth::auth::AuthUser,
    error::ApiError,
    model::project::{Project, ProjectStatus, ProjectSummary},
    store,
};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateProjectReq {
    #[schema(example = "Harbour Bridge Site")]
    pub name: String,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateProjectReq {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

/// List all projects with contractor head-counts, newest first
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    responses(
        (status = 200, description = "Project list", body = [ProjectSummary]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Project"
)]
pub async fn list_projects(pool: web::Data<SqlitePool>) -> actix_web::Result<impl Responder> {
    let projects = store::list_projects(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(json!({ "projects": projects })))
}

/// Create a project; the slug is derived from the name and de-duplicated
#[utoipa::path(
    post,
    path = "/api/v1/projects",
    request_body = CreateProjectReq,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 400, description = "Project name is required"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Project"
)]
pub async fn create_project(
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateProjectReq>,
) -> actix_web::Result<impl Responder> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Project name is required".into()).into());
    }

    let project = store::create_project(
        pool.get_ref(),
        name,
        payload.description.as_deref(),
        payload.status.unwrap_or(ProjectStatus::Ongoing),
    )
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Project created successfully",
        "project": project
    })))
}

/// Get one project with its contractors
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}",
    params(("id", Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project with contractors"),
        (status = 404, description = "Project not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Project"
)]
pub async fn get_project(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let project_id = path.into_inner();

    let project = store::project_by_id(pool.get_ref(), project_id)
        .await?
        .ok_or_else(|| ApiError::RecordNotFound("Project not found".into()))?;

    let contractors = store::contractors_by_project(pool.get_ref(), project_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "project": project,
        "contractors": contractors
    })))
}

/// Get one project by its slug
#[utoipa::path(
    get,
    path = "/api/v1/projects/slug/{slug}",
    params(("slug", Path, description = "Project slug")),
    responses(
        (status = 200, description = "Project", body = Project),
        (status = 404, description = "Project not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Project"
)]
pub async fn get_project_by_slug(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let slug = path.into_inner();

    let project = store::project_by_slug(pool.get_ref(), &slug)
        .await?
        .ok_or_else(|| ApiError::RecordNotFound("Project not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({ "project": project })))
}

/// Update a project's name, description and status
#[utoipa::path(
    put,
    path = "/api/v1/projects/{id}",
    params(("id", Path, description = "Project ID")),
    request_body = UpdateProjectReq,
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 400, description = "Project name is required"),
        (status = 404, description = "Project not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Project"
)]
pub async fn update_project(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<UpdateProjectReq>,
) -> actix_web::Result<impl Responder> {
    let project_id = path.into_inner();

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Project name is required".into()).into());
    }

    let project = store::update_project(
        pool.get_ref(),
        project_id,
        name,
        payload.description.as_deref(),
        payload.status.unwrap_or(ProjectStatus::Ongoing),
    )
    .await?
    .ok_or_else(|| ApiError::RecordNotFound("Project not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Project updated successfully",
        "project": project
    })))
}

/// Delete a project; contractors and attendance cascade away with it
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{id}",
    params(("id", Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Project not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Project"
)]
pub async fn delete_project(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let project_id = path.into_inner();

    if !store::delete_project(pool.get_ref(), project_id).await? {
        return Err(ApiError::RecordNotFound("Project not found".into()).into());
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Project deleted successfully"
    })))
}
