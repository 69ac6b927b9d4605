use crate::api::attendance::{DaySheetRow, OvertimeReq, SaveAttendanceReq};
use crate::api::contractor::ContractorReq;
use crate::api::project::{CreateProjectReq, UpdateProjectReq};
use crate::ledger::reconcile::AttendanceEntry;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::contractor::Contractor;
use crate::model::project::{Project, ProjectStatus, ProjectSummary};
use crate::model::role::Role;
use crate::models::{LoginReq, RefreshReq, RegisterReq};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CrewTrack API",
        version = "1.0.0",
        description = r#"
## Contractor Attendance Tracking

This API powers a multi-project contractor attendance tracker.

### Key Features
- **Projects**: create projects with unique URL slugs, track status
- **Contractors**: register contractors per project
- **Attendance**: save a day's present/absent sheet per project, record
  overtime windows (overnight windows roll to the next day)
- **Export**: download date-range attendance summaries as CSV

### Security
All `/api/v1` endpoints require **JWT Bearer authentication**; obtain
tokens via `/auth/login`.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::register,
        crate::auth::handlers::refresh_token,

        crate::api::project::list_projects,
        crate::api::project::create_project,
        crate::api::project::get_project,
        crate::api::project::get_project_by_slug,
        crate::api::project::update_project,
        crate::api::project::delete_project,

        crate::api::contractor::list_contractors,
        crate::api::contractor::create_contractor,
        crate::api::contractor::update_contractor,
        crate::api::contractor::delete_contractor,

        crate::api::attendance::day_sheet,
        crate::api::attendance::save_attendance,
        crate::api::attendance::update_overtime,

        crate::api::export::export_attendance
    ),
    components(
        schemas(
            LoginReq,
            RegisterReq,
            RefreshReq,
            Role,
            Project,
            ProjectStatus,
            ProjectSummary,
            CreateProjectReq,
            UpdateProjectReq,
            Contractor,
            ContractorReq,
            AttendanceRecord,
            AttendanceStatus,
            AttendanceEntry,
            SaveAttendanceReq,
            OvertimeReq,
            DaySheetRow
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Authentication APIs"),
        (name = "Project", description = "Project management APIs"),
        (name = "Contractor", description = "Contractor management APIs"),
        (name = "Attendance", description = "Attendance and overtime APIs"),
        (name = "Export", description = "Spreadsheet export APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
