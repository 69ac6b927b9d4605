mod common;

use actix_web::{App, http::StatusCode, test, web::Data};
use crewtrack::model::role::Role;
use crewtrack::{auth::jwt, db, routes};
use serde_json::{Value, json};

macro_rules! spawn_app {
    ($pool:expr, $config:expr) => {
        test::init_service(
            App::new()
                .app_data(Data::new($pool.clone()))
                .app_data(Data::new($config.clone()))
                .configure(|cfg| routes::configure(cfg, $config.clone())),
        )
        .await
    };
}

fn bearer(config: &crewtrack::config::Config) -> (&'static str, String) {
    let token = jwt::generate_access_token(
        1,
        "admin@example.com".to_string(),
        Role::Admin,
        &config.jwt_secret,
        config.access_token_ttl,
    );
    ("Authorization", format!("Bearer {token}"))
}

fn peer() -> std::net::SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

#[actix_web::test]
async fn protected_routes_require_a_token() {
    let pool = common::memory_pool().await;
    let config = common::test_config();
    let app = spawn_app!(pool, config);

    let req = test::TestRequest::get()
        .uri("/api/v1/projects")
        .peer_addr(peer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn login_issues_tokens_and_rejects_bad_credentials() {
    let pool = common::memory_pool().await;
    let config = common::test_config();
    db::seed_admin(&pool, "admin@example.com", "admin123")
        .await
        .unwrap();
    let app = spawn_app!(pool, config);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .peer_addr(peer())
        .set_json(json!({ "email": "admin@example.com", "password": "admin123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["access_token"].as_str().is_some());
    assert!(body["refresh_token"].as_str().is_some());
    assert_eq!(body["user"]["role"], "admin");

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .peer_addr(peer())
        .set_json(json!({ "email": "admin@example.com", "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn project_creation_generates_a_slug_and_rejects_blank_names() {
    let pool = common::memory_pool().await;
    let config = common::test_config();
    let app = spawn_app!(pool, config);
    let auth = bearer(&config);

    let req = test::TestRequest::post()
        .uri("/api/v1/projects")
        .peer_addr(peer())
        .insert_header(auth.clone())
        .set_json(json!({ "name": "Harbour Bridge Site", "description": "East wing" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["project"]["slug"], "harbour-bridge-site");
    assert_eq!(body["project"]["status"], "ongoing");

    let req = test::TestRequest::post()
        .uri("/api/v1/projects")
        .peer_addr(peer())
        .insert_header(auth)
        .set_json(json!({ "name": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn project_deletion_is_admin_only() {
    let pool = common::memory_pool().await;
    let config = common::test_config();
    let app = spawn_app!(pool, config);
    let admin = bearer(&config);

    let req = test::TestRequest::post()
        .uri("/api/v1/projects")
        .peer_addr(peer())
        .insert_header(admin.clone())
        .set_json(json!({ "name": "Doomed Site" }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let project_id = body["project"]["id"].as_i64().unwrap();

    let manager_token = jwt::generate_access_token(
        2,
        "manager@example.com".to_string(),
        Role::Manager,
        &config.jwt_secret,
        config.access_token_ttl,
    );
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/projects/{project_id}"))
        .peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {manager_token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/projects/{project_id}"))
        .peer_addr(peer())
        .insert_header(admin.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/projects/{project_id}"))
        .peer_addr(peer())
        .insert_header(admin)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn attendance_round_trip_through_the_api() {
    let pool = common::memory_pool().await;
    let config = common::test_config();
    let app = spawn_app!(pool, config);
    let auth = bearer(&config);

    // project + two contractors
    let req = test::TestRequest::post()
        .uri("/api/v1/projects")
        .peer_addr(peer())
        .insert_header(auth.clone())
        .set_json(json!({ "name": "Site A" }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let project_id = body["project"]["id"].as_i64().unwrap();

    let mut contractor_ids = Vec::new();
    for name in ["Alice", "Bob"] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/projects/{project_id}/contractors"))
            .peer_addr(peer())
            .insert_header(auth.clone())
            .set_json(json!({ "name": name }))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        contractor_ids.push(body["contractor"]["id"].as_i64().unwrap());
    }

    // save the day sheet; the malformed third row must be dropped silently
    let req = test::TestRequest::post()
        .uri("/api/v1/attendance")
        .peer_addr(peer())
        .insert_header(auth.clone())
        .set_json(json!({
            "projectId": project_id,
            "date": "2024-01-15",
            "attendanceRecords": [
                { "contractorId": contractor_ids[0], "status": "present", "overtimeHours": 1.5 },
                { "contractorId": contractor_ids[1], "status": "absent" },
                { "status": "present" }
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["saved"], 2);

    // day sheet pairs every contractor with record-or-null
    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/attendance?project_id={project_id}&date=2024-01-15"
        ))
        .peer_addr(peer())
        .insert_header(auth.clone())
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let rows = body["attendance"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["contractor"]["name"], "Alice");
    assert_eq!(rows[0]["attendance"]["status"], "present");
    assert_eq!(rows[1]["attendance"]["status"], "absent");

    // a date with no records still lists the crew, with null attendance
    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/attendance?project_id={project_id}&date=2024-01-16"
        ))
        .peer_addr(peer())
        .insert_header(auth)
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let rows = body["attendance"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows[0]["attendance"].is_null());
}

#[actix_web::test]
async fn overtime_patch_requires_an_existing_record() {
    let pool = common::memory_pool().await;
    let config = common::test_config();
    let app = spawn_app!(pool, config);
    let auth = bearer(&config);

    let req = test::TestRequest::post()
        .uri("/api/v1/projects")
        .peer_addr(peer())
        .insert_header(auth.clone())
        .set_json(json!({ "name": "Site B" }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let project_id = body["project"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/projects/{project_id}/contractors"))
        .peer_addr(peer())
        .insert_header(auth.clone())
        .set_json(json!({ "name": "Alice" }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let contractor_id = body["contractor"]["id"].as_i64().unwrap();

    let overtime = json!({
        "contractorId": contractor_id,
        "projectId": project_id,
        "date": "2024-01-15",
        "startTime": "23:00",
        "endTime": "01:00"
    });

    // no attendance marked yet: 404
    let req = test::TestRequest::put()
        .uri("/api/v1/attendance/overtime")
        .peer_addr(peer())
        .insert_header(auth.clone())
        .set_json(&overtime)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // mark attendance, then the patch lands and reports rolled-over hours
    let req = test::TestRequest::post()
        .uri("/api/v1/attendance")
        .peer_addr(peer())
        .insert_header(auth.clone())
        .set_json(json!({
            "projectId": project_id,
            "date": "2024-01-15",
            "attendanceRecords": [
                { "contractorId": contractor_id, "status": "present" }
            ]
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri("/api/v1/attendance/overtime")
        .peer_addr(peer())
        .insert_header(auth.clone())
        .set_json(&overtime)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["overtimeHours"], 2.0);

    // malformed time strings are a 400, not silent negative hours
    let req = test::TestRequest::put()
        .uri("/api/v1/attendance/overtime")
        .peer_addr(peer())
        .insert_header(auth)
        .set_json(json!({
            "contractorId": contractor_id,
            "projectId": project_id,
            "date": "2024-01-15",
            "startTime": "25:61",
            "endTime": "01:00"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn export_returns_a_csv_attachment() {
    let pool = common::memory_pool().await;
    let config = common::test_config();
    let app = spawn_app!(pool, config);
    let auth = bearer(&config);

    let req = test::TestRequest::post()
        .uri("/api/v1/projects")
        .peer_addr(peer())
        .insert_header(auth.clone())
        .set_json(json!({ "name": "Site C" }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let project_id = body["project"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/projects/{project_id}/contractors"))
        .peer_addr(peer())
        .insert_header(auth.clone())
        .set_json(json!({ "name": "Alice" }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let contractor_id = body["contractor"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance")
        .peer_addr(peer())
        .insert_header(auth.clone())
        .set_json(json!({
            "projectId": project_id,
            "date": "2024-01-01",
            "attendanceRecords": [
                { "contractorId": contractor_id, "status": "present", "overtimeHours": 1.0 }
            ]
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/export/attendance?project_id={project_id}&start_date=2024-01-01&end_date=2024-01-03"
        ))
        .peer_addr(peer())
        .insert_header(auth.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "text/csv; charset=utf-8"
    );
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("Site_C_attendance_2024-01-01_to_2024-01-03.csv"));

    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("Project Name,Site C"));
    assert!(text.contains("Alice"));
    assert!(text.contains("Total Overtime Hours"));

    // unknown project: 404
    let req = test::TestRequest::get()
        .uri("/api/v1/export/attendance?project_id=999&start_date=2024-01-01&end_date=2024-01-03")
        .peer_addr(peer())
        .insert_header(auth)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}
