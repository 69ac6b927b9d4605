use crate::{
    auth::{
        jwt::{generate_access_token, generate_refresh_token, verify_token},
        password::{hash_password, verify_password},
    },
    config::Config,
    model::{role::Role, user::User},
    models::{LoginReq, RefreshReq, RegisterReq, TokenType},
};
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::error;

/// Login with email and password, returns access + refresh tokens
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Login successful"),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn login(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    payload: web::Json<LoginReq>,
) -> impl Responder {
    let email = payload.email.trim().to_lowercase();

    if email.is_empty() || payload.password.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "error": "Email and password are required"
        }));
    }

    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, password, role, created_at FROM users WHERE email = ?",
    )
    .bind(&email)
    .fetch_optional(pool.get_ref())
    .await;

    let user = match user {
        Ok(Some(u)) => u,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(json!({
                "error": "Invalid credentials"
            }));
        }
        Err(e) => {
            error!(error = %e, "Failed to fetch user for login");
            return HttpResponse::InternalServerError().json(json!({
                "error": "Internal server error"
            }));
        }
    };

    if verify_password(&payload.password, &user.password).is_err() {
        return HttpResponse::Unauthorized().json(json!({
            "error": "Invalid credentials"
        }));
    }

    let access_token = generate_access_token(
        user.id,
        user.email.clone(),
        user.role,
        &config.jwt_secret,
        config.access_token_ttl,
    );
    let (refresh_token, _) = generate_refresh_token(
        user.id,
        user.email.clone(),
        user.role,
        &config.jwt_secret,
        config.refresh_token_ttl,
    );

    HttpResponse::Ok().json(json!({
        "message": "Login successful",
        "access_token": access_token,
        "refresh_token": refresh_token,
        "user": {
            "id": user.id,
            "email": user.email,
            "role": user.role,
        }
    }))
}

/// Register a new user (admin or manager)
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "User registered successfully"),
        (status = 400, description = "Missing email or password"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn register(pool: web::Data<SqlitePool>, payload: web::Json<RegisterReq>) -> impl Responder {
    let email = payload.email.trim().to_lowercase();
    let role = payload.role.unwrap_or(Role::Manager);

    if email.is_empty() || payload.password.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "error": "Email and password must not be empty"
        }));
    }

    let hashed = hash_password(&payload.password);

    let result = sqlx::query("INSERT INTO users (email, password, role) VALUES (?, ?, ?)")
        .bind(&email)
        .bind(&hashed)
        .bind(role)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(_) => HttpResponse::Created().json(json!({
            "message": "User registered successfully"
        })),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) {
                    return HttpResponse::Conflict().json(json!({
                        "error": "Email already registered"
                    }));
                }
            }

            error!(error = %e, "Failed to register user");
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to register user"
            }))
        }
    }
}

/// Exchange a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshReq,
    responses(
        (status = 200, description = "New access token issued"),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "Auth"
)]
pub async fn refresh_token(
    config: web::Data<Config>,
    payload: web::Json<RefreshReq>,
) -> impl Responder {
    let claims = match verify_token(&payload.refresh_token, &config.jwt_secret) {
        Ok(c) => c,
        Err(e) => {
            return HttpResponse::Unauthorized().json(json!({
                "error": "Invalid or expired refresh token",
                "details": e
            }));
        }
    };

    if claims.token_type != TokenType::Refresh {
        return HttpResponse::Unauthorized().json(json!({
            "error": "Refresh token required"
        }));
    }

    let access_token = generate_access_token(
        claims.user_id,
        claims.sub,
        claims.role,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    HttpResponse::Ok().json(json!({
        "access_token": access_token
    }))
}
