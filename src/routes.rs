use crate::{
    api::{attendance, contractor, export, project},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter config
    fn build_limiter(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    let login_limiter = build_limiter(config.rate_login_per_min);
    let register_limiter = build_limiter(config.rate_register_per_min);
    let refresh_limiter = build_limiter(config.rate_refresh_per_min);
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(Governor::new(&login_limiter))
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(Governor::new(&register_limiter))
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(Governor::new(&refresh_limiter))
                    .route(web::post().to(handlers::refresh_token)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(Governor::new(&protected_limiter)) // rate limiting
            .service(
                web::scope("/projects")
                    // /projects
                    .service(
                        web::resource("")
                            .route(web::get().to(project::list_projects))
                            .route(web::post().to(project::create_project)),
                    )
                    // /projects/slug/{slug}
                    .service(
                        web::resource("/slug/{slug}")
                            .route(web::get().to(project::get_project_by_slug)),
                    )
                    // /projects/{id}/contractors
                    .service(
                        web::resource("/{id}/contractors")
                            .route(web::get().to(contractor::list_contractors))
                            .route(web::post().to(contractor::create_contractor)),
                    )
                    // /projects/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(project::get_project))
                            .route(web::put().to(project::update_project))
                            .route(web::delete().to(project::delete_project)),
                    ),
            )
            .service(
                web::scope("/contractors")
                    // /contractors/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(contractor::update_contractor))
                            .route(web::delete().to(contractor::delete_contractor)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance/overtime
                    .service(
                        web::resource("/overtime")
                            .route(web::put().to(attendance::update_overtime)),
                    )
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::get().to(attendance::day_sheet))
                            .route(web::post().to(attendance::save_attendance)),
                    ),
            )
            .service(
                web::scope("/export")
                    // /export/attendance
                    .service(
                        web::resource("/attendance")
                            .route(web::get().to(export::export_attendance)),
                    ),
            ),
    );
}
