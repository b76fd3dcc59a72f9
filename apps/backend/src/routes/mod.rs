use actix_web::web;

use crate::middleware::{Authenticate, RequireRole};

pub mod admin;
pub mod auth;
pub mod checklists;
pub mod dashboard;
pub mod emergencies;
pub mod health;
pub mod me;
pub mod miners;
pub mod modules;
pub mod streaks;

/// Register every route with its authentication and role gates.
///
/// Process-wide middleware (rate limiting, tracing, CORS, timeouts) is
/// applied by the caller around the whole `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .configure(auth::configure_routes);

    cfg.service(
        web::scope("/api/me")
            .wrap(Authenticate)
            .configure(me::configure_routes),
    );

    // Middleware runs last-registered first: authenticate, then check role.
    cfg.service(
        web::scope("/api/miners")
            .wrap(RequireRole::supervisor())
            .wrap(Authenticate)
            .configure(miners::configure_routes),
    );

    cfg.service(
        web::scope("/api/modules")
            .wrap(Authenticate)
            .configure(modules::configure_routes),
    );

    cfg.service(
        web::scope("/api/dashboard")
            .wrap(RequireRole::supervisor())
            .wrap(Authenticate)
            .configure(dashboard::configure_routes),
    );

    cfg.service(
        web::scope("/api/emergencies")
            .wrap(Authenticate)
            .configure(emergencies::configure_routes),
    );

    cfg.service(
        web::scope("/api/checklists")
            .wrap(Authenticate)
            .configure(checklists::configure_routes),
    );

    cfg.service(
        web::scope("/api/admin")
            .wrap(RequireRole::admin())
            .wrap(Authenticate)
            .configure(admin::configure_routes),
    );

    // Streak and completion paths share the bare `/api` prefix, so this
    // scope goes last.
    cfg.service(
        web::scope("/api")
            .wrap(Authenticate)
            .configure(streaks::configure_routes),
    );
}
