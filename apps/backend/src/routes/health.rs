use actix_web::{web, HttpResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        service: "MineSafe Backend",
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health));
}
