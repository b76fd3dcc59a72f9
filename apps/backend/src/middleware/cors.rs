use actix_cors::Cors;
use actix_web::http::header;

const DEV_ORIGINS: &[&str] = &["http://localhost:3000", "http://127.0.0.1:3000"];

/// CORS for the configured origins, or the localhost dev origins when none are set.
pub fn cors_middleware(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
            header::RETRY_AFTER,
        ])
        .max_age(3600);

    if allowed_origins.is_empty() {
        for origin in DEV_ORIGINS {
            cors = cors.allowed_origin(origin);
        }
    } else {
        for origin in allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}
