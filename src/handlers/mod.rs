pub mod report_handlers;

use actix_web::{web, HttpResponse};

/// Application routes. Shared by `main` and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(report_handlers::form))
        .route("/report", web::post().to(report_handlers::generate))
        .route("/healthz", web::get().to(|| async { HttpResponse::Ok().body("ok") }));
}
