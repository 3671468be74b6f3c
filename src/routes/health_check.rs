use actix_web::HttpResponse;

/// Liveness check: 200 with an empty body.
#[tracing::instrument(name = "Health check")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
