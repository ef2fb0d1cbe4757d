use crate::configuration::Settings;
use crate::health::{HealthChecker, StatusCache};
use crate::views::{Pages, StatusReport};
use actix_web::{error, get, http::header::ContentType, web, HttpResponse, Responder, Result};

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

fn render_failed(err: tera::Error) -> error::Error {
    tracing::error!("Failed to render page: {:?}", err);
    error::ErrorInternalServerError("Failed to render page")
}

#[tracing::instrument(name = "Status page.", skip_all)]
#[get("/")]
pub async fn index_handler(
    checker: web::Data<HealthChecker>,
    status_cache: web::Data<StatusCache>,
    pages: web::Data<Pages>,
    settings: web::Data<Settings>,
) -> Result<HttpResponse> {
    let snapshot = status_cache.refresh(&checker).await;
    let body = pages
        .index(&settings.app_name, &snapshot)
        .map_err(render_failed)?;

    Ok(html(body))
}

#[tracing::instrument(name = "Status report.", skip_all)]
#[get("/status")]
pub async fn status_handler(
    checker: web::Data<HealthChecker>,
    status_cache: web::Data<StatusCache>,
    settings: web::Data<Settings>,
) -> impl Responder {
    let snapshot = status_cache.refresh(&checker).await;

    web::Json(StatusReport::new(&settings, &snapshot))
}

/// Serves the last snapshot while it is younger than `status.max_age_secs`.
#[tracing::instrument(name = "Simple check.", skip_all)]
#[get("/simple-check")]
pub async fn simple_check_handler(
    checker: web::Data<HealthChecker>,
    status_cache: web::Data<StatusCache>,
    pages: web::Data<Pages>,
    settings: web::Data<Settings>,
) -> Result<HttpResponse> {
    let (snapshot, cached) = status_cache
        .get_or_refresh(&checker, settings.status.max_age())
        .await;
    let body = pages
        .simple_check(&snapshot, cached)
        .map_err(render_failed)?;

    Ok(html(body))
}
