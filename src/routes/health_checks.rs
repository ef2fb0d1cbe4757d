use crate::configuration::{HealthMode, Settings};
use crate::health::{HealthChecker, StatusCache};
use crate::views::HealthReport;
use actix_web::{get, web, Responder};

/// Always 200; dependency state lives in the payload.
#[tracing::instrument(name = "Health check.", skip_all)]
#[get("/health")]
pub async fn health_check(
    checker: web::Data<HealthChecker>,
    status_cache: web::Data<StatusCache>,
    settings: web::Data<Settings>,
) -> impl Responder {
    let (snapshot, cached) = match settings.status.health_mode {
        HealthMode::Live => (status_cache.refresh(&checker).await, false),
        HealthMode::Cached => {
            status_cache
                .get_or_refresh(&checker, settings.status.max_age())
                .await
        }
    };

    web::Json(HealthReport::new(&settings.app_name, &snapshot, cached))
}
