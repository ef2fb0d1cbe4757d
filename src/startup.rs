use crate::configuration::Settings;
use crate::connectors;
use crate::health::{HealthChecker, StatusCache};
use crate::routes;
use crate::views::Pages;
use actix_web::{dev::Server, web, App, HttpServer};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub async fn run(listener: TcpListener, settings: Settings) -> Result<Server, std::io::Error> {
    let port = listener.local_addr()?.port();

    let database = connectors::init_database(&settings);
    let cache = connectors::init_cache(&settings);

    let health_checker = web::Data::new(HealthChecker::new(database.clone(), cache.clone(), port));
    let status_cache = web::Data::new(StatusCache::new());

    let pages = Pages::new().map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
    let pages = web::Data::new(pages);

    let database = web::Data::new(database);
    let cache = web::Data::new(cache);
    let settings = web::Data::new(settings);

    // Startup check: log both dependencies once and seed the status cache.
    let startup_checker = health_checker.clone();
    let startup_cache = status_cache.clone();
    tokio::spawn(async move {
        tracing::info!("Testing connections on startup...");
        let snapshot = startup_cache.refresh(&startup_checker).await;
        tracing::info!(
            mysql = %crate::views::status::probe_message(&snapshot.database),
            redis = %crate::views::status::probe_message(&snapshot.cache),
            "Startup connection check finished"
        );
    });

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .service(routes::index_handler)
            .service(routes::status_handler)
            .service(routes::health_check)
            .service(routes::simple_check_handler)
            .service(routes::test_mysql_handler)
            .service(routes::test_redis_handler)
            .service(routes::visitors_handler)
            .app_data(health_checker.clone())
            .app_data(status_cache.clone())
            .app_data(pages.clone())
            .app_data(database.clone())
            .app_data(cache.clone())
            .app_data(settings.clone())
    })
    // exit on SIGINT/SIGTERM without draining in-flight requests
    .shutdown_timeout(0)
    .listen(listener)?
    .run();

    Ok(server)
}
