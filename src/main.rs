use healthboard::banner;
use healthboard::configuration::get_configuration;
use healthboard::startup::run;
use healthboard::telemetry::{get_subscriber, init_subscriber};
use std::net::TcpListener;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("healthboard".into(), "info".into());
    init_subscriber(subscriber);

    let settings = get_configuration().expect("Failed to read configuration.");

    banner::print_banner();
    banner::print_startup_info(&settings.app_host, settings.app_port);

    tracing::info!(
        mysql_host = %settings.database.host,
        mysql_database = %settings.database.database_name,
        redis_host = %settings.redis.host,
        redis_port = settings.redis.port,
        redis_tls = settings.redis.tls,
        health_mode = ?settings.status.health_mode,
        "Configuration resolved"
    );

    let address = format!("{}:{}", settings.app_host, settings.app_port);
    tracing::info!("Start server at {:?}", &address);
    let listener =
        TcpListener::bind(&address).expect(&format!("failed to bind to {}", settings.app_port));

    run(listener, settings).await?.await
}
