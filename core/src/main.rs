mod cors;

use std::time::Duration;

use actix_web::{
    App, HttpServer,
    web::{self},
};
use common::env_config::Config;
use monitoring::PgSink;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();
    let config_data = config.clone();

    // get info
    let is_production = config.is_production();
    let origin = config.cors_allowed_origin.clone();

    // init logger
    if config.console_logging_enabled {
        let level = if is_production {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Debug
        };
        logger::setup(&config.log_file, level).expect("Failed to set up logger");
    }

    // init db connection
    let pool = db::setup(&config.database_url, is_production)
        .await
        .expect("Failed to set up database");

    // web-vitals reporter
    let (metrics, reporter) = monitoring::spawn_reporter(PgSink::new(pool.clone()), &config.metrics);
    let metrics_data = web::Data::new(metrics);

    // limiters are shared by every worker
    let global_limiter =
        limiter::global_middleware(config.global_rate_limit).exempt("/api/monitoring/health");
    let download_limiter = limiter::user_middleware(config.download_rate_limit_per_minute);

    log::info!(
        "Starting server on {}:{} with {} workers",
        config.server_host,
        config.server_port,
        config.num_workers
    );

    let app_metrics = metrics_data.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .app_data(web::Data::new(config_data.jwt_config.clone()))
            .app_data(app_metrics.clone())
            .wrap(global_limiter.clone()) // 4th
            .wrap(logger::middleware()) // 3rd
            .wrap(extractor::middleware()) // 2nd
            .wrap(cors::middleware(&origin)) // 1st
            .service(
                web::scope("/api")
                    .service(api_market::mount_market(download_limiter.clone()))
                    .service(api_compare::mount_compare())
                    .service(api_affiliates::mount_referral())
                    .service(api_affiliates::mount_admin())
                    .service(monitoring::mount_monitoring()),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await?;

    // flush buffered web-vitals before exiting
    drop(metrics_data);
    if tokio::time::timeout(Duration::from_secs(5), reporter).await.is_err() {
        log::warn!("Web-vitals reporter did not finish flushing in time");
    }
    Ok(())
}
