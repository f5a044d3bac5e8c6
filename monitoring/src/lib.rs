use actix_web::web;

pub mod reporter;
pub mod routes;
pub mod sink;

mod dtos;

pub use reporter::{MetricsHandle, MetricsSink, spawn_reporter};
pub use sink::PgSink;

pub fn mount_monitoring() -> actix_web::Scope {
    web::scope("/monitoring")
        .service(routes::get_health)
        .service(routes::post_vitals)
        .service(
            web::scope("/vitals/summary")
                .wrap(extractor::admin_middleware())
                .service(routes::get_summary),
        )
}
