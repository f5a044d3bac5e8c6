use std::{future::Future, time::Duration};

use actix_web::{App, http::StatusCode, test, web};
use common::{env_config::MetricsConfig, error::Res};
use db::models::vital::WebVital;
use monitoring::{MetricsSink, routes, spawn_reporter};
use serde_json::json;
use tokio::sync::mpsc::{self, UnboundedSender};

struct ChannelSink(UnboundedSender<Vec<WebVital>>);

impl MetricsSink for ChannelSink {
    fn write(&self, batch: Vec<WebVital>) -> impl Future<Output = Res<()>> + Send {
        let _ = self.0.send(batch);
        async { Ok(()) }
    }
}

fn sample(name: &str, value: f64) -> WebVital {
    WebVital {
        name: name.to_string(),
        value,
        rating: None,
        page: "/".to_string(),
        recorded_at: chrono::Utc::now().naive_utc(),
    }
}

fn config(batch_size: usize) -> MetricsConfig {
    with_capacity(batch_size, 64)
}

fn with_capacity(batch_size: usize, queue_capacity: usize) -> MetricsConfig {
    MetricsConfig {
        batch_size,
        flush_interval: Duration::from_secs(3600),
        queue_capacity,
    }
}

#[actix_web::test]
async fn report_is_queued_and_flushed() {
    let (out, mut batches) = mpsc::unbounded_channel();
    let (handle, _task) = spawn_reporter(ChannelSink(out), &config(2));

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(handle))
            .service(web::scope("/monitoring").service(routes::post_vitals)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/monitoring/vitals")
        .set_json(json!({
            "page": "/compare",
            "metrics": [
                { "name": "LCP", "value": 2100.5, "rating": "needs-improvement" },
                { "name": "cls", "value": 0.01 }
            ]
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["accepted"], 2);

    let batch = batches.recv().await.unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[1].name, "CLS");
    assert_eq!(batch[0].page, "/compare");
}

#[actix_web::test]
async fn invalid_report_is_rejected() {
    let (out, _batches) = mpsc::unbounded_channel();
    let (handle, _task) = spawn_reporter(ChannelSink(out), &config(10));

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(handle))
            .service(web::scope("/monitoring").service(routes::post_vitals)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/monitoring/vitals")
        .set_json(json!({ "page": "/", "metrics": [{ "name": "FPS", "value": 60 }] }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn rejected_report_leaves_queue_untouched() {
    let (out, _batches) = mpsc::unbounded_channel();
    let (handle, _task) = spawn_reporter(ChannelSink(out), &with_capacity(100, 2));

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(handle.clone()))
            .service(web::scope("/monitoring").service(routes::post_vitals)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/monitoring/vitals")
        .set_json(json!({
            "page": "/",
            "metrics": [
                { "name": "LCP", "value": 1.0 },
                { "name": "FCP", "value": 2.0 },
                { "name": "TTFB", "value": 3.0 }
            ]
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);

    for name in ["LCP", "CLS"] {
        handle.record(sample(name, 1.0)).unwrap();
    }
}

#[tokio::test]
async fn reporter_flushes_after_every_handle_is_dropped() {
    let (out, mut batches) = mpsc::unbounded_channel();
    let (handle, task) = spawn_reporter(ChannelSink(out), &config(100));
    let metrics = web::Data::new(handle);

    // the server factory owns a clone; the outer handle is dropped at shutdown
    let app_metrics = metrics.clone();
    let factory = move || app_metrics.clone();
    let worker_metrics = factory();
    assert_eq!(worker_metrics.record_all(vec![sample("INP", 120.0)]).unwrap(), 1);

    drop(worker_metrics);
    drop(factory);
    drop(metrics);
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(batches.recv().await.unwrap().len(), 1);
}
