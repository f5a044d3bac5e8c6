//! Buffered web-vitals reporting.
//!
//! Handlers push samples through a [`MetricsHandle`]. A single background
//! task owns the buffer and hands batches to a [`MetricsSink`] when the
//! buffer reaches `batch_size`, on every `flush_interval` tick, and one last
//! time when every handle has been dropped.

use std::{future::Future, time::Duration};

use common::{
    env_config::MetricsConfig,
    error::{AppError, Res},
};
use db::models::vital::WebVital;
use tokio::{
    sync::mpsc::{self, error::TrySendError},
    task::JoinHandle,
    time::MissedTickBehavior,
};

/// Destination of flushed batches.
pub trait MetricsSink: Send + Sync + 'static {
    fn write(&self, batch: Vec<WebVital>) -> impl Future<Output = Res<()>> + Send;
}

#[derive(Clone)]
pub struct MetricsHandle {
    tx: mpsc::Sender<WebVital>,
}

impl MetricsHandle {
    /// Queues a sample without waiting. Fails with 429 when the queue is full.
    pub fn record(&self, vital: WebVital) -> Res<()> {
        self.tx.try_send(vital).map_err(queue_error)
    }

    /// Queues a whole report or nothing. Slots for every sample are reserved
    /// up front, so a 429 leaves no part of the report behind.
    pub fn record_all(&self, vitals: Vec<WebVital>) -> Res<usize> {
        let permits = self.tx.try_reserve_many(vitals.len()).map_err(queue_error)?;
        let queued = vitals.len();
        for (permit, vital) in permits.zip(vitals) {
            permit.send(vital);
        }
        Ok(queued)
    }
}

fn queue_error<T>(e: TrySendError<T>) -> AppError {
    match e {
        TrySendError::Full(_) => AppError::TooManyRequests("Metrics queue is full".to_string()),
        TrySendError::Closed(_) => AppError::Internal("Metrics reporter has stopped".to_string()),
    }
}

/// Starts the reporter task. The task ends after the last handle is dropped
/// and the remaining buffer is flushed.
pub fn spawn_reporter<S: MetricsSink>(
    sink: S,
    config: &MetricsConfig,
) -> (MetricsHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
    let task = tokio::spawn(run(
        sink,
        rx,
        config.batch_size.max(1),
        config.flush_interval,
    ));
    (MetricsHandle { tx }, task)
}

async fn run<S: MetricsSink>(
    sink: S,
    mut rx: mpsc::Receiver<WebVital>,
    batch_size: usize,
    flush_interval: Duration,
) {
    let mut buffer = Vec::with_capacity(batch_size);
    let mut ticker = tokio::time::interval(flush_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(vital) => {
                    buffer.push(vital);
                    if buffer.len() >= batch_size {
                        flush(&sink, &mut buffer).await;
                    }
                }
                None => {
                    flush(&sink, &mut buffer).await;
                    log::info!("Metrics reporter stopped");
                    return;
                }
            },
            _ = ticker.tick() => {
                flush(&sink, &mut buffer).await;
            }
        }
    }
}

async fn flush<S: MetricsSink>(sink: &S, buffer: &mut Vec<WebVital>) {
    if buffer.is_empty() {
        return;
    }
    let batch = std::mem::take(buffer);
    let size = batch.len();
    match sink.write(batch).await {
        Ok(()) => log::debug!("Flushed {} web-vitals samples", size),
        // samples are best-effort; a failed batch is dropped
        Err(e) => log::error!("Dropped {} web-vitals samples: {}", size, e),
    }
}
