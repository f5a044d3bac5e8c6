use std::{future::Future, sync::Arc};

use common::error::Res;
use db::models::vital::WebVital;
use sqlx::PgPool;

use crate::reporter::MetricsSink;

/// Writes flushed batches to the `web_vitals` table.
pub struct PgSink {
    pool: Arc<PgPool>,
}

impl PgSink {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

impl MetricsSink for PgSink {
    fn write(&self, batch: Vec<WebVital>) -> impl Future<Output = Res<()>> + Send {
        let pool = Arc::clone(&self.pool);
        async move {
            db::vital::insert_vitals(pool.as_ref(), &batch).await?;
            Ok(())
        }
    }
}
