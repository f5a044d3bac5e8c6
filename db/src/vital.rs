use crate::{
    dtos::vital::VitalFilter,
    models::vital::{VitalSummary, WebVital},
};
use common::error::{AppError, Res};
use sqlx::{Executor, Postgres, QueryBuilder};

/// Writes a whole batch in one statement.
pub async fn insert_vitals<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    vitals: &[WebVital],
) -> Res<u64> {
    if vitals.is_empty() {
        return Ok(0);
    }

    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO web_vitals (name, value, rating, page, recorded_at) ");
    qb.push_values(vitals, |mut b, vital| {
        b.push_bind(&vital.name)
            .push_bind(vital.value)
            .push_bind(&vital.rating)
            .push_bind(&vital.page)
            .push_bind(vital.recorded_at);
    });

    let result = qb.build().execute(executor).await.map_err(AppError::from)?;
    Ok(result.rows_affected())
}

pub async fn get_summary<'e, E>(executor: E, filter: VitalFilter) -> Res<Vec<VitalSummary>>
where
    E: Executor<'e, Database = Postgres>,
{
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
        "SELECT name, COUNT(*) AS samples, AVG(value) AS average, \
         percentile_cont(0.75) WITHIN GROUP (ORDER BY value) AS p75 FROM web_vitals",
    );
    let mut conditions_added = false;

    // Helper to add WHERE or AND
    let mut add_condition_separator = |qb: &mut QueryBuilder<Postgres>| {
        if !conditions_added {
            qb.push(" WHERE ");
            conditions_added = true;
        } else {
            qb.push(" AND ");
        }
    };

    if let Some(name) = filter.name {
        add_condition_separator(&mut qb);
        qb.push("name = ").push_bind(name);
    }

    if let Some(page) = filter.page {
        add_condition_separator(&mut qb);
        // plain substring match, so `%` and `_` in the filter are literal
        qb.push("strpos(page, ").push_bind(page).push(") > 0");
    }

    if let Some(starting_after) = filter.starting_after {
        add_condition_separator(&mut qb);
        qb.push("recorded_at > ").push_bind(starting_after);
    }

    if let Some(ending_before) = filter.ending_before {
        add_condition_separator(&mut qb);
        qb.push("recorded_at < ").push_bind(ending_before);
    }

    qb.push(" GROUP BY name ORDER BY name");

    qb.build_query_as::<VitalSummary>()
        .fetch_all(executor)
        .await
        .map_err(AppError::from)
}
