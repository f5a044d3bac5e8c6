use api_market::service::access;
use chrono::NaiveDate;
use common::error::AppError;
use db::dtos::subscription::SubscriptionUpsert;
use entitlement::DownloadDecision;
use sqlx::PgPool;
use uuid::Uuid;

async fn seed_product(pool: &PgPool, price_cents: i64) -> Uuid {
    sqlx::query_scalar("INSERT INTO products (name, price_cents) VALUES ('Item', $1) RETURNING id")
        .bind(price_cents)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// A standard-plan subscriber with `credits` left.
async fn seed_subscriber(pool: &PgPool, credits: i64) -> Uuid {
    sqlx::query(
        "INSERT INTO plans (id, name, access_level, monthly_credits) \
         VALUES ('price_standard', 'Standard', 'standard', $1)",
    )
    .bind(credits)
    .execute(pool)
    .await
    .unwrap();

    let user_id = Uuid::new_v4();
    db::subscription::upsert_subscription(
        pool,
        SubscriptionUpsert {
            user_id,
            stripe_subscription_id: "sub_download".to_string(),
            stripe_customer_id: "cus_download".to_string(),
            plan_id: "price_standard".to_string(),
            access_level: "standard".to_string(),
            status: "active".to_string(),
            period_credits: credits,
            current_period_end: NaiveDate::from_ymd_opt(2030, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        },
    )
    .await
    .unwrap();
    user_id
}

#[sqlx::test(migrations = "../db/migrations")]
async fn premium_product_is_charged_to_standard_plan(pool: PgPool) {
    let user_id = seed_subscriber(&pool, 5).await;
    let product_id = seed_product(&pool, 60_00).await;

    let receipt = access::download(&pool, &user_id, &product_id).await.unwrap();
    assert_eq!(receipt.decision, DownloadDecision::Charge { cost: 2 });
    assert_eq!(receipt.credits_charged, 2);
    assert_eq!(receipt.credits_remaining, 3);

    let preview = access::get_access_preview(&pool, &user_id, &product_id)
        .await
        .unwrap();
    assert_eq!(preview.credits_remaining, Some(3));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn included_product_costs_nothing(pool: PgPool) {
    let user_id = seed_subscriber(&pool, 5).await;
    let product_id = seed_product(&pool, 40_00).await;

    let receipt = access::download(&pool, &user_id, &product_id).await.unwrap();
    assert_eq!(receipt.decision, DownloadDecision::Included);
    assert_eq!(receipt.credits_charged, 0);
    assert_eq!(receipt.credits_remaining, 5);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn short_balance_is_denied_and_untouched(pool: PgPool) {
    let user_id = seed_subscriber(&pool, 3).await;
    let product_id = seed_product(&pool, 200_00).await;

    let res = access::download(&pool, &user_id, &product_id).await;
    assert!(matches!(res, Err(AppError::Forbidden(_))));

    let sub = access::get_subscription(&pool, &user_id).await.unwrap().unwrap();
    assert_eq!(sub.credits_remaining, 3);
    assert_eq!(sub.credits_used_this_period, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn download_needs_subscription_and_known_product(pool: PgPool) {
    let product_id = seed_product(&pool, 0).await;
    let res = access::download(&pool, &Uuid::new_v4(), &product_id).await;
    assert!(matches!(res, Err(AppError::Forbidden(_))));

    let user_id = seed_subscriber(&pool, 5).await;
    let res = access::download(&pool, &user_id, &Uuid::new_v4()).await;
    assert!(matches!(res, Err(AppError::NotFound(_))));
}
