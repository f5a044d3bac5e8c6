use common::{
    error::{AppError, Res},
    http::PageMeta,
    misc::Pagination,
};
use db::{
    dtos::affiliate::{AffiliateCreate, AffiliateUpdate},
    models::affiliate::Affiliate,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::affiliate::{CreateAffiliateRequest, UpdateAffiliateRequest};

const CODE_LEN: std::ops::RangeInclusive<usize> = 3..=32;
const MAX_NAME_LEN: usize = 100;
const MAX_COMMISSION_BPS: i32 = 100_00;
const DEFAULT_COMMISSION_BPS: i32 = 10_00;
const STATUSES: [&str; 2] = ["active", "paused"];

/// Referral codes are matched case-insensitively and stored upper-cased.
pub(crate) fn normalize_code(code: &str) -> Res<String> {
    let code = code.trim();
    if !CODE_LEN.contains(&code.len())
        || !code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::BadRequest(format!(
            "Code must be {} to {} letters, digits, '-' or '_'",
            CODE_LEN.start(),
            CODE_LEN.end()
        )));
    }
    Ok(code.to_ascii_uppercase())
}

fn validate_name(name: &str) -> Res<String> {
    let name = name.trim();
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "Name must be 1 to {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

fn validate_email(email: &str) -> Res<String> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {
            Ok(email.to_lowercase())
        }
        _ => Err(AppError::BadRequest(format!("Invalid email '{}'", email))),
    }
}

fn validate_commission(bps: i32) -> Res<i32> {
    if !(0..=MAX_COMMISSION_BPS).contains(&bps) {
        return Err(AppError::BadRequest(format!(
            "commission_bps must be between 0 and {}",
            MAX_COMMISSION_BPS
        )));
    }
    Ok(bps)
}

fn validate_status(status: &str) -> Res<String> {
    let status = status.trim().to_lowercase();
    if !STATUSES.contains(&status.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Status must be one of {}",
            STATUSES.join(", ")
        )));
    }
    Ok(status)
}

pub(crate) fn validate_create(req: CreateAffiliateRequest) -> Res<AffiliateCreate> {
    Ok(AffiliateCreate {
        code: normalize_code(&req.code)?,
        name: validate_name(&req.name)?,
        email: validate_email(&req.email)?,
        commission_bps: req
            .commission_bps
            .map(validate_commission)
            .transpose()?
            .unwrap_or(DEFAULT_COMMISSION_BPS),
    })
}

pub(crate) fn validate_update(req: UpdateAffiliateRequest) -> Res<AffiliateUpdate> {
    Ok(AffiliateUpdate {
        name: req.name.as_deref().map(validate_name).transpose()?,
        email: req.email.as_deref().map(validate_email).transpose()?,
        commission_bps: req.commission_bps.map(validate_commission).transpose()?,
        status: req.status.as_deref().map(validate_status).transpose()?,
    })
}

pub async fn list_affiliates(
    pool: &PgPool,
    pagination: Pagination,
) -> Res<(Vec<Affiliate>, PageMeta)> {
    let limit = pagination.limit();
    let offset = pagination.offset();
    let affiliates = db::affiliate::get_affiliates(pool, limit, offset).await?;
    let total = db::affiliate::count_affiliates(pool).await?;
    Ok((
        affiliates,
        PageMeta {
            total,
            limit,
            offset,
        },
    ))
}

pub async fn get_affiliate(pool: &PgPool, affiliate_id: &Uuid) -> Res<Affiliate> {
    db::affiliate::get_affiliate_by_id(pool, affiliate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Affiliate {} not found", affiliate_id)))
}

/// Creates an affiliate. A code already in use answers 409.
pub async fn create_affiliate(pool: &PgPool, req: CreateAffiliateRequest) -> Res<Affiliate> {
    let data = validate_create(req)?;
    let code = data.code.clone();
    let affiliate = db::affiliate::insert_affiliate(pool, data)
        .await
        .map_err(|e| match e {
            AppError::Database(ref db_err)
                if db_err
                    .as_database_error()
                    .is_some_and(|d| d.is_unique_violation()) =>
            {
                AppError::Conflict(format!("Affiliate code {} is already taken", code))
            }
            other => other,
        })?;
    log::info!("Affiliate {} created with code {}", affiliate.id, affiliate.code);
    Ok(affiliate)
}

pub async fn update_affiliate(
    pool: &PgPool,
    affiliate_id: Uuid,
    req: UpdateAffiliateRequest,
) -> Res<Affiliate> {
    let data = validate_update(req)?;
    db::affiliate::update_affiliate(pool, affiliate_id, data)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Affiliate {} not found", affiliate_id)))
}

pub async fn delete_affiliate(pool: &PgPool, affiliate_id: &Uuid) -> Res<()> {
    if !db::affiliate::delete_affiliate(pool, affiliate_id).await? {
        return Err(AppError::NotFound(format!(
            "Affiliate {} not found",
            affiliate_id
        )));
    }
    log::info!("Affiliate {} deleted", affiliate_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(code: &str, email: &str, bps: i32) -> CreateAffiliateRequest {
        CreateAffiliateRequest {
            code: code.to_string(),
            name: "Jordan".to_string(),
            email: email.to_string(),
            commission_bps: Some(bps),
        }
    }

    #[test]
    fn codes_are_normalized() {
        assert_eq!(normalize_code(" spring-25 ").unwrap(), "SPRING-25");
        assert!(normalize_code("ab").is_err());
        assert!(normalize_code("has space").is_err());
        assert!(normalize_code(&"x".repeat(33)).is_err());
    }

    #[test]
    fn create_is_validated() {
        let data = validate_create(create("partner_1", "Jo@Example.com", 1250)).unwrap();
        assert_eq!(data.code, "PARTNER_1");
        assert_eq!(data.email, "jo@example.com");
        assert_eq!(data.commission_bps, 1250);

        assert!(validate_create(create("partner_1", "nope", 0)).is_err());
        assert!(validate_create(create("partner_1", "a@b.co", -1)).is_err());
        assert!(validate_create(create("partner_1", "a@b.co", 10_001)).is_err());
    }

    #[test]
    fn omitted_commission_gets_default() {
        let req = CreateAffiliateRequest {
            commission_bps: None,
            ..create("partner_2", "a@b.co", 0)
        };
        assert_eq!(validate_create(req).unwrap().commission_bps, 1000);

        let zero = validate_create(create("partner_2", "a@b.co", 0)).unwrap();
        assert_eq!(zero.commission_bps, 0);
    }

    #[test]
    fn update_only_touches_given_fields() {
        let data = validate_update(UpdateAffiliateRequest {
            status: Some("Paused".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(data.status.as_deref(), Some("paused"));
        assert!(data.name.is_none() && data.email.is_none() && data.commission_bps.is_none());

        let bad = validate_update(UpdateAffiliateRequest {
            status: Some("deleted".to_string()),
            ..Default::default()
        });
        assert!(matches!(bad, Err(AppError::BadRequest(_))));
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn duplicate_code_conflicts(pool: PgPool) {
        let created = create_affiliate(&pool, create("partner_1", "a@b.co", 500))
            .await
            .unwrap();
        assert_eq!(created.code, "PARTNER_1");
        assert_eq!(created.status, "active");

        // codes differ only by case
        let res = create_affiliate(&pool, create("PARTNER_1", "c@d.co", 500)).await;
        assert!(matches!(res, Err(AppError::Conflict(_))));
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn omitted_commission_is_stored_as_default(pool: PgPool) {
        let req = CreateAffiliateRequest {
            commission_bps: None,
            ..create("partner_3", "a@b.co", 0)
        };
        let created = create_affiliate(&pool, req).await.unwrap();
        assert_eq!(created.commission_bps, 1000);
    }
}
