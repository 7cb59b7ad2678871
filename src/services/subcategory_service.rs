// src/services/subcategory_service.rs
// DOCUMENTATION: Subcategory catalog management
// PURPOSE: Premium subcategories are mirrored as Stripe products with a one-off price

use crate::db::schema::SUBCATEGORIES;
use crate::db::{QueryBuilder, StripeIds, SubcategoryRepository};
use crate::errors::ApiError;
use crate::models::{CreateSubcategoryRequest, Paginated, Subcategory};
use crate::services::stripe::{to_cents, StripeClient};
use crate::services::ResponseCache;
use serde_json::Value;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Cache prefix for everything derived from subcategories
pub const CATEGORY_CACHE_PREFIX: &str = "categories:";

/// Query parameters honoured by GET /subcategories
const LIST_PARAMS: [&str; 3] = ["categoryType", "page", "limit"];

pub struct SubcategoryService;

/// Logs Stripe objects created for a subcategory row that was never stored
fn orphaned_product(stripe_ids: &StripeIds, err: ApiError) -> ApiError {
    if let Some(product_id) = &stripe_ids.product_id {
        log::error!(
            "Stripe product {} (price {}) has no subcategory: {}",
            product_id,
            stripe_ids.price_id.as_deref().unwrap_or("-"),
            err
        );
    }
    err
}

impl SubcategoryService {
    pub async fn create(
        pool: &PgPool,
        stripe: &StripeClient,
        cache: &ResponseCache,
        req: CreateSubcategoryRequest,
    ) -> Result<Subcategory, ApiError> {
        if SubcategoryRepository::exists(pool, &req.name, req.category_type).await? {
            return Err(ApiError::AlreadyExists(
                "Subcategory name must be unique per categoryType".to_string(),
            ));
        }

        let mut stripe_ids = StripeIds::default();
        if let Some(amount) = req.stored_premium_price() {
            let product = stripe
                .create_product(
                    &format!("Premium Access: {} ({})", req.name, req.category_type),
                    &format!(
                        "One-time unlock for {} premium content in {}",
                        req.name, req.category_type
                    ),
                    &[
                        ("subcategoryName", req.name.clone()),
                        ("categoryType", req.category_type.to_string()),
                    ],
                )
                .await?;
            let price = stripe
                .create_price(&product.id, to_cents(amount), "usd")
                .await?;

            stripe_ids = StripeIds {
                product_id: Some(product.id),
                price_id: Some(price.id),
            };
        }

        let subcategory = SubcategoryRepository::create(pool, &req, &stripe_ids)
            .await
            .map_err(|e| orphaned_product(&stripe_ids, e))?;
        cache.invalidate_prefix(CATEGORY_CACHE_PREFIX).await;

        log::info!(
            "Created subcategory {} ({}, premium: {})",
            subcategory.name,
            subcategory.category_type,
            subcategory.is_premium
        );
        Ok(subcategory)
    }

    /// Paginated listing with each subcategory's places embedded
    pub async fn list(
        pool: &PgPool,
        params: &HashMap<String, String>,
    ) -> Result<Paginated<Value>, ApiError> {
        let params: HashMap<String, String> = params
            .iter()
            .filter(|(k, _)| LIST_PARAMS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        QueryBuilder::new(&SUBCATEGORIES, &params)
            .filter()?
            .include("places")?
            .sort()?
            .paginate()
            .execute(pool)
            .await
    }

    /// Name, image and premium flag of a subcategory plus its place summaries
    pub async fn places_of(pool: &PgPool, id: Uuid) -> Result<Value, ApiError> {
        let params = HashMap::new();
        QueryBuilder::new(&SUBCATEGORIES, &params)
            .select(&["name", "image", "isPremium"])?
            .include("places")?
            .where_eq("id", id)?
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Subcategory not found".to_string()))
    }

    pub async fn delete(
        pool: &PgPool,
        cache: &ResponseCache,
        id: Uuid,
    ) -> Result<Subcategory, ApiError> {
        let deleted = SubcategoryRepository::delete(pool, id).await?;
        cache.invalidate_prefix(CATEGORY_CACHE_PREFIX).await;
        log::info!("Deleted subcategory {}", id);
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_prefix_matches_listing_keys() {
        assert!(ResponseCache::subcategories_key("Beach_Life").starts_with(CATEGORY_CACHE_PREFIX));
    }

    #[test]
    fn test_orphaned_product_keeps_insert_error() {
        let ids = StripeIds {
            product_id: Some("prod_1".into()),
            price_id: Some("price_1".into()),
        };
        let err = orphaned_product(&ids, ApiError::AlreadyExists("duplicate".into()));
        assert!(matches!(err, ApiError::AlreadyExists(msg) if msg == "duplicate"));

        let err = orphaned_product(&StripeIds::default(), ApiError::InternalError("db".into()));
        assert!(matches!(err, ApiError::InternalError(_)));
    }
}
