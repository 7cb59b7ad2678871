// src/db/subcategory_repository.rs
// DOCUMENTATION: Database access for subcategories
// PURPOSE: Typed queries; list endpoints go through QueryBuilder instead

use crate::errors::ApiError;
use crate::models::{CategoryType, CreateSubcategoryRequest, Subcategory, SubcategorySummary};
use sqlx::PgPool;
use uuid::Uuid;

/// Stripe identifiers attached to premium subcategories
#[derive(Debug, Default, Clone)]
pub struct StripeIds {
    pub product_id: Option<String>,
    pub price_id: Option<String>,
}

pub struct SubcategoryRepository;

impl SubcategoryRepository {
    pub async fn create(
        pool: &PgPool,
        req: &CreateSubcategoryRequest,
        stripe: &StripeIds,
    ) -> Result<Subcategory, ApiError> {
        sqlx::query_as::<_, Subcategory>(
            r#"
            INSERT INTO subcategories (
                name, description, image, category_type, is_premium,
                premium_price, stripe_product_id, stripe_price_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.image)
        .bind(req.category_type)
        .bind(req.is_premium)
        .bind(req.stored_premium_price())
        .bind(&stripe.product_id)
        .bind(&stripe.price_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create subcategory {}: {}", req.name, e);
            ApiError::from(e)
        })
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Subcategory>, ApiError> {
        sqlx::query_as::<_, Subcategory>("SELECT * FROM subcategories WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch subcategory {}: {}", id, e);
                ApiError::from(e)
            })
    }

    pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Subcategory>, ApiError> {
        sqlx::query_as::<_, Subcategory>("SELECT * FROM subcategories WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
            .map_err(ApiError::from)
    }

    /// Whether a subcategory with this name already exists in the category
    pub async fn exists(
        pool: &PgPool,
        name: &str,
        category_type: CategoryType,
    ) -> Result<bool, ApiError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM subcategories WHERE name = $1 AND category_type = $2)",
        )
        .bind(name)
        .bind(category_type)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Subcategories of one category, oldest first
    pub async fn list_by_category(
        pool: &PgPool,
        category_type: CategoryType,
    ) -> Result<Vec<SubcategorySummary>, ApiError> {
        sqlx::query_as::<_, SubcategorySummary>(
            r#"
            SELECT id, name, image, description, is_premium, premium_price
            FROM subcategories
            WHERE category_type = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(category_type)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list subcategories for {}: {}", category_type, e);
            ApiError::from(e)
        })
    }

    /// Hard delete; places are removed by ON DELETE CASCADE
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Subcategory, ApiError> {
        sqlx::query_as::<_, Subcategory>("DELETE FROM subcategories WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| {
                log::warn!("Subcategory not found: {}", id);
                ApiError::NotFound("Subcategory not found".to_string())
            })
    }
}
