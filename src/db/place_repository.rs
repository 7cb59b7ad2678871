// src/db/place_repository.rs
// DOCUMENTATION: Database access layer for places
// PURPOSE: Typed writes and single-row reads; listings go through QueryBuilder

use crate::errors::ApiError;
use crate::models::{CreatePlaceRequest, Place, PlacePricing, UpdatePlaceRequest};
use sqlx::PgPool;
use uuid::Uuid;

/// PlaceRepository: All database operations for places
pub struct PlaceRepository;

impl PlaceRepository {
    /// Create new place in database
    /// DOCUMENTATION: Pricing is resolved by the service from the subcategory
    /// Used by POST /places endpoint
    pub async fn create(
        pool: &PgPool,
        req: &CreatePlaceRequest,
        pricing: &PlacePricing,
        owner_id: Uuid,
    ) -> Result<Place, ApiError> {
        sqlx::query_as::<_, Place>(
            r#"
            INSERT INTO places (
                place_title, place_description, place_location,
                about_place, how_to_go_there, suggested_visit_time, image_url,
                category_type, subcategory_id,
                price, subscription_type, stripe_price_id, stripe_product_id,
                user_id, latitude, longitude
            )
            VALUES (
                $1, $2, $3,
                $4, $5, $6, $7,
                $8, $9,
                $10, $11, $12, $13,
                $14, $15, $16
            )
            RETURNING *
            "#,
        )
        .bind(&req.place_title) // $1
        .bind(&req.place_description) // $2
        .bind(&req.place_location) // $3
        .bind(&req.about_place) // $4
        .bind(&req.how_to_go_there) // $5
        .bind(&req.suggested_visit_time) // $6
        .bind(&req.image_url) // $7
        .bind(req.category_type) // $8
        .bind(req.subcategory_id) // $9
        .bind(pricing.price) // $10
        .bind(pricing.subscription_type) // $11
        .bind(&pricing.stripe_price_id) // $12
        .bind(&pricing.stripe_product_id) // $13
        .bind(owner_id) // $14
        .bind(req.latitude) // $15
        .bind(req.longitude) // $16
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to insert place {}: {}", req.place_title, e);
            ApiError::from(e)
        })
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Place>, ApiError> {
        sqlx::query_as::<_, Place>("SELECT * FROM places WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch place {}: {}", id, e);
                ApiError::from(e)
            })
    }

    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, ApiError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM places WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(exists)
    }

    /// Update place fields
    /// DOCUMENTATION: Only provided fields are updated (COALESCE keeps the rest)
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &UpdatePlaceRequest,
    ) -> Result<Place, ApiError> {
        sqlx::query_as::<_, Place>(
            r#"
            UPDATE places SET
                place_title = COALESCE($2, place_title),
                place_description = COALESCE($3, place_description),
                place_location = COALESCE($4, place_location),
                about_place = COALESCE($5, about_place),
                how_to_go_there = COALESCE($6, how_to_go_there),
                suggested_visit_time = COALESCE($7, suggested_visit_time),
                image_url = COALESCE($8, image_url),
                category_type = COALESCE($9, category_type),
                subcategory_id = COALESCE($10, subcategory_id),
                price = COALESCE($11, price),
                subscription_type = COALESCE($12, subscription_type),
                latitude = COALESCE($13, latitude),
                longitude = COALESCE($14, longitude),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.place_title)
        .bind(&req.place_description)
        .bind(&req.place_location)
        .bind(&req.about_place)
        .bind(&req.how_to_go_there)
        .bind(&req.suggested_visit_time)
        .bind(&req.image_url)
        .bind(req.category_type)
        .bind(req.subcategory_id)
        .bind(req.price)
        .bind(req.subscription_type)
        .bind(req.latitude)
        .bind(req.longitude)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to update place {}: {}", id, e);
            ApiError::from(e)
        })?
        .ok_or_else(|| {
            log::warn!("Place not found for update: {}", id);
            ApiError::NotFound(format!("Place with id {} not found", id))
        })
    }

    /// Hard delete; favorites go through ON DELETE CASCADE
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Place, ApiError> {
        sqlx::query_as::<_, Place>("DELETE FROM places WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| {
                log::warn!("Place not found for delete: {}", id);
                ApiError::NotFound(format!("Place with id {} not found", id))
            })
    }
}
