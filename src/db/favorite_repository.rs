// src/db/favorite_repository.rs
// DOCUMENTATION: Database access for favorites
// PURPOSE: Toggle, list and guest-to-user migration

use crate::errors::ApiError;
use crate::models::{FavoriteOwner, Place};
use sqlx::PgPool;
use uuid::Uuid;

pub struct FavoriteRepository;

impl FavoriteRepository {
    /// Delete the favorite if present; returns whether a row was removed
    pub async fn remove(
        pool: &PgPool,
        owner: FavoriteOwner,
        place_id: Uuid,
    ) -> Result<bool, ApiError> {
        let sql = format!(
            "DELETE FROM favorites WHERE {} = $1 AND place_id = $2",
            owner.column()
        );
        let deleted = sqlx::query(&sql)
            .bind(owner.id())
            .bind(place_id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to remove favorite: {}", e);
                ApiError::from(e)
            })?
            .rows_affected();
        Ok(deleted > 0)
    }

    /// Insert a favorite; a concurrent duplicate is ignored
    pub async fn add(pool: &PgPool, owner: FavoriteOwner, place_id: Uuid) -> Result<(), ApiError> {
        let sql = format!(
            "INSERT INTO favorites ({}, place_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            owner.column()
        );
        sqlx::query(&sql)
            .bind(owner.id())
            .bind(place_id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to add favorite: {}", e);
                ApiError::from(e)
            })?;
        Ok(())
    }

    /// Favorite places of an owner, most recently favorited first
    pub async fn list_places(pool: &PgPool, owner: FavoriteOwner) -> Result<Vec<Place>, ApiError> {
        let sql = format!(
            r#"
            SELECT p.*
            FROM favorites f
            JOIN places p ON p.id = f.place_id
            WHERE f.{} = $1
            ORDER BY f.created_at DESC, f.id ASC
            "#,
            owner.column()
        );
        sqlx::query_as::<_, Place>(&sql)
            .bind(owner.id())
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list favorites: {}", e);
                ApiError::from(e)
            })
    }

    /// Move a guest's favorites to a user, dropping duplicates
    /// DOCUMENTATION: Runs in one transaction; returns the number of favorites moved
    pub async fn migrate_guest(
        pool: &PgPool,
        guest_id: Uuid,
        user_id: Uuid,
    ) -> Result<u64, ApiError> {
        let mut tx = pool.begin().await?;

        let moved = sqlx::query(
            r#"
            INSERT INTO favorites (user_id, place_id, created_at)
            SELECT $2, place_id, created_at FROM favorites WHERE guest_id = $1
            ON CONFLICT (user_id, place_id) DO NOTHING
            "#,
        )
        .bind(guest_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query("DELETE FROM favorites WHERE guest_id = $1")
            .bind(guest_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(moved)
    }
}
