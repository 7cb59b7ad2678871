// src/db/guest_repository.rs
// DOCUMENTATION: Database access for anonymous guests

use crate::errors::ApiError;
use crate::models::Guest;
use sqlx::PgPool;
use uuid::Uuid;

pub struct GuestRepository;

impl GuestRepository {
    /// Create the guest for a device, or return the existing one
    /// DOCUMENTATION: The no-op update makes RETURNING yield the row on conflict too
    pub async fn upsert_by_device(pool: &PgPool, device_id: &str) -> Result<Guest, ApiError> {
        sqlx::query_as::<_, Guest>(
            r#"
            INSERT INTO guests (device_id)
            VALUES ($1)
            ON CONFLICT (device_id) DO UPDATE SET device_id = EXCLUDED.device_id
            RETURNING *
            "#,
        )
        .bind(device_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to upsert guest for device {}: {}", device_id, e);
            ApiError::from(e)
        })
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Guest>, ApiError> {
        sqlx::query_as::<_, Guest>("SELECT * FROM guests WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch guest {}: {}", id, e);
                ApiError::from(e)
            })
    }
}
