// src/services/guest_service.rs
// DOCUMENTATION: Anonymous guest accounts

use crate::db::GuestRepository;
use crate::errors::ApiError;
use crate::models::{CreateGuestRequest, GuestResponse};
use sqlx::PgPool;
use uuid::Uuid;

pub struct GuestService;

impl GuestService {
    /// Create-or-get the guest of a device; a device id is generated when none is sent
    pub async fn create_guest(
        pool: &PgPool,
        req: CreateGuestRequest,
    ) -> Result<GuestResponse, ApiError> {
        let device_id = req
            .device_id
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let guest = GuestRepository::upsert_by_device(pool, &device_id).await?;
        log::debug!("Guest {} for device {}", guest.id, device_id);
        Ok(guest.to_response())
    }

    pub async fn get_guest(pool: &PgPool, id: Uuid) -> Result<GuestResponse, ApiError> {
        GuestRepository::find_by_id(pool, id)
            .await?
            .map(|g| g.to_response())
            .ok_or_else(|| {
                log::warn!("Guest not found: {}", id);
                ApiError::NotFound("Guest not found".to_string())
            })
    }
}
