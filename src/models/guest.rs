// src/models/guest.rs
// DOCUMENTATION: Anonymous device accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, FromRow)]
pub struct Guest {
    pub id: Uuid,
    pub device_id: String,
    pub full_name: String,
    pub has_premium_access: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Guest as returned by the API; role is always GUEST
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestResponse {
    pub id: Uuid,
    pub device_id: String,
    pub role: &'static str,
    pub has_premium_access: bool,
}

impl Guest {
    pub fn to_response(&self) -> GuestResponse {
        GuestResponse {
            id: self.id,
            device_id: self.device_id.clone(),
            role: "GUEST",
            has_premium_access: self.has_premium_access,
        }
    }
}

/// POST /guest
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGuestRequest {
    /// Stable device identifier; a random one is generated when absent
    #[validate(length(min = 1, max = 255))]
    pub device_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GuestLookupQuery {
    pub id: Uuid,
}
