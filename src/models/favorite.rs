// src/models/favorite.rs
// DOCUMENTATION: Favorite places owned by users or guests

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::OwnerType;

/// POST /favorites
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFavoriteRequest {
    pub place_id: Option<Uuid>,
    /// Only read for anonymous callers
    pub owner_id: Option<Uuid>,
    pub owner_type: Option<OwnerType>,
}

/// GET /favorites query string
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesQuery {
    pub owner_id: Option<Uuid>,
    pub owner_type: Option<OwnerType>,
}

/// Resolved owner of a favorite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteOwner {
    User(Uuid),
    Guest(Uuid),
}

impl FavoriteOwner {
    /// Column holding the owner id in the favorites table
    pub fn column(&self) -> &'static str {
        match self {
            FavoriteOwner::User(_) => "user_id",
            FavoriteOwner::Guest(_) => "guest_id",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            FavoriteOwner::User(id) | FavoriteOwner::Guest(id) => *id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFavoriteResponse {
    pub is_favorite: bool,
}
