// src/services/favorite_service.rs
// DOCUMENTATION: Favorites for users and guests

use crate::db::{FavoriteRepository, GuestRepository, PlaceRepository, SubcategoryRepository};
use crate::errors::ApiError;
use crate::models::{FavoriteOwner, OwnerType, Place, Subcategory, ToggleFavoriteResponse};
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// A favorite place with its subcategory
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritePlace {
    #[serde(flatten)]
    pub place: Place,
    pub subcategory: Option<Subcategory>,
    pub is_favorite: bool,
}

/// Decide who owns the favorite
/// DOCUMENTATION: An authenticated caller always acts as itself; anonymous callers must be guests
pub fn resolve_owner(
    authenticated: Option<Uuid>,
    owner_id: Option<Uuid>,
    owner_type: Option<OwnerType>,
) -> Result<FavoriteOwner, ApiError> {
    if let Some(user_id) = authenticated {
        return Ok(FavoriteOwner::User(user_id));
    }

    match (owner_id, owner_type) {
        (Some(id), Some(OwnerType::Guest)) => Ok(FavoriteOwner::Guest(id)),
        (_, Some(OwnerType::User)) => Err(ApiError::Unauthorized(
            "Login required to manage user favorites".to_string(),
        )),
        _ => Err(ApiError::InvalidInput(
            "ownerId and ownerType are required".to_string(),
        )),
    }
}

pub struct FavoriteService;

impl FavoriteService {
    async fn ensure_guest(pool: &PgPool, owner: FavoriteOwner) -> Result<(), ApiError> {
        if let FavoriteOwner::Guest(id) = owner {
            if GuestRepository::find_by_id(pool, id).await?.is_none() {
                return Err(ApiError::NotFound("Guest not found".to_string()));
            }
        }
        Ok(())
    }

    /// Add the place if absent, remove it if present
    pub async fn toggle(
        pool: &PgPool,
        owner: FavoriteOwner,
        place_id: Uuid,
    ) -> Result<ToggleFavoriteResponse, ApiError> {
        Self::ensure_guest(pool, owner).await?;
        if !PlaceRepository::exists(pool, place_id).await? {
            return Err(ApiError::NotFound("Place not found".to_string()));
        }

        if FavoriteRepository::remove(pool, owner, place_id).await? {
            return Ok(ToggleFavoriteResponse { is_favorite: false });
        }

        FavoriteRepository::add(pool, owner, place_id).await?;
        Ok(ToggleFavoriteResponse { is_favorite: true })
    }

    /// Favorite places, newest favorite first
    pub async fn list(pool: &PgPool, owner: FavoriteOwner) -> Result<Vec<FavoritePlace>, ApiError> {
        Self::ensure_guest(pool, owner).await?;
        let places = FavoriteRepository::list_places(pool, owner).await?;

        let mut ids: Vec<Uuid> = places.iter().filter_map(|p| p.subcategory_id).collect();
        ids.sort();
        ids.dedup();

        let subcategories: HashMap<Uuid, Subcategory> = if ids.is_empty() {
            HashMap::new()
        } else {
            SubcategoryRepository::find_by_ids(pool, &ids)
                .await?
                .into_iter()
                .map(|s| (s.id, s))
                .collect()
        };

        Ok(places
            .into_iter()
            .map(|place| FavoritePlace {
                subcategory: place
                    .subcategory_id
                    .and_then(|id| subcategories.get(&id).cloned()),
                place,
                is_favorite: true,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticated_caller_is_user() {
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert_eq!(
            resolve_owner(Some(user), Some(other), Some(OwnerType::Guest)).unwrap(),
            FavoriteOwner::User(user)
        );
    }

    #[test]
    fn test_anonymous_guest() {
        let guest = Uuid::new_v4();
        assert_eq!(
            resolve_owner(None, Some(guest), Some(OwnerType::Guest)).unwrap(),
            FavoriteOwner::Guest(guest)
        );
    }

    #[test]
    fn test_anonymous_user_or_missing_owner_rejected() {
        assert!(matches!(
            resolve_owner(None, Some(Uuid::new_v4()), Some(OwnerType::User)),
            Err(ApiError::Unauthorized(_))
        ));
        assert!(matches!(
            resolve_owner(None, None, Some(OwnerType::Guest)),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            resolve_owner(None, Some(Uuid::new_v4()), None),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_owner_column() {
        let id = Uuid::new_v4();
        assert_eq!(FavoriteOwner::User(id).column(), "user_id");
        assert_eq!(FavoriteOwner::Guest(id).column(), "guest_id");
        assert_eq!(FavoriteOwner::Guest(id).id(), id);
    }
}
