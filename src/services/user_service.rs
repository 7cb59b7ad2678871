// src/services/user_service.rs
// DOCUMENTATION: User management business logic

use crate::db::schema::USERS;
use crate::db::{QueryBuilder, UserRepository};
use crate::errors::ApiError;
use crate::models::{
    Paginated, UpdateProfileRequest, UserProfile, UserRole, UserStatus,
};
use serde_json::Value;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Fields matched by `searchTerm` on GET /user
pub const USER_SEARCH_FIELDS: [&str; 4] = ["fullName", "email", "address", "city"];

/// Projection of GET /user/me
pub const ME_FIELDS: [&str; 10] = [
    "id",
    "fullName",
    "email",
    "phoneNumber",
    "role",
    "status",
    "describe",
    "city",
    "address",
    "profile",
];

pub struct UserService;

impl UserService {
    /// Paginated user listing driven by query parameters; soft-deleted users are hidden
    pub async fn list_users(
        pool: &PgPool,
        params: &HashMap<String, String>,
    ) -> Result<Paginated<Value>, ApiError> {
        QueryBuilder::new(&USERS, params)
            .search(&USER_SEARCH_FIELDS)?
            .filter()?
            .where_eq("isDeleted", false)?
            .sort()?
            .fields()?
            .exclude()?
            .paginate()
            .execute(pool)
            .await
    }

    pub async fn get_me(pool: &PgPool, user_id: Uuid) -> Result<Value, ApiError> {
        let params = HashMap::new();
        QueryBuilder::new(&USERS, &params)
            .select(&ME_FIELDS)?
            .where_eq("id", user_id)?
            .where_eq("isDeleted", false)?
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    pub async fn get_user(pool: &PgPool, id: Uuid) -> Result<UserProfile, ApiError> {
        Ok(UserRepository::get_active(pool, id).await?.to_profile())
    }

    pub async fn update_profile(
        pool: &PgPool,
        user_id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<UserProfile, ApiError> {
        Ok(UserRepository::update_profile(pool, user_id, &req)
            .await?
            .to_profile())
    }

    pub async fn update_profile_image(
        pool: &PgPool,
        user_id: Uuid,
        profile: Option<String>,
    ) -> Result<UserProfile, ApiError> {
        let profile = profile
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ApiError::InvalidInput("Please provide image".to_string()))?;

        Ok(UserRepository::update_profile_image(pool, user_id, &profile)
            .await?
            .to_profile())
    }

    pub async fn update_role(
        pool: &PgPool,
        id: Uuid,
        role: UserRole,
    ) -> Result<UserProfile, ApiError> {
        let user = UserRepository::update_role(pool, id, role).await?;
        log::info!("User {} role set to {}", id, role);
        Ok(user.to_profile())
    }

    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        status: UserStatus,
    ) -> Result<UserProfile, ApiError> {
        let user = UserRepository::update_status(pool, id, status).await?;
        log::info!("User {} status set to {:?}", id, status);
        Ok(user.to_profile())
    }

    pub async fn soft_delete(pool: &PgPool, user_id: Uuid) -> Result<UserProfile, ApiError> {
        let user = UserRepository::soft_delete(pool, user_id).await?;
        log::info!("User {} soft-deleted", user_id);
        Ok(user.to_profile())
    }

    /// Permanently remove a user
    /// DOCUMENTATION: The acting admin is re-read from the database, not trusted from the token
    pub async fn hard_delete(pool: &PgPool, actor_id: Uuid, target_id: Uuid) -> Result<(), ApiError> {
        let actor = UserRepository::get_active(pool, actor_id).await?;
        if actor.role != UserRole::Admin {
            return Err(ApiError::Forbidden(
                "Only admins can delete users".to_string(),
            ));
        }

        UserRepository::hard_delete(pool, target_id).await
    }
}
