// src/handlers/users.rs
// DOCUMENTATION: HTTP handlers for user accounts

use crate::errors::ApiError;
use crate::handlers::extractors::AuthUser;
use crate::models::{
    ApiResponse, UpdateProfileImageRequest, UpdateProfileRequest, UpdateRoleRequest,
    UpdateStatusRequest, UserRole,
};
use crate::services::UserService;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

/// GET /user
pub async fn list_users(
    pool: web::Data<PgPool>,
    user: AuthUser,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, ApiError> {
    user.require_role(&[UserRole::Admin, UserRole::User])?;
    let page = UserService::list_users(pool.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::page("Users retrieved successfully", page)))
}

/// GET /user/me
pub async fn get_me(pool: web::Data<PgPool>, user: AuthUser) -> Result<impl Responder, ApiError> {
    let me = UserService::get_me(pool.get_ref(), user.id()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Profile retrieved successfully", me)))
}

/// GET /user/{id}
pub async fn get_user(
    pool: web::Data<PgPool>,
    _user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    let profile = UserService::get_user(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("User retrieved successfully", profile)))
}

/// PUT /user/update-profile
pub async fn update_profile(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<UpdateProfileRequest>,
) -> Result<impl Responder, ApiError> {
    req.validate()?;
    let profile = UserService::update_profile(pool.get_ref(), user.id(), req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Profile updated successfully", profile)))
}

/// PUT /user/update-profile-image
pub async fn update_profile_image(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<UpdateProfileImageRequest>,
) -> Result<impl Responder, ApiError> {
    req.validate()?;
    let profile =
        UserService::update_profile_image(pool.get_ref(), user.id(), req.into_inner().profile)
            .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Profile image updated successfully", profile)))
}

/// PUT /user/user-role/{id}
pub async fn update_role(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateRoleRequest>,
) -> Result<impl Responder, ApiError> {
    user.require_role(&[UserRole::Admin])?;
    let profile = UserService::update_role(pool.get_ref(), path.into_inner(), req.role).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("User role updated successfully", profile)))
}

/// PUT /user/user-status/{id}
pub async fn update_status(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateStatusRequest>,
) -> Result<impl Responder, ApiError> {
    user.require_role(&[UserRole::Admin])?;
    let profile = UserService::update_status(pool.get_ref(), path.into_inner(), req.status).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("User status updated successfully", profile)))
}

/// DELETE /user/soft-delete
pub async fn soft_delete(pool: web::Data<PgPool>, user: AuthUser) -> Result<impl Responder, ApiError> {
    let profile = UserService::soft_delete(pool.get_ref(), user.id()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("User deleted successfully", profile)))
}

/// DELETE /user/hard-delete/{id}
pub async fn hard_delete(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    user.require_role(&[UserRole::Admin])?;
    UserService::hard_delete(pool.get_ref(), user.id(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("User permanently deleted", json!({}))))
}

/// Configuration for user routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .route("", web::get().to(list_users))
            .route("/me", web::get().to(get_me))
            .route("/update-profile", web::put().to(update_profile))
            .route("/update-profile-image", web::put().to(update_profile_image))
            .route("/user-role/{id}", web::put().to(update_role))
            .route("/user-status/{id}", web::put().to(update_status))
            .route("/soft-delete", web::delete().to(soft_delete))
            .route("/hard-delete/{id}", web::delete().to(hard_delete))
            .route("/{id}", web::get().to(get_user)),
    );
}
