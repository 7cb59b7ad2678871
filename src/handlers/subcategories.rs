// src/handlers/subcategories.rs
// DOCUMENTATION: HTTP handlers for subcategories

use crate::errors::ApiError;
use crate::handlers::extractors::AuthUser;
use crate::models::{ApiResponse, CreateSubcategoryRequest, UserRole};
use crate::services::{ResponseCache, StripeClient, SubcategoryService};
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

/// POST /subcategories
pub async fn create_subcategory(
    pool: web::Data<PgPool>,
    stripe: web::Data<StripeClient>,
    cache: web::Data<ResponseCache>,
    user: AuthUser,
    req: web::Json<CreateSubcategoryRequest>,
) -> Result<impl Responder, ApiError> {
    user.require_role(&[UserRole::Admin])?;
    req.validate()?;

    let subcategory = SubcategoryService::create(
        pool.get_ref(),
        stripe.get_ref(),
        cache.get_ref(),
        req.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(
        "Subcategory created successfully",
        subcategory,
    )))
}

/// GET /subcategories
pub async fn list_subcategories(
    pool: web::Data<PgPool>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, ApiError> {
    let page = SubcategoryService::list(pool.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::page(
        "Subcategories retrieved successfully",
        page,
    )))
}

/// GET /subcategories/{id}/places
pub async fn subcategory_places(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    let data = SubcategoryService::places_of(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Places retrieved successfully", data)))
}

/// DELETE /subcategories/{id}
pub async fn delete_subcategory(
    pool: web::Data<PgPool>,
    cache: web::Data<ResponseCache>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    user.require_role(&[UserRole::Admin])?;
    let deleted =
        SubcategoryService::delete(pool.get_ref(), cache.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Subcategory deleted successfully", deleted)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/subcategories")
            .route("", web::post().to(create_subcategory))
            .route("", web::get().to(list_subcategories))
            .route("/{id}/places", web::get().to(subcategory_places))
            .route("/{id}", web::delete().to(delete_subcategory)),
    );
}
