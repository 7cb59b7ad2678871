// src/handlers/guests.rs
// DOCUMENTATION: HTTP handlers for anonymous guests

use crate::errors::ApiError;
use crate::models::{ApiResponse, CreateGuestRequest, GuestLookupQuery};
use crate::services::GuestService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// POST /guest
/// Body is optional; an empty body gets a generated device id
pub async fn create_guest(
    pool: web::Data<PgPool>,
    req: Option<web::Json<CreateGuestRequest>>,
) -> Result<impl Responder, ApiError> {
    let req = req.map(|r| r.into_inner()).unwrap_or_default();
    req.validate()?;

    let guest = GuestService::create_guest(pool.get_ref(), req).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Guest created successfully", guest)))
}

/// GET /guest/my?id=
pub async fn get_guest(
    pool: web::Data<PgPool>,
    query: web::Query<GuestLookupQuery>,
) -> Result<impl Responder, ApiError> {
    let guest = GuestService::get_guest(pool.get_ref(), query.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Guest retrieved successfully", guest)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/guest")
            .route("", web::post().to(create_guest))
            .route("/my", web::get().to(get_guest)),
    );
}
