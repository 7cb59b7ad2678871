// src/handlers/meta.rs
// DOCUMENTATION: Admin dashboard endpoint

use crate::errors::ApiError;
use crate::handlers::extractors::AuthUser;
use crate::models::{ApiResponse, UserRole};
use crate::services::AnalyticsService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;

/// GET /meta/admin
pub async fn admin_dashboard(
    pool: web::Data<PgPool>,
    user: AuthUser,
) -> Result<impl Responder, ApiError> {
    user.require_role(&[UserRole::Admin])?;
    let data = AnalyticsService::dashboard(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(
        "Dashboard data retrieved successfully",
        data,
    )))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/meta").route("/admin", web::get().to(admin_dashboard)));
}
