// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components and mount them under /api/v1

pub mod auth;
pub mod categories;
pub mod extractors;
pub mod favorites;
pub mod guests;
pub mod health;
pub mod meta;
pub mod payments;
pub mod places;
pub mod subcategories;
pub mod users;

use actix_web::web;

pub use health::config as health_config;

/// All versioned API routes
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(auth::config)
            .configure(users::config)
            .configure(guests::config)
            .configure(categories::config)
            .configure(subcategories::config)
            .configure(places::config)
            .configure(favorites::config)
            .configure(payments::config)
            .configure(meta::config),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_routes_are_versioned() {
        let app = test::init_service(
            App::new().configure(health_config).configure(api_config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/categories").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/categories").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
