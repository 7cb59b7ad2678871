// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod analytics_service;
pub mod auth;
pub mod auth_service;
pub mod cache;
pub mod category_service;
pub mod favorite_service;
pub mod guest_service;
pub mod mailer;
pub mod otp;
pub mod payment_service;
pub mod place_service;
pub mod rate_limit;
pub mod stripe;
pub mod subcategory_service;
pub mod user_service;

pub use analytics_service::AnalyticsService;
pub use auth::JwtAuth;
pub use auth_service::{AuthDeps, AuthService, LoginOutcome};
pub use cache::{start_cleanup_task, ResponseCache};
pub use category_service::CategoryService;
pub use favorite_service::{resolve_owner, FavoriteService};
pub use guest_service::GuestService;
pub use mailer::{mailer_from_config, Mailer};
pub use payment_service::PaymentService;
pub use place_service::PlaceService;
pub use rate_limit::OtpRateLimiter;
pub use stripe::StripeClient;
pub use subcategory_service::SubcategoryService;
pub use user_service::UserService;
