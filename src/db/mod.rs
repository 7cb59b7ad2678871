// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod analytics_repository;
pub mod favorite_repository;
pub mod guest_repository;
pub mod payment_repository;
pub mod place_repository;
pub mod query_builder;
pub mod schema;
pub mod subcategory_repository;
pub mod user_repository;

pub use analytics_repository::*;
pub use favorite_repository::*;
pub use guest_repository::*;
pub use payment_repository::*;
pub use place_repository::*;
pub use query_builder::QueryBuilder;
pub use subcategory_repository::*;
pub use user_repository::*;
