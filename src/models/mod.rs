// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod enums;
pub mod favorite;
pub mod guest;
pub mod payment;
pub mod place;
pub mod response;
pub mod subcategory;
pub mod user;

pub use enums::*;
pub use favorite::*;
pub use guest::*;
pub use payment::*;
pub use place::*;
pub use response::*;
pub use subcategory::*;
pub use user::*;
