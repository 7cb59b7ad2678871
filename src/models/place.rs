// src/models/place.rs
// DOCUMENTATION: Core data structures for places
// PURPOSE: Defines all serialization/deserialization models for API and database

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::{CategoryType, Subcategory, SubscriptionType};

/// Represents a complete place record from the database
/// DOCUMENTATION: This struct maps directly to the places table in PostgreSQL
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: Uuid,
    pub place_title: String,
    pub place_description: String,
    pub place_location: String,
    pub about_place: Option<String>,
    pub how_to_go_there: Option<String>,
    pub suggested_visit_time: Option<String>,
    pub image_url: Option<String>,
    pub category_type: CategoryType,
    pub subcategory_id: Option<Uuid>,
    pub price: f64,
    pub stripe_price_id: Option<String>,
    pub stripe_product_id: Option<String>,
    pub subscription_type: SubscriptionType,
    pub user_id: Uuid,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a new place
/// DOCUMENTATION: Data transfer object for POST /places endpoint
#[derive(Debug, Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaceRequest {
    #[validate(length(min = 1, max = 255))]
    pub place_title: String,

    #[validate(length(min = 1))]
    pub place_description: String,

    #[validate(length(min = 1, max = 255))]
    pub place_location: String,

    pub about_place: Option<String>,
    pub how_to_go_there: Option<String>,
    pub suggested_visit_time: Option<String>,

    #[validate(url)]
    pub image_url: Option<String>,

    pub category_type: CategoryType,
    pub subcategory_id: Option<Uuid>,

    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub stripe_price_id: Option<String>,
    pub stripe_product_id: Option<String>,
    pub subscription_type: Option<SubscriptionType>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

/// Pricing fields resolved from the request and its subcategory
#[derive(Debug, Clone, PartialEq)]
pub struct PlacePricing {
    pub price: f64,
    pub subscription_type: SubscriptionType,
    pub stripe_price_id: Option<String>,
    pub stripe_product_id: Option<String>,
}

impl CreatePlaceRequest {
    /// A premium subcategory overrides whatever pricing the caller sent
    pub fn resolve_pricing(&self, subcategory: Option<&Subcategory>) -> PlacePricing {
        match subcategory {
            Some(sub) if sub.is_premium => PlacePricing {
                price: sub.effective_premium_price(),
                subscription_type: SubscriptionType::Premium,
                stripe_price_id: sub.stripe_price_id.clone(),
                stripe_product_id: sub.stripe_product_id.clone(),
            },
            _ => PlacePricing {
                price: self.price.unwrap_or(0.0),
                subscription_type: self.subscription_type.unwrap_or(SubscriptionType::Free),
                stripe_price_id: self.stripe_price_id.clone(),
                stripe_product_id: self.stripe_product_id.clone(),
            },
        }
    }
}

/// Request DTO for updating an existing place
/// DOCUMENTATION: PATCH /places/{id}; absent fields keep their value
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaceRequest {
    #[validate(length(min = 1, max = 255))]
    pub place_title: Option<String>,
    pub place_description: Option<String>,
    pub place_location: Option<String>,
    pub about_place: Option<String>,
    pub how_to_go_there: Option<String>,
    pub suggested_visit_time: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub category_type: Option<CategoryType>,
    pub subcategory_id: Option<Uuid>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub subscription_type: Option<SubscriptionType>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

/// POST /places/create-payment
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PremiumPaymentRequest {
    pub subcategory_id: Uuid,
    /// Stripe PaymentMethod id (pm_...)
    pub method_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumPaymentResponse {
    pub message: String,
    pub client_secret: Option<String>,
    pub payment_intent_id: String,
}
