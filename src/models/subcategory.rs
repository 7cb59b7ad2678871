// src/models/subcategory.rs
// DOCUMENTATION: Subcategories group places inside a category type
// PURPOSE: Premium subcategories carry the Stripe product used to unlock them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::CategoryType;

/// Price charged for a premium subcategory when none is configured
pub const DEFAULT_PREMIUM_PRICE: f64 = 10.0;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category_type: CategoryType,
    pub is_premium: bool,
    pub premium_price: Option<f64>,
    pub stripe_price_id: Option<String>,
    pub stripe_product_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subcategory {
    /// Price used when unlocking this subcategory
    pub fn effective_premium_price(&self) -> f64 {
        self.premium_price.unwrap_or(DEFAULT_PREMIUM_PRICE)
    }
}

/// Row returned by GET /categories/{categoryType}/subcategories
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SubcategorySummary {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub is_premium: bool,
    pub premium_price: Option<f64>,
}

/// POST /subcategories
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubcategoryRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub description: Option<String>,
    pub category_type: CategoryType,
    #[serde(default)]
    pub is_premium: bool,
    #[validate(range(min = 0.5, max = 10000.0))]
    pub premium_price: Option<f64>,
    #[validate(url)]
    pub image: Option<String>,
}

impl CreateSubcategoryRequest {
    /// premium_price column value: only premium rows carry a price
    pub fn stored_premium_price(&self) -> Option<f64> {
        if self.is_premium {
            Some(self.premium_price.unwrap_or(DEFAULT_PREMIUM_PRICE))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_premium_price() {
        let mut req = CreateSubcategoryRequest {
            name: "Surf".into(),
            description: None,
            category_type: CategoryType::BeachLife,
            is_premium: false,
            premium_price: Some(25.0),
            image: None,
        };
        assert_eq!(req.stored_premium_price(), None);

        req.is_premium = true;
        assert_eq!(req.stored_premium_price(), Some(25.0));

        req.premium_price = None;
        assert_eq!(req.stored_premium_price(), Some(DEFAULT_PREMIUM_PRICE));
    }

    #[test]
    fn test_request_deserializes_category() {
        let req: CreateSubcategoryRequest = serde_json::from_value(serde_json::json!({
            "name": "Hiking",
            "categoryType": "Mountain_Life",
            "isPremium": true
        }))
        .unwrap();
        assert_eq!(req.category_type, CategoryType::MountainLife);
        assert!(req.is_premium);
    }
}
