// src/services/place_service.rs
// DOCUMENTATION: Business logic for places
// PURPOSE: Intermediary between handlers and repository, handles pricing and premium unlocks

use crate::db::schema::PLACES;
use crate::db::{PaymentRepository, PlaceRepository, QueryBuilder, SubcategoryRepository, UserRepository};
use crate::errors::ApiError;
use crate::models::{
    CreatePlaceRequest, NewPayment, Paginated, PremiumPaymentRequest, PremiumPaymentResponse,
    Subcategory, UpdatePlaceRequest,
};
use crate::services::stripe::{to_cents, PaymentIntentParams, StripeClient};
use serde_json::Value;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Fields matched by the `search` parameter of GET /places
pub const PLACE_SEARCH_FIELDS: [&str; 5] = [
    "placeTitle",
    "placeDescription",
    "placeLocation",
    "aboutPlace",
    "subcategory.name",
];

/// Generic parameters passed through to QueryBuilder unchanged
const PASSTHROUGH_PARAMS: [&str; 5] = ["page", "limit", "sort", "fields", "exclude"];

/// Translate the public place-listing parameters into QueryBuilder parameters
pub fn listing_params(query: &HashMap<String, String>, premium_only: bool) -> HashMap<String, String> {
    let mut params: HashMap<String, String> = query
        .iter()
        .filter(|(k, _)| PASSTHROUGH_PARAMS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    if let Some(category) = query.get("categoryType").filter(|v| !v.is_empty()) {
        params.insert("categoryType".to_string(), category.clone());
    }
    if let Some(name) = query.get("subcategoryName").filter(|v| !v.is_empty()) {
        params.insert("subcategory.name".to_string(), name.clone());
    }
    if premium_only || query.get("premiumOnly").map(String::as_str) == Some("true") {
        params.insert("subscriptionType".to_string(), "PREMIUM".to_string());
    }
    if let Some(search) = query.get("search") {
        params.insert("searchTerm".to_string(), search.clone());
    }

    params
}

pub struct PlaceService;

impl PlaceService {
    async fn require_subcategory(pool: &PgPool, id: Uuid) -> Result<Subcategory, ApiError> {
        SubcategoryRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| ApiError::InvalidInput("Invalid subcategory ID".to_string()))
    }

    /// Create a new place owned by the caller
    /// DOCUMENTATION: A premium subcategory overrides price, tier and Stripe ids
    pub async fn create_place(
        pool: &PgPool,
        owner_id: Uuid,
        req: CreatePlaceRequest,
    ) -> Result<Value, ApiError> {
        let subcategory = match req.subcategory_id {
            Some(id) => Some(Self::require_subcategory(pool, id).await?),
            None => None,
        };

        let pricing = req.resolve_pricing(subcategory.as_ref());
        let place = PlaceRepository::create(pool, &req, &pricing, owner_id).await?;
        log::info!("Created place {} ({})", place.id, place.place_title);

        Self::get_place(pool, place.id).await
    }

    /// Paginated listing with subcategory and owner embedded
    pub async fn list_places(
        pool: &PgPool,
        query: &HashMap<String, String>,
        premium_only: bool,
    ) -> Result<Paginated<Value>, ApiError> {
        let params = listing_params(query, premium_only);

        QueryBuilder::new(&PLACES, &params)
            .search(&PLACE_SEARCH_FIELDS)?
            .filter()?
            .sort()?
            .fields()?
            .exclude()?
            .include("subcategory")?
            .include("user")?
            .paginate()
            .execute(pool)
            .await
    }

    /// Places created by a user, newest first
    pub async fn my_places(pool: &PgPool, user_id: Uuid) -> Result<Vec<Value>, ApiError> {
        let params = HashMap::new();
        QueryBuilder::new(&PLACES, &params)
            .where_eq("userId", user_id)?
            .include("subcategory")?
            .include("user")?
            .sort()?
            .fetch_all(pool)
            .await
    }

    pub async fn get_place(pool: &PgPool, id: Uuid) -> Result<Value, ApiError> {
        let params = HashMap::new();
        QueryBuilder::new(&PLACES, &params)
            .where_eq("id", id)?
            .include("subcategory")?
            .include("user")?
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| {
                log::warn!("Place not found: {}", id);
                ApiError::NotFound("Place not found".to_string())
            })
    }

    pub async fn update_place(
        pool: &PgPool,
        id: Uuid,
        req: UpdatePlaceRequest,
    ) -> Result<Value, ApiError> {
        if let Some(subcategory_id) = req.subcategory_id {
            Self::require_subcategory(pool, subcategory_id).await?;
        }

        PlaceRepository::update(pool, id, &req).await?;
        Self::get_place(pool, id).await
    }

    pub async fn delete_place(pool: &PgPool, actor_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        UserRepository::get_active(pool, actor_id).await?;
        let place = PlaceRepository::delete(pool, id).await?;
        log::info!("Deleted place {} ({})", place.id, place.place_title);
        Ok(())
    }

    /// One-time premium unlock through a confirmed PaymentIntent
    /// DOCUMENTATION: The payment is stored PENDING; the webhook settles it
    pub async fn create_premium_payment(
        pool: &PgPool,
        stripe: &StripeClient,
        user_id: Uuid,
        req: PremiumPaymentRequest,
    ) -> Result<PremiumPaymentResponse, ApiError> {
        let user = UserRepository::get_active(pool, user_id).await?;
        if user.email.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "User profile must be complete (email and name) before purchasing a subscription."
                    .to_string(),
            ));
        }

        let method_id = req
            .method_id
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| {
                ApiError::InvalidInput(
                    "Payment method ID is required for paid subscriptions.".to_string(),
                )
            })?;

        let subcategory = SubcategoryRepository::find_by_id(pool, req.subcategory_id)
            .await?
            .ok_or_else(|| ApiError::InvalidInput("Subscription not found".to_string()))?;
        let amount = subcategory.premium_price.ok_or_else(|| {
            ApiError::InvalidInput("Premium price not found for this subcategory.".to_string())
        })?;

        let customer_id = match user.stripe_customer_id.clone() {
            Some(id) => id,
            None => {
                let customer = stripe
                    .create_customer(&user.email, &user.full_name, &user.id.to_string())
                    .await?;
                UserRepository::set_stripe_customer(pool, user.id, &customer.id).await?;
                customer.id
            }
        };

        stripe.attach_payment_method(&method_id, &customer_id).await?;
        stripe
            .set_default_payment_method(&customer_id, &method_id)
            .await?;

        let intent = stripe
            .create_payment_intent(&PaymentIntentParams {
                amount_cents: to_cents(amount),
                currency: "usd",
                customer_id: &customer_id,
                payment_method_id: &method_id,
                description: format!("Payment for premium subcategory: {}", subcategory.name),
                metadata: vec![
                    ("userId", user.id.to_string()),
                    ("subcategoryId", subcategory.id.to_string()),
                ],
            })
            .await?;

        PaymentRepository::create(
            pool,
            &NewPayment {
                user_id: user.id,
                subcategory_id: Some(subcategory.id),
                amount,
                currency: "usd".to_string(),
                stripe_payment_id: Some(intent.id.clone()),
                stripe_customer_id: Some(customer_id),
            },
        )
        .await?;

        log::info!(
            "Payment {} initiated for user {} ({}: {})",
            intent.id,
            user.id,
            subcategory.name,
            intent.status
        );

        Ok(PremiumPaymentResponse {
            message: "Payment initiated successfully.".to_string(),
            client_secret: intent.client_secret,
            payment_intent_id: intent.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::PLACES;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_listing_params_mapping() {
        let params = listing_params(
            &query(&[
                ("categoryType", "Beach_Life"),
                ("subcategoryName", "Surf"),
                ("premiumOnly", "true"),
                ("search", "cove"),
                ("page", "2"),
                ("unknown", "x"),
            ]),
            false,
        );

        assert_eq!(params["categoryType"], "Beach_Life");
        assert_eq!(params["subcategory.name"], "Surf");
        assert_eq!(params["subscriptionType"], "PREMIUM");
        assert_eq!(params["searchTerm"], "cove");
        assert_eq!(params["page"], "2");
        assert!(!params.contains_key("unknown"));
        assert!(!params.contains_key("premiumOnly"));
    }

    #[test]
    fn test_premium_only_false_does_not_filter() {
        let params = listing_params(&query(&[("premiumOnly", "false")]), false);
        assert!(!params.contains_key("subscriptionType"));

        let params = listing_params(&query(&[]), true);
        assert_eq!(params["subscriptionType"], "PREMIUM");
    }

    #[test]
    fn test_listing_sql_shape() {
        let params = listing_params(&query(&[("search", "cove"), ("subcategoryName", "Surf")]), true);
        let qb = QueryBuilder::new(&PLACES, &params)
            .search(&PLACE_SEARCH_FIELDS)
            .unwrap()
            .filter()
            .unwrap()
            .sort()
            .unwrap()
            .include("subcategory")
            .unwrap()
            .paginate();
        let (sql, _) = qb.to_sql();

        assert!(sql.contains("p.place_title ILIKE $1"));
        assert!(sql.contains("p_subcategory.name = $2"));
        assert!(sql.contains("p.subscription_type::text = $3"));
        assert!(sql.contains("ORDER BY p.created_at DESC, p.id ASC LIMIT 10 OFFSET 0"));
    }
}
