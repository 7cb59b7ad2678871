// src/models/payment.rs
// DOCUMENTATION: Payment records mirrored from Stripe

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::PaymentStatus;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subcategory_id: Option<Uuid>,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub stripe_payment_id: Option<String>,
    pub stripe_session_id: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for a new PENDING payment
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: Uuid,
    pub subcategory_id: Option<Uuid>,
    pub amount: f64,
    pub currency: String,
    pub stripe_payment_id: Option<String>,
    pub stripe_customer_id: Option<String>,
}
