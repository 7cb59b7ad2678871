// src/db/payment_repository.rs
// DOCUMENTATION: Database access for payments
// PURPOSE: Pending rows written at checkout, status transitions driven by webhooks

use crate::errors::ApiError;
use crate::models::{NewPayment, Payment, PaymentStatus};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

pub struct PaymentRepository;

impl PaymentRepository {
    pub async fn create(pool: &PgPool, payment: &NewPayment) -> Result<Payment, ApiError> {
        sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (
                user_id, subcategory_id, amount, currency, status,
                stripe_payment_id, stripe_customer_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(payment.user_id)
        .bind(payment.subcategory_id)
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(PaymentStatus::Pending)
        .bind(&payment.stripe_payment_id)
        .bind(&payment.stripe_customer_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to record payment for user {}: {}", payment.user_id, e);
            ApiError::from(e)
        })
    }

    /// Settle the payment for a PaymentIntent
    pub async fn update_by_intent<'e, E>(
        executor: E,
        intent_id: &str,
        status: PaymentStatus,
        amount: Option<f64>,
        customer_id: Option<&str>,
    ) -> Result<Option<Payment>, ApiError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments SET
                status = $2,
                amount = COALESCE($3, amount),
                stripe_customer_id = COALESCE($4, stripe_customer_id),
                updated_at = NOW()
            WHERE stripe_payment_id = $1
            RETURNING *
            "#,
        )
        .bind(intent_id)
        .bind(status)
        .bind(amount)
        .bind(customer_id)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            log::error!("Failed to update payment for intent {}: {}", intent_id, e);
            ApiError::from(e)
        })
    }

    /// Mark a checkout session paid
    pub async fn complete_session<'e, E>(
        executor: E,
        session_id: &str,
        amount: f64,
        intent_id: Option<&str>,
        customer_id: Option<&str>,
    ) -> Result<Option<Payment>, ApiError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments SET
                status = 'SUCCESS',
                amount = $2,
                stripe_payment_id = COALESCE($3, stripe_payment_id),
                stripe_customer_id = COALESCE($4, stripe_customer_id),
                updated_at = NOW()
            WHERE stripe_session_id = $1
            RETURNING *
            "#,
        )
        .bind(session_id)
        .bind(amount)
        .bind(intent_id)
        .bind(customer_id)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            log::error!("Failed to complete payment for session {}: {}", session_id, e);
            ApiError::from(e)
        })
    }

    pub async fn cancel(
        pool: &PgPool,
        payment_id: Uuid,
        session_id: &str,
    ) -> Result<Option<Payment>, ApiError> {
        sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments SET
                status = 'CANCELED',
                stripe_session_id = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(payment_id)
        .bind(session_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to cancel payment {}: {}", payment_id, e);
            ApiError::from(e)
        })
    }
}
