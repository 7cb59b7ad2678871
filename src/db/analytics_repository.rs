// src/db/analytics_repository.rs
// DOCUMENTATION: Aggregate counts for the admin dashboard

use crate::errors::ApiError;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Totals across the whole dataset
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct Totals {
    pub total_places: i64,
    pub total_users: i64,
    pub active_users: i64,
}

pub struct AnalyticsRepository;

impl AnalyticsRepository {
    pub async fn totals(pool: &PgPool) -> Result<Totals, ApiError> {
        sqlx::query_as::<_, Totals>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM places) AS total_places,
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM users WHERE status = 'ACTIVE') AS active_users
            "#,
        )
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to compute dashboard totals: {}", e);
            ApiError::from(e)
        })
    }

    /// New users per month in `[from, to)`, as (month 1-12, count) pairs
    pub async fn signups_by_month(
        pool: &PgPool,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<(i32, i64)>, ApiError> {
        sqlx::query_as::<_, (i32, i64)>(
            r#"
            SELECT EXTRACT(MONTH FROM created_at AT TIME ZONE 'UTC')::int AS month, COUNT(*)
            FROM users
            WHERE created_at >= $1 AND created_at < $2
            GROUP BY month
            ORDER BY month
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to compute monthly signups: {}", e);
            ApiError::from(e)
        })
    }
}
