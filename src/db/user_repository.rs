// src/db/user_repository.rs
// DOCUMENTATION: Database access for user accounts
// PURPOSE: All SQL touching the users table

use crate::errors::ApiError;
use crate::models::{RegisterRequest, UpdateProfileRequest, User, UserRole, UserStatus};
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// UserRepository: All database operations for users
/// DOCUMENTATION: Rows always come back as the full User; callers project with to_profile()
pub struct UserRepository;

impl UserRepository {
    /// Insert a new, unverified account holding a fresh OTP
    /// Used by POST /auth/register
    pub async fn create<'e, E>(
        executor: E,
        req: &RegisterRequest,
        password_hash: &str,
        otp: &str,
        otp_expiry: DateTime<Utc>,
    ) -> Result<User, ApiError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                full_name, email, password, phone_number, city, address,
                otp, otp_expiry
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&req.full_name)
        .bind(&req.email)
        .bind(password_hash)
        .bind(&req.phone_number)
        .bind(&req.city)
        .bind(&req.address)
        .bind(otp)
        .bind(otp_expiry)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            log::error!("Failed to create user {}: {}", req.email, e);
            ApiError::from(e)
        })
    }

    /// Find user by email, including soft-deleted rows
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, ApiError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch user by email: {}", e);
                ApiError::from(e)
            })
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, ApiError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch user {}: {}", id, e);
                ApiError::from(e)
            })
    }

    /// Find a user that has not been soft-deleted, or 404
    pub async fn get_active(pool: &PgPool, id: Uuid) -> Result<User, ApiError> {
        match Self::find_by_id(pool, id).await? {
            Some(user) if !user.is_deleted => Ok(user),
            _ => {
                log::warn!("User not found: {}", id);
                Err(ApiError::NotFound("User not found".to_string()))
            }
        }
    }

    /// Store (or clear) the one-time password
    /// DOCUMENTATION: Generic over the executor so it can run inside a transaction
    pub async fn set_otp<'e, E>(
        executor: E,
        id: Uuid,
        otp: Option<&str>,
        otp_expiry: Option<DateTime<Utc>>,
    ) -> Result<(), ApiError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query("UPDATE users SET otp = $2, otp_expiry = $3, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(otp)
            .bind(otp_expiry)
            .execute(executor)
            .await
            .map_err(|e| {
                log::error!("Failed to store OTP for user {}: {}", id, e);
                ApiError::from(e)
            })?;
        Ok(())
    }

    /// Mark email verified and consume the OTP
    pub async fn mark_email_verified(pool: &PgPool, id: Uuid) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_email_verified = TRUE, otp = NULL, otp_expiry = NULL, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to verify email for user {}: {}", id, e);
            ApiError::from(e)
        })
    }

    /// Replace the password hash; any pending OTP is cleared
    pub async fn update_password(
        pool: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            UPDATE users
            SET password = $2, otp = NULL, otp_expiry = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to update password for user {}: {}", id, e);
            ApiError::from(e)
        })?;
        Ok(())
    }

    /// Partial profile update; absent fields keep their value
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateProfileRequest,
    ) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                full_name = COALESCE($2, full_name),
                phone_number = COALESCE($3, phone_number),
                describe = COALESCE($4, describe),
                city = COALESCE($5, city),
                address = COALESCE($6, address),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.full_name)
        .bind(&req.phone_number)
        .bind(&req.describe)
        .bind(&req.city)
        .bind(&req.address)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to update profile for user {}: {}", id, e);
            ApiError::from(e)
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    pub async fn update_profile_image(
        pool: &PgPool,
        id: Uuid,
        profile: &str,
    ) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET profile = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(profile)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    pub async fn update_role(pool: &PgPool, id: Uuid, role: UserRole) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(role)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        status: UserStatus,
    ) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Remove the user and their payments atomically
    /// DOCUMENTATION: Places and favorites go through ON DELETE CASCADE
    pub async fn hard_delete(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM payments WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            log::warn!("Hard delete requested for unknown user {}", id);
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        tx.commit().await?;
        log::info!("User {} permanently deleted", id);
        Ok(())
    }

    pub async fn set_stripe_customer(
        pool: &PgPool,
        id: Uuid,
        customer_id: &str,
    ) -> Result<(), ApiError> {
        sqlx::query("UPDATE users SET stripe_customer_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(customer_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Unlock premium content; returns false if access was already granted
    pub async fn grant_premium<'e, E>(executor: E, id: Uuid) -> Result<bool, ApiError>
    where
        E: PgExecutor<'e>,
    {
        let updated = sqlx::query(
            r#"
            UPDATE users SET has_premium_access = TRUE, updated_at = NOW()
            WHERE id = $1 AND has_premium_access = FALSE
            "#,
        )
        .bind(id)
        .execute(executor)
        .await
        .map_err(|e| {
            log::error!("Failed to unlock premium for user {}: {}", id, e);
            ApiError::from(e)
        })?
        .rows_affected();

        Ok(updated > 0)
    }
}
