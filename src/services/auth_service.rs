// src/services/auth_service.rs
// DOCUMENTATION: Registration, login and OTP-based account recovery
// PURPOSE: Business rules between the auth handlers and UserRepository

use crate::config::Config;
use crate::db::{FavoriteRepository, UserRepository};
use crate::errors::ApiError;
use crate::models::{
    ChangePasswordRequest, LoginRequest, LoginResponse, OtpRequest, RegisterRequest,
    ResetPasswordRequest, User, UserRole, UserStatus,
};
use crate::services::auth::{JwtAuth, PasswordAuth};
use crate::services::mailer::{otp_email, Mailer};
use crate::services::otp::{generate_otp, otp_expiry, pending_otp_message};
use crate::services::OtpRateLimiter;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

/// Shared dependencies of the auth flows
pub struct AuthDeps<'a> {
    pub pool: &'a PgPool,
    pub config: &'a Config,
    pub mailer: &'a dyn Mailer,
    pub limiter: &'a OtpRateLimiter,
}

/// Result of a successful credential check
#[derive(Debug)]
pub enum LoginOutcome {
    LoggedIn(LoginResponse),
    /// Email not verified yet; a fresh OTP was mailed
    VerificationRequired,
}

pub struct AuthService;

impl AuthService {
    fn login_response(user: &User, config: &Config) -> Result<LoginResponse, ApiError> {
        let access_token =
            JwtAuth::create_token(user, &config.jwt_secret, config.jwt_expires_in_secs)?;
        Ok(LoginResponse {
            id: user.id,
            name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role,
            access_token,
        })
    }

    async fn send_otp_mail(
        deps: &AuthDeps<'_>,
        email: &str,
        subject: &str,
        otp: &str,
    ) -> Result<(), ApiError> {
        let html = otp_email(subject, otp, deps.config.otp_expiry_minutes);
        deps.mailer.send(email, subject, &html).await.map_err(|e| {
            log::error!("Failed to send OTP email to {}: {}", email, e);
            ApiError::InternalError("Failed to send OTP email".to_string())
        })
    }

    async fn find_by_email_or_404(pool: &PgPool, email: &str) -> Result<User, ApiError> {
        UserRepository::find_by_email(pool, email)
            .await?
            .filter(|u| !u.is_deleted)
            .ok_or_else(|| {
                log::warn!("No user with email {}", email);
                ApiError::NotFound("User not found".to_string())
            })
    }

    /// OTP must match and be unexpired
    fn check_otp(user: &User, otp: &str) -> Result<(), ApiError> {
        match (&user.otp, user.otp_expiry) {
            (Some(stored), Some(expiry)) if stored == otp => {
                if expiry < Utc::now() {
                    Err(ApiError::InvalidInput("OTP has expired".to_string()))
                } else {
                    Ok(())
                }
            }
            _ => Err(ApiError::InvalidInput("Invalid OTP".to_string())),
        }
    }

    /// Create an unverified account and mail its OTP
    /// DOCUMENTATION: The insert is rolled back when the mail cannot be sent
    pub async fn register(deps: &AuthDeps<'_>, req: RegisterRequest) -> Result<String, ApiError> {
        if UserRepository::find_by_email(deps.pool, &req.email)
            .await?
            .is_some()
        {
            return Err(ApiError::AlreadyExists("User already exists".to_string()));
        }

        deps.limiter.check(&req.email)?;

        let password_hash = PasswordAuth::hash_password(&req.password)?;
        let otp = generate_otp();
        let expiry = otp_expiry(Utc::now(), deps.config.otp_expiry_minutes);

        let mut tx = deps.pool.begin().await?;
        let user = UserRepository::create(&mut *tx, &req, &password_hash, &otp, expiry).await?;
        Self::send_otp_mail(deps, &user.email, "OTP Verification", &otp).await?;
        tx.commit().await?;

        log::info!("Registered user {} ({})", user.id, user.email);
        Ok("Please check mail to verify your email".to_string())
    }

    pub async fn login(deps: &AuthDeps<'_>, req: LoginRequest) -> Result<LoginOutcome, ApiError> {
        let user = Self::find_by_email_or_404(deps.pool, &req.email).await?;

        if !PasswordAuth::verify_password(&req.password, &user.password)? {
            return Err(ApiError::InvalidInput("Password incorrect".to_string()));
        }

        if user.role != UserRole::Admin && !user.is_email_verified {
            deps.limiter.check(&user.email)?;
            let otp = generate_otp();
            let expiry = otp_expiry(Utc::now(), deps.config.otp_expiry_minutes);
            UserRepository::set_otp(deps.pool, user.id, Some(&otp), Some(expiry)).await?;
            Self::send_otp_mail(deps, &user.email, "OTP Verification", &otp).await?;
            return Ok(LoginOutcome::VerificationRequired);
        }

        if let Some(guest_id) = req.guest_id {
            let moved = FavoriteRepository::migrate_guest(deps.pool, guest_id, user.id).await?;
            log::info!(
                "Moved {} favorites from guest {} to user {}",
                moved,
                guest_id,
                user.id
            );
        }

        Ok(LoginOutcome::LoggedIn(Self::login_response(
            &user,
            deps.config,
        )?))
    }

    pub async fn verify_email(
        pool: &PgPool,
        config: &Config,
        req: OtpRequest,
    ) -> Result<LoginResponse, ApiError> {
        let user = Self::find_by_email_or_404(pool, &req.email).await?;
        Self::check_otp(&user, &req.otp)?;

        let user = UserRepository::mark_email_verified(pool, user.id).await?;
        log::info!("Email verified for user {}", user.id);
        Self::login_response(&user, config)
    }

    pub async fn resend_verification(deps: &AuthDeps<'_>, email: &str) -> Result<(), ApiError> {
        let user = Self::find_by_email_or_404(deps.pool, email).await?;

        if user.status == UserStatus::Suspended {
            return Err(ApiError::Forbidden("User is Suspended".to_string()));
        }
        if user.is_email_verified {
            return Err(ApiError::InvalidInput(
                "Email is already verified".to_string(),
            ));
        }

        deps.limiter.check(&user.email)?;
        let otp = generate_otp();
        let expiry = otp_expiry(Utc::now(), deps.config.otp_expiry_minutes);
        UserRepository::set_otp(deps.pool, user.id, Some(&otp), Some(expiry)).await?;
        Self::send_otp_mail(deps, &user.email, "OTP Verification", &otp).await
    }

    pub async fn change_password(
        pool: &PgPool,
        user_id: Uuid,
        req: ChangePasswordRequest,
    ) -> Result<(), ApiError> {
        let user = UserRepository::get_active(pool, user_id).await?;
        if user.status != UserStatus::Active {
            return Err(ApiError::Forbidden("User is not active".to_string()));
        }

        if !PasswordAuth::verify_password(&req.old_password, &user.password)? {
            return Err(ApiError::InvalidInput("Password incorrect!".to_string()));
        }

        let hash = PasswordAuth::hash_password(&req.new_password)?;
        UserRepository::update_password(pool, user.id, &hash).await?;
        log::info!("Password changed for user {}", user.id);
        Ok(())
    }

    /// Store and mail a password-reset OTP
    /// DOCUMENTATION: The OTP is only persisted when the mail goes out
    pub async fn forget_password(deps: &AuthDeps<'_>, email: &str) -> Result<(), ApiError> {
        let user = Self::find_by_email_or_404(deps.pool, email).await?;

        if user.status == UserStatus::Suspended {
            return Err(ApiError::InvalidInput("User has suspended".to_string()));
        }

        let now = Utc::now();
        if let (true, Some(expiry)) = (user.has_pending_otp(now), user.otp_expiry) {
            return Err(ApiError::AlreadyExists(pending_otp_message(expiry, now)));
        }

        deps.limiter.check(&user.email)?;
        let otp = generate_otp();
        let expiry = otp_expiry(now, deps.config.otp_expiry_minutes);

        let mut tx = deps.pool.begin().await?;
        UserRepository::set_otp(&mut *tx, user.id, Some(&otp), Some(expiry)).await?;
        Self::send_otp_mail(deps, &user.email, "Password Reset", &otp).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Consume the reset OTP and hand out a reset token
    pub async fn verify_forgot_password_otp(
        pool: &PgPool,
        config: &Config,
        req: OtpRequest,
    ) -> Result<String, ApiError> {
        let user = UserRepository::find_by_email(pool, &req.email)
            .await?
            .ok_or_else(|| ApiError::NotFound("This user is not found!".to_string()))?;

        Self::check_otp(&user, &req.otp)?;
        UserRepository::set_otp(pool, user.id, None, None).await?;

        JwtAuth::create_reset_token(&user, &config.jwt_secret, config.reset_token_expires_in_secs)
    }

    pub async fn reset_password(
        pool: &PgPool,
        config: &Config,
        req: ResetPasswordRequest,
    ) -> Result<(), ApiError> {
        let claims = JwtAuth::verify_reset_token(&req.reset_token, &req.email, &config.jwt_secret)?;
        let user = Self::find_by_email_or_404(pool, &req.email).await?;
        if user.id != claims.sub {
            return Err(ApiError::Unauthorized(
                "Invalid or expired reset token".to_string(),
            ));
        }

        let hash = PasswordAuth::hash_password(&req.password)?;
        UserRepository::update_password(pool, user.id, &hash).await?;
        log::info!("Password reset for user {}", user.id);
        Ok(())
    }
}
