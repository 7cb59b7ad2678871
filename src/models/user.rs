// src/models/user.rs
// DOCUMENTATION: User account records and request/response DTOs
// PURPOSE: Separate stored credentials from what the API exposes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::{UserRole, UserStatus};

/// Complete user row, including secrets
/// DOCUMENTATION: Never serialized; convert with to_profile() first
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub is_email_verified: bool,
    pub otp: Option<String>,
    pub otp_expiry: Option<DateTime<Utc>>,
    pub describe: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub profile: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub has_premium_access: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub describe: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub profile: Option<String>,
    pub is_email_verified: bool,
    pub has_premium_access: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            role: self.role,
            status: self.status,
            describe: self.describe.clone(),
            city: self.city.clone(),
            address: self.address.clone(),
            profile: self.profile.clone(),
            is_email_verified: self.is_email_verified,
            has_premium_access: self.has_premium_access,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Whether a stored OTP is present and still valid
    pub fn has_pending_otp(&self, now: DateTime<Utc>) -> bool {
        matches!((&self.otp, self.otp_expiry), (Some(_), Some(expiry)) if expiry > now)
    }
}

/// POST /auth/register
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
}

/// POST /auth/login
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    /// Guest whose favorites should be moved to this account
    pub guest_id: Option<Uuid>,
}

/// Access token payload returned after login or email verification
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub access_token: String,
}

/// Body carrying email + OTP
#[derive(Debug, Deserialize, Validate)]
pub struct OtpRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(equal = 6))]
    pub otp: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub old_password: String,
    #[validate(length(min = 6, max = 128))]
    pub new_password: String,
}

/// POST /auth/reset-password
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    /// Token returned by /auth/verify-forgot-password-otp
    #[validate(length(min = 1))]
    pub reset_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetTokenResponse {
    pub message: String,
    pub reset_token: String,
}

/// PUT /user/update-profile
/// DOCUMENTATION: email and role are deliberately absent
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 120))]
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub describe: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileImageRequest {
    #[validate(url)]
    pub profile: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: UserStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            full_name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "$argon2id$secret".into(),
            phone_number: None,
            role: UserRole::User,
            status: UserStatus::Active,
            is_email_verified: false,
            otp: Some("123456".into()),
            otp_expiry: Some(now + Duration::minutes(5)),
            describe: None,
            city: Some("Lisbon".into()),
            address: None,
            profile: None,
            stripe_customer_id: None,
            has_premium_access: false,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_profile_hides_secrets() {
        let json = serde_json::to_value(sample_user().to_profile()).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("otp").is_none());
        assert_eq!(json["fullName"], "Ada");
        assert_eq!(json["role"], "USER");
    }

    #[test]
    fn test_pending_otp() {
        let mut user = sample_user();
        assert!(user.has_pending_otp(Utc::now()));

        user.otp_expiry = Some(Utc::now() - Duration::minutes(1));
        assert!(!user.has_pending_otp(Utc::now()));

        user.otp = None;
        user.otp_expiry = Some(Utc::now() + Duration::minutes(1));
        assert!(!user.has_pending_otp(Utc::now()));
    }

    #[test]
    fn test_register_validation() {
        let req = RegisterRequest {
            full_name: "Ada".into(),
            email: "not-an-email".into(),
            password: "123".into(),
            phone_number: None,
            city: None,
            address: None,
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }
}
