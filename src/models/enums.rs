// src/models/enums.rs
// DOCUMENTATION: Enumerations shared by models, database and API
// PURPOSE: Mirror the PostgreSQL enum types declared in migrations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role stored in `user_role`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Ok(UserRole::User),
            "ADMIN" => Ok(UserRole::Admin),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account status stored in `user_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

/// Top-level place category stored in `category_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "category_type")]
pub enum CategoryType {
    #[sqlx(rename = "Beach_Life")]
    #[serde(rename = "Beach_Life")]
    BeachLife,
    #[sqlx(rename = "City_Life")]
    #[serde(rename = "City_Life")]
    CityLife,
    #[sqlx(rename = "Mountain_Life")]
    #[serde(rename = "Mountain_Life")]
    MountainLife,
    #[sqlx(rename = "Nature_Life")]
    #[serde(rename = "Nature_Life")]
    NatureLife,
    #[sqlx(rename = "Cultural_Life")]
    #[serde(rename = "Cultural_Life")]
    CulturalLife,
    #[sqlx(rename = "Night_Life")]
    #[serde(rename = "Night_Life")]
    NightLife,
}

impl CategoryType {
    pub const ALL: [CategoryType; 6] = [
        CategoryType::BeachLife,
        CategoryType::CityLife,
        CategoryType::MountainLife,
        CategoryType::NatureLife,
        CategoryType::CulturalLife,
        CategoryType::NightLife,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::BeachLife => "Beach_Life",
            CategoryType::CityLife => "City_Life",
            CategoryType::MountainLife => "Mountain_Life",
            CategoryType::NatureLife => "Nature_Life",
            CategoryType::CulturalLife => "Cultural_Life",
            CategoryType::NightLife => "Night_Life",
        }
    }
}

impl FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryType::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Invalid category type: {}", s))
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access level of a place stored in `subscription_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionType {
    Free,
    Premium,
}

/// Lifecycle of a payment stored in `payment_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
    Canceled,
}

/// Who owns a favorite: a registered user or an anonymous guest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OwnerType {
    User,
    Guest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip_names() {
        for category in CategoryType::ALL {
            assert_eq!(CategoryType::from_str(category.as_str()), Ok(category));
        }
        assert!(CategoryType::from_str("beach_life").is_err());
    }

    #[test]
    fn test_category_serde_uses_db_names() {
        let json = serde_json::to_string(&CategoryType::NightLife).unwrap();
        assert_eq!(json, "\"Night_Life\"");
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(UserRole::from_str("admin"), Ok(UserRole::Admin));
        assert_eq!(UserRole::from_str("USER"), Ok(UserRole::User));
        assert!(UserRole::from_str("GUEST").is_err());
    }

    #[test]
    fn test_owner_type_deserialize() {
        let owner: OwnerType = serde_json::from_str("\"GUEST\"").unwrap();
        assert_eq!(owner, OwnerType::Guest);
        assert!(serde_json::from_str::<OwnerType>("\"ROBOT\"").is_err());
    }
}
