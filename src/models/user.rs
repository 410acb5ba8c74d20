// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'users' table in the database.
///
/// Besides the account credentials this carries the registration
/// questionnaire answers (free-text budget range, yes/no smoking preference,
/// ...). Those are only read once, to seed a roommate profile on first
/// creation; the profile is the source of truth afterwards.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique login email.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub full_name: String,

    pub age: Option<i32>,
    pub gender: Option<String>,
    pub occupation: Option<String>,
    pub about_me: Option<String>,
    /// 'high' / 'medium' / 'low'.
    pub cleanliness_level: Option<String>,
    /// 'yes' / 'no'.
    pub smoking_preference: Option<String>,
    /// 'yes' / 'no'.
    pub pet_friendly: Option<String>,
    /// Single number as text, e.g. "1200".
    pub budget_range: Option<String>,
    pub location_preference: Option<String>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,

    #[validate(length(
        min = 8,
        max = 128,
        message = "Password length must be between 8 and 128 characters."
    ))]
    pub password: String,

    #[validate(length(
        min = 1,
        max = 100,
        message = "Full name must be between 1 and 100 characters."
    ))]
    pub full_name: String,

    #[validate(range(min = 16, max = 120, message = "Age must be between 16 and 120."))]
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub occupation: Option<String>,
    pub about_me: Option<String>,
    pub cleanliness_level: Option<String>,
    pub smoking_preference: Option<String>,
    pub pet_friendly: Option<String>,
    pub budget_range: Option<String>,
    pub location_preference: Option<String>,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Aggregated account data for the current user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Whether a roommate profile exists; the UI routes to profile setup when false.
    pub has_profile: bool,
}
