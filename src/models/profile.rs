// src/models/profile.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::user::User;

/// Represents the 'roommate_profiles' table in the database.
///
/// Exactly one profile per user; upserts preserve `id` and `created_at`.
/// Inactive profiles are hidden from discovery but kept so match history
/// still resolves.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoommateProfile {
    pub id: i64,
    pub user_id: i64,

    pub display_name: String,
    pub age: i32,
    pub gender: String,
    pub occupation: String,
    pub bio: String,
    /// Ordered picture references; order matters for display only.
    pub profile_pictures: Vec<String>,

    pub budget_min: f64,
    pub budget_max: f64,
    pub preferred_locations: Vec<String>,

    /// 1-5 scales.
    pub cleanliness: i32,
    pub social_level: i32,
    pub noise_level: i32,
    pub smoking_ok: bool,
    pub pets_ok: bool,

    pub interests: Vec<String>,
    pub is_active: bool,

    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating or updating a roommate profile.
///
/// Every field is optional: on first creation, missing fields fall back to
/// the registration seed (then to defaults); on update, missing fields keep
/// their current value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProfileRequest {
    #[validate(length(max = 100, message = "Display name must be at most 100 characters."))]
    pub display_name: Option<String>,

    #[validate(range(min = 0, max = 120))]
    pub age: Option<i32>,
    pub gender: Option<String>,
    #[validate(length(max = 100))]
    pub occupation: Option<String>,
    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters."))]
    pub bio: Option<String>,
    pub profile_pictures: Option<Vec<String>>,

    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub preferred_locations: Option<Vec<String>>,

    #[validate(range(min = 1, max = 5))]
    pub cleanliness: Option<i32>,
    #[validate(range(min = 1, max = 5))]
    pub social_level: Option<i32>,
    #[validate(range(min = 1, max = 5))]
    pub noise_level: Option<i32>,
    pub smoking_ok: Option<bool>,
    pub pets_ok: Option<bool>,

    pub interests: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Registration-time answers converted to typed profile defaults.
///
/// Applied exactly once, when a user's profile is first created; later
/// upserts never consult the seed again.
#[derive(Debug, Clone, Default)]
pub struct ProfileSeed {
    pub display_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub occupation: Option<String>,
    pub bio: Option<String>,
    pub cleanliness: Option<i32>,
    pub smoking_ok: Option<bool>,
    pub pets_ok: Option<bool>,
    pub budget: Option<f64>,
    pub location: Option<String>,
}

impl ProfileSeed {
    /// Maps the free-text registration answers onto profile fields.
    /// 'high'/'medium'/'low' cleanliness becomes 5/3/1; unknown text means 3.
    pub fn from_user(user: &User) -> Self {
        let cleanliness = user.cleanliness_level.as_deref().map(|level| {
            match level.trim().to_lowercase().as_str() {
                "high" => 5,
                "medium" => 3,
                "low" => 1,
                _ => 3,
            }
        });

        let yes = |value: &Option<String>| {
            value
                .as_deref()
                .map(|v| v.trim().eq_ignore_ascii_case("yes"))
        };

        Self {
            display_name: Some(user.full_name.clone()),
            age: user.age,
            gender: user.gender.clone(),
            occupation: user.occupation.clone(),
            bio: user.about_me.clone(),
            cleanliness,
            smoking_ok: yes(&user.smoking_preference),
            pets_ok: yes(&user.pet_friendly),
            budget: user
                .budget_range
                .as_deref()
                .and_then(|b| b.trim().parse::<f64>().ok()),
            location: user.location_preference.clone(),
        }
    }
}
