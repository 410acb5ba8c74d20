// src/models/match_record.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::profile::RoommateProfile;

/// One user's swipe decision on another profile.
///
/// Stored and serialized as symbolic names ('like', 'super_like', ...) so the
/// database stays self-describing; never integer-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_action", rename_all = "snake_case")]
pub enum UserAction {
    None,
    Like,
    Pass,
    SuperLike,
}

impl UserAction {
    /// Whether this action can participate in a mutual match.
    /// A super-like carries the same reciprocity weight as a like.
    pub fn is_positive(self) -> bool {
        matches!(self, UserAction::Like | UserAction::SuperLike)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "match_status", rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    Matched,
    Rejected,
    Expired,
}

/// Represents the 'matches' table: one directed swipe and its derived match
/// state. Written once at swipe time; mutated at most once more, when the
/// reverse swipe flips the pair to matched.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: i64,

    /// Actor who swiped.
    pub user_id_1: i64,
    /// Owner of the swiped profile.
    pub user_id_2: i64,
    pub profile_id_1: i64,
    pub profile_id_2: i64,

    /// Compatibility at swipe time, 0-100 with two decimals.
    pub compatibility_score: f64,
    pub status: MatchStatus,
    pub user1_action: UserAction,
    pub user2_action: UserAction,

    /// Set once when the mutual like is detected, never cleared.
    pub matched_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Input for appending a swipe to the ledger.
#[derive(Debug, Clone)]
pub struct NewSwipe {
    pub user_id_1: i64,
    pub user_id_2: i64,
    pub profile_id_1: i64,
    pub profile_id_2: i64,
    pub compatibility_score: f64,
    pub action: UserAction,
}

/// What the ledger reports back after an append.
#[derive(Debug, Clone)]
pub struct SwipeOutcome {
    pub record: MatchRecord,
    /// True only for the call that flipped the pair to matched.
    pub is_new_match: bool,
}

/// DTO for the swipe endpoint body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeRequest {
    pub profile_id: i64,
    pub action: UserAction,
}

/// DTO for discovery and swipe responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    /// The candidate's profile id.
    pub id: i64,
    pub profile: RoommateProfile,
    pub compatibility_score: f64,
    pub is_new_match: bool,
}

/// A confirmed match joined with the other party's current profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedMatch {
    pub record: MatchRecord,
    pub profile: RoommateProfile,
}
