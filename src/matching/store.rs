// src/matching/store.rs
//
// Storage seams for the matching engine. The engine only ever talks to these
// two traits; Postgres backs them in production (`pg`), a HashMap-backed
// store (`memory`) backs the engine test suite.

use std::collections::HashSet;

use async_trait::async_trait;

use super::MatchError;
use crate::models::{
    match_record::{MatchRecord, NewSwipe, SwipeOutcome},
    profile::RoommateProfile,
};

/// Draft of a profile with every invariant already enforced by the engine:
/// the store persists it verbatim, preserving `id`/`created_at` when a row
/// for the user already exists.
#[derive(Debug, Clone)]
pub struct ProfileRecord {
    pub user_id: i64,
    pub display_name: String,
    pub age: i32,
    pub gender: String,
    pub occupation: String,
    pub bio: String,
    pub profile_pictures: Vec<String>,
    pub budget_min: f64,
    pub budget_max: f64,
    pub preferred_locations: Vec<String>,
    pub cleanliness: i32,
    pub social_level: i32,
    pub noise_level: i32,
    pub smoking_ok: bool,
    pub pets_ok: bool,
    pub interests: Vec<String>,
    pub is_active: bool,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Profile owned by `user_id`, active or not.
    async fn find_by_user(&self, user_id: i64) -> Result<Option<RoommateProfile>, MatchError>;

    /// Profile by its own id, active or not.
    async fn find_by_id(&self, profile_id: i64) -> Result<Option<RoommateProfile>, MatchError>;

    /// All active profiles not owned by `excluding_user`.
    async fn active_candidates(
        &self,
        excluding_user: i64,
    ) -> Result<Vec<RoommateProfile>, MatchError>;

    /// Insert-or-replace keyed by `user_id`. An existing row keeps its `id`
    /// and `created_at`; `updated_at` is bumped either way.
    async fn upsert(&self, record: ProfileRecord) -> Result<RoommateProfile, MatchError>;
}

#[async_trait]
pub trait MatchLedger: Send + Sync {
    /// Profile ids the actor has already swiped on, regardless of action.
    async fn swiped_profile_ids(&self, actor_user_id: i64) -> Result<HashSet<i64>, MatchError>;

    /// Appends one directed swipe and resolves reciprocity atomically.
    ///
    /// Implementations must guarantee, under concurrency, that
    /// * a second append for the same direction fails with `DuplicateSwipe`
    ///   rather than creating a second row, and
    /// * when both directions of a pair are appended, exactly one of the two
    ///   calls observes the reverse record and performs the matched flip
    ///   (setting both records' status/`matched_at` and the reverse record's
    ///   `user2_action`).
    ///
    /// The reciprocity rule itself is `UserAction::is_positive` on both the
    /// incoming action and the reverse record's `user1_action`.
    async fn record_swipe(&self, swipe: NewSwipe) -> Result<SwipeOutcome, MatchError>;

    /// Matched records involving the user, most recently matched first.
    async fn confirmed_for_user(&self, user_id: i64) -> Result<Vec<MatchRecord>, MatchError>;
}
