// src/matching/memory.rs
//
// In-memory implementation of the storage seams. Thread-safe via
// `tokio::sync::RwLock`; data is lost on drop. Backs the engine test suite
// and works as a throwaway dev fixture.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::MatchError;
use super::store::{MatchLedger, ProfileRecord, ProfileStore};
use crate::models::{
    match_record::{MatchRecord, MatchStatus, NewSwipe, SwipeOutcome, UserAction},
    profile::RoommateProfile,
};

#[derive(Debug, Default)]
struct Inner {
    /// Keyed by owning user id (one profile per user).
    profiles: HashMap<i64, RoommateProfile>,
    records: Vec<MatchRecord>,
    next_profile_id: i64,
    next_record_id: i64,
}

/// HashMap-backed store. Atomicity for the swipe ledger comes from holding
/// the write guard across the whole check-insert-flip sequence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record count in the ledger (for tests).
    pub async fn ledger_len(&self) -> usize {
        self.inner.read().await.records.len()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_by_user(&self, user_id: i64) -> Result<Option<RoommateProfile>, MatchError> {
        Ok(self.inner.read().await.profiles.get(&user_id).cloned())
    }

    async fn find_by_id(&self, profile_id: i64) -> Result<Option<RoommateProfile>, MatchError> {
        Ok(self
            .inner
            .read()
            .await
            .profiles
            .values()
            .find(|p| p.id == profile_id)
            .cloned())
    }

    async fn active_candidates(
        &self,
        excluding_user: i64,
    ) -> Result<Vec<RoommateProfile>, MatchError> {
        Ok(self
            .inner
            .read()
            .await
            .profiles
            .values()
            .filter(|p| p.is_active && p.user_id != excluding_user)
            .cloned()
            .collect())
    }

    async fn upsert(&self, record: ProfileRecord) -> Result<RoommateProfile, MatchError> {
        let mut inner = self.inner.write().await;
        let now = chrono::Utc::now();

        let (id, created_at) = match inner.profiles.get(&record.user_id) {
            Some(existing) => (existing.id, existing.created_at),
            None => {
                inner.next_profile_id += 1;
                (inner.next_profile_id, now)
            }
        };

        let profile = RoommateProfile {
            id,
            user_id: record.user_id,
            display_name: record.display_name,
            age: record.age,
            gender: record.gender,
            occupation: record.occupation,
            bio: record.bio,
            profile_pictures: record.profile_pictures,
            budget_min: record.budget_min,
            budget_max: record.budget_max,
            preferred_locations: record.preferred_locations,
            cleanliness: record.cleanliness,
            social_level: record.social_level,
            noise_level: record.noise_level,
            smoking_ok: record.smoking_ok,
            pets_ok: record.pets_ok,
            interests: record.interests,
            is_active: record.is_active,
            created_at,
            updated_at: now,
        };

        inner.profiles.insert(record.user_id, profile.clone());
        Ok(profile)
    }
}

#[async_trait]
impl MatchLedger for MemoryStore {
    async fn swiped_profile_ids(&self, actor_user_id: i64) -> Result<HashSet<i64>, MatchError> {
        Ok(self
            .inner
            .read()
            .await
            .records
            .iter()
            .filter(|r| r.user_id_1 == actor_user_id)
            .map(|r| r.profile_id_2)
            .collect())
    }

    async fn record_swipe(&self, swipe: NewSwipe) -> Result<SwipeOutcome, MatchError> {
        // One write guard for the whole check-insert-flip sequence.
        let mut inner = self.inner.write().await;
        let now = chrono::Utc::now();

        let duplicate = inner
            .records
            .iter()
            .any(|r| r.user_id_1 == swipe.user_id_1 && r.profile_id_2 == swipe.profile_id_2);
        if duplicate {
            return Err(MatchError::DuplicateSwipe);
        }

        let reverse_positive = inner
            .records
            .iter()
            .position(|r| r.user_id_1 == swipe.user_id_2 && r.profile_id_2 == swipe.profile_id_1)
            .map(|idx| (idx, inner.records[idx].user1_action.is_positive()));

        let is_new_match = match reverse_positive {
            Some((_, true)) => swipe.action.is_positive(),
            _ => false,
        };

        if is_new_match {
            if let Some((idx, _)) = reverse_positive {
                let reverse = &mut inner.records[idx];
                reverse.status = MatchStatus::Matched;
                reverse.matched_at = Some(now);
                reverse.user2_action = swipe.action;
            }
        }

        inner.next_record_id += 1;
        let record = MatchRecord {
            id: inner.next_record_id,
            user_id_1: swipe.user_id_1,
            user_id_2: swipe.user_id_2,
            profile_id_1: swipe.profile_id_1,
            profile_id_2: swipe.profile_id_2,
            compatibility_score: swipe.compatibility_score,
            status: if is_new_match {
                MatchStatus::Matched
            } else {
                MatchStatus::Pending
            },
            user1_action: swipe.action,
            user2_action: UserAction::None,
            matched_at: if is_new_match { Some(now) } else { None },
            created_at: now,
        };
        inner.records.push(record.clone());

        Ok(SwipeOutcome {
            record,
            is_new_match,
        })
    }

    async fn confirmed_for_user(&self, user_id: i64) -> Result<Vec<MatchRecord>, MatchError> {
        let mut matched: Vec<MatchRecord> = self
            .inner
            .read()
            .await
            .records
            .iter()
            .filter(|r| {
                r.status == MatchStatus::Matched
                    && (r.user_id_1 == user_id || r.user_id_2 == user_id)
            })
            .cloned()
            .collect();

        // Both records of a freshly flipped pair share one matched_at;
        // fall back to record id so the listing order is stable.
        matched.sort_by(|a, b| b.matched_at.cmp(&a.matched_at).then(b.id.cmp(&a.id)));
        Ok(matched)
    }
}
