// src/matching/engine.rs

use std::cmp::Ordering;
use std::sync::Arc;

use super::scorer;
use super::store::{MatchLedger, ProfileRecord, ProfileStore};
use super::MatchError;
use crate::models::{
    match_record::{ConfirmedMatch, MatchResponse, NewSwipe, UserAction},
    profile::{ProfileSeed, RoommateProfile, UpsertProfileRequest},
};

/// Outcome of candidate discovery.
///
/// `NeedsProfile` is deliberately distinct from an empty ranked list: the
/// first means "send the user to profile setup", the second "nobody
/// compatible right now".
#[derive(Debug)]
pub enum Discovery {
    NeedsProfile,
    Ranked(Vec<MatchResponse>),
}

/// Orchestrates discovery, swipes and match listing over the storage seams.
///
/// Stateless between calls; everything lives in the stores, so concurrent
/// requests for different users need no coordination here.
#[derive(Clone)]
pub struct MatchEngine {
    profiles: Arc<dyn ProfileStore>,
    ledger: Arc<dyn MatchLedger>,
    /// Candidates scoring below this are never surfaced. Product-tunable.
    min_score: f64,
}

impl MatchEngine {
    pub fn new(profiles: Arc<dyn ProfileStore>, ledger: Arc<dyn MatchLedger>, min_score: f64) -> Self {
        Self {
            profiles,
            ledger,
            min_score,
        }
    }

    /// Ranked prospective matches for `user_id`.
    ///
    /// Excludes inactive profiles, everyone already swiped on (a pass hides
    /// a candidate forever too) and anyone under the relevance threshold.
    /// Ordering is deterministic: score descending, then profile id
    /// ascending, so paginating callers see a stable sequence.
    pub async fn discover(&self, user_id: i64) -> Result<Discovery, MatchError> {
        let Some(own) = self
            .profiles
            .find_by_user(user_id)
            .await?
            .filter(|p| p.is_active)
        else {
            return Ok(Discovery::NeedsProfile);
        };

        let candidates = self.profiles.active_candidates(user_id).await?;
        let already_swiped = self.ledger.swiped_profile_ids(user_id).await?;

        let mut ranked: Vec<MatchResponse> = candidates
            .into_iter()
            .filter(|candidate| !already_swiped.contains(&candidate.id))
            .filter_map(|candidate| {
                let score = scorer::compatibility(&own, &candidate);
                (score >= self.min_score).then(|| MatchResponse {
                    id: candidate.id,
                    profile: candidate,
                    compatibility_score: score,
                    is_new_match: false,
                })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.compatibility_score
                .partial_cmp(&a.compatibility_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(Discovery::Ranked(ranked))
    }

    /// Records one directed swipe and resolves reciprocity.
    ///
    /// `is_new_match` in the response is true only for the call that flipped
    /// the pair to matched; re-reads never report it again.
    pub async fn swipe(
        &self,
        user_id: i64,
        target_profile_id: i64,
        action: UserAction,
    ) -> Result<MatchResponse, MatchError> {
        let own = self
            .profiles
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| MatchError::ProfileNotFound(format!("user {} has no profile", user_id)))?;

        let target = self
            .profiles
            .find_by_id(target_profile_id)
            .await?
            .ok_or_else(|| {
                MatchError::ProfileNotFound(format!("profile {} does not exist", target_profile_id))
            })?;

        // Discovery never surfaces the requester's own profile, but a direct
        // swipe by id could still reach it; keep self-directed records out of
        // the ledger.
        if target.user_id == user_id {
            return Err(MatchError::InvalidProfile(
                "cannot swipe on your own profile".to_string(),
            ));
        }

        let score = scorer::compatibility(&own, &target);

        let outcome = self
            .ledger
            .record_swipe(NewSwipe {
                user_id_1: user_id,
                user_id_2: target.user_id,
                profile_id_1: own.id,
                profile_id_2: target.id,
                compatibility_score: score,
                action,
            })
            .await?;

        if outcome.is_new_match {
            tracing::info!(
                actor = user_id,
                target = target.user_id,
                score,
                "mutual match confirmed"
            );
        }

        Ok(MatchResponse {
            id: target.id,
            profile: target,
            compatibility_score: score,
            is_new_match: outcome.is_new_match,
        })
    }

    /// Confirmed matches for the user, most recent first, each joined with
    /// the other party's current profile (inactive profiles still resolve,
    /// so history keeps rendering).
    pub async fn confirmed_matches(&self, user_id: i64) -> Result<Vec<ConfirmedMatch>, MatchError> {
        let records = self.ledger.confirmed_for_user(user_id).await?;

        let mut matches = Vec::with_capacity(records.len());
        for record in records {
            let other_user = if record.user_id_1 == user_id {
                record.user_id_2
            } else {
                record.user_id_1
            };

            // A missing profile here means the account was deleted; the FK
            // cascade removes the record eventually, so just skip it.
            if let Some(profile) = self.profiles.find_by_user(other_user).await? {
                matches.push(ConfirmedMatch { record, profile });
            }
        }

        Ok(matches)
    }

    /// The user's own profile, active or not.
    pub async fn profile_of(&self, user_id: i64) -> Result<Option<RoommateProfile>, MatchError> {
        self.profiles.find_by_user(user_id).await
    }

    /// Insert-or-update the user's profile.
    ///
    /// On first creation, fields absent from the request fall back to the
    /// registration `seed`, then to defaults. On update, absent fields keep
    /// their current value; the seed is never consulted again. `id` and
    /// `created_at` survive every update.
    pub async fn upsert_profile(
        &self,
        user_id: i64,
        draft: UpsertProfileRequest,
        seed: Option<ProfileSeed>,
    ) -> Result<RoommateProfile, MatchError> {
        let existing = self.profiles.find_by_user(user_id).await?;

        let record = match existing {
            Some(current) => ProfileRecord {
                user_id,
                display_name: draft.display_name.unwrap_or(current.display_name),
                age: draft.age.unwrap_or(current.age),
                gender: draft.gender.unwrap_or(current.gender),
                occupation: draft.occupation.unwrap_or(current.occupation),
                bio: draft.bio.unwrap_or(current.bio),
                profile_pictures: draft.profile_pictures.unwrap_or(current.profile_pictures),
                budget_min: draft.budget_min.unwrap_or(current.budget_min),
                budget_max: draft.budget_max.unwrap_or(current.budget_max),
                preferred_locations: draft
                    .preferred_locations
                    .unwrap_or(current.preferred_locations),
                cleanliness: draft.cleanliness.unwrap_or(current.cleanliness),
                social_level: draft.social_level.unwrap_or(current.social_level),
                noise_level: draft.noise_level.unwrap_or(current.noise_level),
                smoking_ok: draft.smoking_ok.unwrap_or(current.smoking_ok),
                pets_ok: draft.pets_ok.unwrap_or(current.pets_ok),
                interests: draft.interests.unwrap_or(current.interests),
                is_active: draft.is_active.unwrap_or(current.is_active),
            },
            None => {
                let seed = seed.unwrap_or_default();
                ProfileRecord {
                    user_id,
                    display_name: draft
                        .display_name
                        .or(seed.display_name)
                        .unwrap_or_default(),
                    age: draft.age.or(seed.age).unwrap_or(0),
                    gender: draft.gender.or(seed.gender).unwrap_or_default(),
                    occupation: draft.occupation.or(seed.occupation).unwrap_or_default(),
                    bio: draft.bio.or(seed.bio).unwrap_or_default(),
                    profile_pictures: draft.profile_pictures.unwrap_or_default(),
                    budget_min: draft.budget_min.or(seed.budget).unwrap_or(0.0),
                    budget_max: draft.budget_max.or(seed.budget).unwrap_or(0.0),
                    preferred_locations: draft.preferred_locations.unwrap_or_else(|| {
                        seed.location.map(|l| vec![l]).unwrap_or_default()
                    }),
                    cleanliness: draft.cleanliness.or(seed.cleanliness).unwrap_or(3),
                    social_level: draft.social_level.unwrap_or(3),
                    noise_level: draft.noise_level.unwrap_or(3),
                    smoking_ok: draft.smoking_ok.or(seed.smoking_ok).unwrap_or(false),
                    pets_ok: draft.pets_ok.or(seed.pets_ok).unwrap_or(false),
                    interests: draft.interests.unwrap_or_default(),
                    is_active: draft.is_active.unwrap_or(true),
                }
            }
        };

        validate_profile(&record)?;

        self.profiles.upsert(record).await
    }
}

/// Rejects malformed profiles before anything reaches the store.
fn validate_profile(record: &ProfileRecord) -> Result<(), MatchError> {
    if record.budget_min < 0.0 {
        return Err(MatchError::InvalidProfile(
            "budgetMin must not be negative".to_string(),
        ));
    }
    if record.budget_min > record.budget_max {
        return Err(MatchError::InvalidProfile(
            "budgetMin must not exceed budgetMax".to_string(),
        ));
    }
    if record.age < 0 {
        return Err(MatchError::InvalidProfile(
            "age must not be negative".to_string(),
        ));
    }
    for (name, value) in [
        ("cleanliness", record.cleanliness),
        ("socialLevel", record.social_level),
        ("noiseLevel", record.noise_level),
    ] {
        if !(1..=5).contains(&value) {
            return Err(MatchError::InvalidProfile(format!(
                "{} must be on the 1-5 scale",
                name
            )));
        }
    }
    Ok(())
}
