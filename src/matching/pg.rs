// src/matching/pg.rs
//
// Postgres implementation of the storage seams, sharing the application's
// `PgPool`. Uniqueness of a swipe direction is enforced by the
// (user_id_1, profile_id_2) unique index; the reciprocity read-then-write is
// serialized by locking both participating profile rows in id order, so two
// simultaneous mutual likes cannot both miss the reverse record.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;

use super::MatchError;
use super::store::{MatchLedger, ProfileRecord, ProfileStore};
use crate::models::{
    match_record::{MatchRecord, MatchStatus, NewSwipe, SwipeOutcome},
    profile::RoommateProfile,
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn find_by_user(&self, user_id: i64) -> Result<Option<RoommateProfile>, MatchError> {
        let profile =
            sqlx::query_as::<_, RoommateProfile>("SELECT * FROM roommate_profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(profile)
    }

    async fn find_by_id(&self, profile_id: i64) -> Result<Option<RoommateProfile>, MatchError> {
        let profile =
            sqlx::query_as::<_, RoommateProfile>("SELECT * FROM roommate_profiles WHERE id = $1")
                .bind(profile_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(profile)
    }

    async fn active_candidates(
        &self,
        excluding_user: i64,
    ) -> Result<Vec<RoommateProfile>, MatchError> {
        let profiles = sqlx::query_as::<_, RoommateProfile>(
            "SELECT * FROM roommate_profiles WHERE is_active AND user_id <> $1",
        )
        .bind(excluding_user)
        .fetch_all(&self.pool)
        .await?;
        Ok(profiles)
    }

    async fn upsert(&self, record: ProfileRecord) -> Result<RoommateProfile, MatchError> {
        // ON CONFLICT keeps id and created_at from the existing row.
        let profile = sqlx::query_as::<_, RoommateProfile>(
            r#"
            INSERT INTO roommate_profiles (
                user_id, display_name, age, gender, occupation, bio,
                profile_pictures, budget_min, budget_max, preferred_locations,
                cleanliness, social_level, noise_level, smoking_ok, pets_ok,
                interests, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT (user_id) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                age = EXCLUDED.age,
                gender = EXCLUDED.gender,
                occupation = EXCLUDED.occupation,
                bio = EXCLUDED.bio,
                profile_pictures = EXCLUDED.profile_pictures,
                budget_min = EXCLUDED.budget_min,
                budget_max = EXCLUDED.budget_max,
                preferred_locations = EXCLUDED.preferred_locations,
                cleanliness = EXCLUDED.cleanliness,
                social_level = EXCLUDED.social_level,
                noise_level = EXCLUDED.noise_level,
                smoking_ok = EXCLUDED.smoking_ok,
                pets_ok = EXCLUDED.pets_ok,
                interests = EXCLUDED.interests,
                is_active = EXCLUDED.is_active,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(record.user_id)
        .bind(record.display_name)
        .bind(record.age)
        .bind(record.gender)
        .bind(record.occupation)
        .bind(record.bio)
        .bind(record.profile_pictures)
        .bind(record.budget_min)
        .bind(record.budget_max)
        .bind(record.preferred_locations)
        .bind(record.cleanliness)
        .bind(record.social_level)
        .bind(record.noise_level)
        .bind(record.smoking_ok)
        .bind(record.pets_ok)
        .bind(record.interests)
        .bind(record.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }
}

#[async_trait]
impl MatchLedger for PgStore {
    async fn swiped_profile_ids(&self, actor_user_id: i64) -> Result<HashSet<i64>, MatchError> {
        let rows: Vec<(i64,)> =
            sqlx::query_as("SELECT profile_id_2 FROM matches WHERE user_id_1 = $1")
                .bind(actor_user_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn record_swipe(&self, swipe: NewSwipe) -> Result<SwipeOutcome, MatchError> {
        let mut tx = self.pool.begin().await?;

        // Both directions of a pair lock the same two rows in the same
        // order, so the duplicate check and reverse lookup below run
        // serialized per pair.
        sqlx::query("SELECT id FROM roommate_profiles WHERE id = ANY($1) ORDER BY id FOR UPDATE")
            .bind(vec![swipe.profile_id_1, swipe.profile_id_2])
            .fetch_all(&mut *tx)
            .await?;

        let duplicate: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM matches WHERE user_id_1 = $1 AND profile_id_2 = $2")
                .bind(swipe.user_id_1)
                .bind(swipe.profile_id_2)
                .fetch_optional(&mut *tx)
                .await?;
        if duplicate.is_some() {
            return Err(MatchError::DuplicateSwipe);
        }

        let reverse = sqlx::query_as::<_, MatchRecord>(
            "SELECT * FROM matches WHERE user_id_1 = $1 AND profile_id_2 = $2",
        )
        .bind(swipe.user_id_2)
        .bind(swipe.profile_id_1)
        .fetch_optional(&mut *tx)
        .await?;

        let is_new_match = swipe.action.is_positive()
            && reverse
                .as_ref()
                .map(|r| r.user1_action.is_positive())
                .unwrap_or(false);

        let status = if is_new_match {
            MatchStatus::Matched
        } else {
            MatchStatus::Pending
        };

        let record = sqlx::query_as::<_, MatchRecord>(
            r#"
            INSERT INTO matches (
                user_id_1, user_id_2, profile_id_1, profile_id_2,
                compatibility_score, status, user1_action, matched_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, CASE WHEN $8 THEN now() ELSE NULL END)
            RETURNING *
            "#,
        )
        .bind(swipe.user_id_1)
        .bind(swipe.user_id_2)
        .bind(swipe.profile_id_1)
        .bind(swipe.profile_id_2)
        .bind(swipe.compatibility_score)
        .bind(status)
        .bind(swipe.action)
        .bind(is_new_match)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            // Unique index backstop for a concurrent writer on this direction.
            if e.to_string().contains("unique constraint") || e.to_string().contains("23505") {
                MatchError::DuplicateSwipe
            } else {
                MatchError::from(e)
            }
        })?;

        if is_new_match {
            if let Some(reverse) = &reverse {
                // The reverse record becomes the canonical bidirectional one:
                // it carries both sides' actions.
                sqlx::query(
                    "UPDATE matches SET status = $1, matched_at = now(), user2_action = $2 WHERE id = $3",
                )
                .bind(MatchStatus::Matched)
                .bind(swipe.action)
                .bind(reverse.id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Ok(SwipeOutcome {
            record,
            is_new_match,
        })
    }

    async fn confirmed_for_user(&self, user_id: i64) -> Result<Vec<MatchRecord>, MatchError> {
        let records = sqlx::query_as::<_, MatchRecord>(
            r#"
            SELECT * FROM matches
            WHERE status = $1 AND (user_id_1 = $2 OR user_id_2 = $2)
            ORDER BY matched_at DESC, id DESC
            "#,
        )
        .bind(MatchStatus::Matched)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}
