// tests/engine_tests.rs
//
// Matching engine behavior against the in-memory store: discovery rules,
// swipe reciprocity, ledger invariants and profile upsert semantics.

use std::sync::Arc;

use homemate::matching::MatchError;
use homemate::matching::engine::{Discovery, MatchEngine};
use homemate::matching::memory::MemoryStore;
use homemate::models::match_record::{MatchStatus, UserAction};
use homemate::models::profile::{ProfileSeed, UpsertProfileRequest};

const MIN_SCORE: f64 = 50.0;

fn engine_with_store() -> (MatchEngine, MemoryStore) {
    let store = MemoryStore::new();
    let shared = Arc::new(store.clone());
    let engine = MatchEngine::new(shared.clone(), shared, MIN_SCORE);
    (engine, store)
}

/// A profile draft that scores 100 against itself.
fn base_draft(name: &str) -> UpsertProfileRequest {
    UpsertProfileRequest {
        display_name: Some(name.to_string()),
        age: Some(25),
        budget_min: Some(1000.0),
        budget_max: Some(1500.0),
        preferred_locations: Some(vec!["downtown".to_string()]),
        cleanliness: Some(3),
        social_level: Some(3),
        noise_level: Some(3),
        smoking_ok: Some(false),
        pets_ok: Some(false),
        interests: Some(vec!["cooking".to_string()]),
        ..Default::default()
    }
}

/// A draft engineered to score far below the discovery threshold against
/// `base_draft` profiles.
fn incompatible_draft(name: &str) -> UpsertProfileRequest {
    UpsertProfileRequest {
        budget_min: Some(5000.0),
        budget_max: Some(5100.0),
        preferred_locations: Some(vec!["far-away".to_string()]),
        cleanliness: Some(5),
        social_level: Some(1),
        noise_level: Some(5),
        smoking_ok: Some(true),
        pets_ok: Some(true),
        interests: Some(vec!["parkour".to_string()]),
        ..base_draft(name)
    }
}

fn ranked(discovery: Discovery) -> Vec<homemate::models::match_record::MatchResponse> {
    match discovery {
        Discovery::Ranked(matches) => matches,
        Discovery::NeedsProfile => panic!("expected a ranked list, got NeedsProfile"),
    }
}

#[tokio::test]
async fn discovery_without_profile_signals_needs_profile() {
    let (engine, _) = engine_with_store();

    let discovery = engine.discover(1).await.unwrap();
    assert!(matches!(discovery, Discovery::NeedsProfile));
}

#[tokio::test]
async fn discovery_ranks_compatible_candidates_and_hides_low_scores() {
    let (engine, _) = engine_with_store();

    engine.upsert_profile(1, base_draft("Me"), None).await.unwrap();
    engine.upsert_profile(2, base_draft("Good"), None).await.unwrap();
    engine
        .upsert_profile(3, incompatible_draft("Bad"), None)
        .await
        .unwrap();

    let matches = ranked(engine.discover(1).await.unwrap());

    // The incompatible candidate never surfaces; the compatible one does,
    // and never the requester's own profile.
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].profile.user_id, 2);
    assert_eq!(matches[0].compatibility_score, 100.0);
    assert!(!matches[0].is_new_match);
}

#[tokio::test]
async fn discovery_orders_by_score_then_profile_id() {
    let (engine, _) = engine_with_store();

    engine.upsert_profile(1, base_draft("Me"), None).await.unwrap();
    // Three identical candidates tie on score; ordering falls back to
    // profile id ascending.
    engine.upsert_profile(2, base_draft("A"), None).await.unwrap();
    engine.upsert_profile(3, base_draft("B"), None).await.unwrap();
    engine.upsert_profile(4, base_draft("C"), None).await.unwrap();

    let matches = ranked(engine.discover(1).await.unwrap());
    let ids: Vec<i64> = matches.iter().map(|m| m.id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[tokio::test]
async fn discovery_never_shows_a_swiped_candidate_again() {
    let (engine, _) = engine_with_store();

    engine.upsert_profile(1, base_draft("Me"), None).await.unwrap();
    let other = engine.upsert_profile(2, base_draft("Other"), None).await.unwrap();

    // Even a pass hides the candidate from discovery forever.
    engine.swipe(1, other.id, UserAction::Pass).await.unwrap();

    let matches = ranked(engine.discover(1).await.unwrap());
    assert!(matches.iter().all(|m| m.id != other.id));
}

#[tokio::test]
async fn discovery_excludes_inactive_candidates() {
    let (engine, _) = engine_with_store();

    engine.upsert_profile(1, base_draft("Me"), None).await.unwrap();
    engine
        .upsert_profile(
            2,
            UpsertProfileRequest {
                is_active: Some(false),
                ..base_draft("Retired")
            },
            None,
        )
        .await
        .unwrap();

    let matches = ranked(engine.discover(1).await.unwrap());
    assert!(matches.is_empty());
}

#[tokio::test]
async fn swipe_on_unknown_profile_is_not_found() {
    let (engine, _) = engine_with_store();
    engine.upsert_profile(1, base_draft("Me"), None).await.unwrap();

    let err = engine.swipe(1, 999, UserAction::Like).await.unwrap_err();
    assert!(matches!(err, MatchError::ProfileNotFound(_)));
}

#[tokio::test]
async fn duplicate_swipe_is_rejected_and_ledger_keeps_one_record() {
    let (engine, store) = engine_with_store();

    engine.upsert_profile(1, base_draft("Me"), None).await.unwrap();
    let other = engine.upsert_profile(2, base_draft("Other"), None).await.unwrap();

    engine.swipe(1, other.id, UserAction::Like).await.unwrap();
    let err = engine.swipe(1, other.id, UserAction::Like).await.unwrap_err();

    assert!(matches!(err, MatchError::DuplicateSwipe));
    assert_eq!(store.ledger_len().await, 1);
}

#[tokio::test]
async fn mutual_like_creates_a_match_exactly_once() {
    let (engine, _) = engine_with_store();

    let p1 = engine.upsert_profile(1, base_draft("One"), None).await.unwrap();
    let p2 = engine.upsert_profile(2, base_draft("Two"), None).await.unwrap();
    engine.upsert_profile(3, base_draft("Three"), None).await.unwrap();

    let first = engine.swipe(1, p2.id, UserAction::Like).await.unwrap();
    assert!(!first.is_new_match);

    let second = engine.swipe(2, p1.id, UserAction::Like).await.unwrap();
    assert!(second.is_new_match);

    // An unrelated swipe on the same target reports no match.
    let unrelated = engine.swipe(3, p2.id, UserAction::Like).await.unwrap();
    assert!(!unrelated.is_new_match);

    // Both directions of the pair are now matched; each party sees the pair.
    let for_one = engine.confirmed_matches(1).await.unwrap();
    assert!(!for_one.is_empty());
    assert!(for_one
        .iter()
        .all(|m| m.record.status == MatchStatus::Matched));
    assert!(for_one.iter().all(|m| m.profile.user_id == 2));

    let for_two = engine.confirmed_matches(2).await.unwrap();
    assert!(for_two.iter().all(|m| m.profile.user_id == 1));
}

#[tokio::test]
async fn super_like_counts_like_a_like_for_reciprocity() {
    let (engine, _) = engine_with_store();

    let p1 = engine.upsert_profile(1, base_draft("One"), None).await.unwrap();
    let p2 = engine.upsert_profile(2, base_draft("Two"), None).await.unwrap();

    engine.swipe(1, p2.id, UserAction::SuperLike).await.unwrap();
    let second = engine.swipe(2, p1.id, UserAction::Like).await.unwrap();

    assert!(second.is_new_match);
}

#[tokio::test]
async fn a_pass_never_produces_a_match() {
    let (engine, _) = engine_with_store();

    let p1 = engine.upsert_profile(1, base_draft("One"), None).await.unwrap();
    let p2 = engine.upsert_profile(2, base_draft("Two"), None).await.unwrap();

    // Like then pass.
    engine.swipe(1, p2.id, UserAction::Like).await.unwrap();
    let second = engine.swipe(2, p1.id, UserAction::Pass).await.unwrap();
    assert!(!second.is_new_match);
    assert!(engine.confirmed_matches(1).await.unwrap().is_empty());

    // Pass then like, on a fresh pair.
    let p3 = engine.upsert_profile(3, base_draft("Three"), None).await.unwrap();
    let p4 = engine.upsert_profile(4, base_draft("Four"), None).await.unwrap();
    engine.swipe(3, p4.id, UserAction::Pass).await.unwrap();
    let reply = engine.swipe(4, p3.id, UserAction::Like).await.unwrap();
    assert!(!reply.is_new_match);
    assert!(engine.confirmed_matches(3).await.unwrap().is_empty());
}

#[tokio::test]
async fn swiping_your_own_profile_is_rejected() {
    let (engine, store) = engine_with_store();

    let own = engine.upsert_profile(1, base_draft("Me"), None).await.unwrap();

    let err = engine.swipe(1, own.id, UserAction::Like).await.unwrap_err();
    assert!(matches!(err, MatchError::InvalidProfile(_)));
    // No self-directed record reaches the ledger.
    assert_eq!(store.ledger_len().await, 0);
}

#[tokio::test]
async fn match_listing_puts_the_most_recent_match_first() {
    let (engine, _) = engine_with_store();

    let p1 = engine.upsert_profile(1, base_draft("One"), None).await.unwrap();
    let p2 = engine.upsert_profile(2, base_draft("Two"), None).await.unwrap();
    let p3 = engine.upsert_profile(3, base_draft("Three"), None).await.unwrap();

    engine.swipe(1, p2.id, UserAction::Like).await.unwrap();
    engine.swipe(2, p1.id, UserAction::Like).await.unwrap();

    // Make sure the second pair's matched_at lands strictly later.
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    engine.swipe(1, p3.id, UserAction::Like).await.unwrap();
    engine.swipe(3, p1.id, UserAction::Like).await.unwrap();

    let matches = engine.confirmed_matches(1).await.unwrap();
    // Both directed records per pair; the fresher pair (with user 3) leads.
    let others: Vec<i64> = matches.iter().map(|m| m.profile.user_id).collect();
    assert_eq!(others, vec![3, 3, 2, 2]);

    // Stable across reads: the tie within a pair breaks on record id.
    let again = engine.confirmed_matches(1).await.unwrap();
    let ids: Vec<i64> = again.iter().map(|m| m.record.id).collect();
    assert_eq!(
        ids,
        matches.iter().map(|m| m.record.id).collect::<Vec<i64>>()
    );
}

#[tokio::test]
async fn match_listing_still_resolves_inactive_profiles() {
    let (engine, _) = engine_with_store();

    let p1 = engine.upsert_profile(1, base_draft("One"), None).await.unwrap();
    let p2 = engine.upsert_profile(2, base_draft("Two"), None).await.unwrap();

    engine.swipe(1, p2.id, UserAction::Like).await.unwrap();
    engine.swipe(2, p1.id, UserAction::Like).await.unwrap();

    // User 2 retires their profile; user 1's match history must keep
    // rendering it.
    engine
        .upsert_profile(
            2,
            UpsertProfileRequest {
                is_active: Some(false),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    let matches = engine.confirmed_matches(1).await.unwrap();
    assert!(!matches.is_empty());
    assert!(matches.iter().all(|m| !m.profile.is_active));
}

#[tokio::test]
async fn upsert_preserves_id_and_created_at() {
    let (engine, _) = engine_with_store();

    let created = engine.upsert_profile(1, base_draft("Me"), None).await.unwrap();

    let updated = engine
        .upsert_profile(
            1,
            UpsertProfileRequest {
                bio: Some("New bio".to_string()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.bio, "New bio");
    // Fields absent from the update keep their values.
    assert_eq!(updated.display_name, created.display_name);
    assert_eq!(updated.budget_min, created.budget_min);
}

#[tokio::test]
async fn registration_seed_fills_blanks_on_first_upsert_only() {
    let (engine, _) = engine_with_store();

    let seed = ProfileSeed {
        display_name: Some("Sam Seed".to_string()),
        age: Some(30),
        budget: Some(1200.0),
        location: Some("midtown".to_string()),
        cleanliness: Some(5),
        smoking_ok: Some(true),
        ..Default::default()
    };

    // Empty draft: everything comes from the seed (or defaults).
    let profile = engine
        .upsert_profile(1, UpsertProfileRequest::default(), Some(seed))
        .await
        .unwrap();

    assert_eq!(profile.display_name, "Sam Seed");
    assert_eq!(profile.age, 30);
    assert_eq!(profile.budget_min, 1200.0);
    assert_eq!(profile.budget_max, 1200.0);
    assert_eq!(profile.preferred_locations, vec!["midtown".to_string()]);
    assert_eq!(profile.cleanliness, 5);
    assert!(profile.smoking_ok);

    // A later upsert with a different seed must not overwrite anything.
    let other_seed = ProfileSeed {
        display_name: Some("Someone Else".to_string()),
        ..Default::default()
    };
    let unchanged = engine
        .upsert_profile(1, UpsertProfileRequest::default(), Some(other_seed))
        .await
        .unwrap();
    assert_eq!(unchanged.display_name, "Sam Seed");
}

#[tokio::test]
async fn invalid_budget_range_is_rejected_before_persistence() {
    let (engine, _) = engine_with_store();

    let err = engine
        .upsert_profile(
            1,
            UpsertProfileRequest {
                budget_min: Some(2000.0),
                budget_max: Some(1000.0),
                ..base_draft("Broken")
            },
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, MatchError::InvalidProfile(_)));
    // Nothing was written.
    assert!(engine.profile_of(1).await.unwrap().is_none());
}

#[tokio::test]
async fn concurrent_same_direction_swipes_leave_one_record() {
    let (engine, store) = engine_with_store();

    engine.upsert_profile(1, base_draft("Me"), None).await.unwrap();
    let other = engine.upsert_profile(2, base_draft("Other"), None).await.unwrap();

    let (a, b) = tokio::join!(
        engine.swipe(1, other.id, UserAction::Like),
        engine.swipe(1, other.id, UserAction::Like),
    );

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1);
    assert_eq!(store.ledger_len().await, 1);

    let failure = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
    assert!(matches!(failure, MatchError::DuplicateSwipe));
}

#[tokio::test]
async fn simultaneous_mutual_likes_declare_exactly_one_new_match() {
    let (engine, store) = engine_with_store();

    let p1 = engine.upsert_profile(1, base_draft("One"), None).await.unwrap();
    let p2 = engine.upsert_profile(2, base_draft("Two"), None).await.unwrap();

    let (a, b) = tokio::join!(
        engine.swipe(1, p2.id, UserAction::Like),
        engine.swipe(2, p1.id, UserAction::Like),
    );

    let a = a.unwrap();
    let b = b.unwrap();
    assert_eq!(store.ledger_len().await, 2);
    // Exactly one of the two calls observes the flip.
    assert!(a.is_new_match ^ b.is_new_match);

    let matches = engine.confirmed_matches(1).await.unwrap();
    assert!(matches
        .iter()
        .all(|m| m.record.status == MatchStatus::Matched));
    assert!(!matches.is_empty());
}

#[tokio::test]
async fn swipe_response_carries_the_computed_score() {
    let (engine, _) = engine_with_store();

    engine.upsert_profile(1, base_draft("Me"), None).await.unwrap();
    let other = engine.upsert_profile(2, base_draft("Twin"), None).await.unwrap();

    let result = engine.swipe(1, other.id, UserAction::Like).await.unwrap();
    // Identical profiles score a perfect 100.
    assert_eq!(result.compatibility_score, 100.0);
    assert_eq!(result.id, other.id);
}
