// src/matching/mod.rs
//
// The roommate matching engine: compatibility scoring, the swipe ledger and
// candidate discovery. The HTTP layer hands in explicit user ids and gets
// scored candidates or swipe outcomes back; no ambient auth context in here.

pub mod engine;
pub mod memory;
pub mod pg;
pub mod scorer;
pub mod store;

use std::fmt;

/// Domain errors the engine surfaces to its callers.
///
/// Callers must be able to tell "no data yet" from "transient failure" from
/// "business-rule violation"; `error.rs` maps each kind onto its HTTP status.
#[derive(Debug)]
pub enum MatchError {
    /// The user/profile has no roommate profile record. Recoverable: the
    /// caller redirects to profile setup.
    ProfileNotFound(String),

    /// The actor already swiped this target in this direction. Swipes are
    /// write-once per direction.
    DuplicateSwipe,

    /// Malformed profile data rejected before persistence.
    InvalidProfile(String),

    /// The backing store is unreachable or failed; retryable.
    DataAccess(String),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::ProfileNotFound(msg) => write!(f, "profile not found: {}", msg),
            MatchError::DuplicateSwipe => write!(f, "already swiped on this profile"),
            MatchError::InvalidProfile(msg) => write!(f, "invalid profile: {}", msg),
            MatchError::DataAccess(msg) => write!(f, "data access failure: {}", msg),
        }
    }
}

impl std::error::Error for MatchError {}

impl From<sqlx::Error> for MatchError {
    fn from(err: sqlx::Error) -> Self {
        MatchError::DataAccess(err.to_string())
    }
}
