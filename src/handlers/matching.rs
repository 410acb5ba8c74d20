// src/handlers/matching.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use super::authorize_path_user;
use crate::{
    error::AppError,
    matching::engine::{Discovery, MatchEngine},
    models::match_record::{SwipeRequest, UserAction},
    utils::jwt::Claims,
};

/// Ranked potential matches for the user.
///
/// `needsProfile: true` means the user has no active profile yet and should
/// be sent to profile setup; it is not the same as an empty result.
pub async fn get_potential_matches(
    State(engine): State<MatchEngine>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    authorize_path_user(&claims, user_id)?;

    let response = match engine.discover(user_id).await? {
        Discovery::NeedsProfile => json!({
            "needsProfile": true,
            "matches": [],
        }),
        Discovery::Ranked(matches) => json!({
            "needsProfile": false,
            "matches": matches,
        }),
    };

    Ok(Json(response))
}

/// Record a swipe on a profile.
///
/// Responds 409 when this direction was already swiped, so the UI can stop
/// re-prompting instead of treating it as a generic failure.
pub async fn swipe(
    State(engine): State<MatchEngine>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<i64>,
    Json(payload): Json<SwipeRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize_path_user(&claims, user_id)?;

    if payload.action == UserAction::None {
        return Err(AppError::BadRequest(
            "Action must be 'like', 'pass' or 'super_like'".to_string(),
        ));
    }

    let result = engine
        .swipe(user_id, payload.profile_id, payload.action)
        .await?;

    Ok(Json(result))
}

/// Confirmed matches for the user, most recent first.
pub async fn get_matches(
    State(engine): State<MatchEngine>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    authorize_path_user(&claims, user_id)?;

    let matches = engine.confirmed_matches(user_id).await?;

    Ok(Json(matches))
}
