// src/handlers/profile.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::PgPool;
use url::Url;
use validator::Validate;

use super::authorize_path_user;
use crate::{
    error::AppError,
    matching::engine::MatchEngine,
    models::{
        profile::{ProfileSeed, UpsertProfileRequest},
        user::User,
    },
    utils::{html::clean_html, jwt::Claims},
};

/// Get a user's roommate profile.
pub async fn get_profile(
    State(engine): State<MatchEngine>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    authorize_path_user(&claims, user_id)?;

    let profile = engine
        .profile_of(user_id)
        .await?
        .ok_or(AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}

/// Create or update a user's roommate profile.
///
/// On first creation, fields missing from the request are backfilled from
/// the registration questionnaire; later updates only touch the fields the
/// request actually carries.
pub async fn upsert_profile(
    State(pool): State<PgPool>,
    State(engine): State<MatchEngine>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<i64>,
    Json(mut payload): Json<UpsertProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize_path_user(&claims, user_id)?;

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    // Free text is rendered to other users; sanitize it on the way in.
    payload.bio = payload.bio.as_deref().map(clean_html);

    if let Some(pictures) = &payload.profile_pictures {
        for picture in pictures {
            Url::parse(picture).map_err(|_| {
                AppError::BadRequest(format!("'{}' is not a valid picture URL", picture))
            })?;
        }
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    let seed = ProfileSeed::from_user(&user);
    let profile = engine.upsert_profile(user_id, payload, Some(seed)).await?;

    Ok(Json(profile))
}
