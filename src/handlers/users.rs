// src/handlers/users.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use sqlx::PgPool;

use crate::{
    error::AppError,
    matching::engine::MatchEngine,
    models::user::{MeResponse, User},
    utils::jwt::Claims,
};

/// Get the current user's account data.
///
/// `has_profile` tells the UI whether to route to profile setup before
/// showing discovery.
pub async fn get_me(
    State(pool): State<PgPool>,
    State(engine): State<MatchEngine>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    let has_profile = engine.profile_of(user_id).await?.is_some();

    Ok(Json(MeResponse {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        created_at: user.created_at,
        has_profile,
    }))
}
