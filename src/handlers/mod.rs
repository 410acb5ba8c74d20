// src/handlers/mod.rs

pub mod auth;
pub mod matching;
pub mod profile;
pub mod users;

use crate::{error::AppError, utils::jwt::Claims};

/// Match endpoints carry an explicit `{userId}` path segment; the token
/// subject must agree with it. Acting for another user is forbidden.
pub(crate) fn authorize_path_user(claims: &Claims, path_user_id: i64) -> Result<(), AppError> {
    if claims.user_id()? != path_user_id {
        return Err(AppError::Forbidden(
            "Token does not match the requested user".to_string(),
        ));
    }
    Ok(())
}
