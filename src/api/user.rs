//! Current user endpoint.

use axum::{extract::State, Extension};

use super::{success, ApiResult};
use crate::auth::Identity;
use crate::models::User;
use crate::AppState;

/// GET /api/user - The caller's resolved identity and admin status.
pub async fn current_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<User> {
    let config = state.link_snapshot();

    success(User {
        is_admin: config.is_admin(&identity.user_id),
        id: identity.user_id,
    })
}
