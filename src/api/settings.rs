//! Settings read endpoint.

use axum::{extract::State, Extension};

use super::{success, ApiResult};
use crate::auth::Identity;
use crate::models::Settings;
use crate::AppState;

/// GET /api/settings - Get the caller's settings (absent reads as empty).
pub async fn get_settings(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Settings> {
    let settings = state
        .repo
        .get_settings(&identity.user_id)
        .await?
        .unwrap_or_default();

    success(settings)
}
