//! Runtime configuration endpoints (admin only).

use axum::{extract::State, Extension, Json};

use super::{error, success, ApiResult};
use crate::auth::Identity;
use crate::errors::AppError;
use crate::models::LinkConfig;
use crate::AppState;

/// GET /api/config - Read the stored runtime configuration.
pub async fn get_config(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<LinkConfig> {
    let current = state.link_snapshot();
    if !current.is_admin(&identity.user_id) {
        return error(AppError::Forbidden("Admin rights required".to_string()));
    }

    let stored = state.repo.get_link_config().await?.unwrap_or_default();
    success(stored)
}

/// POST /api/config - Replace the runtime configuration.
///
/// Admin rights are checked against the configuration current at request
/// start; the new value is persisted first and only then swapped into the
/// shared snapshot, so in-flight requests keep the value they started with.
pub async fn update_config(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(new_config): Json<LinkConfig>,
) -> ApiResult<LinkConfig> {
    let current = state.link_snapshot();
    if !current.is_admin(&identity.user_id) {
        return error(AppError::Forbidden("Admin rights required".to_string()));
    }

    state.replace_link_config(new_config.clone()).await?;

    tracing::info!(admin = %identity.user_id, "Runtime configuration replaced");

    success(new_config)
}
