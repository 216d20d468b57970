//! Account link/unlink endpoints.

use axum::{
    extract::{Path, Query, State},
    Extension,
};
use serde::Deserialize;

use super::{error, success, ApiResult};
use crate::auth::Identity;
use crate::errors::AppError;
use crate::linker::{LinkOutcome, UnlinkOutcome};
use crate::models::SettingsResponse;
use crate::AppState;

/// Query parameters for the link endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkQuery {
    #[serde(default)]
    pub redirect_uri: Option<String>,
}

/// POST /api/discord/{code} - Link the account behind an authorization code.
pub async fn link_account(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(code): Path<String>,
    Query(query): Query<LinkQuery>,
) -> ApiResult<SettingsResponse> {
    if code.trim().is_empty() {
        return error(AppError::Validation(
            "Authorization code is required".to_string(),
        ));
    }

    let config = state.link_snapshot();

    let outcome = state
        .linker
        .link(
            &identity.user_id,
            &code,
            query.redirect_uri.as_deref(),
            config.primary_guild(),
            &config.member_role_id,
        )
        .await?;

    match outcome {
        LinkOutcome::Linked { settings, .. } | LinkOutcome::Updated(settings) => {
            success(SettingsResponse::new(settings))
        }
        LinkOutcome::NoProfile(settings) => success(SettingsResponse::with_notice(
            settings,
            "No profile returned; nothing was linked",
        )),
    }
}

/// DELETE /api/discord/{id} - Unlink an account by its external id.
pub async fn unlink_account(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<SettingsResponse> {
    if id.trim().is_empty() {
        return error(AppError::Validation("Account id is required".to_string()));
    }

    let config = state.link_snapshot();

    let outcome = state
        .linker
        .unlink(&identity.user_id, &id, config.primary_guild())
        .await?;

    match outcome {
        UnlinkOutcome::Removed { settings, .. } => success(SettingsResponse::new(settings)),
        UnlinkOutcome::NotLinked(settings) => success(SettingsResponse::with_notice(
            settings,
            format!("Account {} is not linked", id),
        )),
    }
}
