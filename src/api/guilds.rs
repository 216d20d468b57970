//! Guild listing endpoint.

use axum::extract::State;

use super::{success, ApiResult};
use crate::models::Guild;
use crate::AppState;

/// GET /api/guilds - List configured guilds with cached metadata.
///
/// Descriptors are returned in configured order. Any failed fetch aborts
/// the whole request; hits keep being served from cache across retries.
pub async fn list_guilds(State(state): State<AppState>) -> ApiResult<Vec<Guild>> {
    let config = state.link_snapshot();

    let mut guilds = Vec::with_capacity(config.guild_ids.len());
    for guild_id in &config.guild_ids {
        guilds.push(state.guilds.get(state.chat.as_ref(), guild_id).await?);
    }

    success(guilds)
}
