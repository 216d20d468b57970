//! Guild descriptor exposed to clients.

use serde::{Deserialize, Serialize};

/// Public metadata for one configured guild.
///
/// Immutable once constructed; cached by id with a fixed TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guild {
    pub id: String,
    pub name: String,
    pub icon_url: String,
}
