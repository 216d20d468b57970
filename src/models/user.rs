//! Platform user model, derived per request from the resolved identity.

use serde::{Deserialize, Serialize};

/// The authenticated platform user making a request.
///
/// Never persisted; `is_admin` is computed against the config snapshot
/// taken at request start.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub is_admin: bool,
}
