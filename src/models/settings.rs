//! Per-user settings document holding linked chat-service accounts.

use serde::{Deserialize, Serialize};

/// Maximum number of chat-service accounts a user may link.
pub const MAX_LINKED_ACCOUNTS: usize = 2;

/// One external chat-service account bound to a platform user.
///
/// The `id` is immutable once linked; `username` and `discriminator` are
/// refreshed on every re-link of the same account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAccount {
    pub id: String,
    pub username: String,
    pub discriminator: String,
}

/// Per-user settings, stored as a whole document keyed by user id.
///
/// Invariants maintained by the synchronizer: at most
/// [`MAX_LINKED_ACCOUNTS`] entries, account ids unique within the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub linked_accounts: Vec<LinkedAccount>,
}

impl Settings {
    /// Whether an account with the given external id is linked.
    pub fn has_account(&self, account_id: &str) -> bool {
        self.linked_accounts.iter().any(|a| a.id == account_id)
    }
}

/// Response body for link/unlink operations: the (possibly unchanged)
/// settings plus an optional notice for benign no-op outcomes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub settings: Settings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl SettingsResponse {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            notice: None,
        }
    }

    pub fn with_notice(settings: Settings, notice: impl Into<String>) -> Self {
        Self {
            settings,
            notice: Some(notice.into()),
        }
    }
}
