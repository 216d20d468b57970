//! Runtime configuration record, stored as a singleton document.

use serde::{Deserialize, Serialize};

/// Process-wide linking configuration.
///
/// Loaded once at startup from the store (absent means an empty config is
/// persisted before first use) and replaced atomically by an admin action.
/// Requests operate on the snapshot taken at request start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkConfig {
    /// Guild ids served by the guild list, in display order.
    pub guild_ids: Vec<String>,
    /// User ids allowed to read and replace this config.
    pub admin_ids: Vec<String>,
    /// Role assigned when mirroring a new link into the primary guild.
    pub member_role_id: String,
}

impl LinkConfig {
    /// Whether the given user id has admin rights under this config.
    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admin_ids.iter().any(|id| id == user_id)
    }

    /// The first configured guild id, used as the membership mirror target.
    pub fn primary_guild(&self) -> Option<&str> {
        self.guild_ids.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_has_no_admins_or_primary_guild() {
        let config = LinkConfig::default();
        assert!(!config.is_admin("anyone"));
        assert!(config.primary_guild().is_none());
    }

    #[test]
    fn test_primary_guild_is_first_configured() {
        let config = LinkConfig {
            guild_ids: vec!["g1".to_string(), "g2".to_string()],
            ..Default::default()
        };
        assert_eq!(config.primary_guild(), Some("g1"));
    }
}
