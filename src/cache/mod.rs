//! Time-bounded guild metadata cache.
//!
//! Entries are immutable once constructed and replaced wholesale on expiry.
//! Concurrent misses for the same id may each fetch and overwrite the entry
//! (last-write-wins); the cache never serves a value past its TTL and never
//! caches a failed fetch.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::discord::{ChatService, GuildInfo};
use crate::errors::AppError;
use crate::models::Guild;

/// How long a fetched guild descriptor stays fresh.
pub const GUILD_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    guild: Guild,
    expires_at: Instant,
}

/// TTL cache of guild descriptors keyed by guild id.
///
/// Size is bounded by the configured guild list, so there is no eviction
/// beyond expiry. The lock is never held across an await.
pub struct GuildCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl GuildCache {
    pub fn new() -> Self {
        Self::with_ttl(GUILD_CACHE_TTL)
    }

    /// Create a cache with a custom TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get the descriptor for a guild, fetching from the remote service on
    /// a miss or an expired entry.
    pub async fn get(&self, chat: &dyn ChatService, guild_id: &str) -> Result<Guild, AppError> {
        if let Some(entry) = self
            .entries
            .read()
            .expect("guild cache lock poisoned")
            .get(guild_id)
        {
            if Instant::now() < entry.expires_at {
                return Ok(entry.guild.clone());
            }
        }

        let info = chat.fetch_guild(guild_id).await?;
        let guild = guild_from_info(info);

        let entry = CacheEntry {
            guild: guild.clone(),
            expires_at: Instant::now() + self.ttl,
        };
        self.entries
            .write()
            .expect("guild cache lock poisoned")
            .insert(guild_id.to_string(), entry);

        Ok(guild)
    }
}

impl Default for GuildCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the public descriptor from raw remote guild info.
///
/// Guilds without an icon get an empty `icon_url` rather than a CDN URL
/// with a missing hash segment.
fn guild_from_info(info: GuildInfo) -> Guild {
    Guild {
        icon_url: info
            .icon
            .map(|icon| format!("https://cdn.discordapp.com/icons/{}/{}.gif", info.id, icon))
            .unwrap_or_default(),
        id: info.id,
        name: info.name,
    }
}
