//! Configuration module for the GuildLink backend.
//!
//! All configuration is loaded from environment variables with sensible
//! defaults. Runtime linking configuration (guild ids, admin ids, member
//! role) lives in the document store instead, see `models::LinkConfig`.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for the trusted gateway (required in production)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Outbound Discord client settings
    pub discord: DiscordConfig,
}

/// Credentials and endpoints for the outbound Discord client.
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    /// OAuth2 application client id
    pub client_id: String,
    /// OAuth2 application client secret
    pub client_secret: String,
    /// Bot token used for guild and membership calls
    pub bot_token: String,
    /// REST API base URL
    pub api_base: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_psk = env::var("GUILDLINK_API_PSK").ok();

        let db_path = env::var("GUILDLINK_DB_PATH")
            .unwrap_or_else(|_| "./data/app.sqlite".to_string())
            .into();

        let bind_addr = env::var("GUILDLINK_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid GUILDLINK_BIND_ADDR format");

        let log_level = env::var("GUILDLINK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let discord = DiscordConfig {
            client_id: env::var("GUILDLINK_DISCORD_CLIENT_ID").unwrap_or_default(),
            client_secret: env::var("GUILDLINK_DISCORD_CLIENT_SECRET").unwrap_or_default(),
            bot_token: env::var("GUILDLINK_DISCORD_BOT_TOKEN").unwrap_or_default(),
            api_base: env::var("GUILDLINK_DISCORD_API_BASE")
                .unwrap_or_else(|_| "https://discord.com/api/v10".to_string()),
        };

        Self {
            api_psk,
            db_path,
            bind_addr,
            log_level,
            discord,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("GUILDLINK_API_PSK");
        env::remove_var("GUILDLINK_DB_PATH");
        env::remove_var("GUILDLINK_BIND_ADDR");
        env::remove_var("GUILDLINK_LOG_LEVEL");
        env::remove_var("GUILDLINK_DISCORD_API_BASE");

        let config = Config::from_env();

        assert!(config.api_psk.is_none());
        assert_eq!(config.db_path, PathBuf::from("./data/app.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.discord.api_base, "https://discord.com/api/v10");
    }
}
