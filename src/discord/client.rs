//! Discord REST client implementing the chat-service capability.
//!
//! User-scoped calls (token exchange, profile fetch) authenticate with the
//! OAuth2 application; guild and membership calls authenticate with the
//! bot token.

use async_trait::async_trait;
use serde::Deserialize;

use super::{AccessToken, ChatError, ChatProfile, ChatService, GuildInfo};
use crate::config::DiscordConfig;

/// Production Discord client over reqwest.
pub struct DiscordClient {
    http: reqwest::Client,
    config: DiscordConfig,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl DiscordClient {
    pub fn new(config: DiscordConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base.trim_end_matches('/'), path)
    }

    fn bot_auth(&self) -> String {
        format!("Bot {}", self.config.bot_token)
    }
}

#[async_trait]
impl ChatService for DiscordClient {
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: Option<&str>,
    ) -> Result<AccessToken, ChatError> {
        let mut form = vec![
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
        ];
        if let Some(uri) = redirect_uri {
            form.push(("redirect_uri", uri));
        }

        let resp = self
            .http
            .post(self.url("oauth2/token"))
            .form(&form)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ChatError::Status {
                status: resp.status().as_u16(),
                context: "oauth2/token".to_string(),
            });
        }

        let token: TokenResponse = resp.json().await?;
        Ok(AccessToken(token.access_token))
    }

    async fn get_profile(&self, token: &AccessToken) -> Result<Option<ChatProfile>, ChatError> {
        let resp = self
            .http
            .get(self.url("users/@me"))
            .bearer_auth(&token.0)
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(ChatError::Status {
                status: resp.status().as_u16(),
                context: "users/@me".to_string(),
            });
        }

        let profile: ChatProfile = resp.json().await?;
        Ok(Some(profile))
    }

    async fn fetch_guild(&self, guild_id: &str) -> Result<GuildInfo, ChatError> {
        let resp = self
            .http
            .get(self.url(&format!("guilds/{}", guild_id)))
            .header(reqwest::header::AUTHORIZATION, self.bot_auth())
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ChatError::Status {
                status: resp.status().as_u16(),
                context: format!("guilds/{}", guild_id),
            });
        }

        let guild: GuildInfo = resp.json().await?;
        Ok(guild)
    }

    async fn add_member(
        &self,
        guild_id: &str,
        account_id: &str,
        roles: &[String],
    ) -> Result<(), ChatError> {
        let resp = self
            .http
            .put(self.url(&format!("guilds/{}/members/{}", guild_id, account_id)))
            .header(reqwest::header::AUTHORIZATION, self.bot_auth())
            .json(&serde_json::json!({ "roles": roles }))
            .send()
            .await?;

        // 204 means the account was already a member; roles still applied
        if !resp.status().is_success() {
            return Err(ChatError::Status {
                status: resp.status().as_u16(),
                context: format!("guilds/{}/members/{}", guild_id, account_id),
            });
        }

        Ok(())
    }

    async fn remove_member(&self, guild_id: &str, account_id: &str) -> Result<(), ChatError> {
        let resp = self
            .http
            .delete(self.url(&format!("guilds/{}/members/{}", guild_id, account_id)))
            .header(reqwest::header::AUTHORIZATION, self.bot_auth())
            .send()
            .await?;

        // Already gone counts as removed
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        if !resp.status().is_success() {
            return Err(ChatError::Status {
                status: resp.status().as_u16(),
                context: format!("guilds/{}/members/{}", guild_id, account_id),
            });
        }

        Ok(())
    }
}
