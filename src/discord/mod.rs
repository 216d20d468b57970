//! Outbound chat-service capability.
//!
//! The rest of the backend consumes the remote service through the
//! [`ChatService`] trait; the production implementation lives in
//! [`client`] and tests inject [`mock::MockChatService`].

mod client;

pub use client::*;

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::AppError;

/// OAuth2 user access token obtained from an authorization-code exchange.
#[derive(Debug, Clone)]
pub struct AccessToken(pub String);

/// Remote profile of the account being linked.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub discriminator: String,
}

/// Raw guild info as returned by the remote service.
#[derive(Debug, Clone, Deserialize)]
pub struct GuildInfo {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
}

/// Remote chat-service capability.
///
/// Callers treat every method as a suspension point scoped to the single
/// request invoking it; a stalled remote call stalls only that request.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Exchange an authorization code for a user access token.
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: Option<&str>,
    ) -> Result<AccessToken, ChatError>;

    /// Fetch the profile behind an access token. Absent is `Ok(None)`.
    async fn get_profile(&self, token: &AccessToken) -> Result<Option<ChatProfile>, ChatError>;

    /// Fetch metadata for a guild.
    async fn fetch_guild(&self, guild_id: &str) -> Result<GuildInfo, ChatError>;

    /// Add an account to a guild with the given roles.
    async fn add_member(
        &self,
        guild_id: &str,
        account_id: &str,
        roles: &[String],
    ) -> Result<(), ChatError>;

    /// Remove an account from a guild.
    async fn remove_member(&self, guild_id: &str, account_id: &str) -> Result<(), ChatError>;
}

/// Failure from the remote chat service.
#[derive(Debug)]
pub enum ChatError {
    /// Transport-level failure (connect, timeout, TLS)
    Transport(String),
    /// Unexpected HTTP status from the remote API
    Status { status: u16, context: String },
    /// Response body could not be decoded
    Decode(String),
}

impl std::fmt::Display for ChatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatError::Transport(msg) => write!(f, "transport error: {}", msg),
            ChatError::Status { status, context } => {
                write!(f, "unexpected status {} from {}", status, context)
            }
            ChatError::Decode(msg) => write!(f, "decode error: {}", msg),
        }
    }
}

impl std::error::Error for ChatError {}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ChatError::Decode(err.to_string())
        } else {
            ChatError::Transport(err.to_string())
        }
    }
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        tracing::error!("Chat service error: {}", err);
        AppError::Upstream(format!("Chat service error: {}", err))
    }
}
