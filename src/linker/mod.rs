//! Linkage synchronizer: the link/unlink workflow.
//!
//! Order within a flow is the correctness-critical invariant: read
//! settings, mutate the working copy, persist the whole document, and only
//! then mirror the change into guild membership. The settings store is the
//! source of truth; the membership mirror is best-effort and its failure is
//! logged, never rolled back, never surfaced to the caller.

use std::sync::Arc;

use crate::db::Repository;
use crate::discord::ChatService;
use crate::errors::AppError;
use crate::models::{LinkedAccount, Settings, MAX_LINKED_ACCOUNTS};

/// Result of the best-effort membership mirror step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorStatus {
    /// The remote membership change was applied.
    Applied,
    /// The remote call failed; logged only, settings stand as persisted.
    Failed,
    /// No guild is configured, nothing to mirror.
    Skipped,
}

/// Outcome of the link flow.
#[derive(Debug)]
pub enum LinkOutcome {
    /// A new account was linked and persisted.
    Linked {
        settings: Settings,
        mirror: MirrorStatus,
    },
    /// An already-linked account had its profile fields refreshed.
    Updated(Settings),
    /// The remote returned no profile; settings were left untouched.
    NoProfile(Settings),
}

/// Outcome of the unlink flow.
#[derive(Debug)]
pub enum UnlinkOutcome {
    /// The account was removed and the removal persisted.
    Removed {
        settings: Settings,
        mirror: MirrorStatus,
    },
    /// The account id was not linked; no side effects.
    NotLinked(Settings),
}

/// The account-linking synchronizer.
pub struct Linker {
    repo: Arc<Repository>,
    chat: Arc<dyn ChatService>,
}

impl Linker {
    pub fn new(repo: Arc<Repository>, chat: Arc<dyn ChatService>) -> Self {
        Self { repo, chat }
    }

    /// Link the account behind an authorization code to `user_id`.
    ///
    /// A failed code exchange aborts before the profile fetch and before
    /// any settings mutation. At most [`MAX_LINKED_ACCOUNTS`] accounts may
    /// be linked; re-linking an existing account refreshes its fields.
    pub async fn link(
        &self,
        user_id: &str,
        code: &str,
        redirect_uri: Option<&str>,
        primary_guild: Option<&str>,
        member_role_id: &str,
    ) -> Result<LinkOutcome, AppError> {
        let token = self.chat.exchange_code(code, redirect_uri).await?;

        let Some(profile) = self.chat.get_profile(&token).await? else {
            let settings = self.repo.get_settings(user_id).await?.unwrap_or_default();
            return Ok(LinkOutcome::NoProfile(settings));
        };

        let mut settings = self.repo.get_settings(user_id).await?.unwrap_or_default();

        if let Some(account) = settings
            .linked_accounts
            .iter_mut()
            .find(|a| a.id == profile.id)
        {
            account.username = profile.username;
            account.discriminator = profile.discriminator;
            self.repo.set_settings(user_id, &settings).await?;
            return Ok(LinkOutcome::Updated(settings));
        }

        if settings.linked_accounts.len() >= MAX_LINKED_ACCOUNTS {
            return Err(AppError::LimitReached(format!(
                "At most {} accounts can be linked",
                MAX_LINKED_ACCOUNTS
            )));
        }

        settings.linked_accounts.push(LinkedAccount {
            id: profile.id.clone(),
            username: profile.username,
            discriminator: profile.discriminator,
        });

        self.repo.set_settings(user_id, &settings).await?;

        // Best-effort mirror, only for a newly linked account
        let mirror = self
            .mirror_add(primary_guild, &profile.id, member_role_id)
            .await;

        Ok(LinkOutcome::Linked { settings, mirror })
    }

    /// Remove a linked account from `user_id`'s settings.
    pub async fn unlink(
        &self,
        user_id: &str,
        account_id: &str,
        primary_guild: Option<&str>,
    ) -> Result<UnlinkOutcome, AppError> {
        let mut settings = self.repo.get_settings(user_id).await?.unwrap_or_default();

        if !settings.has_account(account_id) {
            return Ok(UnlinkOutcome::NotLinked(settings));
        }

        settings.linked_accounts.retain(|a| a.id != account_id);
        self.repo.set_settings(user_id, &settings).await?;

        let mirror = self.mirror_remove(primary_guild, account_id).await;

        Ok(UnlinkOutcome::Removed { settings, mirror })
    }

    async fn mirror_add(
        &self,
        primary_guild: Option<&str>,
        account_id: &str,
        member_role_id: &str,
    ) -> MirrorStatus {
        let Some(guild_id) = primary_guild else {
            tracing::warn!("No guild configured, skipping membership mirror");
            return MirrorStatus::Skipped;
        };

        let roles = [member_role_id.to_string()];
        match self.chat.add_member(guild_id, account_id, &roles).await {
            Ok(()) => MirrorStatus::Applied,
            Err(e) => {
                tracing::error!(guild_id, account_id, "Failed to add guild member: {}", e);
                MirrorStatus::Failed
            }
        }
    }

    async fn mirror_remove(&self, primary_guild: Option<&str>, account_id: &str) -> MirrorStatus {
        let Some(guild_id) = primary_guild else {
            tracing::warn!("No guild configured, skipping membership mirror");
            return MirrorStatus::Skipped;
        };

        match self.chat.remove_member(guild_id, account_id).await {
            Ok(()) => MirrorStatus::Applied,
            Err(e) => {
                tracing::error!(guild_id, account_id, "Failed to remove guild member: {}", e);
                MirrorStatus::Failed
            }
        }
    }
}
