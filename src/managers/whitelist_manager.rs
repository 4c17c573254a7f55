use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, UpdateOutcome};
use crate::config::WhitelistSettings;
use crate::error::{BotError, Result};
use crate::store::SharedDocumentStore;

/// The Discord user behind a request
#[derive(Debug, Clone)]
pub struct Requester {
    /// Discord user ID (snowflake as string)
    pub id: String,
    /// Username, only used in the commit message
    pub name: String,
}

impl Requester {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Applies whitelist requests to the remote catalog
pub struct WhitelistManager {
    store: SharedDocumentStore,
    settings: WhitelistSettings,
}

impl WhitelistManager {
    pub fn new(store: SharedDocumentStore, settings: WhitelistSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &WhitelistSettings {
        &self.settings
    }

    /// Add `nickname` to the target instance's whitelist.
    ///
    /// Reads the catalog, applies the registration rules and commits the
    /// result guarded by the revision that was read. A concurrent commit in
    /// between surfaces as `WriteConflict`; nothing is retried.
    pub async fn apply_whitelist_request(
        &self,
        nickname: &str,
        requester: &Requester,
    ) -> Result<UpdateOutcome> {
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(BotError::InvalidNickname {
                message: "nickname cannot be empty".to_string(),
            });
        }

        let path = &self.settings.catalog_path;
        let document = self.store.fetch(path).await?;
        debug!("Fetched '{}' at revision {}", document.path, document.revision);

        let mut catalog = Catalog::parse(&document.path, &document.content)?;
        let outcome = catalog.register(
            &self.settings.target_instance,
            nickname,
            &requester.id,
            self.settings.claim_policy,
        )?;

        match &outcome {
            UpdateOutcome::AlreadyClaimed => {
                warn!(
                    "{} ({}) already claimed a whitelist slot on '{}'",
                    requester.name, requester.id, self.settings.target_instance
                );
                return Ok(outcome);
            }
            UpdateOutcome::AlreadyListed { nickname } => {
                info!(
                    "'{}' is already whitelisted on '{}'",
                    nickname, self.settings.target_instance
                );
                return Ok(outcome);
            }
            UpdateOutcome::Applied { .. } => {}
        }

        let content = catalog.to_pretty_json()?;
        let message = commit_message(nickname, requester);

        if let Err(e) = self
            .store
            .write(&document.path, &content, &message, &document.revision)
            .await
        {
            warn!("Whitelisting '{}' for {} failed: {}", nickname, requester.name, e);
            return Err(e);
        }

        let listed = catalog
            .find_instance(&self.settings.target_instance)
            .map(|i| i.whitelist.len())
            .unwrap_or_default();
        info!(
            "Whitelisted '{}' on '{}' for {} ({}), {} players listed",
            nickname, self.settings.target_instance, requester.name, requester.id, listed
        );
        Ok(outcome)
    }
}

fn commit_message(nickname: &str, requester: &Requester) -> String {
    format!("Bot: Whitelist {} (Discord: {})", nickname, requester.name)
}

/// Shared whitelist manager type
pub type SharedWhitelistManager = Arc<WhitelistManager>;

pub fn create_shared_whitelist_manager(
    store: SharedDocumentStore,
    settings: WhitelistSettings,
) -> SharedWhitelistManager {
    Arc::new(WhitelistManager::new(store, settings))
}
