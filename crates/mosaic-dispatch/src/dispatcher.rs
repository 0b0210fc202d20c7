//! Routes `(platform, operation)` requests to the right client.
//!
//! The dispatcher is the only entry point the embedding HTTP/CLI layer
//! calls. It validates requests against the static compatibility table
//! before any I/O, forwards to one client, and converts every
//! client-specific failure into the unified [`DispatchError`] shape.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use mosaic_core::{AppConfig, NormalizedEntity, Platform, Post};
use mosaic_linkedin::LinkedinClient;
use mosaic_social::{
    AccountPool, AuthEndpoints, AuthReport, JsonFileStore, PageClient, PoolStatus, XClient,
};

use crate::error::{DispatchError, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Profile,
    Organization,
    Timeline,
    Search,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Profile => write!(f, "profile"),
            Operation::Organization => write!(f, "organization"),
            Operation::Timeline => write!(f, "timeline"),
            Operation::Search => write!(f, "search"),
        }
    }
}

/// Which operations each platform supports. Checked before any network
/// activity; everything else is rejected as unsupported.
pub const COMPATIBILITY: &[(Platform, Operation)] = &[
    (Platform::Linkedin, Operation::Profile),
    (Platform::Linkedin, Operation::Organization),
    (Platform::Linkedin, Operation::Timeline),
    (Platform::X, Operation::Timeline),
    (Platform::X, Operation::Search),
    (Platform::Facebook, Operation::Timeline),
];

#[must_use]
pub fn is_supported(platform: Platform, operation: Operation) -> bool {
    COMPATIBILITY.contains(&(platform, operation))
}

/// Result of a dispatched fetch: a single entity or a feed of them.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FetchResult {
    Entity(NormalizedEntity),
    Entities(Vec<NormalizedEntity>),
}

/// Snapshot surfaced verbatim by the embedding layer's health endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Health {
    pub linkedin_initialized: bool,
    pub x_pool: PoolStatus,
    pub facebook_pool: PoolStatus,
}

pub struct Dispatcher {
    linkedin: Arc<LinkedinClient>,
    x: Arc<XClient>,
    x_pool: Arc<AccountPool>,
    facebook: Arc<PageClient>,
    facebook_pool: Arc<AccountPool>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        linkedin: Arc<LinkedinClient>,
        x: Arc<XClient>,
        x_pool: Arc<AccountPool>,
        facebook: Arc<PageClient>,
        facebook_pool: Arc<AccountPool>,
    ) -> Self {
        Self {
            linkedin,
            x,
            x_pool,
            facebook,
            facebook_pool,
        }
    }

    /// Wires up all clients from the application config: the LinkedIn
    /// session client, one account pool per feed platform backed by the
    /// shared credential store file, and the feed clients on top.
    ///
    /// Seed accounts from the accounts file are registered if their
    /// identifier is not already in the persisted pool, so restarts keep
    /// authenticated sessions. A missing accounts file is an empty pool,
    /// not an error. Authentication is a separate step
    /// ([`Dispatcher::authenticate_pools`]) so construction stays cheap.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] when a client cannot be constructed or
    /// the accounts file exists but cannot be parsed.
    pub fn from_config(config: &AppConfig) -> Result<Self, DispatchError> {
        let linkedin = Arc::new(LinkedinClient::new(
            config.linkedin_cookie.clone(),
            config.request_timeout_secs,
            &config.user_agent,
        )?);

        let x_pool = Arc::new(AccountPool::new(
            Box::new(JsonFileStore::new(config.store_path.with_extension("x.json"))),
            AuthEndpoints::X,
            "https://api.x.com",
            config.request_timeout_secs,
            &config.user_agent,
        )?);
        let facebook_pool = Arc::new(AccountPool::new(
            Box::new(JsonFileStore::new(
                config.store_path.with_extension("facebook.json"),
            )),
            AuthEndpoints::FACEBOOK,
            "https://graph.facebook.com",
            config.request_timeout_secs,
            &config.user_agent,
        )?);

        if config.accounts_path.exists() {
            for seed in mosaic_core::load_account_seeds(&config.accounts_path)? {
                let pool = match seed.platform {
                    Platform::X => &x_pool,
                    Platform::Facebook => &facebook_pool,
                    // Seed validation already rejects linkedin entries.
                    Platform::Linkedin => continue,
                };
                if !pool.has_account(&seed.identifier) {
                    pool.add_account(seed)?;
                }
            }
        } else {
            tracing::warn!(
                path = %config.accounts_path.display(),
                "accounts file missing; feed pools start empty"
            );
        }

        let x = Arc::new(XClient::new(
            Arc::clone(&x_pool),
            config.request_timeout_secs,
            &config.user_agent,
        )?);
        let facebook = Arc::new(PageClient::new(
            Arc::clone(&facebook_pool),
            config.request_timeout_secs,
            &config.user_agent,
        )?);

        Ok(Self::new(linkedin, x, x_pool, facebook, facebook_pool))
    }

    /// Runs an authentication pass over both feed pools. Partial success
    /// is normal; the reports say which accounts need operator attention.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] only when pool state cannot be
    /// persisted; per-account auth failures live inside the reports.
    pub async fn authenticate_pools(&self) -> Result<(AuthReport, AuthReport), DispatchError> {
        let x_report = self.x_pool.authenticate_all().await?;
        let facebook_report = self.facebook_pool.authenticate_all().await?;
        Ok((x_report, facebook_report))
    }

    /// The single fetch entry point.
    ///
    /// `identifier` is a profile slug, company slug, username, page name,
    /// or search query depending on the operation; `limit` bounds feed
    /// operations and is ignored for single-entity lookups.
    ///
    /// # Errors
    ///
    /// [`DispatchError`] with `kind = UnsupportedOperation` for a pair
    /// outside the compatibility table (no I/O performed), otherwise the
    /// mapped client failure (§ taxonomy on [`ErrorKind`]).
    pub async fn fetch(
        &self,
        platform: Platform,
        operation: Operation,
        identifier: &str,
        limit: u32,
    ) -> Result<FetchResult, DispatchError> {
        if !is_supported(platform, operation) {
            return Err(DispatchError::new(
                ErrorKind::UnsupportedOperation,
                format!("operation '{operation}' is not supported on platform '{platform}'"),
            ));
        }

        tracing::debug!(%platform, %operation, identifier, limit, "dispatching fetch");

        match (platform, operation) {
            (Platform::Linkedin, Operation::Profile) => {
                let profile = self.linkedin.fetch_profile(identifier).await?;
                Ok(FetchResult::Entity(NormalizedEntity::Profile(profile)))
            }
            (Platform::Linkedin, Operation::Organization) => {
                let org = self.linkedin.fetch_organization(identifier).await?;
                Ok(FetchResult::Entity(NormalizedEntity::Organization(org)))
            }
            (Platform::Linkedin, Operation::Timeline) => {
                let posts = self.linkedin.recent_activity(identifier, limit).await?;
                Ok(entities_from(posts))
            }
            (Platform::X, Operation::Timeline) => {
                let posts = self.x.user_timeline(identifier, limit).await?;
                Ok(entities_from(posts))
            }
            (Platform::X, Operation::Search) => {
                let posts = self.x.search(identifier, limit).await?;
                Ok(entities_from(posts))
            }
            (Platform::Facebook, Operation::Timeline) => {
                let posts = self.facebook.page_feed(identifier, limit).await?;
                Ok(entities_from(posts))
            }
            _ => Err(DispatchError::new(
                ErrorKind::UnsupportedOperation,
                format!("operation '{operation}' is not supported on platform '{platform}'"),
            )),
        }
    }

    /// Health snapshot for the embedding layer. Non-blocking.
    #[must_use]
    pub fn health(&self) -> Health {
        Health {
            linkedin_initialized: self.linkedin.is_initialized(),
            x_pool: self.x_pool.status(),
            facebook_pool: self.facebook_pool.status(),
        }
    }
}

fn entities_from(posts: Vec<Post>) -> FetchResult {
    FetchResult::Entities(posts.into_iter().map(NormalizedEntity::Post).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compatibility_table_accepts_documented_pairs() {
        assert!(is_supported(Platform::Linkedin, Operation::Profile));
        assert!(is_supported(Platform::Linkedin, Operation::Organization));
        assert!(is_supported(Platform::X, Operation::Search));
        assert!(is_supported(Platform::Facebook, Operation::Timeline));
    }

    #[test]
    fn compatibility_table_rejects_everything_else() {
        assert!(!is_supported(Platform::X, Operation::Profile));
        assert!(!is_supported(Platform::X, Operation::Organization));
        assert!(!is_supported(Platform::Facebook, Operation::Search));
        assert!(!is_supported(Platform::Facebook, Operation::Profile));
        assert!(!is_supported(Platform::Linkedin, Operation::Search));
    }

    #[test]
    fn operation_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Operation::Organization).unwrap(),
            "\"organization\""
        );
        assert_eq!(Operation::Timeline.to_string(), "timeline");
    }
}
