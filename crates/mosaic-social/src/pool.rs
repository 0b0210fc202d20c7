//! The account pool: registration, authentication, rotation, failure
//! handling, and health reporting for the feed-platform scraper accounts.
//!
//! The pool is the single point of truth for which accounts may be used.
//! Acquisition is an exclusive checkout: a leased account is out of the
//! rotation until its [`AccountLease`] drops, so two in-flight operations
//! never share an account. All state lives behind one `std::sync::Mutex`
//! with short critical sections (never held across an await), which lets
//! the lease release itself from `Drop` even when an operation is
//! abandoned mid-flight.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use mosaic_core::AccountSeed;

use crate::account::{Account, AccountStatus, Credentials};
use crate::error::SocialError;
use crate::store::AccountStore;

/// Platform-specific authentication endpoints, relative to the pool's base
/// URL.
#[derive(Debug, Clone, Copy)]
pub struct AuthEndpoints {
    pub login_path: &'static str,
    pub verify_path: &'static str,
}

impl AuthEndpoints {
    pub const X: Self = Self {
        login_path: "1.1/account/login.json",
        verify_path: "1.1/account/verify_credentials.json",
    };

    pub const FACEBOOK: Self = Self {
        login_path: "login.json",
        verify_path: "me",
    };
}

/// How a client observed a leased account fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Provider reported the session invalid; the account leaves rotation.
    AuthExpired,
    /// Provider throttled the account; it stays active but cycles to the
    /// back of the rotation.
    RateLimited,
    /// Network-level failure; says nothing about the account.
    Transient,
}

/// Outcome of [`AccountPool::authenticate_all`]. Partial success is the
/// expected steady state, not an error.
#[derive(Debug)]
pub struct AuthReport {
    pub succeeded: usize,
    /// `(identifier, reason)` for every account that did not authenticate.
    pub failed: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStatus {
    pub active: usize,
    pub total: usize,
}

#[derive(Debug)]
pub(crate) struct PoolShared {
    accounts: Mutex<Vec<Account>>,
}

impl PoolShared {
    pub(crate) fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Account>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Exclusive checkout of one active account.
///
/// Carries the session material needed to sign requests, never the
/// underlying credentials. Dropping the lease returns the account to the
/// rotation; `last_used_at` was already stamped at acquisition, so a
/// released account queues behind accounts used less recently.
#[derive(Debug)]
pub struct AccountLease {
    shared: Arc<PoolShared>,
    identifier: String,
    session: String,
}

impl AccountLease {
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// `Cookie` header value for signed requests.
    pub(crate) fn session(&self) -> &str {
        &self.session
    }
}

impl Drop for AccountLease {
    fn drop(&mut self) {
        let mut accounts = self.shared.lock();
        if let Some(account) = accounts.iter_mut().find(|a| a.identifier == self.identifier) {
            account.checked_out = false;
        }
    }
}

enum AuthOutcome {
    Success { session: String },
    Rejected { status: u16 },
    LockedOut,
    Transient { reason: String },
}

/// Pool of independently authenticated scraper accounts for one feed
/// platform.
pub struct AccountPool {
    http: Client,
    base_url: Url,
    endpoints: AuthEndpoints,
    shared: Arc<PoolShared>,
    store: Box<dyn AccountStore>,
}

impl AccountPool {
    /// Creates a pool and loads its accounts from the credential store.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::Http`] if the HTTP client cannot be built,
    /// store errors if the persisted accounts cannot be loaded, or
    /// [`SocialError::InvalidBaseUrl`] for an unparseable base URL.
    pub fn new(
        store: Box<dyn AccountStore>,
        endpoints: AuthEndpoints,
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SocialError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SocialError::InvalidBaseUrl {
            url: normalised.clone(),
            reason: e.to_string(),
        })?;

        let accounts = store.load()?;
        tracing::debug!(count = accounts.len(), "loaded pool accounts from store");

        Ok(Self {
            http,
            base_url,
            endpoints,
            shared: Arc::new(PoolShared {
                accounts: Mutex::new(accounts),
            }),
            store,
        })
    }

    /// Registers (or re-registers) an account from a validated seed.
    ///
    /// A seed matching an existing identifier replaces that account's
    /// credentials and resets it to `Unauthenticated`; registration never
    /// grants rotation eligibility by itself.
    ///
    /// # Errors
    ///
    /// Returns store errors if the updated pool cannot be persisted.
    pub fn add_account(&self, seed: AccountSeed) -> Result<(), SocialError> {
        let account = Account::from_seed(seed);
        let snapshot = {
            let mut accounts = self.shared.lock();
            if let Some(existing) = accounts
                .iter_mut()
                .find(|a| a.identifier == account.identifier)
            {
                *existing = account;
            } else {
                accounts.push(account);
            }
            accounts.clone()
        };
        self.store.persist(&snapshot)
    }

    /// Returns `true` when an account with this identifier is registered,
    /// whatever its status.
    #[must_use]
    pub fn has_account(&self, identifier: &str) -> bool {
        self.shared
            .lock()
            .iter()
            .any(|a| a.identifier == identifier)
    }

    /// Authenticates every eligible account independently; one account's
    /// failure never aborts the others.
    ///
    /// `Unauthenticated` and `Active` accounts are attempted (re-verifying
    /// an active session is cheap and catches silent expiry). `Locked` and
    /// `Failed` accounts are skipped until manually reset. Only a
    /// provider-reported rejection (401/403) fails an account; a provider
    /// lockout (423) locks it; network errors leave its status untouched.
    ///
    /// # Errors
    ///
    /// Returns store errors if the resulting pool state cannot be persisted.
    pub async fn authenticate_all(&self) -> Result<AuthReport, SocialError> {
        let candidates: Vec<(String, Credentials)> = {
            let accounts = self.shared.lock();
            accounts
                .iter()
                .filter(|a| {
                    matches!(
                        a.status,
                        AccountStatus::Unauthenticated | AccountStatus::Active
                    )
                })
                .map(|a| (a.identifier.clone(), a.credentials.clone()))
                .collect()
        };

        let mut report = AuthReport {
            succeeded: 0,
            failed: Vec::new(),
        };

        for (identifier, credentials) in candidates {
            let outcome = self.authenticate_account(&identifier, &credentials).await;
            let mut accounts = self.shared.lock();
            let Some(account) = accounts.iter_mut().find(|a| a.identifier == identifier)
            else {
                continue;
            };
            match outcome {
                AuthOutcome::Success { session } => {
                    account.status = AccountStatus::Active;
                    account.session = Some(session);
                    report.succeeded += 1;
                }
                AuthOutcome::Rejected { status } => {
                    account.status = AccountStatus::Failed;
                    account.session = None;
                    account.failure_count += 1;
                    tracing::warn!(identifier = %identifier, status, "account rejected by provider");
                    report
                        .failed
                        .push((identifier, format!("provider rejected credentials (status {status})")));
                }
                AuthOutcome::LockedOut => {
                    account.status = AccountStatus::Locked;
                    account.session = None;
                    account.failure_count += 1;
                    tracing::warn!(identifier = %identifier, "account locked by provider");
                    report
                        .failed
                        .push((identifier, "provider reported the account locked".to_string()));
                }
                AuthOutcome::Transient { reason } => {
                    tracing::warn!(identifier = %identifier, reason = %reason, "transient authentication failure");
                    report.failed.push((identifier, reason));
                }
            }
        }

        let snapshot = self.shared.lock().clone();
        self.store.persist(&snapshot)?;

        tracing::info!(
            succeeded = report.succeeded,
            failed = report.failed.len(),
            "pool authentication pass finished"
        );
        Ok(report)
    }

    async fn authenticate_account(
        &self,
        identifier: &str,
        credentials: &Credentials,
    ) -> AuthOutcome {
        let result = match credentials {
            Credentials::Cookies { cookies } => self.verify_session(cookies).await,
            Credentials::Password { password, email } => {
                self.login(identifier, password, email.as_deref()).await
            }
        };
        match result {
            Ok(outcome) => outcome,
            Err(e) => AuthOutcome::Transient {
                reason: format!("network error: {e}"),
            },
        }
    }

    /// Validates pasted cookies against the platform's verify endpoint. The
    /// cookie string itself becomes the session material on success.
    async fn verify_session(&self, cookies: &str) -> Result<AuthOutcome, reqwest::Error> {
        let url = self.auth_url(self.endpoints.verify_path);
        let response = self
            .http
            .get(url)
            .header(reqwest::header::COOKIE, cookies)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(AuthOutcome::Success {
                session: cookies.to_string(),
            });
        }
        Ok(Self::classify_auth_failure(status))
    }

    /// Exchanges a password for session cookies at the platform's login
    /// endpoint. Every `Set-Cookie` of the response is folded into the
    /// session material.
    async fn login(
        &self,
        identifier: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<AuthOutcome, reqwest::Error> {
        let url = self.auth_url(self.endpoints.login_path);
        let mut form = vec![("username", identifier), ("password", password)];
        if let Some(email) = email {
            form.push(("email", email));
        }
        let response = self.http.post(url).form(&form).send().await?;
        let status = response.status();

        if status.is_success() {
            let session = response
                .headers()
                .get_all(reqwest::header::SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .filter_map(|cookie| cookie.split(';').next())
                .map(str::trim)
                .filter(|pair| !pair.is_empty())
                .collect::<Vec<_>>()
                .join("; ");
            if session.is_empty() {
                return Ok(AuthOutcome::Transient {
                    reason: "login returned no session cookies".to_string(),
                });
            }
            return Ok(AuthOutcome::Success { session });
        }

        Ok(Self::classify_auth_failure(status))
    }

    fn classify_auth_failure(status: StatusCode) -> AuthOutcome {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            AuthOutcome::Rejected {
                status: status.as_u16(),
            }
        } else if status == StatusCode::LOCKED {
            AuthOutcome::LockedOut
        } else {
            AuthOutcome::Transient {
                reason: format!("unexpected status {status} from auth endpoint"),
            }
        }
    }

    fn auth_url(&self, path: &str) -> Url {
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }

    /// Checks out the least-recently-used active account.
    ///
    /// Never blocks: with no active, unleased account available the call
    /// fails immediately with [`SocialError::PoolExhausted`] and the caller
    /// decides whether to retry later.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::PoolExhausted`] when no account is available.
    pub fn acquire(&self) -> Result<AccountLease, SocialError> {
        let mut accounts = self.shared.lock();
        let idx = accounts
            .iter()
            .enumerate()
            .filter(|(_, a)| a.status == AccountStatus::Active && !a.checked_out)
            .min_by_key(|(_, a)| a.last_used_at)
            .map(|(idx, _)| idx)
            .ok_or(SocialError::PoolExhausted)?;

        let account = &mut accounts[idx];
        account.checked_out = true;
        account.last_used_at = Some(Utc::now());
        tracing::debug!(identifier = %account.identifier, "account checked out");

        Ok(AccountLease {
            shared: Arc::clone(&self.shared),
            identifier: account.identifier.clone(),
            session: account.session.clone().unwrap_or_default(),
        })
    }

    /// Records how a leased account failed.
    ///
    /// `AuthExpired` removes the account from rotation until manually
    /// reset. `RateLimited` keeps it active but bumps `last_used_at` so it
    /// cycles to the back of the rotation. `Transient` changes nothing.
    ///
    /// # Errors
    ///
    /// Returns store errors if the state change cannot be persisted.
    pub fn report_failure(
        &self,
        lease: &AccountLease,
        kind: FailureKind,
    ) -> Result<(), SocialError> {
        if kind == FailureKind::Transient {
            return Ok(());
        }

        let snapshot = {
            let mut accounts = self.shared.lock();
            let Some(account) = accounts
                .iter_mut()
                .find(|a| a.identifier == lease.identifier)
            else {
                return Ok(());
            };
            account.failure_count += 1;
            if kind == FailureKind::AuthExpired {
                account.status = AccountStatus::Failed;
                account.session = None;
                tracing::warn!(identifier = %account.identifier, "account session expired; removed from rotation");
            } else {
                account.last_used_at = Some(Utc::now());
                tracing::warn!(identifier = %account.identifier, "account rate limited; cycled to back of rotation");
            }
            accounts.clone()
        };
        self.store.persist(&snapshot)
    }

    /// Manually returns a `Locked`/`Failed` account to `Unauthenticated`
    /// so the next [`AccountPool::authenticate_all`] pass can revive it.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::NotFound`] for an unknown identifier, or
    /// store errors if the change cannot be persisted.
    pub fn reset_account(&self, identifier: &str) -> Result<(), SocialError> {
        let snapshot = {
            let mut accounts = self.shared.lock();
            let account = accounts
                .iter_mut()
                .find(|a| a.identifier == identifier)
                .ok_or_else(|| SocialError::NotFound {
                    entity: "account",
                    identifier: identifier.to_string(),
                })?;
            account.status = AccountStatus::Unauthenticated;
            account.session = None;
            accounts.clone()
        };
        self.store.persist(&snapshot)
    }

    #[must_use]
    pub fn status(&self) -> PoolStatus {
        let accounts = self.shared.lock();
        PoolStatus {
            active: accounts
                .iter()
                .filter(|a| a.status == AccountStatus::Active)
                .count(),
            total: accounts.len(),
        }
    }
}

#[cfg(test)]
#[path = "pool_test.rs"]
mod tests;
