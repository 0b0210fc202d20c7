//! Account records owned by the pool.
//!
//! Credential material never leaves this crate: clients receive an
//! [`crate::pool::AccountLease`] carrying only the session material needed
//! to sign requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mosaic_core::{AccountSeed, Platform};

/// Credential material for one scraper account. Password and cookies are
/// mutually exclusive by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Credentials {
    Password {
        password: String,
        email: Option<String>,
    },
    Cookies {
        cookies: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Registered but not yet authenticated (or manually reset).
    Unauthenticated,
    /// Authenticated and eligible for rotation.
    Active,
    /// Provider reported a lockout during authentication; needs manual reset.
    Locked,
    /// Provider rejected the credentials or session; needs manual reset.
    Failed,
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Unauthenticated => write!(f, "unauthenticated"),
            AccountStatus::Active => write!(f, "active"),
            AccountStatus::Locked => write!(f, "locked"),
            AccountStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One pool account as held in memory and persisted by the credential store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub identifier: String,
    pub platform: Platform,
    pub credentials: Credentials,
    pub status: AccountStatus,
    /// Session material from the last successful authentication: the
    /// `Cookie` header value requests are signed with.
    pub session: Option<String>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub failure_count: u32,
    /// Exclusive-checkout marker; in-memory only.
    #[serde(skip)]
    pub(crate) checked_out: bool,
}

impl Account {
    /// Builds a fresh, unauthenticated account from a validated seed.
    ///
    /// Seed validation (in `mosaic-core`) guarantees exactly one of
    /// password/cookies is present; a seed that somehow carries neither is
    /// registered with an empty cookie string and will fail authentication.
    #[must_use]
    pub fn from_seed(seed: AccountSeed) -> Self {
        let credentials = match (seed.password, seed.cookies) {
            (Some(password), _) => Credentials::Password {
                password,
                email: seed.email,
            },
            (None, cookies) => Credentials::Cookies {
                cookies: cookies.unwrap_or_default(),
            },
        };
        Self {
            identifier: seed.identifier,
            platform: seed.platform,
            credentials,
            status: AccountStatus::Unauthenticated,
            session: None,
            last_used_at: None,
            failure_count: 0,
            checked_out: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_seed_prefers_password_material() {
        let seed = AccountSeed {
            identifier: "scout1".to_string(),
            platform: Platform::X,
            password: Some("hunter2".to_string()),
            email: Some("scout@example.com".to_string()),
            cookies: None,
        };
        let account = Account::from_seed(seed);
        assert_eq!(account.status, AccountStatus::Unauthenticated);
        assert!(matches!(account.credentials, Credentials::Password { .. }));
        assert!(account.session.is_none());
        assert_eq!(account.failure_count, 0);
    }

    #[test]
    fn from_seed_cookie_material() {
        let seed = AccountSeed {
            identifier: "pages1".to_string(),
            platform: Platform::Facebook,
            password: None,
            email: None,
            cookies: Some("c_user=1; xs=abc".to_string()),
        };
        let account = Account::from_seed(seed);
        assert!(matches!(
            account.credentials,
            Credentials::Cookies { ref cookies } if cookies == "c_user=1; xs=abc"
        ));
    }

    #[test]
    fn checked_out_is_not_persisted() {
        let mut account = Account::from_seed(AccountSeed {
            identifier: "scout1".to_string(),
            platform: Platform::X,
            password: None,
            email: None,
            cookies: Some("auth_token=a".to_string()),
        });
        account.checked_out = true;
        let json = serde_json::to_string(&account).unwrap();
        let decoded: Account = serde_json::from_str(&json).unwrap();
        assert!(!decoded.checked_out);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AccountStatus::Unauthenticated).unwrap(),
            "\"unauthenticated\""
        );
        assert_eq!(AccountStatus::Locked.to_string(), "locked");
    }
}
