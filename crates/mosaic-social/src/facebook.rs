//! Pool-backed client for Facebook page feeds.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use mosaic_core::Post;

use crate::error::SocialError;
use crate::normalize::normalize_page_post;
use crate::pool::{AccountLease, AccountPool, FailureKind};
use crate::types::PageFeedResponse;

const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/";

/// Feed client for Facebook pages. Same pool discipline as the X client:
/// every call checks an account out, and a session expiry is retried
/// exactly once with a fresh account.
pub struct PageClient {
    http: Client,
    pool: Arc<AccountPool>,
    base_url: Url,
}

impl PageClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        pool: Arc<AccountPool>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SocialError> {
        Self::with_base_url(pool, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SocialError::InvalidBaseUrl`] for an
    /// unparseable base URL.
    pub fn with_base_url(
        pool: Arc<AccountPool>,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
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
        Ok(Self {
            http,
            pool,
            base_url,
        })
    }

    /// Fetches a page's most recent posts.
    ///
    /// `limit` is a hard upper bound on the items requested from the
    /// provider; `limit == 0` returns empty without acquiring an account
    /// or touching the network.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`crate::XClient::user_timeline`].
    pub async fn page_feed(&self, page: &str, limit: u32) -> Result<Vec<Post>, SocialError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut url = self.api_url(&format!("{page}/posts"));
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        let lease = self.pool.acquire()?;
        let raw = match self.fetch_page(&lease, url.clone(), page).await {
            Err(SocialError::AuthExpired { identifier: expired }) => {
                self.pool.report_failure(&lease, FailureKind::AuthExpired)?;
                drop(lease);
                tracing::info!(
                    account = %expired,
                    page,
                    "session expired; retrying once with a fresh account"
                );
                let retry = self.pool.acquire()?;
                match self.fetch_page(&retry, url, page).await {
                    Err(e @ SocialError::AuthExpired { .. }) => {
                        self.pool.report_failure(&retry, FailureKind::AuthExpired)?;
                        return Err(e);
                    }
                    Err(e @ SocialError::RateLimited { .. }) => {
                        self.pool.report_failure(&retry, FailureKind::RateLimited)?;
                        return Err(e);
                    }
                    other => other?,
                }
            }
            Err(e @ SocialError::RateLimited { .. }) => {
                self.pool.report_failure(&lease, FailureKind::RateLimited)?;
                return Err(e);
            }
            other => other?,
        };

        Ok(raw
            .data
            .into_iter()
            .filter_map(|post| normalize_page_post(post, page))
            .collect())
    }

    async fn fetch_page(
        &self,
        lease: &AccountLease,
        url: Url,
        page: &str,
    ) -> Result<PageFeedResponse, SocialError> {
        let response = self
            .http
            .get(url.clone())
            .header(reqwest::header::COOKIE, lease.session())
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(SocialError::AuthExpired {
                identifier: lease.identifier().to_string(),
            });
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(SocialError::RateLimited {
                identifier: lease.identifier().to_string(),
                retry_after_secs,
            });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(SocialError::NotFound {
                entity: "page",
                identifier: page.to_string(),
            });
        }
        if !status.is_success() {
            return Err(SocialError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<PageFeedResponse>(&body).map_err(|e| SocialError::Deserialize {
            context: format!("page '{page}' feed"),
            source: e,
        })
    }

    fn api_url(&self, path: &str) -> Url {
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }
}
