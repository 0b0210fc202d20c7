//! Pool-backed client for X timelines and keyword search.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use mosaic_core::Post;

use crate::error::SocialError;
use crate::normalize::normalize_tweet;
use crate::pool::{AccountLease, AccountPool, FailureKind};
use crate::types::{RawTweet, SearchResponse};

const DEFAULT_BASE_URL: &str = "https://api.x.com/";

/// Feed client for X. Every call checks an account out of the pool, and a
/// provider-reported session expiry triggers exactly one retry with a
/// freshly acquired account: never an unauthenticated fallback, and never
/// an unbounded loop.
pub struct XClient {
    http: Client,
    pool: Arc<AccountPool>,
    base_url: Url,
}

impl XClient {
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

    /// Fetches a user's most recent posts.
    ///
    /// `limit` is a hard upper bound on the items requested from the
    /// provider, not a post-filter; fewer may come back. `limit == 0`
    /// returns empty without acquiring an account or touching the network.
    ///
    /// # Errors
    ///
    /// - [`SocialError::PoolExhausted`] — no usable account.
    /// - [`SocialError::NotFound`] — unknown user.
    /// - [`SocialError::AuthExpired`] — both the leased account and its
    ///   one-retry replacement were rejected.
    /// - [`SocialError::RateLimited`] / [`SocialError::UnexpectedStatus`] /
    ///   [`SocialError::Http`] / [`SocialError::Deserialize`] — surfaced
    ///   with detail for the caller's retry policy.
    pub async fn user_timeline(
        &self,
        username: &str,
        limit: u32,
    ) -> Result<Vec<Post>, SocialError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut url = self.api_url("1.1/statuses/user_timeline.json");
        url.query_pairs_mut()
            .append_pair("screen_name", username)
            .append_pair("count", &limit.to_string())
            .append_pair("tweet_mode", "extended");
        self.fetch_rotating(url, true, "user", username).await
    }

    /// Searches recent posts by keyword.
    ///
    /// Same limit and rotation semantics as [`XClient::user_timeline`].
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`XClient::user_timeline`] (minus `NotFound`;
    /// an unmatched query is an empty result, not an error).
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<Post>, SocialError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut url = self.api_url("1.1/search/tweets.json");
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("count", &limit.to_string())
            .append_pair("result_type", "recent")
            .append_pair("tweet_mode", "extended");
        self.fetch_rotating(url, false, "search", query).await
    }

    /// Acquire → fetch → on session expiry mark the account failed and
    /// retry exactly once with a fresh account.
    async fn fetch_rotating(
        &self,
        url: Url,
        bare_array: bool,
        entity: &'static str,
        identifier: &str,
    ) -> Result<Vec<Post>, SocialError> {
        let lease = self.pool.acquire()?;
        let tweets = match self
            .fetch_tweets(&lease, url.clone(), bare_array, entity, identifier)
            .await
        {
            Err(SocialError::AuthExpired { identifier: expired }) => {
                self.pool.report_failure(&lease, FailureKind::AuthExpired)?;
                drop(lease);
                tracing::info!(
                    account = %expired,
                    identifier,
                    "session expired; retrying once with a fresh account"
                );
                let retry = self.pool.acquire()?;
                match self
                    .fetch_tweets(&retry, url, bare_array, entity, identifier)
                    .await
                {
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

        Ok(tweets.into_iter().filter_map(normalize_tweet).collect())
    }

    async fn fetch_tweets(
        &self,
        lease: &AccountLease,
        url: Url,
        bare_array: bool,
        entity: &'static str,
        identifier: &str,
    ) -> Result<Vec<RawTweet>, SocialError> {
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
                entity,
                identifier: identifier.to_string(),
            });
        }
        if !status.is_success() {
            return Err(SocialError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        if bare_array {
            serde_json::from_str::<Vec<RawTweet>>(&body).map_err(|e| SocialError::Deserialize {
                context: format!("{entity} '{identifier}' timeline"),
                source: e,
            })
        } else {
            serde_json::from_str::<SearchResponse>(&body)
                .map(|r| r.statuses)
                .map_err(|e| SocialError::Deserialize {
                    context: format!("{entity} '{identifier}' search"),
                    source: e,
                })
        }
    }

    fn api_url(&self, path: &str) -> Url {
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }
}
