use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, StatusCode, Url};
use tokio::sync::RwLock;

use mosaic_core::{Organization, Platform, Post, Profile};

use crate::error::LinkedinError;
use crate::extract::{extract_organization, extract_profile};
use crate::session::Session;
use crate::types::VoyagerResponse;

const DEFAULT_BASE_URL: &str = "https://www.linkedin.com/";

const ACCEPT_NORMALIZED: &str = "application/vnd.linkedin.normalized+json+2.1";
const RESTLI_VERSION: &str = "2.0.0";

const PROFILE_DECORATION: &str =
    "com.linkedin.voyager.dash.deco.identity.profile.WebTopCardCore-16";
const COMPANY_DECORATION: &str =
    "com.linkedin.voyager.deco.organization.web.WebFullCompanyMain-12";

/// Cookie-authenticated client for the Voyager API.
///
/// Holds one lazily-created [`Session`] shared by all requests (see
/// `session.rs` for the locking discipline). Each fetch issues a single
/// signed GET and reconstructs the entity from the `"included"` record
/// graph; a response without a primary record fails rather than producing
/// a partial entity.
///
/// Use [`LinkedinClient::new`] for production or
/// [`LinkedinClient::with_base_url`] to point at a mock server in tests.
pub struct LinkedinClient {
    http: Client,
    /// `li_at` cookie value; empty when unconfigured (auth error on use).
    cookie: String,
    base_url: Url,
    session: RwLock<Option<Arc<Session>>>,
}

impl LinkedinClient {
    /// Creates a client pointed at the production Voyager API.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedinError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        cookie: Option<String>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, LinkedinError> {
        Self::with_base_url(cookie, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`LinkedinError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`LinkedinError::Auth`] if `base_url` is
    /// not a valid URL.
    pub fn with_base_url(
        cookie: Option<String>,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, LinkedinError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| LinkedinError::Auth {
            reason: format!("invalid base URL '{base_url}': {e}"),
        })?;

        Ok(Self {
            http,
            cookie: cookie.unwrap_or_default(),
            base_url,
            session: RwLock::new(None),
        })
    }

    pub(crate) fn session(&self) -> &RwLock<Option<Arc<Session>>> {
        &self.session
    }

    /// Fetches a profile by its public identifier (the `/in/{id}` slug).
    ///
    /// # Errors
    ///
    /// - [`LinkedinError::Auth`] — cookie unconfigured, or Voyager rejected
    ///   the session (401/403).
    /// - [`LinkedinError::NotFound`] — 404, or no primary profile record in
    ///   the response graph.
    /// - [`LinkedinError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`LinkedinError::Deserialize`] — body is not the expected envelope.
    /// - [`LinkedinError::Http`] — network failure.
    pub async fn fetch_profile(&self, identifier: &str) -> Result<Profile, LinkedinError> {
        let url = self.profile_url(identifier);
        let response = self.fetch_included(url, "profile", identifier).await?;
        extract_profile(identifier, &response)
    }

    /// Fetches a company page by its universal name (the `/company/{id}` slug).
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`LinkedinClient::fetch_profile`].
    pub async fn fetch_organization(
        &self,
        identifier: &str,
    ) -> Result<Organization, LinkedinError> {
        let url = self.organization_url(identifier);
        let response = self.fetch_included(url, "organization", identifier).await?;
        extract_organization(identifier, &response)
    }

    /// Synthesizes recent-activity posts for a profile.
    ///
    /// Voyager has no stable public-activity read for third-party members,
    /// so this mirrors the profile's summary (falling back to the headline)
    /// as a single post, which is enough for the aggregated feed view. `limit == 0`
    /// returns empty without a network call.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`LinkedinClient::fetch_profile`].
    pub async fn recent_activity(
        &self,
        identifier: &str,
        limit: u32,
    ) -> Result<Vec<Post>, LinkedinError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let profile = self.fetch_profile(identifier).await?;

        let mut posts = Vec::new();
        if let Some(summary) = &profile.summary {
            posts.push(synthesized_post(
                &profile,
                format!("{identifier}-summary"),
                summary.clone(),
            ));
        } else if let Some(headline) = &profile.headline {
            posts.push(synthesized_post(
                &profile,
                format!("{identifier}-headline"),
                format!("{}: {headline}", profile.display_name),
            ));
        }

        posts.truncate(limit as usize);
        Ok(posts)
    }

    /// Issues one signed Voyager GET and parses the normalized envelope.
    async fn fetch_included(
        &self,
        url: Url,
        entity: &'static str,
        identifier: &str,
    ) -> Result<VoyagerResponse, LinkedinError> {
        let session = self.ensure_session().await?;

        let mut request = self
            .http
            .get(url.clone())
            .header(reqwest::header::ACCEPT, ACCEPT_NORMALIZED)
            .header(reqwest::header::COOKIE, self.cookie_header(&session))
            .header("x-restli-protocol-version", RESTLI_VERSION)
            .header("x-li-lang", "en_US");
        if !session.csrf_token.is_empty() {
            request = request.header("csrf-token", &session.csrf_token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(LinkedinError::Auth {
                reason: format!("voyager rejected the session with status {status}"),
            });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(LinkedinError::NotFound {
                entity,
                identifier: identifier.to_string(),
            });
        }
        if !status.is_success() {
            return Err(LinkedinError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<VoyagerResponse>(&body).map_err(|e| LinkedinError::Deserialize {
            context: format!("{entity} '{identifier}'"),
            source: e,
        })
    }

    /// Performs the one-off handshake that seeds the session.
    ///
    /// A missing `JSESSIONID` cookie (and even a non-2xx handshake status)
    /// is non-fatal: the session is created with an empty CSRF token and
    /// the condition recorded.
    pub(crate) async fn handshake(&self) -> Result<Session, LinkedinError> {
        if self.cookie.is_empty() {
            return Err(LinkedinError::Auth {
                reason: "linkedin cookie not configured".to_string(),
            });
        }

        tracing::debug!(cookie_len = self.cookie.len(), "initializing voyager session");

        let response = self
            .http
            .get(self.base_url.clone())
            .header(reqwest::header::COOKIE, format!("li_at={}", self.cookie))
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(
                status = response.status().as_u16(),
                "voyager handshake returned non-success status"
            );
        }

        let csrf_token = response
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(parse_jsessionid)
            .unwrap_or_default();

        if csrf_token.is_empty() {
            tracing::warn!("handshake yielded no JSESSIONID; proceeding without a CSRF token");
        }

        Ok(Session {
            csrf_token,
            created_at: Utc::now(),
        })
    }

    fn cookie_header(&self, session: &Session) -> String {
        if session.csrf_token.is_empty() {
            format!("li_at={}", self.cookie)
        } else {
            // Voyager expects the JSESSIONID value quoted, matching how the
            // site itself sets it.
            format!(
                "li_at={}; JSESSIONID=\"{}\"",
                self.cookie, session.csrf_token
            )
        }
    }

    fn profile_url(&self, identifier: &str) -> Url {
        let mut url = self.voyager_url("voyager/api/identity/dash/profiles");
        url.query_pairs_mut()
            .append_pair("q", "memberIdentity")
            .append_pair("memberIdentity", identifier)
            .append_pair("decorationId", PROFILE_DECORATION);
        url
    }

    fn organization_url(&self, identifier: &str) -> Url {
        let mut url = self.voyager_url("voyager/api/organization/companies");
        url.query_pairs_mut()
            .append_pair("q", "universalName")
            .append_pair("universalName", identifier)
            .append_pair("decorationId", COMPANY_DECORATION);
        url
    }

    fn voyager_url(&self, path: &str) -> Url {
        // The base URL is normalised to end in "/" at construction, so join
        // cannot fail on these fixed paths.
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }
}

/// Extracts the CSRF token from a `Set-Cookie` header value such as
/// `JSESSIONID="ajax:123"; Path=/; Secure`. The surrounding quotes are part
/// of the cookie value on the wire but not of the token.
fn parse_jsessionid(set_cookie: &str) -> Option<String> {
    let rest = set_cookie.trim_start().strip_prefix("JSESSIONID=")?;
    let value = rest.split(';').next().unwrap_or(rest);
    let token = value.trim().trim_matches('"');
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn synthesized_post(profile: &Profile, id: String, text: String) -> Post {
    Post {
        id,
        text,
        author_name: profile.display_name.clone(),
        author_id: Some(profile.id.clone()),
        url: profile.url.clone(),
        image_url: profile.picture_url.clone(),
        published_at: Utc::now(),
        like_count: 0,
        share_count: 0,
        comment_count: 0,
        platform: Platform::Linkedin,
        provider_raw: serde_json::Value::Null,
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
