//! Platform-agnostic entity shapes returned to callers regardless of the
//! source platform.
//!
//! Every entity carries a non-empty `id` and `url` by construction: the
//! provider clients fail an operation outright rather than returning a
//! partial entity with those fields missing. Optional fields (`headline`,
//! `image_url`, ...) are `None` when the provider omits them; numeric
//! engagement counters default to `0` and are never fabricated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source platform of a fetched entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linkedin,
    X,
    Facebook,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Linkedin => write!(f, "linkedin"),
            Platform::X => write!(f, "x"),
            Platform::Facebook => write!(f, "facebook"),
        }
    }
}

/// Tagged union of every normalized shape the dispatcher can return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NormalizedEntity {
    Profile(Profile),
    Organization(Organization),
    Post(Post),
}

impl NormalizedEntity {
    /// Provider-scoped identifier of the underlying entity.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            NormalizedEntity::Profile(p) => &p.id,
            NormalizedEntity::Organization(o) => &o.id,
            NormalizedEntity::Post(p) => &p.id,
        }
    }

    /// Canonical public URL of the underlying entity.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            NormalizedEntity::Profile(p) => &p.url,
            NormalizedEntity::Organization(o) => &o.url,
            NormalizedEntity::Post(p) => &p.url,
        }
    }
}

/// A person profile from the professional network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Public identifier (the `/in/{id}` URL slug).
    pub id: String,
    pub display_name: String,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub picture_url: Option<String>,
    /// Canonical profile URL, e.g. `"https://www.linkedin.com/in/satyanadella"`.
    pub url: String,
    /// Most recent positions, in provider order, truncated by the extractor.
    pub experience: Vec<ExperienceItem>,
    /// Education entries, in provider order, truncated by the extractor.
    pub education: Vec<EducationItem>,
    pub is_premium: bool,
}

/// One position entry on a [`Profile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceItem {
    pub title: String,
    pub company: Option<String>,
    /// Provider-formatted range string, e.g. `"2019 - Present"`.
    pub date_range: Option<String>,
}

/// One education entry on a [`Profile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationItem {
    pub school: String,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
}

/// A company page from the professional network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// Public identifier (the `/company/{id}` URL slug).
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub staff_count: Option<u32>,
    pub logo_url: Option<String>,
    pub url: String,
}

/// A single post from any platform's feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub text: String,
    pub author_name: String,
    pub author_id: Option<String>,
    pub url: String,
    /// First image of the post's media collection, if any.
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub like_count: u32,
    pub share_count: u32,
    pub comment_count: u32,
    pub platform: Platform,
    /// Opaque provider-side identifiers, kept for debugging and dedup.
    pub provider_raw: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_post() -> Post {
        Post {
            id: "1234567890".to_string(),
            text: "Launching our seed round today.".to_string(),
            author_name: "acme".to_string(),
            author_id: Some("42".to_string()),
            url: "https://x.com/acme/status/1234567890".to_string(),
            image_url: None,
            published_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            like_count: 10,
            share_count: 2,
            comment_count: 1,
            platform: Platform::X,
            provider_raw: serde_json::json!({ "id": "1234567890" }),
        }
    }

    #[test]
    fn platform_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Platform::Linkedin).unwrap(),
            "\"linkedin\""
        );
        assert_eq!(serde_json::to_string(&Platform::X).unwrap(), "\"x\"");
    }

    #[test]
    fn platform_display_matches_serde() {
        assert_eq!(Platform::Facebook.to_string(), "facebook");
        assert_eq!(Platform::Linkedin.to_string(), "linkedin");
    }

    #[test]
    fn entity_id_and_url_accessors() {
        let entity = NormalizedEntity::Post(make_post());
        assert_eq!(entity.id(), "1234567890");
        assert_eq!(entity.url(), "https://x.com/acme/status/1234567890");
    }

    #[test]
    fn entity_serializes_with_kind_tag() {
        let entity = NormalizedEntity::Post(make_post());
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["kind"], "post");
        assert_eq!(json["platform"], "x");
    }

    #[test]
    fn serde_roundtrip_profile() {
        let profile = Profile {
            id: "satyanadella".to_string(),
            display_name: "Satya Nadella".to_string(),
            headline: Some("Chairman and CEO at Microsoft".to_string()),
            summary: None,
            location: Some("Redmond, Washington".to_string()),
            industry: None,
            picture_url: None,
            url: "https://www.linkedin.com/in/satyanadella".to_string(),
            experience: vec![ExperienceItem {
                title: "CEO".to_string(),
                company: Some("Microsoft".to_string()),
                date_range: Some("2014 - Present".to_string()),
            }],
            education: vec![],
            is_premium: true,
        };
        let json = serde_json::to_string(&profile).unwrap();
        let decoded: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, profile);
    }
}
