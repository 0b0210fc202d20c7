//! Raw feed-provider response types.
//!
//! ## Observed shapes
//!
//! ### X / Twitter (legacy REST)
//! `statuses/user_timeline.json` returns a bare JSON array of tweet
//! objects; `search/tweets.json` wraps the same objects in
//! `{ "statuses": [...] }`. Tweet IDs are sent both as a number (`id`,
//! lossy above 2^53 in some client stacks) and as a string (`id_str`);
//! we read `id_str` only. `full_text` is present with
//! `tweet_mode=extended`; older gateways send `text`. Engagement counters
//! may be absent on very fresh tweets and default to 0. `created_at` uses
//! the legacy `"Wed Oct 10 20:19:24 +0000 2018"` format.
//!
//! ### Facebook page feed
//! `/{page}/posts` returns `{ "data": [...] }` with scraper-gateway post
//! dictionaries: flat `likes`/`comments`/`shares` counters, `images` as a
//! list of URLs (first is the lead image), ISO-8601 `time`, and `text`
//! with a `post_text` fallback on older captures.

use serde::Deserialize;

/// Envelope of `search/tweets.json`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub statuses: Vec<RawTweet>,
}

/// One tweet object from the legacy REST shapes.
#[derive(Debug, Deserialize)]
pub struct RawTweet {
    /// String form of the tweet ID; the only form we read.
    #[serde(default)]
    pub id_str: String,

    /// Extended-mode tweet body.
    #[serde(default)]
    pub full_text: Option<String>,

    /// Compatibility-mode tweet body.
    #[serde(default)]
    pub text: Option<String>,

    /// Legacy-format creation time; absent on some gateway captures.
    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub user: Option<RawTweetUser>,

    #[serde(default)]
    pub favorite_count: u32,

    #[serde(default)]
    pub retweet_count: u32,

    #[serde(default)]
    pub reply_count: u32,

    /// `extended_entities` carries the full media list when present;
    /// `entities` holds at most the first photo.
    #[serde(default)]
    pub extended_entities: Option<RawEntities>,

    #[serde(default)]
    pub entities: Option<RawEntities>,
}

#[derive(Debug, Deserialize)]
pub struct RawTweetUser {
    #[serde(default)]
    pub id_str: String,
    pub screen_name: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawEntities {
    #[serde(default)]
    pub media: Vec<RawMedia>,
}

#[derive(Debug, Deserialize)]
pub struct RawMedia {
    /// `"photo"`, `"video"`, or `"animated_gif"`.
    #[serde(rename = "type", default)]
    pub media_type: String,
    #[serde(default)]
    pub media_url_https: Option<String>,
}

/// Envelope of the page feed endpoint.
#[derive(Debug, Deserialize)]
pub struct PageFeedResponse {
    #[serde(default)]
    pub data: Vec<RawPagePost>,
}

/// One page post from the scraper gateway.
#[derive(Debug, Deserialize)]
pub struct RawPagePost {
    #[serde(default)]
    pub post_id: String,

    #[serde(default)]
    pub text: Option<String>,

    /// Older captures populate `post_text` instead of `text`.
    #[serde(default)]
    pub post_text: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default)]
    pub post_url: Option<String>,

    /// ISO-8601 publication time.
    #[serde(default)]
    pub time: Option<String>,

    /// Image gallery URLs; the first one is the lead image.
    #[serde(default)]
    pub images: Vec<String>,

    /// Single-image fallback on captures without a gallery.
    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub likes: u32,

    #[serde(default)]
    pub comments: u32,

    #[serde(default)]
    pub shares: u32,
}
