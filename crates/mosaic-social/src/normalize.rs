//! Normalization from raw provider objects to [`mosaic_core::Post`].
//!
//! Malformed entries (no ID, no author) are skipped with a warning rather
//! than failing the whole feed. A post with neither text nor media is kept
//! with empty text; dropping it would silently shrink feeds.

use chrono::{DateTime, Utc};

use mosaic_core::{Platform, Post};

use crate::types::{RawPagePost, RawTweet};

/// Legacy tweet timestamp format: `"Wed Oct 10 20:19:24 +0000 2018"`.
const TWEET_TIME_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Normalizes a raw tweet. Returns `None` (and warns) when the tweet has
/// no ID or no author; nothing useful can be linked without either.
pub(crate) fn normalize_tweet(tweet: RawTweet) -> Option<Post> {
    if tweet.id_str.is_empty() {
        tracing::warn!("skipping tweet without id_str");
        return None;
    }
    let Some(user) = tweet.user else {
        tracing::warn!(tweet_id = %tweet.id_str, "skipping tweet without user");
        return None;
    };

    let text = tweet.full_text.or(tweet.text).unwrap_or_default();

    // First photo of the media collection only; videos and GIFs carry a
    // preview URL but we deliberately keep images deterministic.
    let image_url = tweet
        .extended_entities
        .or(tweet.entities)
        .map(|entities| entities.media)
        .unwrap_or_default()
        .into_iter()
        .find(|media| media.media_type == "photo")
        .and_then(|media| media.media_url_https);

    let published_at = parse_provider_time(
        tweet.created_at.as_deref(),
        TWEET_TIME_FORMAT,
        &tweet.id_str,
    );

    let url = format!("https://x.com/{}/status/{}", user.screen_name, tweet.id_str);
    let provider_raw = serde_json::json!({
        "id": tweet.id_str,
        "user_id": user.id_str,
    });

    Some(Post {
        id: tweet.id_str,
        text,
        author_name: user.screen_name,
        author_id: if user.id_str.is_empty() {
            None
        } else {
            Some(user.id_str)
        },
        url,
        image_url,
        published_at,
        like_count: tweet.favorite_count,
        share_count: tweet.retweet_count,
        comment_count: tweet.reply_count,
        platform: Platform::X,
        provider_raw,
    })
}

/// Normalizes a raw page post. Returns `None` (and warns) when the post
/// has no ID.
pub(crate) fn normalize_page_post(post: RawPagePost, page: &str) -> Option<Post> {
    if post.post_id.is_empty() {
        tracing::warn!(page, "skipping page post without post_id");
        return None;
    }

    let text = post.text.or(post.post_text).unwrap_or_default();
    let image_url = post.images.into_iter().next().or(post.image);
    let url = post
        .post_url
        .unwrap_or_else(|| format!("https://facebook.com/{page}"));

    let published_at = match post.time.as_deref() {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|e| {
                tracing::warn!(post_id = %post.post_id, raw, error = %e, "unparseable post time; using fetch time");
                Utc::now()
            }),
        None => Utc::now(),
    };

    let provider_raw = serde_json::json!({ "post_id": post.post_id });

    Some(Post {
        id: post.post_id,
        text,
        author_name: post.username.unwrap_or_else(|| page.to_string()),
        author_id: post.user_id,
        url,
        image_url,
        published_at,
        like_count: post.likes,
        share_count: post.shares,
        comment_count: post.comments,
        platform: Platform::Facebook,
        provider_raw,
    })
}

fn parse_provider_time(raw: Option<&str>, format: &str, id: &str) -> DateTime<Utc> {
    match raw {
        Some(raw) => DateTime::parse_from_str(raw, format)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|e| {
                tracing::warn!(post_id = %id, raw, error = %e, "unparseable post time; using fetch time");
                Utc::now()
            }),
        None => Utc::now(),
    }
}
