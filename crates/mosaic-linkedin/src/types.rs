//! Voyager API response types.
//!
//! ## Observed shape
//!
//! Voyager endpoints decorated with `normalized+json+2.1` return a flat
//! `"included"` array of denormalized records rather than a nested
//! document. Each record carries a `"$type"` tag such as
//! `"com.linkedin.voyager.dash.identity.profile.Profile"` and an
//! arbitrary, decoration-dependent set of fields. There is no fixed
//! schema: the same request can return side records (geo lookups, vector
//! images, premium upsell cards) interleaved with the entity that was
//! asked for, in an order that has been stable in practice but is not
//! documented anywhere.
//!
//! We therefore keep each item as a type tag plus an opaque field map and
//! let `extract.rs` apply the selection rules.

use serde::Deserialize;

/// Top-level envelope of a Voyager `normalized+json+2.1` response.
#[derive(Debug, Deserialize)]
pub struct VoyagerResponse {
    /// Denormalized record graph. Absent on some error payloads.
    #[serde(default)]
    pub included: Vec<IncludedItem>,
}

/// One record from the `"included"` array.
#[derive(Debug, Deserialize)]
pub struct IncludedItem {
    /// Fully-qualified record type, e.g.
    /// `"com.linkedin.voyager.dash.common.Geo"`. Defaults to empty for the
    /// occasional untagged filler record.
    #[serde(rename = "$type", default)]
    pub type_tag: String,

    /// Everything else on the record, untyped.
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl IncludedItem {
    /// Returns a string field, treating empty strings as absent.
    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Returns a boolean field, `false` when absent or not a boolean.
    #[must_use]
    pub fn bool_field(&self, name: &str) -> bool {
        self.fields
            .get(name)
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }

    /// Returns a non-negative integer field.
    #[must_use]
    pub fn u64_field(&self, name: &str) -> Option<u64> {
        self.fields.get(name).and_then(serde_json::Value::as_u64)
    }

    /// Returns the first value of a `multiLocale*` map field, e.g.
    /// `"multiLocaleFirstName": { "en_US": "Satya" }`.
    ///
    /// Voyager localizes some name fields per profile locale; we take
    /// whichever single locale the provider sent.
    #[must_use]
    pub fn locale_field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(serde_json::Value::as_object)
            .and_then(|map| map.values().next())
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
    }
}
