//! Entity extraction from the Voyager `"included"` record graph.
//!
//! Two passes over the item list:
//!
//! 1. Categorize every item by `$type` substring match against
//!    [`CATEGORY_RULES`]. The rules are deliberately loose (the
//!    `"profile.Profile"` family substring also matches
//!    `"profile.ProfilePhoto"`) because the second pass disambiguates.
//! 2. Apply the selection rules: the primary entity is the *first* item
//!    in provider order whose category matches the target family AND
//!    whose object-identifier field is non-empty (denormalized side
//!    records carry the family type tag but no identifier). Auxiliary
//!    facts (geo name, image root URL) are taken last-match-wins across
//!    all items.
//!
//! Known limitation: last-match-wins assumes provider ordering is stable.
//! It has been in practice, but Voyager does not guarantee it.

use mosaic_core::{EducationItem, ExperienceItem, Organization, Profile};

use crate::error::LinkedinError;
use crate::types::{IncludedItem, VoyagerResponse};

/// Profiles keep the first N positions, in provider order.
pub(crate) const MAX_EXPERIENCE_ITEMS: usize = 5;
/// Profiles keep the first M education entries, in provider order.
pub(crate) const MAX_EDUCATION_ITEMS: usize = 3;

const PUBLIC_BASE: &str = "https://www.linkedin.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Category {
    ProfileCore,
    OrganizationCore,
    Geo,
    Picture,
    Position,
    Education,
}

/// Category → `$type` substrings. An item belongs to every category whose
/// substring list matches its tag, so overlapping rules are allowed.
pub(crate) const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (Category::ProfileCore, &["identity.profile.Profile"]),
    (
        Category::OrganizationCore,
        &["organization.Company", "organization.School"],
    ),
    (Category::Geo, &["common.Geo"]),
    (
        Category::Picture,
        &["profile.ProfilePhoto", "common.VectorImage"],
    ),
    (Category::Position, &["identity.profile.Position"]),
    (Category::Education, &["identity.profile.Education"]),
];

pub(crate) fn matches_category(type_tag: &str, category: Category) -> bool {
    CATEGORY_RULES
        .iter()
        .filter(|(c, _)| *c == category)
        .any(|(_, substrings)| substrings.iter().any(|s| type_tag.contains(s)))
}

/// Pass 1: item index → matched categories, preserving provider order.
fn categorize(items: &[IncludedItem]) -> Vec<(usize, Vec<Category>)> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let cats = CATEGORY_RULES
                .iter()
                .filter(|(category, _)| matches_category(&item.type_tag, *category))
                .map(|(category, _)| *category)
                .collect();
            (idx, cats)
        })
        .collect()
}

/// Selects the primary entity item: first item in the target family with a
/// non-empty object identifier.
fn select_primary<'a>(
    items: &'a [IncludedItem],
    categorized: &[(usize, Vec<Category>)],
    family: Category,
    id_field: &str,
) -> Option<&'a IncludedItem> {
    categorized
        .iter()
        .filter(|(_, cats)| cats.contains(&family))
        .map(|(idx, _)| &items[*idx])
        .find(|item| item.str_field(id_field).is_some())
}

/// Scans all items of a category for a string field, last match wins.
fn scan_last<'a>(
    items: &'a [IncludedItem],
    categorized: &[(usize, Vec<Category>)],
    category: Category,
    field: &str,
) -> Option<&'a str> {
    categorized
        .iter()
        .filter(|(_, cats)| cats.contains(&category))
        .filter_map(|(idx, _)| items[*idx].str_field(field))
        .last()
}

pub(crate) fn extract_profile(
    identifier: &str,
    response: &VoyagerResponse,
) -> Result<Profile, LinkedinError> {
    let items = &response.included;
    let categorized = categorize(items);

    let primary = select_primary(items, &categorized, Category::ProfileCore, "objectUrn")
        .ok_or_else(|| LinkedinError::NotFound {
            entity: "profile",
            identifier: identifier.to_string(),
        })?;

    let first_name = primary
        .str_field("firstName")
        .or_else(|| primary.locale_field("multiLocaleFirstName"))
        .unwrap_or_default();
    let last_name = primary
        .str_field("lastName")
        .or_else(|| primary.locale_field("multiLocaleLastName"))
        .unwrap_or_default();
    let mut display_name = format!("{first_name} {last_name}").trim().to_string();
    if display_name.is_empty() {
        display_name = identifier.to_string();
    }

    let location = scan_last(items, &categorized, Category::Geo, "defaultLocalizedName");
    let picture_url = scan_last(items, &categorized, Category::Picture, "rootUrl");

    let experience = collect_positions(items, &categorized);
    let education = collect_education(items, &categorized);

    Ok(Profile {
        id: identifier.to_string(),
        display_name,
        headline: primary.str_field("headline").map(str::to_owned),
        summary: primary.str_field("summary").map(str::to_owned),
        location: location.map(str::to_owned),
        industry: primary.str_field("industryName").map(str::to_owned),
        picture_url: picture_url.map(str::to_owned),
        url: format!("{PUBLIC_BASE}/in/{identifier}"),
        experience,
        education,
        is_premium: primary.bool_field("premium"),
    })
}

pub(crate) fn extract_organization(
    identifier: &str,
    response: &VoyagerResponse,
) -> Result<Organization, LinkedinError> {
    let items = &response.included;
    let categorized = categorize(items);

    let primary = select_primary(items, &categorized, Category::OrganizationCore, "entityUrn")
        .ok_or_else(|| LinkedinError::NotFound {
            entity: "organization",
            identifier: identifier.to_string(),
        })?;

    let website = primary
        .str_field("websiteUrl")
        .or_else(|| primary.str_field("companyPageUrl"));

    let staff_count = primary
        .u64_field("staffCount")
        .and_then(|n| u32::try_from(n).ok());

    let logo_url = scan_last(items, &categorized, Category::Picture, "rootUrl");

    Ok(Organization {
        id: identifier.to_string(),
        name: primary
            .str_field("name")
            .unwrap_or(identifier)
            .to_string(),
        description: primary.str_field("description").map(str::to_owned),
        website: website.map(str::to_owned),
        industry: first_industry(primary),
        staff_count,
        logo_url: logo_url.map(str::to_owned),
        url: format!("{PUBLIC_BASE}/company/{identifier}"),
    })
}

/// First entry of the `"industries"` array. Voyager returns either plain
/// strings or `{ "localizedName": ... }` objects depending on decoration.
fn first_industry(item: &IncludedItem) -> Option<String> {
    let first = item
        .fields
        .get("industries")
        .and_then(serde_json::Value::as_array)
        .and_then(|arr| arr.first())?;
    match first {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Object(map) => map
            .get("localizedName")
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned),
        _ => None,
    }
}

fn collect_positions(
    items: &[IncludedItem],
    categorized: &[(usize, Vec<Category>)],
) -> Vec<ExperienceItem> {
    categorized
        .iter()
        .filter(|(_, cats)| cats.contains(&Category::Position))
        .filter_map(|(idx, _)| {
            let item = &items[*idx];
            let title = item.str_field("title")?;
            Some(ExperienceItem {
                title: title.to_string(),
                company: item.str_field("companyName").map(str::to_owned),
                date_range: format_date_range(item),
            })
        })
        .take(MAX_EXPERIENCE_ITEMS)
        .collect()
}

fn collect_education(
    items: &[IncludedItem],
    categorized: &[(usize, Vec<Category>)],
) -> Vec<EducationItem> {
    categorized
        .iter()
        .filter(|(_, cats)| cats.contains(&Category::Education))
        .filter_map(|(idx, _)| {
            let item = &items[*idx];
            let school = item.str_field("schoolName")?;
            Some(EducationItem {
                school: school.to_string(),
                degree: item.str_field("degreeName").map(str::to_owned),
                field_of_study: item.str_field("fieldOfStudy").map(str::to_owned),
            })
        })
        .take(MAX_EDUCATION_ITEMS)
        .collect()
}

/// Renders a Voyager `dateRange` object (`{ "start": { "year": 2019 },
/// "end": { "year": 2023 } }`) as `"2019 - 2023"`, with `"Present"` for an
/// open end. Returns `None` when no start year exists.
fn format_date_range(item: &IncludedItem) -> Option<String> {
    let range = item
        .fields
        .get("dateRange")
        .and_then(serde_json::Value::as_object)?;
    let year = |key: &str| {
        range
            .get(key)
            .and_then(serde_json::Value::as_object)
            .and_then(|d| d.get("year"))
            .and_then(serde_json::Value::as_u64)
    };
    let start = year("start")?;
    Some(match year("end") {
        Some(end) => format!("{start} - {end}"),
        None => format!("{start} - Present"),
    })
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
