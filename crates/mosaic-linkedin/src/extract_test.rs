use super::*;

fn response(included: serde_json::Value) -> VoyagerResponse {
    serde_json::from_value(serde_json::json!({ "included": included })).unwrap()
}

const PROFILE_TYPE: &str = "com.linkedin.voyager.dash.identity.profile.Profile";
const PHOTO_TYPE: &str = "com.linkedin.voyager.dash.identity.profile.ProfilePhoto";
const GEO_TYPE: &str = "com.linkedin.voyager.dash.common.Geo";
const POSITION_TYPE: &str = "com.linkedin.voyager.dash.identity.profile.Position";
const EDUCATION_TYPE: &str = "com.linkedin.voyager.dash.identity.profile.Education";
const COMPANY_TYPE: &str = "com.linkedin.voyager.dash.organization.Company";

#[test]
fn primary_profile_requires_object_urn() {
    // Two items in the profile family: a denormalized side record without
    // objectUrn (first) and the core record (second). The core record wins
    // even though it comes later.
    let response = response(serde_json::json!([
        { "$type": PROFILE_TYPE, "firstName": "Side", "lastName": "Record" },
        {
            "$type": PROFILE_TYPE,
            "objectUrn": "urn:li:member:1337",
            "firstName": "Satya",
            "lastName": "Nadella",
            "headline": "Chairman and CEO at Microsoft",
            "premium": true
        }
    ]));
    let profile = extract_profile("satyanadella", &response).unwrap();
    assert_eq!(profile.display_name, "Satya Nadella");
    assert!(profile.is_premium);
}

#[test]
fn first_identified_item_wins_among_candidates() {
    let response = response(serde_json::json!([
        { "$type": PROFILE_TYPE, "objectUrn": "urn:li:member:1", "firstName": "First" },
        { "$type": PROFILE_TYPE, "objectUrn": "urn:li:member:2", "firstName": "Second" }
    ]));
    let profile = extract_profile("someone", &response).unwrap();
    assert_eq!(profile.display_name, "First");
}

#[test]
fn profile_photo_is_not_a_primary_candidate() {
    // ProfilePhoto's type tag contains the "identity.profile.Profile"
    // substring; the objectUrn gate must exclude it.
    let response = response(serde_json::json!([
        { "$type": PHOTO_TYPE, "rootUrl": "https://media.licdn.com/dms/image/abc" }
    ]));
    let err = extract_profile("someone", &response).unwrap_err();
    assert!(matches!(
        err,
        LinkedinError::NotFound { entity: "profile", .. }
    ));
}

#[test]
fn zero_matching_items_is_not_found() {
    let response = response(serde_json::json!([
        { "$type": GEO_TYPE, "defaultLocalizedName": "Oslo, Norway" }
    ]));
    let err = extract_profile("someone", &response).unwrap_err();
    assert!(matches!(err, LinkedinError::NotFound { .. }));
}

#[test]
fn empty_included_is_not_found() {
    let response = response(serde_json::json!([]));
    assert!(extract_profile("someone", &response).is_err());
    assert!(extract_organization("acme", &response).is_err());
}

#[test]
fn aux_facts_last_match_wins() {
    let response = response(serde_json::json!([
        { "$type": GEO_TYPE, "defaultLocalizedName": "Seattle, Washington" },
        { "$type": PROFILE_TYPE, "objectUrn": "urn:li:member:1", "firstName": "Satya" },
        { "$type": GEO_TYPE, "defaultLocalizedName": "Redmond, Washington" },
        { "$type": PHOTO_TYPE, "rootUrl": "https://media.licdn.com/old" },
        { "$type": "com.linkedin.common.VectorImage", "rootUrl": "https://media.licdn.com/new" }
    ]));
    let profile = extract_profile("satyanadella", &response).unwrap();
    assert_eq!(profile.location.as_deref(), Some("Redmond, Washington"));
    assert_eq!(
        profile.picture_url.as_deref(),
        Some("https://media.licdn.com/new")
    );
}

#[test]
fn falls_back_to_multi_locale_names() {
    let response = response(serde_json::json!([
        {
            "$type": PROFILE_TYPE,
            "objectUrn": "urn:li:member:1",
            "multiLocaleFirstName": { "en_US": "Satya" },
            "multiLocaleLastName": { "en_US": "Nadella" }
        }
    ]));
    let profile = extract_profile("satyanadella", &response).unwrap();
    assert_eq!(profile.display_name, "Satya Nadella");
}

#[test]
fn display_name_falls_back_to_identifier() {
    let response = response(serde_json::json!([
        { "$type": PROFILE_TYPE, "objectUrn": "urn:li:member:1" }
    ]));
    let profile = extract_profile("satyanadella", &response).unwrap();
    assert_eq!(profile.display_name, "satyanadella");
}

#[test]
fn profile_url_uses_public_identifier() {
    let response = response(serde_json::json!([
        { "$type": PROFILE_TYPE, "objectUrn": "urn:li:member:1", "firstName": "S" }
    ]));
    let profile = extract_profile("satyanadella", &response).unwrap();
    assert_eq!(profile.url, "https://www.linkedin.com/in/satyanadella");
    assert!(!profile.id.is_empty());
}

#[test]
fn experience_truncated_in_provider_order() {
    let positions: Vec<serde_json::Value> = (1..=8)
        .map(|n| {
            serde_json::json!({
                "$type": POSITION_TYPE,
                "title": format!("Role {n}"),
                "companyName": "Acme",
                "dateRange": { "start": { "year": 2010 + n } }
            })
        })
        .collect();
    let mut included = vec![serde_json::json!({
        "$type": PROFILE_TYPE, "objectUrn": "urn:li:member:1", "firstName": "S"
    })];
    included.extend(positions);
    let profile = extract_profile("someone", &response(serde_json::json!(included))).unwrap();
    assert_eq!(profile.experience.len(), MAX_EXPERIENCE_ITEMS);
    assert_eq!(profile.experience[0].title, "Role 1");
    assert_eq!(profile.experience[4].title, "Role 5");
    assert_eq!(profile.experience[0].date_range.as_deref(), Some("2011 - Present"));
}

#[test]
fn education_truncated_and_untitled_entries_skipped() {
    let response = response(serde_json::json!([
        { "$type": PROFILE_TYPE, "objectUrn": "urn:li:member:1", "firstName": "S" },
        { "$type": EDUCATION_TYPE, "degreeName": "BSc" },
        { "$type": EDUCATION_TYPE, "schoolName": "Manipal Institute of Technology", "degreeName": "BE", "fieldOfStudy": "Electrical Engineering" },
        { "$type": EDUCATION_TYPE, "schoolName": "University of Wisconsin", "degreeName": "MS" },
        { "$type": EDUCATION_TYPE, "schoolName": "University of Chicago", "degreeName": "MBA" },
        { "$type": EDUCATION_TYPE, "schoolName": "One Too Many" }
    ]));
    let profile = extract_profile("someone", &response).unwrap();
    assert_eq!(profile.education.len(), MAX_EDUCATION_ITEMS);
    assert_eq!(profile.education[0].school, "Manipal Institute of Technology");
    assert_eq!(profile.education[2].school, "University of Chicago");
}

#[test]
fn closed_date_range_renders_both_years() {
    let response = response(serde_json::json!([
        { "$type": PROFILE_TYPE, "objectUrn": "urn:li:member:1", "firstName": "S" },
        {
            "$type": POSITION_TYPE,
            "title": "Engineer",
            "dateRange": { "start": { "year": 2015 }, "end": { "year": 2019 } }
        }
    ]));
    let profile = extract_profile("someone", &response).unwrap();
    assert_eq!(profile.experience[0].date_range.as_deref(), Some("2015 - 2019"));
}

#[test]
fn organization_primary_requires_entity_urn() {
    let response = response(serde_json::json!([
        { "$type": COMPANY_TYPE, "name": "Side Record" },
        {
            "$type": COMPANY_TYPE,
            "entityUrn": "urn:li:fsd_company:1441",
            "name": "Microsoft",
            "description": "Every company has a mission.",
            "websiteUrl": "https://www.microsoft.com",
            "staffCount": 221000,
            "industries": ["Software Development"]
        }
    ]));
    let org = extract_organization("microsoft", &response).unwrap();
    assert_eq!(org.name, "Microsoft");
    assert_eq!(org.staff_count, Some(221_000));
    assert_eq!(org.industry.as_deref(), Some("Software Development"));
    assert_eq!(org.url, "https://www.linkedin.com/company/microsoft");
}

#[test]
fn organization_name_falls_back_to_identifier() {
    let response = response(serde_json::json!([
        { "$type": COMPANY_TYPE, "entityUrn": "urn:li:fsd_company:1" }
    ]));
    let org = extract_organization("microsoft", &response).unwrap();
    assert_eq!(org.name, "microsoft");
}

#[test]
fn organization_industry_object_form() {
    let response = response(serde_json::json!([
        {
            "$type": COMPANY_TYPE,
            "entityUrn": "urn:li:fsd_company:1",
            "name": "Acme",
            "industries": [{ "localizedName": "Robotics" }]
        }
    ]));
    let org = extract_organization("acme", &response).unwrap();
    assert_eq!(org.industry.as_deref(), Some("Robotics"));
}

#[test]
fn organization_website_falls_back_to_company_page_url() {
    let response = response(serde_json::json!([
        {
            "$type": COMPANY_TYPE,
            "entityUrn": "urn:li:fsd_company:1",
            "name": "Acme",
            "companyPageUrl": "https://acme.example.com"
        }
    ]));
    let org = extract_organization("acme", &response).unwrap();
    assert_eq!(org.website.as_deref(), Some("https://acme.example.com"));
}

#[test]
fn matches_category_substring_rules() {
    assert!(matches_category(PROFILE_TYPE, Category::ProfileCore));
    assert!(matches_category(PHOTO_TYPE, Category::ProfileCore));
    assert!(matches_category(PHOTO_TYPE, Category::Picture));
    assert!(matches_category(COMPANY_TYPE, Category::OrganizationCore));
    assert!(!matches_category(GEO_TYPE, Category::ProfileCore));
    assert!(matches_category(GEO_TYPE, Category::Geo));
}
