use super::*;

fn test_client(base_url: &str) -> LinkedinClient {
    LinkedinClient::with_base_url(Some("AQEDAxyz".to_string()), 30, "mosaic/test", base_url)
        .expect("client construction should not fail")
}

#[test]
fn profile_url_includes_member_identity_query() {
    let client = test_client("https://www.linkedin.com");
    let url = client.profile_url("satyanadella");
    assert!(url
        .as_str()
        .starts_with("https://www.linkedin.com/voyager/api/identity/dash/profiles?"));
    assert!(url.as_str().contains("q=memberIdentity"));
    assert!(url.as_str().contains("memberIdentity=satyanadella"));
}

#[test]
fn organization_url_includes_universal_name_query() {
    let client = test_client("https://www.linkedin.com/");
    let url = client.organization_url("microsoft");
    assert!(url
        .as_str()
        .starts_with("https://www.linkedin.com/voyager/api/organization/companies?"));
    assert!(url.as_str().contains("universalName=microsoft"));
}

#[test]
fn profile_url_encodes_identifier() {
    let client = test_client("https://www.linkedin.com");
    let url = client.profile_url("some one&else");
    assert!(
        url.as_str().contains("memberIdentity=some+one%26else"),
        "identifier should be form-encoded: {url}"
    );
}

#[test]
fn parse_jsessionid_strips_quotes_and_attributes() {
    assert_eq!(
        parse_jsessionid("JSESSIONID=\"ajax:123456\"; Path=/; Secure"),
        Some("ajax:123456".to_string())
    );
}

#[test]
fn parse_jsessionid_unquoted_value() {
    assert_eq!(
        parse_jsessionid("JSESSIONID=ajax:9"),
        Some("ajax:9".to_string())
    );
}

#[test]
fn parse_jsessionid_rejects_other_cookies() {
    assert_eq!(parse_jsessionid("li_at=AQEDAxyz; Path=/"), None);
}

#[test]
fn parse_jsessionid_rejects_empty_value() {
    assert_eq!(parse_jsessionid("JSESSIONID=\"\"; Path=/"), None);
}

#[test]
fn cookie_header_includes_quoted_jsessionid() {
    let client = test_client("https://www.linkedin.com");
    let session = Session {
        csrf_token: "ajax:123".to_string(),
        created_at: Utc::now(),
    };
    assert_eq!(
        client.cookie_header(&session),
        "li_at=AQEDAxyz; JSESSIONID=\"ajax:123\""
    );
}

#[test]
fn cookie_header_omits_empty_token() {
    let client = test_client("https://www.linkedin.com");
    let session = Session {
        csrf_token: String::new(),
        created_at: Utc::now(),
    };
    assert_eq!(client.cookie_header(&session), "li_at=AQEDAxyz");
}

#[test]
fn is_initialized_false_before_first_use() {
    let client = test_client("https://www.linkedin.com");
    assert!(!client.is_initialized());
}
