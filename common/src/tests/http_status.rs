// Unit tests for HttpStatusCode categorization

use crate::HttpStatusCode;

/// **VALUE**: Verifies status classification boundaries.
///
/// **WHY THIS MATTERS**: The API client reports any non-2xx response as a server failure;
/// a wrong boundary would treat redirects or 404s as successful verifications.
///
/// **BUG THIS CATCHES**: Off-by-one range errors at 200/300/400/500/600.
#[test]
fn given_status_codes_when_classified_then_ranges_are_exclusive() {
    assert!(HttpStatusCode(200).is_success());
    assert!(HttpStatusCode(299).is_success());
    assert!(!HttpStatusCode(300).is_success());

    assert!(HttpStatusCode(404).is_client_error());
    assert!(!HttpStatusCode(404).is_server_error());

    assert!(HttpStatusCode(503).is_server_error());
    assert!(!HttpStatusCode(600).is_server_error());
}

#[test]
fn given_u16_when_converted_then_displays_number() {
    let status = HttpStatusCode::from(502);
    assert_eq!(status.to_string(), "502");
}
