use caseflow::bpm_gateway::{cookies::parse_set_cookie_headers, error::BpmErrorKind};

fn headers(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|header| header.to_string()).collect()
}

#[test]
fn given_headers_with_attributes_when_parsed_then_only_name_value_pairs_survive() {
    let cookies = parse_set_cookie_headers(&headers(&[
        "JSESSIONID=abc123; Path=/bonita; HttpOnly",
        "X-Bonita-API-Token=tok-9; Secure",
    ]))
    .expect("headers must parse");

    assert_eq!(cookies.get("JSESSIONID").map(String::as_str), Some("abc123"));
    assert_eq!(
        cookies.get("X-Bonita-API-Token").map(String::as_str),
        Some("tok-9")
    );
    assert_eq!(cookies.len(), 2);
}

#[test]
fn given_duplicate_cookie_names_when_parsed_then_first_occurrence_wins() {
    let cookies = parse_set_cookie_headers(&headers(&[
        "JSESSIONID=first; Path=/",
        "JSESSIONID=second; Path=/",
    ]))
    .expect("headers must parse");

    assert_eq!(cookies.get("JSESSIONID").map(String::as_str), Some("first"));
}

#[test]
fn given_quoted_cookie_value_when_parsed_then_quotes_are_stripped() {
    let cookies = parse_set_cookie_headers(&headers(&["token=\"quoted-value\""]))
        .expect("headers must parse");

    assert_eq!(cookies.get("token").map(String::as_str), Some("quoted-value"));
}

#[test]
fn given_value_containing_equals_when_parsed_then_split_happens_at_first_equals() {
    let cookies = parse_set_cookie_headers(&headers(&["payload=a=b=c; Path=/"]))
        .expect("headers must parse");

    assert_eq!(cookies.get("payload").map(String::as_str), Some("a=b=c"));
}

#[test]
fn given_header_without_name_value_pair_when_parsed_then_malformed_cookie_is_returned() {
    let err = parse_set_cookie_headers(&headers(&["JSESSIONID=ok", "garbage-without-equals"]))
        .expect_err("parsing must fail");

    assert_eq!(err.kind, BpmErrorKind::MalformedCookie);
}

#[test]
fn given_header_with_empty_name_when_parsed_then_malformed_cookie_is_returned() {
    let err = parse_set_cookie_headers(&headers(&["=value-without-name"]))
        .expect_err("parsing must fail");

    assert_eq!(err.kind, BpmErrorKind::MalformedCookie);
}

#[test]
fn given_no_headers_when_parsed_then_empty_map_is_returned() {
    let cookies = parse_set_cookie_headers(&[]).expect("empty input parses");

    assert!(cookies.is_empty());
}
