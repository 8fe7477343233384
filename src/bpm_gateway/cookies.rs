use std::collections::BTreeMap;

use crate::bpm_gateway::error::{BpmError, BpmErrorKind};

/// Reduces a sequence of raw `Set-Cookie` header values to a name/value map.
/// Attributes after the first `;` are dropped; the first occurrence of a name
/// wins. Fails only when a header carries no parsable `name=value` pair.
pub fn parse_set_cookie_headers(headers: &[String]) -> Result<BTreeMap<String, String>, BpmError> {
    let mut cookies = BTreeMap::new();

    for header in headers {
        let pair = header.split(';').next().unwrap_or("").trim();
        let Some((name, value)) = pair.split_once('=') else {
            return Err(BpmError::new(
                BpmErrorKind::MalformedCookie,
                format!("set-cookie header has no name=value pair: '{}'", pair),
            ));
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(BpmError::new(
                BpmErrorKind::MalformedCookie,
                "set-cookie header has an empty cookie name",
            ));
        }

        let value = value.trim().trim_matches('"').to_string();
        cookies.entry(name.to_string()).or_insert(value);
    }

    Ok(cookies)
}
