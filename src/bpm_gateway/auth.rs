use crate::bpm_gateway::{
    cookies::parse_set_cookie_headers,
    error::{BpmError, authentication_failed, incomplete_session},
    session::{AuthSession, epoch_millis},
};

pub const SESSION_COOKIE: &str = "JSESSIONID";
pub const API_TOKEN_COOKIE: &str = "X-Bonita-API-Token";

/// Extracts the two required tokens from a successful login exchange.
/// No cookies at all means the engine rejected the credentials; cookies that
/// omit either required token mean the handshake is unusable.
pub fn tokens_from_login_cookies(set_cookies: &[String]) -> Result<(String, String), BpmError> {
    if set_cookies.is_empty() {
        return Err(authentication_failed(
            "login rejected: engine response carried no set-cookie headers",
        ));
    }

    let cookies = parse_set_cookie_headers(set_cookies)?;

    let session_token = cookies
        .get(SESSION_COOKIE)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            incomplete_session(format!("login response is missing the {SESSION_COOKIE} cookie"))
        })?;
    let api_token = cookies
        .get(API_TOKEN_COOKIE)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            incomplete_session(format!(
                "login response is missing the {API_TOKEN_COOKIE} cookie"
            ))
        })?;

    Ok((session_token.clone(), api_token.clone()))
}

pub fn build_session(
    username: &str,
    session_token: String,
    api_token: String,
    user_id: String,
) -> AuthSession {
    AuthSession {
        username: username.to_string(),
        session_token,
        api_token,
        user_id,
        acquired_at_millis: epoch_millis(),
    }
}
