//! Session cookie construction and extraction

use axum::http::{header, HeaderMap};

/// Build the Set-Cookie value for a new session
pub fn build_session_cookie(name: &str, token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie =
        format!("{name}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the Set-Cookie value that clears the session cookie
pub fn build_clear_cookie(name: &str) -> String {
    format!("{name}=; HttpOnly; Path=/; Max-Age=0")
}

/// Extract a cookie value from request headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            if key == name {
                Some(value.to_string())
            } else {
                None
            }
        })
}
