// src/auth/cookie.rs
// Session token delivery: HTTP-only secure cookie scoped to the API.

use axum::http::{HeaderMap, HeaderValue};

pub const SESSION_COOKIE: &str = "hostpanel_session";

pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie = headers.get("cookie").or_else(|| headers.get("Cookie"))?;
    let s = cookie.to_str().ok()?;
    for part in s.split(';') {
        let p = part.trim();
        if let Some(eq) = p.find('=') {
            let (k, v) = p.split_at(eq);
            if k == name {
                return Some(v[1..].to_string());
            }
        }
    }
    None
}

pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    parse_cookie(headers, SESSION_COOKIE)
}

/// Secure, HttpOnly cookie scoped to path / with SameSite=Lax. Max-Age
/// matches the token expiry so browser and token lifetimes agree.
pub fn set_session_cookie(token: &str, max_age_secs: i64) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{}={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    ))
    .expect("session cookie header is always valid ASCII")
}

pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{}=deleted; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; Secure; SameSite=Lax; Path=/",
        SESSION_COOKIE
    ))
    .expect("session cookie header is always valid ASCII")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_static("theme=dark; hostpanel_session=abc123; lang=en"),
        );
        assert_eq!(
            parse_cookie(&headers, SESSION_COOKIE),
            Some("abc123".to_string())
        );
        assert_eq!(parse_cookie(&headers, "missing"), None);
    }

    #[test]
    fn set_cookie_carries_security_attributes() {
        let value = set_session_cookie("tok", 86400);
        let s = value.to_str().unwrap();
        assert!(s.contains("HttpOnly"));
        assert!(s.contains("Secure"));
        assert!(s.contains("SameSite=Lax"));
        assert!(s.contains("Max-Age=86400"));
    }

    #[test]
    fn clear_cookie_expires_in_the_past() {
        let s = clear_session_cookie();
        assert!(s.to_str().unwrap().contains("Expires=Thu, 01 Jan 1970"));
    }
}
