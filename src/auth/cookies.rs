use axum::http::{header::SET_COOKIE, HeaderMap, HeaderValue};

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Build an `HttpOnly` session cookie. `Secure` is only added when the
/// frontend is served over HTTPS.
pub fn session_cookie(name: &str, value: &str, max_age_secs: u64, secure: bool) -> String {
    let mut cookie =
        format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn clear_cookie(name: &str, secure: bool) -> String {
    let mut cookie = format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Read a single cookie value out of the inbound `Cookie` header.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(axum::http::header::COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == name {
            return Some(val.to_string());
        }
    }
    None
}

/// Append `Set-Cookie` headers for a freshly minted token pair.
pub fn set_token_cookies(
    headers: &mut HeaderMap,
    access_token: &str,
    refresh_token: &str,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
    secure: bool,
) {
    let access = session_cookie(ACCESS_COOKIE, access_token, access_ttl_secs, secure);
    let refresh = session_cookie(REFRESH_COOKIE, refresh_token, refresh_ttl_secs, secure);
    if let Ok(value) = HeaderValue::from_str(&access) {
        headers.append(SET_COOKIE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&refresh) {
        headers.append(SET_COOKIE, value);
    }
}

/// Append `Set-Cookie` headers deleting both token cookies.
pub fn clear_token_cookies(headers: &mut HeaderMap, secure: bool) {
    for name in [ACCESS_COOKIE, REFRESH_COOKIE] {
        if let Ok(value) = HeaderValue::from_str(&clear_cookie(name, secure)) {
            headers.append(SET_COOKIE, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_http_only() {
        let cookie = session_cookie(ACCESS_COOKIE, "abc.def.ghi", 300, false);
        assert!(cookie.starts_with("accessToken=abc.def.ghi;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=300"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn secure_flag_is_opt_in() {
        let cookie = session_cookie(REFRESH_COOKIE, "t", 60, true);
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cookie = clear_cookie(ACCESS_COOKIE, false);
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.starts_with("accessToken=;"));
    }

    #[test]
    fn read_cookie_finds_named_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("theme=dark; accessToken=tok123; refreshToken=tok456"),
        );
        assert_eq!(read_cookie(&headers, ACCESS_COOKIE).as_deref(), Some("tok123"));
        assert_eq!(read_cookie(&headers, REFRESH_COOKIE).as_deref(), Some("tok456"));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn set_and_clear_emit_one_header_per_cookie() {
        let mut headers = HeaderMap::new();
        set_token_cookies(&mut headers, "a", "r", 60, 120, false);
        assert_eq!(headers.get_all(SET_COOKIE).iter().count(), 2);

        let mut headers = HeaderMap::new();
        clear_token_cookies(&mut headers, false);
        assert_eq!(headers.get_all(SET_COOKIE).iter().count(), 2);
    }
}
