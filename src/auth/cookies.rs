use axum::http::{header, HeaderMap};

use crate::auth::session::Persistence;

/// Cookie carrying the browser context token. Remembered sign-ins get a `Max-Age` so the
/// browser keeps the cookie; volatile ones get a session cookie.
pub fn session_cookie(
    name: &str,
    context_id: &str,
    persistence: Persistence,
    max_age_secs: u64,
) -> String {
    match persistence {
        Persistence::Remembered => format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            name, context_id, max_age_secs
        ),
        Persistence::Volatile => format!("{}={}; HttpOnly; SameSite=Lax; Path=/", name, context_id),
    }
}

pub fn clear_cookie(name: &str) -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", name)
}

pub fn get_cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == name {
                Some(val)
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn remembered_cookie_has_max_age() {
        let cookie = session_cookie("inkwell_user", "abc", Persistence::Remembered, 3600);
        assert!(cookie.starts_with("inkwell_user=abc;"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn volatile_cookie_is_a_browser_session_cookie() {
        let cookie = session_cookie("inkwell_user", "abc", Persistence::Volatile, 3600);
        assert!(!cookie.contains("Max-Age"));
    }

    #[test]
    fn finds_cookie_among_several_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(
            header::COOKIE,
            HeaderValue::from_static("a=1; inkwell_user=tok123; b=2"),
        );
        assert_eq!(get_cookie_value(&headers, "inkwell_user"), Some("tok123"));
        assert_eq!(get_cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn value_may_contain_equals_signs() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("inkwell_flash=kind=error&message=x"),
        );
        assert_eq!(
            get_cookie_value(&headers, "inkwell_flash"),
            Some("kind=error&message=x")
        );
    }
}
