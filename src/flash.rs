//! One-shot notifications carried across a redirect in a cookie.

use axum::http::{header, HeaderMap};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use url::form_urlencoded;

use crate::auth::cookies::get_cookie_value;

pub const FLASH_COOKIE: &str = "inkwell_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    pub fn css_class(&self) -> &'static str {
        self.kind.as_str()
    }

    fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("kind", self.kind.as_str())
            .append_pair("message", &self.message)
            .finish()
    }

    fn decode(value: &str) -> Option<Self> {
        let mut kind = None;
        let mut message = None;
        for (key, val) in form_urlencoded::parse(value.as_bytes()) {
            match key.as_ref() {
                "kind" => {
                    kind = match val.as_ref() {
                        "success" => Some(FlashKind::Success),
                        "error" => Some(FlashKind::Error),
                        _ => None,
                    }
                }
                "message" => message = Some(val.into_owned()),
                _ => {}
            }
        }
        Some(Self {
            kind: kind?,
            message: message?,
        })
    }

    pub fn cookie(&self) -> String {
        format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age=60",
            FLASH_COOKIE,
            self.encode()
        )
    }

    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        get_cookie_value(headers, FLASH_COOKIE).and_then(Self::decode)
    }
}

pub fn clear_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", FLASH_COOKIE)
}

/// Redirect and show `flash` on the next page.
pub fn redirect_with(to: &str, flash: Flash) -> Response {
    (
        AppendHeaders([(header::SET_COOKIE, flash.cookie())]),
        Redirect::to(to),
    )
        .into_response()
}
