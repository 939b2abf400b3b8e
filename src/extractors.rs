use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::api::Session;
use crate::auth::cookies::get_cookie_value;
use crate::auth::AuthContext;
use crate::error::AppError;
use crate::flash::Flash;
use crate::state::AppState;

/// Auth state of the requesting browser. Never rejects; an unknown or missing cookie yields an
/// anonymous context.
pub struct Viewer(pub AuthContext);

impl Viewer {
    pub fn user(&self) -> Option<&Session> {
        self.0.user()
    }
}

impl FromRequestParts<AppState> for Viewer {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = match get_cookie_value(&parts.headers, &state.config.auth.cookie_name) {
            Some(token) if !token.is_empty() => state.sessions.open(token),
            _ => AuthContext::anonymous(),
        };
        Ok(Viewer(ctx))
    }
}

/// Extractor that requires a signed-in browser.
/// Returns 401 if no session is stored for the context.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Session);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Viewer(ctx) = match Viewer::from_request_parts(parts, state).await {
            Ok(viewer) => viewer,
            Err(never) => match never {},
        };
        ctx.user()
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Notification left by the previous request, if any.
pub struct IncomingFlash(pub Option<Flash>);

impl<S: Send + Sync> FromRequestParts<S> for IncomingFlash {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(IncomingFlash(Flash::from_headers(&parts.headers)))
    }
}

/// Whether the request came from htmx and expects a fragment back.
pub struct HxRequest(pub bool);

impl<S: Send + Sync> FromRequestParts<S> for HxRequest {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(HxRequest(parts.headers.contains_key("hx-request")))
    }
}
