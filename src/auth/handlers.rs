use askama::Template;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::api::{Credentials, NewAccount};
use crate::auth::account::{validate_signup, PasswordStrength};
use crate::auth::cookies::{clear_cookie, session_cookie};
use crate::auth::AuthContext;
use crate::error::AppResult;
use crate::extractors::{IncomingFlash, Viewer};
use crate::flash::Flash;
use crate::routes::home::{page, Layout};
use crate::state::AppState;

// -- Templates --

#[derive(Template)]
#[template(path = "pages/signin.html")]
pub struct SigninTemplate {
    pub layout: Layout,
    pub email: String,
    pub remember: bool,
}

#[derive(Template)]
#[template(path = "pages/signup.html")]
pub struct SignupTemplate {
    pub layout: Layout,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub strength: Option<&'static str>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct SigninForm {
    pub email: String,
    pub password: String,
    /// Checkbox: present only when ticked.
    pub remember: Option<String>,
}

#[derive(Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Cookie naming the freshly signed-in context.
fn context_cookie(state: &AppState, ctx: &AuthContext) -> String {
    let persistence = ctx
        .persistence()
        .unwrap_or(crate::auth::Persistence::Volatile);
    session_cookie(
        &state.config.auth.cookie_name,
        ctx.context_id(),
        persistence,
        state.config.auth.remember_secs(),
    )
}

fn signed_in_redirect(state: &AppState, ctx: &AuthContext, flash: Flash) -> Response {
    (
        AppendHeaders([
            (header::SET_COOKIE, context_cookie(state, ctx)),
            (header::SET_COOKIE, flash.cookie()),
        ]),
        Redirect::to("/"),
    )
        .into_response()
}

// -- Sign in --

/// GET /signin
pub async fn signin_page(viewer: Viewer, IncomingFlash(flash): IncomingFlash) -> Response {
    if viewer.0.is_authenticated() {
        return Redirect::to("/").into_response();
    }
    let had_flash = flash.is_some();
    page(
        StatusCode::OK,
        had_flash,
        SigninTemplate {
            layout: Layout::new(&viewer, flash),
            email: String::new(),
            remember: false,
        },
    )
}

/// POST /signin: authenticate against the API and store the session
pub async fn signin(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<SigninForm>,
) -> AppResult<Response> {
    let remember = form.remember.is_some();
    let credentials = Credentials {
        email: form.email.trim().to_string(),
        password: form.password,
    };

    let profile = match state.api.login(&credentials).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::info!(email = %credentials.email, "Sign in rejected: {}", e);
            let flash = Flash::error(e.user_message("Login failed. Please try again."));
            return Ok(page(
                StatusCode::UNAUTHORIZED,
                false,
                SigninTemplate {
                    layout: Layout::new(&viewer, Some(flash)),
                    email: credentials.email,
                    remember,
                },
            ));
        }
    };

    let Viewer(mut ctx) = viewer;
    state
        .sessions
        .login(&mut ctx, profile.into_session(), remember)?;

    Ok(signed_in_redirect(
        &state,
        &ctx,
        Flash::success("Welcome back!"),
    ))
}

// -- Sign up --

/// GET /signup
pub async fn signup_page(viewer: Viewer, IncomingFlash(flash): IncomingFlash) -> Response {
    if viewer.0.is_authenticated() {
        return Redirect::to("/").into_response();
    }
    let had_flash = flash.is_some();
    page(
        StatusCode::OK,
        had_flash,
        SignupTemplate {
            layout: Layout::new(&viewer, flash),
            full_name: String::new(),
            username: String::new(),
            email: String::new(),
            strength: None,
        },
    )
}

/// POST /signup: register, then sign in for this browser session only
pub async fn signup(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<SignupForm>,
) -> AppResult<Response> {
    let username = form.username.trim().to_string();
    let rejected = |viewer: &Viewer, form: &SignupForm, message: String| {
        page(
            StatusCode::UNPROCESSABLE_ENTITY,
            false,
            SignupTemplate {
                layout: Layout::new(viewer, Some(Flash::error(message))),
                full_name: form.full_name.clone(),
                username: form.username.clone(),
                email: form.email.clone(),
                strength: PasswordStrength::of(&form.password).map(PasswordStrength::label),
            },
        )
    };

    if let Err(message) = validate_signup(&username, &form.password) {
        return Ok(rejected(&viewer, &form, message.to_string()));
    }

    let account = NewAccount {
        full_name: form.full_name.trim().to_string(),
        username,
        email: form.email.trim().to_string(),
        password: form.password.clone(),
    };
    let profile = match state.api.register(&account).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::info!(username = %account.username, "Sign up rejected: {}", e);
            let message = e.user_message("Registration failed. Please try again.");
            return Ok(rejected(&viewer, &form, message));
        }
    };

    let Viewer(mut ctx) = viewer;
    state
        .sessions
        .login(&mut ctx, profile.into_session(), false)?;

    Ok(signed_in_redirect(
        &state,
        &ctx,
        Flash::success("Account created successfully!"),
    ))
}

// -- Sign out --

/// POST /signout: tell the API, forget the stored session and drop the cookie
pub async fn signout(State(state): State<AppState>, Viewer(mut ctx): Viewer) -> Response {
    state.sessions.logout(&mut ctx, state.api.as_ref()).await;

    (
        AppendHeaders([
            (
                header::SET_COOKIE,
                clear_cookie(&state.config.auth.cookie_name),
            ),
            (header::SET_COOKIE, Flash::success("Signed out").cookie()),
        ]),
        Redirect::to("/"),
    )
        .into_response()
}
