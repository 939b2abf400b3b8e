use axum::routing::{get, post};
use axum::Router;

use crate::auth::handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signin", get(handlers::signin_page).post(handlers::signin))
        .route("/signup", get(handlers::signup_page).post(handlers::signup))
        .route("/signout", post(handlers::signout))
}
