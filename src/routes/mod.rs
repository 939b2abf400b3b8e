pub mod assets;
pub mod auth;
pub mod blog;
pub mod compose;
pub mod home;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The whole site: pages, form actions and static assets.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/health", get(home::health))
        .merge(compose::router())
        .merge(blog::router())
        .merge(auth::router())
        .merge(assets::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
