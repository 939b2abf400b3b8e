//! Access to the Inkwell REST API.
//!
//! Handlers never talk to `reqwest` directly; they go through [`InkwellApi`] so the page logic
//! can run against an in-memory double in tests.

pub mod client;
#[cfg(test)]
pub mod fake;
pub mod models;

use async_trait::async_trait;

pub use client::ApiClient;
pub use models::{
    Comment, Credentials, NewAccount, NewComment, NewPost, Post, PostKey, Profile, Session,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Message shown to the user: the server's own message when it sent one,
    /// otherwise the operation's generic fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[async_trait]
pub trait InkwellApi: Send + Sync {
    async fn register(&self, account: &NewAccount) -> ApiResult<Profile>;

    async fn login(&self, credentials: &Credentials) -> ApiResult<Profile>;

    /// Invalidate the server-side session cookie.
    async fn logout(&self) -> ApiResult<()>;

    async fn list_blogs(&self) -> ApiResult<Vec<Post>>;

    /// Returns the server-issued id when the response carries one.
    async fn create_blog(&self, post: &NewPost) -> ApiResult<Option<String>>;

    async fn delete_blog(&self, key: &PostKey, author_id: &str) -> ApiResult<()>;

    async fn increment_views(&self, key: &PostKey) -> ApiResult<()>;

    /// Returns whether `username` likes the post after the toggle.
    async fn toggle_like(&self, key: &PostKey, username: &str) -> ApiResult<bool>;

    async fn list_comments(&self, blog_id: &str) -> ApiResult<Vec<Comment>>;

    async fn add_comment(&self, comment: &NewComment) -> ApiResult<()>;
}
