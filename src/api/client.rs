use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::models::Envelope;
use super::{
    ApiError, ApiResult, Comment, Credentials, InkwellApi, NewAccount, NewComment, NewPost, Post,
    PostKey, Profile,
};
use crate::config::ApiConfig;

/// `reqwest`-backed client for the Inkwell REST API.
///
/// No cookie jar is kept: one front-end process serves many browsers, so every call carries the
/// identifiers it needs in its body.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct KeyedAction<'a> {
    #[serde(flatten)]
    key: &'a PostKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_id: Option<&'a str>,
}

#[derive(Deserialize)]
struct LikeToggled {
    liked: bool,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request and unwrap the `{success, message, data}` envelope.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<Option<T>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: Envelope<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => return Err(ApiError::Malformed(e.to_string())),
            Err(_) => {
                return Err(ApiError::Rejected {
                    status: status.as_u16(),
                    message: String::new(),
                })
            }
        };

        if !status.is_success() || !envelope.success {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: envelope.message,
            });
        }

        tracing::debug!(status = status.as_u16(), message = %envelope.message, "api call ok");
        Ok(envelope.data)
    }

    async fn profile(&self, request: RequestBuilder) -> ApiResult<Profile> {
        self.send::<Profile>(request)
            .await?
            .ok_or_else(|| ApiError::Malformed("response carried no user".into()))
    }
}

#[async_trait]
impl InkwellApi for ApiClient {
    async fn register(&self, account: &NewAccount) -> ApiResult<Profile> {
        self.profile(self.http.post(self.endpoint("register")).json(account))
            .await
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<Profile> {
        self.profile(self.http.post(self.endpoint("login")).json(credentials))
            .await
    }

    async fn logout(&self) -> ApiResult<()> {
        self.send::<Value>(self.http.post(self.endpoint("logout")))
            .await
            .map(|_| ())
    }

    async fn list_blogs(&self) -> ApiResult<Vec<Post>> {
        Ok(self
            .send::<Vec<Post>>(self.http.get(self.endpoint("blogs")))
            .await?
            .unwrap_or_default())
    }

    async fn create_blog(&self, post: &NewPost) -> ApiResult<Option<String>> {
        let data = self
            .send::<Value>(self.http.post(self.endpoint("blogs")).json(post))
            .await?;
        Ok(data
            .as_ref()
            .and_then(|d| d.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    async fn delete_blog(&self, key: &PostKey, author_id: &str) -> ApiResult<()> {
        let body = KeyedAction {
            key,
            username: None,
            author_id: Some(author_id),
        };
        self.send::<Value>(self.http.delete(self.endpoint("blogs/delete")).json(&body))
            .await
            .map(|_| ())
    }

    async fn increment_views(&self, key: &PostKey) -> ApiResult<()> {
        let body = KeyedAction {
            key,
            username: None,
            author_id: None,
        };
        self.send::<Value>(
            self.http
                .post(self.endpoint("blogs/increment-views"))
                .json(&body),
        )
        .await
        .map(|_| ())
    }

    async fn toggle_like(&self, key: &PostKey, username: &str) -> ApiResult<bool> {
        let body = KeyedAction {
            key,
            username: Some(username),
            author_id: None,
        };
        self.send::<LikeToggled>(self.http.post(self.endpoint("blogs/toggle-like")).json(&body))
            .await?
            .map(|toggled| toggled.liked)
            .ok_or_else(|| ApiError::Malformed("toggle-like response carried no state".into()))
    }

    async fn list_comments(&self, blog_id: &str) -> ApiResult<Vec<Comment>> {
        Ok(self
            .send::<Vec<Comment>>(
                self.http
                    .get(self.endpoint("comments"))
                    .query(&[("blog_id", blog_id)]),
            )
            .await?
            .unwrap_or_default())
    }

    async fn add_comment(&self, comment: &NewComment) -> ApiResult<()> {
        self.send::<Value>(self.http.post(self.endpoint("comments")).json(comment))
            .await
            .map(|_| ())
    }
}
