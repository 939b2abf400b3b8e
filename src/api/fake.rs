//! In-memory [`InkwellApi`] double for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    ApiError, ApiResult, Comment, Credentials, InkwellApi, NewAccount, NewComment, NewPost, Post,
    PostKey, Profile,
};

#[derive(Default)]
pub struct FakeApi {
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
    /// When set, every call fails with this rejection message.
    pub fail_with: Option<String>,
    liked: Mutex<bool>,
    pub calls: Mutex<Vec<String>>,
    pub added_comments: Mutex<Vec<NewComment>>,
}

impl FakeApi {
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts,
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) -> ApiResult<()> {
        self.calls.lock().unwrap().push(call.to_string());
        match &self.fail_with {
            Some(message) => Err(ApiError::Rejected {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl InkwellApi for FakeApi {
    async fn register(&self, account: &NewAccount) -> ApiResult<Profile> {
        self.record("register")?;
        Ok(Profile {
            id: None,
            email: account.email.clone(),
            username: account.username.clone(),
            full_name: Some(account.full_name.clone()),
        })
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<Profile> {
        self.record("login")?;
        Ok(Profile {
            id: Some("u1".into()),
            email: credentials.email.clone(),
            username: "aria".into(),
            full_name: None,
        })
    }

    async fn logout(&self) -> ApiResult<()> {
        self.record("logout")
    }

    async fn list_blogs(&self) -> ApiResult<Vec<Post>> {
        self.record("list_blogs")?;
        Ok(self.posts.clone())
    }

    async fn create_blog(&self, _post: &NewPost) -> ApiResult<Option<String>> {
        self.record("create_blog")?;
        Ok(Some("b-new".into()))
    }

    async fn delete_blog(&self, key: &PostKey, _author_id: &str) -> ApiResult<()> {
        self.record(&format!("delete_blog:{}", key.title))
    }

    async fn increment_views(&self, key: &PostKey) -> ApiResult<()> {
        self.record(&format!("increment_views:{}", key.title))
    }

    /// Alternates the liked state on every call, like the real toggle endpoint.
    async fn toggle_like(&self, key: &PostKey, _username: &str) -> ApiResult<bool> {
        self.record(&format!("toggle_like:{}", key.title))?;
        let mut liked = self.liked.lock().unwrap();
        *liked = !*liked;
        Ok(*liked)
    }

    async fn list_comments(&self, blog_id: &str) -> ApiResult<Vec<Comment>> {
        self.record(&format!("list_comments:{}", blog_id))?;
        Ok(self
            .comments
            .iter()
            .filter(|c| c.blog_id == blog_id)
            .cloned()
            .collect())
    }

    async fn add_comment(&self, comment: &NewComment) -> ApiResult<()> {
        self.record("add_comment")?;
        self.added_comments.lock().unwrap().push(comment.clone());
        Ok(())
    }
}
