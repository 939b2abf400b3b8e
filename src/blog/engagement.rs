use chrono::Utc;

use crate::api::{ApiResult, Comment, InkwellApi, NewComment, Post, PostKey, Session};

/// Liked flag and counter as shown on the detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub liked: bool,
    pub likes: u64,
}

impl LikeState {
    pub fn for_viewer(post: &Post, viewer: Option<&Session>) -> Self {
        Self {
            liked: viewer.is_some_and(|v| post.is_liked_by(&v.username)),
            likes: post.likes,
        }
    }

    /// Adopt the server's answer: the flag follows it and the counter moves by one.
    pub fn apply(self, liked: bool) -> Self {
        let likes = if liked {
            self.likes.saturating_add(1)
        } else {
            self.likes.saturating_sub(1)
        };
        Self { liked, likes }
    }
}

/// Toggle the viewer's like. The local state only changes once the server has answered.
pub async fn toggle_like(
    api: &dyn InkwellApi,
    key: &PostKey,
    viewer: &Session,
    current: LikeState,
) -> ApiResult<LikeState> {
    let liked = api.toggle_like(key, &viewer.username).await?;
    Ok(current.apply(liked))
}

/// Post a comment and build the copy that is displayed. The id and timestamp are generated
/// here; the server's stored values are not read back.
pub async fn add_comment(
    api: &dyn InkwellApi,
    key: &PostKey,
    viewer: &Session,
    content: &str,
) -> ApiResult<Comment> {
    let request = NewComment {
        blog_id: key.path_segment().to_string(),
        author_id: viewer.username.clone(),
        content: content.trim().to_string(),
    };
    api.add_comment(&request).await?;

    Ok(Comment {
        comment_id: uuid::Uuid::now_v7().to_string(),
        blog_id: request.blog_id,
        author_id: request.author_id,
        parent_id: None,
        content: request.content,
        likes: 0,
        created_at: Utc::now(),
    })
}

/// Comments of the post. A failed fetch shows none.
pub async fn load_comments(api: &dyn InkwellApi, key: &PostKey) -> Vec<Comment> {
    match api.list_comments(key.path_segment()).await {
        Ok(comments) => comments,
        Err(e) => {
            tracing::warn!(post = %key.title, "Failed to fetch comments: {}", e);
            Vec::new()
        }
    }
}

/// Author-only controls are shown when the viewer wrote the post.
pub fn can_manage(post: &Post, viewer: Option<&Session>) -> bool {
    viewer.is_some_and(|v| v.id == post.author_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;

    fn viewer() -> Session {
        Session {
            id: "u1".into(),
            email: "aria@inkwell.test".into(),
            username: "aria".into(),
            full_name: None,
        }
    }

    fn post() -> Post {
        Post {
            id: Some("b1".into()),
            title: "Building Empathy Through User Research".into(),
            author_id: "u1".into(),
            likes: 12,
            ..Post::default()
        }
    }

    #[test]
    fn apply_follows_server_answer() {
        let state = LikeState {
            liked: false,
            likes: 12,
        };
        assert_eq!(
            state.apply(true),
            LikeState {
                liked: true,
                likes: 13
            }
        );
        assert_eq!(
            state.apply(false),
            LikeState {
                liked: false,
                likes: 11
            }
        );
    }

    #[test]
    fn apply_never_goes_below_zero() {
        let state = LikeState {
            liked: true,
            likes: 0,
        };
        assert_eq!(state.apply(false).likes, 0);
    }

    #[test]
    fn initial_state_uses_liked_by() {
        let mut p = post();
        p.liked_by = Some(vec!["aria".into()]);
        assert!(LikeState::for_viewer(&p, Some(&viewer())).liked);
        assert!(!LikeState::for_viewer(&p, None).liked);
        assert_eq!(LikeState::for_viewer(&p, None).likes, 12);
    }

    #[tokio::test]
    async fn toggling_twice_restores_the_counter() {
        let api = FakeApi::default();
        let p = post();
        let start = LikeState::for_viewer(&p, Some(&viewer()));

        let once = toggle_like(&api, &p.key(), &viewer(), start).await.unwrap();
        assert!(once.liked);
        assert_eq!(once.likes, 13);

        let twice = toggle_like(&api, &p.key(), &viewer(), once).await.unwrap();
        assert_eq!(twice, start);
    }

    #[tokio::test]
    async fn failed_toggle_propagates_error() {
        let api = FakeApi::failing("like service down");
        let p = post();
        let start = LikeState::for_viewer(&p, Some(&viewer()));
        assert!(toggle_like(&api, &p.key(), &viewer(), start).await.is_err());
    }

    #[tokio::test]
    async fn add_comment_builds_local_copy() {
        let api = FakeApi::default();
        let comment = add_comment(&api, &post().key(), &viewer(), "  Great read  ")
            .await
            .unwrap();

        assert_eq!(comment.content, "Great read");
        assert_eq!(comment.author_id, "aria");
        assert_eq!(comment.blog_id, "b1");
        assert!(uuid::Uuid::parse_str(&comment.comment_id).is_ok());

        let sent = api.added_comments.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].content, "Great read");
    }

    #[tokio::test]
    async fn failed_comment_fetch_is_empty() {
        let api = FakeApi::failing("boom");
        assert!(load_comments(&api, &post().key()).await.is_empty());
    }

    #[test]
    fn only_author_can_manage() {
        let p = post();
        assert!(can_manage(&p, Some(&viewer())));
        let mut other = viewer();
        other.id = "u2".into();
        assert!(!can_manage(&p, Some(&other)));
        assert!(!can_manage(&p, None));
    }
}
