use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Response envelope returned by every Inkwell API endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// The signed-in user as held by the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(rename = "fullName", default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// User payload returned by `/login` and `/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(rename = "fullName", default)]
    pub full_name: Option<String>,
}

impl Profile {
    /// The API resolves authors by email when no id is issued.
    pub fn into_session(self) -> Session {
        let id = match self.id {
            Some(id) if !id.is_empty() => id,
            _ => self.email.clone(),
        };
        Session {
            id,
            email: self.email,
            username: self.username,
            full_name: self.full_name.filter(|n| !n.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "blog_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub blog_content: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_username: Option<String>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub blog_image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub trending: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liked_by: Option<Vec<String>>,
}

impl Post {
    pub fn key(&self) -> PostKey {
        PostKey {
            id: self.id.clone().filter(|id| !id.is_empty()),
            title: self.title.clone(),
        }
    }

    pub fn is_liked_by(&self, username: &str) -> bool {
        self.liked_by
            .as_ref()
            .is_some_and(|users| users.iter().any(|u| u == username))
    }
}

/// Identifies a post on mutating calls. The server-issued id is sent whenever it is known;
/// the title remains for endpoints that still look posts up by title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostKey {
    #[serde(rename = "blog_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
}

impl PostKey {
    /// Value used in URLs and for `GET /comments?blog_id=`.
    pub fn path_segment(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.title)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPost {
    pub title: String,
    pub blog_content: String,
    pub author_id: String,
    pub tags: Vec<String>,
    pub blog_image: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub comment_id: String,
    #[serde(default)]
    pub blog_id: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub blog_id: String,
    pub author_id: String,
    pub content: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_accepts_go_style_payload() {
        let json = r#"{
            "title": "Demystifying Transformer Models",
            "blog_content": "A visual guide",
            "author_id": "u-5",
            "created_at": "2026-02-17T10:00:00Z",
            "updated_at": "0001-01-01T00:00:00Z",
            "tags": null,
            "blog_image": "",
            "category": "Technology",
            "views": 45600,
            "likes": 3400,
            "comments": 478,
            "featured": true,
            "trending": true
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, None);
        assert!(post.tags.is_empty());
        assert_eq!(post.views, 45600);
        assert!(post.featured && post.trending);
        assert_eq!(post.key().path_segment(), "Demystifying Transformer Models");
    }

    #[test]
    fn post_id_accepts_blog_id_or_id() {
        let a: Post = serde_json::from_str(r#"{"blog_id": "b1", "title": "t"}"#).unwrap();
        let b: Post = serde_json::from_str(r#"{"id": "b2", "title": "t"}"#).unwrap();
        assert_eq!(a.id.as_deref(), Some("b1"));
        assert_eq!(b.id.as_deref(), Some("b2"));
    }

    #[test]
    fn post_key_prefers_server_id() {
        let post = Post {
            id: Some("b1".into()),
            title: "Hello world".into(),
            ..Post::default()
        };
        let key = post.key();
        assert_eq!(key.path_segment(), "b1");
        let body = serde_json::to_value(&key).unwrap();
        assert_eq!(body["blog_id"], "b1");
        assert_eq!(body["title"], "Hello world");
    }

    #[test]
    fn post_key_without_id_omits_blog_id() {
        let post = Post {
            id: Some(String::new()),
            title: "Hello world".into(),
            ..Post::default()
        };
        let body = serde_json::to_value(post.key()).unwrap();
        assert!(body.get("blog_id").is_none());
    }

    #[test]
    fn liked_by_membership() {
        let post = Post {
            liked_by: Some(vec!["elena".into(), "marcus".into()]),
            ..Post::default()
        };
        assert!(post.is_liked_by("marcus"));
        assert!(!post.is_liked_by("aria"));
        assert!(!Post::default().is_liked_by("marcus"));
    }

    #[test]
    fn profile_without_id_uses_email() {
        let profile: Profile =
            serde_json::from_str(r#"{"email": "a@b.c", "username": "aria"}"#).unwrap();
        let session = profile.into_session();
        assert_eq!(session.id, "a@b.c");
        assert_eq!(session.username, "aria");
        assert_eq!(session.full_name, None);
    }

    #[test]
    fn session_round_trips_with_camel_case_name() {
        let session = Session {
            id: "u1".into(),
            email: "a@b.c".into(),
            username: "aria".into(),
            full_name: Some("Aria Nakamura".into()),
        };
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"fullName\""));
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
