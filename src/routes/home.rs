use askama::Template;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::form_urlencoded;

use crate::api::{Post, PostKey};
use crate::blog::format::{format_date, format_number};
use crate::blog::{Feed, FeedOrder};
use crate::extractors::{IncomingFlash, Viewer};
use crate::flash::{self, Flash};
use crate::state::AppState;

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

/// Header data shared by every full page.
pub struct Layout {
    pub username: Option<String>,
    pub flash: Option<Flash>,
}

impl Layout {
    pub fn new(viewer: &Viewer, flash: Option<Flash>) -> Self {
        Self {
            username: viewer.user().map(|u| u.username.clone()),
            flash,
        }
    }
}

/// Render a full page. A flash that was shown is cleared so it appears only once.
pub fn page<T: Template>(status: StatusCode, incoming_flash: bool, template: T) -> Response {
    let mut response = Html(template).into_response();
    if response.status() == StatusCode::OK {
        *response.status_mut() = status;
    }
    if incoming_flash {
        if let Ok(value) = HeaderValue::from_str(&flash::clear_cookie()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

/// Path of the detail page for `key`.
pub fn post_href(key: &PostKey) -> String {
    let segment: String = form_urlencoded::byte_serialize(key.path_segment().as_bytes()).collect();
    format!("/blogs/{}", segment.replace('+', "%20"))
}

pub struct PostCard {
    pub href: String,
    pub title: String,
    pub excerpt: String,
    pub image: String,
    pub tags: Vec<String>,
    pub category: String,
    pub date: String,
    pub views: String,
    pub likes: String,
    pub comments: String,
}

const EXCERPT_CHARS: usize = 160;
const FALLBACK_IMAGE: &str =
    "https://images.unsplash.com/photo-1451187580459-43490279c0fa?w=800&h=500&fit=crop";

impl PostCard {
    pub fn new(post: &Post, now: &DateTime<Utc>) -> Self {
        let mut excerpt: String = post.blog_content.chars().take(EXCERPT_CHARS).collect();
        if post.blog_content.chars().count() > EXCERPT_CHARS {
            excerpt.push('…');
        }
        Self {
            href: post_href(&post.key()),
            title: post.title.clone(),
            excerpt,
            image: cover_image(post),
            tags: post.tags.iter().take(2).cloned().collect(),
            category: post.category.clone(),
            date: format_date(&post.created_at, now),
            views: format_number(post.views),
            likes: format_number(post.likes),
            comments: format_number(post.comments),
        }
    }
}

pub fn cover_image(post: &Post) -> String {
    if post.blog_image.trim().is_empty() {
        FALLBACK_IMAGE.to_string()
    } else {
        post.blog_image.clone()
    }
}

pub struct FilterTab {
    pub key: &'static str,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub featured: Vec<PostCard>,
    pub trending: Vec<PostCard>,
    pub posts: Vec<PostCard>,
    pub filters: Vec<FilterTab>,
}

#[derive(Deserialize)]
pub struct FeedQuery {
    pub sort: Option<String>,
}

pub async fn index(
    State(state): State<AppState>,
    viewer: Viewer,
    IncomingFlash(flash): IncomingFlash,
    Query(query): Query<FeedQuery>,
) -> Response {
    let order = query
        .sort
        .as_deref()
        .map(FeedOrder::from_key)
        .unwrap_or_default();
    let feed = Feed::load(state.api.as_ref(), order).await;

    let now = Utc::now();
    let cards = |posts: &[Post]| -> Vec<PostCard> {
        posts.iter().map(|p| PostCard::new(p, &now)).collect()
    };
    let filters = FeedOrder::ALL
        .iter()
        .map(|o| FilterTab {
            key: o.key(),
            label: o.label(),
            active: *o == feed.order,
        })
        .collect();

    let had_flash = flash.is_some();
    let template = HomeTemplate {
        layout: Layout::new(&viewer, flash),
        featured: cards(&feed.featured),
        trending: cards(&feed.trending),
        posts: cards(&feed.sorted),
        filters,
    };
    page(StatusCode::OK, had_flash, template)
}

pub async fn health() -> &'static str {
    "ok"
}
