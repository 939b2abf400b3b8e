use askama::Template;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::{Comment, InkwellApi, Post, PostKey};
use crate::blog::engagement::{self, can_manage};
use crate::blog::format::{format_date, format_number};
use crate::blog::LikeState;
use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, HxRequest, IncomingFlash, Viewer};
use crate::flash::{redirect_with, Flash};
use crate::routes::home::{cover_image, page, post_href, Html, Layout};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/blogs/{key}", get(detail))
        .route("/blogs/{key}/like", post(like))
        .route("/blogs/{key}/comments", post(comment))
        .route("/blogs/{key}/delete", get(confirm_delete).post(delete))
}

// -- View models --

struct PostView {
    title: String,
    body: String,
    image: String,
    tags: Vec<String>,
    category: String,
    author: String,
    date: String,
    views: String,
}

impl PostView {
    fn new(post: &Post, now: &DateTime<Utc>) -> Self {
        let author = post
            .author_name
            .clone()
            .or_else(|| post.author_username.clone())
            .unwrap_or_else(|| post.author_id.clone());
        Self {
            title: post.title.clone(),
            body: post.blog_content.clone(),
            image: cover_image(post),
            tags: post.tags.clone(),
            category: post.category.clone(),
            author,
            date: format_date(&post.created_at, now),
            views: format_number(post.views),
        }
    }
}

/// Hidden form fields that name the post on like and comment submissions.
struct PostRef {
    href: String,
    blog_id: String,
    title: String,
}

impl PostRef {
    fn new(key: &PostKey) -> Self {
        Self {
            href: post_href(key),
            blog_id: key.id.clone().unwrap_or_default(),
            title: key.title.clone(),
        }
    }
}

struct LikeBar {
    target: PostRef,
    liked: bool,
    likes: u64,
    likes_label: String,
    signed_in: bool,
}

impl LikeBar {
    fn new(key: &PostKey, state: LikeState, signed_in: bool) -> Self {
        Self {
            target: PostRef::new(key),
            liked: state.liked,
            likes: state.likes,
            likes_label: format_number(state.likes),
            signed_in,
        }
    }
}

struct CommentView {
    author: String,
    body: String,
    date: String,
}

impl CommentView {
    fn new(comment: &Comment, now: &DateTime<Utc>) -> Self {
        Self {
            author: comment.author_id.clone(),
            body: comment.content.clone(),
            date: format_date(&comment.created_at, now),
        }
    }
}

// -- Templates --

#[derive(Template)]
#[template(path = "pages/blog.html")]
struct BlogTemplate {
    layout: Layout,
    post: PostView,
    target: PostRef,
    bar: LikeBar,
    comments: Vec<CommentView>,
    can_manage: bool,
    signed_in: bool,
}

#[derive(Template)]
#[template(path = "pages/not_found.html")]
struct NotFoundTemplate {
    layout: Layout,
}

#[derive(Template)]
#[template(path = "pages/confirm_delete.html")]
struct ConfirmDeleteTemplate {
    layout: Layout,
    title: String,
    href: String,
}

#[derive(Template)]
#[template(path = "components/like_bar.html")]
struct LikeBarTemplate {
    bar: LikeBar,
}

/// A new comment plus out-of-band updates for the heading count and the form's count field.
#[derive(Template)]
#[template(path = "components/comment_added.html")]
struct CommentAddedTemplate {
    comment: CommentView,
    count: u64,
}

#[derive(Template)]
#[template(path = "components/flash.html")]
struct FlashTemplate {
    flash: Flash,
}

// -- Request types --

#[derive(Deserialize)]
struct LikeForm {
    #[serde(default)]
    blog_id: String,
    title: String,
    liked: bool,
    likes: u64,
}

#[derive(Deserialize)]
struct CommentForm {
    #[serde(default)]
    blog_id: String,
    title: String,
    #[serde(default)]
    content: String,
    /// Comments shown before this one.
    #[serde(default)]
    count: u64,
}

#[derive(Deserialize)]
struct DetailQuery {
    from: Option<String>,
}

impl DetailQuery {
    /// Set when the page is reached by redirect after an action on it.
    fn after_action(&self) -> bool {
        self.from.as_deref() == Some(AFTER_ACTION)
    }
}

const AFTER_ACTION: &str = "action";

/// Where plain form actions on a post land. The marker keeps the revisit out of the view count.
fn back_to_post(key: &PostKey) -> String {
    format!("{}?from={}", post_href(key), AFTER_ACTION)
}

fn form_key(blog_id: &str, title: &str) -> PostKey {
    PostKey {
        id: Some(blog_id.trim().to_string()).filter(|id| !id.is_empty()),
        title: title.to_string(),
    }
}

/// Resolve a URL key against the collection: server id first, then exact title.
async fn find_post(api: &dyn InkwellApi, key: &str) -> AppResult<Post> {
    let mut posts = api.list_blogs().await?;
    let index = posts
        .iter()
        .position(|p| p.id.as_deref() == Some(key))
        .or_else(|| posts.iter().position(|p| p.title == key));
    match index {
        Some(i) => Ok(posts.swap_remove(i)),
        None => Err(AppError::NotFound),
    }
}

/// Report a failed action. htmx requests get the notice swapped into the flash slot in place;
/// plain form posts are sent back to `back_to`.
fn failure(hx: bool, back_to: &str, flash: Flash) -> Response {
    if hx {
        (
            [("HX-Retarget", "#flash"), ("HX-Reswap", "innerHTML")],
            Html(FlashTemplate { flash }),
        )
            .into_response()
    } else {
        redirect_with(back_to, flash)
    }
}

fn sign_in_required(hx: bool, message: &str) -> Response {
    if hx {
        ([("HX-Redirect", "/signin")], StatusCode::NO_CONTENT).into_response()
    } else {
        redirect_with("/signin", Flash::error(message))
    }
}

// -- Handlers --

/// GET /blogs/{key}: full post with likes and comments
async fn detail(
    State(state): State<AppState>,
    viewer: Viewer,
    IncomingFlash(flash): IncomingFlash,
    Path(key): Path<String>,
    Query(query): Query<DetailQuery>,
) -> AppResult<Response> {
    let had_flash = flash.is_some();
    let post = match find_post(state.api.as_ref(), &key).await {
        Ok(post) => post,
        Err(AppError::NotFound) => {
            return Ok(page(
                StatusCode::NOT_FOUND,
                had_flash,
                NotFoundTemplate {
                    layout: Layout::new(&viewer, flash),
                },
            ));
        }
        Err(e) => return Err(e),
    };
    let post_key = post.key();

    // Fire and forget; the page does not wait on the view counter.
    if !query.after_action() {
        let api = state.api.clone();
        let views_key = post_key.clone();
        tokio::spawn(async move {
            if let Err(e) = api.increment_views(&views_key).await {
                tracing::warn!(post = %views_key.title, "Failed to increment views: {}", e);
            }
        });
    }

    let comments = engagement::load_comments(state.api.as_ref(), &post_key).await;
    let now = Utc::now();
    let user = viewer.user();
    let template = BlogTemplate {
        post: PostView::new(&post, &now),
        target: PostRef::new(&post_key),
        bar: LikeBar::new(
            &post_key,
            LikeState::for_viewer(&post, user),
            user.is_some(),
        ),
        comments: comments.iter().map(|c| CommentView::new(c, &now)).collect(),
        can_manage: can_manage(&post, user),
        signed_in: user.is_some(),
        layout: Layout::new(&viewer, flash),
    };
    Ok(page(StatusCode::OK, had_flash, template))
}

/// POST /blogs/{key}/like: toggle the viewer's like
async fn like(
    State(state): State<AppState>,
    viewer: Viewer,
    HxRequest(hx): HxRequest,
    Form(form): Form<LikeForm>,
) -> Response {
    let key = form_key(&form.blog_id, &form.title);
    let href = back_to_post(&key);
    let Some(user) = viewer.user() else {
        return sign_in_required(hx, "Please sign in to like posts.");
    };

    let current = LikeState {
        liked: form.liked,
        likes: form.likes,
    };
    match engagement::toggle_like(state.api.as_ref(), &key, user, current).await {
        Ok(next) if hx => Html(LikeBarTemplate {
            bar: LikeBar::new(&key, next, true),
        })
        .into_response(),
        Ok(_) => Redirect::to(&href).into_response(),
        Err(e) => {
            tracing::warn!(post = %key.title, "Failed to toggle like: {}", e);
            failure(hx, &href, Flash::error(e.user_message("Failed to update like.")))
        }
    }
}

/// POST /blogs/{key}/comments: add a comment as the viewer
async fn comment(
    State(state): State<AppState>,
    viewer: Viewer,
    HxRequest(hx): HxRequest,
    Form(form): Form<CommentForm>,
) -> Response {
    let key = form_key(&form.blog_id, &form.title);
    let href = back_to_post(&key);
    let Some(user) = viewer.user() else {
        return sign_in_required(hx, "Please sign in to comment.");
    };
    if form.content.trim().is_empty() {
        return failure(hx, &href, Flash::error("Comment cannot be empty."));
    }

    match engagement::add_comment(state.api.as_ref(), &key, user, &form.content).await {
        Ok(added) if hx => Html(CommentAddedTemplate {
            comment: CommentView::new(&added, &Utc::now()),
            count: form.count.saturating_add(1),
        })
        .into_response(),
        Ok(_) => redirect_with(&href, Flash::success("Comment added.")),
        Err(e) => {
            tracing::warn!(post = %key.title, "Failed to add comment: {}", e);
            failure(hx, &href, Flash::error(e.user_message("Failed to add comment.")))
        }
    }
}

/// GET /blogs/{key}/delete: ask before deleting
async fn confirm_delete(
    State(state): State<AppState>,
    viewer: Viewer,
    IncomingFlash(flash): IncomingFlash,
    Path(key): Path<String>,
) -> AppResult<Response> {
    let post = find_post(state.api.as_ref(), &key).await?;
    if !can_manage(&post, viewer.user()) {
        return Err(AppError::Unauthorized);
    }
    let had_flash = flash.is_some();
    Ok(page(
        StatusCode::OK,
        had_flash,
        ConfirmDeleteTemplate {
            layout: Layout::new(&viewer, flash),
            href: post_href(&post.key()),
            title: post.title,
        },
    ))
}

/// POST /blogs/{key}/delete: delete the viewer's own post
async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(key): Path<String>,
) -> AppResult<Response> {
    let post = find_post(state.api.as_ref(), &key).await?;
    if !can_manage(&post, Some(&user)) {
        return Err(AppError::Unauthorized);
    }

    let post_key = post.key();
    match state.api.delete_blog(&post_key, &user.id).await {
        Ok(()) => {
            tracing::info!(post = %post_key.title, author = %user.username, "blog deleted");
            Ok(redirect_with("/", Flash::success("Blog deleted successfully.")))
        }
        Err(e) => {
            tracing::warn!(post = %post_key.title, "Failed to delete blog: {}", e);
            Ok(redirect_with(
                &back_to_post(&post_key),
                Flash::error(e.user_message("Failed to delete blog.")),
            ))
        }
    }
}
