use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;

use crate::auth::{gate, GateOutcome, SignInPrompt};
use crate::blog::draft::TAG_LIMIT;
use crate::blog::{Draft, TagSet};
use crate::extractors::{IncomingFlash, Viewer};
use crate::flash::{redirect_with, Flash};
use crate::routes::home::{page, Layout};
use crate::state::AppState;

const CATEGORIES: [&str; 6] = [
    "Technology",
    "Design",
    "Business",
    "Lifestyle",
    "Science",
    "Culture",
];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/write", get(write))
        .route("/blogs/new", get(new_post))
        .route("/blogs", post(create))
}

struct CategoryOption {
    name: &'static str,
    selected: bool,
}

#[derive(Template)]
#[template(path = "pages/write_gate.html")]
struct WriteGateTemplate {
    layout: Layout,
    prompt: SignInPrompt,
}

#[derive(Template)]
#[template(path = "pages/create.html")]
struct CreateTemplate {
    layout: Layout,
    title: String,
    content: String,
    image_url: String,
    tags: String,
    tag_limit: usize,
    categories: Vec<CategoryOption>,
}

impl CreateTemplate {
    fn new(layout: Layout, draft: &Draft) -> Self {
        Self {
            layout,
            title: draft.title.clone(),
            content: draft.content.clone(),
            image_url: draft.image_url.clone(),
            tags: draft.tags.as_slice().join(", "),
            tag_limit: TAG_LIMIT,
            categories: CATEGORIES
                .iter()
                .map(|&name| CategoryOption {
                    name,
                    selected: name == draft.category,
                })
                .collect(),
        }
    }
}

#[derive(Deserialize)]
struct CreateForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    tags: String,
}

impl From<CreateForm> for Draft {
    fn from(form: CreateForm) -> Self {
        Draft {
            title: form.title,
            content: form.content,
            category: form.category,
            image_url: form.image_url,
            tags: TagSet::parse(&form.tags),
        }
    }
}

/// GET /write: go to the editor, or explain that an account is needed
async fn write(viewer: Viewer, IncomingFlash(flash): IncomingFlash) -> Response {
    match gate(&viewer.0, "/blogs/new") {
        GateOutcome::Navigate(target) => Redirect::to(target).into_response(),
        GateOutcome::Prompt(prompt) => {
            let had_flash = flash.is_some();
            page(
                StatusCode::OK,
                had_flash,
                WriteGateTemplate {
                    layout: Layout::new(&viewer, flash),
                    prompt,
                },
            )
        }
    }
}

/// GET /blogs/new: empty creation form
async fn new_post(viewer: Viewer, IncomingFlash(flash): IncomingFlash) -> Response {
    if !viewer.0.is_authenticated() {
        return Redirect::to("/write").into_response();
    }
    let had_flash = flash.is_some();
    page(
        StatusCode::OK,
        had_flash,
        CreateTemplate::new(Layout::new(&viewer, flash), &Draft::default()),
    )
}

/// POST /blogs: validate the draft and publish it
async fn create(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<CreateForm>,
) -> Response {
    let Some(user) = viewer.user() else {
        return Redirect::to("/write").into_response();
    };

    let draft = Draft::from(form);
    let rejected = |draft: &Draft, message: String| {
        page(
            StatusCode::UNPROCESSABLE_ENTITY,
            false,
            CreateTemplate::new(Layout::new(&viewer, Some(Flash::error(message))), draft),
        )
    };

    let new_post = match draft.clone().into_new_post(&user.id) {
        Ok(new_post) => new_post,
        Err(e) => return rejected(&draft, e.message().to_string()),
    };

    match state.api.create_blog(&new_post).await {
        Ok(id) => {
            tracing::info!(title = %new_post.title, id = ?id, author = %user.username, "blog published");
            redirect_with("/", Flash::success("Blog published successfully!"))
        }
        Err(e) => {
            tracing::warn!(title = %new_post.title, "Failed to publish blog: {}", e);
            rejected(&draft, e.user_message("Failed to publish blog."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_tags_are_parsed_into_a_capped_set() {
        let form = CreateForm {
            title: "Hello world".into(),
            content: "Some words".into(),
            category: "Design".into(),
            image_url: String::new(),
            tags: "rust, web, rust, , a, b, c, d".into(),
        };
        let draft = Draft::from(form);
        assert_eq!(draft.tags.as_slice(), ["rust", "web", "a", "b", "c"]);
    }

    #[test]
    fn create_template_keeps_selected_category() {
        let draft = Draft {
            category: "Science".into(),
            ..Draft::default()
        };
        let layout = Layout {
            username: Some("alice".into()),
            flash: None,
        };
        let template = CreateTemplate::new(layout, &draft);
        let selected: Vec<_> = template
            .categories
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.name)
            .collect();
        assert_eq!(selected, ["Science"]);
    }
}
