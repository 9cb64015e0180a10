//! crates/blog_client/src/controllers/editor.rs
//!
//! Editor and publish screens. Every edit goes straight into the draft held
//! by the context, so leaving and re-entering the editor loses nothing.

use blog_core::validation::check_new_tag;
use blog_core::{BlogDraft, Content, ValidationError};
use tracing::debug;

use crate::bindings::UiEvent;
use crate::context::BlogField;
use crate::controllers::{or_placeholder, Commit, Deps, Outcome, View};
use crate::error::{ClientError, ClientResult};
use crate::views;
use crate::views::editor::{
    self as editor_view, BANNER_WRAPPER, CHAR_COUNT, TAGS_CONTAINER, TAGS_LEFT,
};

pub async fn render(deps: &Deps, blog_id: Option<&str>, resume: bool) -> ClientResult<View> {
    if !deps.context.user().is_signed_in() {
        deps.host.navigate("/login");
        return Ok(View::inert(views::placeholder("Sign in to write a blog")));
    }

    let current = deps.context.blog();
    if resume && current.blog_id.as_deref() == blog_id {
        return Ok(View::new(editor_view::editor(&current), editor_view::editor_bindings()));
    }

    let draft = match blog_id {
        None => BlogDraft::default(),
        Some(id) => match deps.blogs.get(id, true, true).await {
            Ok(blog) => BlogDraft::from_blog(blog),
            Err(e) => return or_placeholder(Err(e), "Blog not found"),
        },
    };
    Ok(View::new(editor_view::editor(&draft), editor_view::editor_bindings())
        .with_commit(Commit::SetDraft(draft)))
}

pub fn render_publish(deps: &Deps) -> View {
    let draft = deps.context.blog();
    View::new(
        editor_view::publish_form(&draft),
        editor_view::publish_bindings(&draft),
    )
}

pub async fn upload_banner(deps: &Deps, event: &UiEvent) -> ClientResult<Outcome> {
    let Some(file) = event.file.clone() else {
        return Ok(Outcome::Done);
    };

    deps.host.loading("Uploading...");
    let uploaded = deps.uploads.upload(file).await;
    deps.host.dismiss_loading();

    match uploaded {
        Ok(url) => {
            deps.context.set_blog_field(BlogField::Banner(url.clone()))?;
            deps.host
                .patch(BANNER_WRAPPER, &editor_view::banner_image(&url).into_string());
            deps.host.success("Uploaded");
        }
        Err(e) => deps.report(&e, "Image upload failed"),
    }
    Ok(Outcome::Done)
}

pub fn edit_title(deps: &Deps, event: &UiEvent) -> ClientResult<Outcome> {
    // Newlines would end up in the slug.
    let title = event.value("title").replace('\n', " ");
    deps.context.set_blog_field(BlogField::Title(title))?;
    Ok(Outcome::Done)
}

/// The editor host posts its document as JSON under `content`.
pub fn edit_content(deps: &Deps, event: &UiEvent) -> ClientResult<Outcome> {
    let raw = event.values.get("content").map(String::as_str).unwrap_or("{}");
    let content: Content =
        serde_json::from_str(raw).map_err(|e| ClientError::Decode(e.to_string()))?;
    debug!("Editor content now has {} blocks", content.blocks.len());
    deps.context.set_blog_field(BlogField::Content(content))?;
    Ok(Outcome::Done)
}

pub fn proceed_to_publish(deps: &Deps) -> ClientResult<Outcome> {
    let draft = deps.context.blog();
    let missing = if draft.banner.is_empty() {
        Some(ValidationError::MissingBanner)
    } else if draft.title.trim().is_empty() {
        Some(ValidationError::MissingTitle)
    } else if draft.content.is_empty() {
        Some(ValidationError::MissingContent)
    } else {
        None
    };

    match missing {
        Some(rule) => deps.host.error(&rule.to_string()),
        None => deps.host.navigate("/publish"),
    }
    Ok(Outcome::Done)
}

pub async fn save_draft(deps: &Deps) -> ClientResult<Outcome> {
    let draft = deps.context.blog();
    deps.host.loading("Saving Draft...");
    let saved = deps.blogs.save(&draft, true).await;
    deps.host.dismiss_loading();

    match saved {
        Ok(blog_id) => {
            deps.context.set_blog_field(BlogField::BlogId(Some(blog_id)))?;
            deps.host.success("Saved");
        }
        Err(e) => deps.report(&e, "Could not save the draft"),
    }
    Ok(Outcome::Done)
}

pub fn back_to_editor(deps: &Deps) -> ClientResult<Outcome> {
    let fragment = match deps.context.blog().blog_id {
        Some(id) => format!("/editor/{}?resume=1", id),
        None => "/editor?resume=1".to_string(),
    };
    deps.host.navigate(&fragment);
    Ok(Outcome::Done)
}

pub fn edit_description(deps: &Deps, event: &UiEvent) -> ClientResult<Outcome> {
    let des = event.value("des").replace('\n', " ");
    deps.host.patch(CHAR_COUNT, &editor_view::chars_left(&des));
    deps.context.set_blog_field(BlogField::Des(des))?;
    Ok(Outcome::Done)
}

fn show_tags(deps: &Deps, tags: &[String]) -> Outcome {
    deps.host
        .patch(TAGS_CONTAINER, &editor_view::tag_list(tags).into_string());
    deps.host.patch(TAGS_LEFT, &editor_view::tags_left(tags));
    Outcome::Rebind(editor_view::publish_bindings(&deps.context.blog()))
}

/// Adds the typed tag on Enter or comma.
pub fn add_tag(deps: &Deps, event: &UiEvent) -> ClientResult<Outcome> {
    let key = event.value("key");
    if key != "Enter" && key != "," {
        return Ok(Outcome::Done);
    }
    let tag = event.value("tag").trim_end_matches(',').trim().to_lowercase();
    if tag.is_empty() {
        return Ok(Outcome::Done);
    }

    let mut tags = deps.context.blog().tags;
    if let Err(rule) = check_new_tag(&tags, &tag) {
        deps.host.error(&rule.to_string());
        return Ok(Outcome::Done);
    }
    tags.push(tag);
    deps.context.set_blog_field(BlogField::Tags(tags.clone()))?;
    Ok(show_tags(deps, &tags))
}

pub fn remove_tag(deps: &Deps, tag: &str) -> ClientResult<Outcome> {
    let mut tags = deps.context.blog().tags;
    tags.retain(|t| t != tag);
    deps.context.set_blog_field(BlogField::Tags(tags.clone()))?;
    Ok(show_tags(deps, &tags))
}

pub async fn publish(deps: &Deps) -> ClientResult<Outcome> {
    let draft = deps.context.blog();
    deps.host.loading("Publishing...");
    let published = deps.blogs.save(&draft, false).await;
    deps.host.dismiss_loading();

    match published {
        Ok(blog_id) => {
            debug!("Published {}", blog_id);
            deps.context.reset_blog()?;
            deps.host.success("Published");
            deps.host.navigate("/");
        }
        Err(e) => deps.report(&e, "Could not publish the blog"),
    }
    Ok(Outcome::Done)
}
