//! crates/blog_client/src/controllers/blog.rs
//!
//! Blog detail page. Likes are applied optimistically and rolled back when
//! the server refuses them.

use tracing::warn;

use crate::controllers::{or_placeholder, Commit, Deps, Outcome, View};
use crate::error::{ClientError, ClientResult};
use crate::views::blog::{self as blog_view, INTERACTION_CONTAINER};

pub async fn render(deps: &Deps, blog_id: &str) -> ClientResult<View> {
    let result = async {
        let blog = deps.blogs.get(blog_id, false, false).await?;
        let bar = interaction(deps, &blog, false);
        let body = blog_view::blog_page(&blog, bar);
        Ok::<_, ClientError>(
            View::new(body, blog_view::interaction_bindings()).with_commit(Commit::ShowBlog(blog)),
        )
    }
    .await;
    or_placeholder(result, "Blog not found")
}

fn interaction(deps: &Deps, blog: &blog_core::Blog, liked: bool) -> maud::Markup {
    let is_author = deps
        .context
        .username()
        .is_some_and(|name| name == blog.author.personal_info.username);
    let share_url = deps.config.page_url(&format!("/blog/{}", blog.blog_id));
    blog_view::interaction_bar(blog, liked, is_author, &share_url)
}

fn patch_bar(deps: &Deps) {
    let shown = deps.shown().clone();
    if let Some(blog) = shown.blog {
        let markup = interaction(deps, &blog, shown.liked);
        deps.host.patch(INTERACTION_CONTAINER, &markup.into_string());
    }
}

/// Fills in whether the signed-in reader already likes the blog.
pub async fn after_render(deps: &Deps) -> ClientResult<()> {
    if !deps.context.user().is_signed_in() {
        return Ok(());
    }
    let Some(blog_id) = deps.shown().blog.as_ref().map(|b| b.blog_id.clone()) else {
        return Ok(());
    };

    let liked = deps.blogs.is_liked(&blog_id).await?;
    {
        let mut shown = deps.shown();
        if shown.blog.as_ref().map(|b| b.blog_id.as_str()) != Some(blog_id.as_str()) {
            return Ok(());
        }
        shown.liked = liked;
    }
    patch_bar(deps);
    Ok(())
}

pub async fn toggle_like(deps: &Deps) -> ClientResult<Outcome> {
    if !deps.context.user().is_signed_in() {
        deps.host.error("Please login to like this blog");
        return Ok(Outcome::Done);
    }

    let (blog_id, was_liked) = {
        let mut shown = deps.shown();
        let was_liked = shown.liked;
        let Some(blog) = shown.blog.as_mut() else {
            return Ok(Outcome::Done);
        };
        blog.activity.total_likes += if was_liked { -1 } else { 1 };
        let blog_id = blog.blog_id.clone();
        shown.liked = !was_liked;
        (blog_id, was_liked)
    };
    patch_bar(deps);

    match deps.blogs.like(&blog_id, was_liked).await {
        Ok(likes_count) => {
            let mut shown = deps.shown();
            if let Some(blog) = shown.blog.as_mut().filter(|b| b.blog_id == blog_id) {
                blog.activity.total_likes = likes_count;
            }
        }
        Err(e) => {
            warn!("Like on {} failed: {}", blog_id, e);
            {
                let mut shown = deps.shown();
                if let Some(blog) = shown.blog.as_mut().filter(|b| b.blog_id == blog_id) {
                    blog.activity.total_likes += if was_liked { 1 } else { -1 };
                    shown.liked = was_liked;
                }
            }
            deps.report(&e, "Could not update the like");
        }
    }
    patch_bar(deps);
    Ok(Outcome::Done)
}
