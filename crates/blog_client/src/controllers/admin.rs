//! crates/blog_client/src/controllers/admin.rs
//!
//! Admin pages. The API enforces the admin role; a non-admin simply gets
//! the 403 message in a placeholder.

use chrono::Utc;

use crate::bindings::UiEvent;
use crate::controllers::{or_placeholder, Deps, Outcome, View};
use crate::error::{ClientError, ClientResult};
use crate::services::AdminBlogFilter;
use crate::views;
use crate::views::admin as admin_view;

fn forbidden_to_placeholder(result: ClientResult<View>) -> ClientResult<View> {
    match result {
        Err(ClientError::Api { status: 403, message }) => {
            Ok(View::inert(views::placeholder(&message)))
        }
        other => other,
    }
}

pub async fn render_dashboard(deps: &Deps) -> ClientResult<View> {
    let first_page = AdminBlogFilter {
        page: 1,
        ..AdminBlogFilter::default()
    };
    let (blogs, users) = tokio::join!(deps.blogs.all(&first_page), deps.users.all(1, None));
    let result = blogs.and_then(|blogs| {
        let users = users?;
        Ok(View::inert(admin_view::dashboard(
            blogs.pagination.total_blogs,
            users.pagination.total_users,
        )))
    });
    forbidden_to_placeholder(result)
}

pub async fn render_blogs(deps: &Deps, filter: &AdminBlogFilter) -> ClientResult<View> {
    let result = deps.blogs.all(filter).await.map(|page| {
        View::new(
            admin_view::blog_list(&page.blogs, &page.pagination, filter, Utc::now()),
            admin_view::blog_list_bindings(&page.blogs, &page.pagination, filter),
        )
    });
    forbidden_to_placeholder(result)
}

pub async fn render_blog(deps: &Deps, blog_id: &str) -> ClientResult<View> {
    let result = deps.blogs.get(blog_id, true, true).await.map(|blog| {
        View::new(
            admin_view::blog_detail(&blog),
            admin_view::blog_detail_bindings(&blog),
        )
    });
    forbidden_to_placeholder(or_placeholder(result, "Blog not found"))
}

/// Value of `name` in the event when it carried one, otherwise `current`.
fn replaced(event: &UiEvent, name: &str, current: Option<&str>) -> Option<String> {
    let value = if event.values.contains_key(name) {
        event.value(name)
    } else {
        current.unwrap_or_default().to_string()
    };
    Some(value).filter(|v| !v.is_empty())
}

/// Rewrites the listing URL; a changed filter starts again from page one.
pub fn navigate(
    deps: &Deps,
    event: &UiEvent,
    page: i64,
    tag: Option<&str>,
    search: Option<&str>,
) -> ClientResult<Outcome> {
    let new_tag = replaced(event, "tag", tag);
    let new_search = replaced(event, "search", search);
    let filter_changed = new_tag.as_deref() != tag || new_search.as_deref() != search;

    let filter = AdminBlogFilter {
        page: if filter_changed { 1 } else { page.max(1) },
        tag: new_tag,
        search: new_search,
    };
    deps.host.navigate(&filter.fragment());
    Ok(Outcome::Done)
}

pub async fn delete_blog(deps: &Deps, blog_id: &str) -> ClientResult<Outcome> {
    match deps.blogs.delete(blog_id).await {
        Ok(()) => {
            deps.host.success("Blog deleted");
            deps.host.navigate("/admin/blogs");
        }
        Err(e) => deps.report(&e, "Could not delete the blog"),
    }
    Ok(Outcome::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::EventKind;

    #[test]
    fn replaced_prefers_the_event_value() {
        let event = UiEvent::new("admin-tag-filter", EventKind::Change).with_value("tag", "");
        assert_eq!(replaced(&event, "tag", Some("travel")), None);
        assert_eq!(
            replaced(&event, "search", Some("rust")),
            Some("rust".to_string())
        );
    }
}
