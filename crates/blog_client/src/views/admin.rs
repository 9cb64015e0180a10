//! crates/blog_client/src/views/admin.rs
//!
//! Admin shell: dashboard, paginated blog list and a read-only blog view.
//! Every control on the list rewrites the `#/admin/blogs` URL and lets the
//! router render the new page.

use blog_core::{Blog, BlogPagination};
use chrono::{DateTime, Utc};
use maud::{html, Markup};

use crate::bindings::{Action, Binding, EventKind};
use crate::services::AdminBlogFilter;
use crate::views::blocks::render_content;
use crate::views::components::{nodata, time_ago};
use crate::views::home::CATEGORIES;

/// One slot of the page strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Page(i64),
    Ellipsis,
}

/// First page, last page and the neighbours of `current`, with an ellipsis
/// wherever pages are skipped.
pub fn page_window(current: i64, total: i64) -> Vec<PageSlot> {
    let total = total.max(1);
    let current = current.clamp(1, total);

    let mut pages = vec![1, current - 1, current, current.saturating_add(1), total];
    pages.retain(|page| (1..=total).contains(page));
    pages.sort_unstable();
    pages.dedup();

    let mut slots = Vec::with_capacity(pages.len() * 2);
    let mut last_shown = 0;
    for page in pages {
        if page - last_shown > 1 {
            slots.push(PageSlot::Ellipsis);
        }
        slots.push(PageSlot::Page(page));
        last_shown = page;
    }
    slots
}

fn sidebar(active: &str) -> Markup {
    let link = |key: &str, href: &str, label: &str| {
        let class = if key == active {
            "block px-6 py-3 bg-gray-100 font-medium"
        } else {
            "block px-6 py-3 text-gray-600 hover:bg-gray-50"
        };
        html! { a href=(href) class=(class) { (label) } }
    };
    html! {
        aside class="w-56 min-h-screen border-r border-gray-200 py-8" {
            a href="#/" class="block px-6 mb-8 font-gelasio font-semibold text-xl" { "Vietnews" }
            (link("dashboard", "#/admin/dashboard", "Dashboard"))
            (link("blogs", "#/admin/blogs", "Blogs"))
        }
    }
}

fn shell(active: &str, body: Markup) -> Markup {
    html! {
        div class="flex" {
            (sidebar(active))
            div class="flex-1 p-10" { (body) }
        }
    }
}

pub fn dashboard(total_blogs: i64, total_users: i64) -> Markup {
    shell(
        "dashboard",
        html! {
            h1 class="text-3xl font-medium mb-8" { "Dashboard" }
            div class="grid grid-cols-2 gap-6 max-w-xl" {
                div class="p-6 border border-gray-200 rounded-lg" {
                    p class="text-gray-600" { "Blogs" }
                    p #total-blogs class="text-4xl font-bold" { (total_blogs) }
                }
                div class="p-6 border border-gray-200 rounded-lg" {
                    p class="text-gray-600" { "Users" }
                    p #total-users class="text-4xl font-bold" { (total_users) }
                }
            }
        },
    )
}

pub fn blog_list(
    blogs: &[Blog],
    pagination: &BlogPagination,
    filter: &AdminBlogFilter,
    now: DateTime<Utc>,
) -> Markup {
    let current = pagination.current_page.max(1);
    let total = pagination.total_pages.max(1);
    let selected_tag = filter.tag.as_deref().unwrap_or_default();

    shell(
        "blogs",
        html! {
            h1 class="text-3xl font-medium mb-8" { "Blogs (" (pagination.total_blogs) ")" }
            div class="flex gap-4 mb-6" {
                select #admin-tag-filter name="tag" class="input-box w-48" {
                    option value="" selected[selected_tag.is_empty()] { "All tags" }
                    @for tag in CATEGORIES {
                        option value=(tag) selected[selected_tag == tag] { (tag) }
                    }
                }
                form #admin-search-form class="flex gap-2" {
                    input name="search" type="text" placeholder="Search title"
                        value=(filter.search.as_deref().unwrap_or_default()) class="input-box";
                    button type="submit" class="btn-dark py-2" { "Search" }
                }
            }
            @if blogs.is_empty() {
                (nodata("No blogs found"))
            } @else {
                table class="w-full text-left" {
                    thead {
                        tr { th { "Title" } th { "Author" } th { "Published" } th { "Likes" } th { "Reads" } th {} }
                    }
                    tbody {
                        @for blog in blogs {
                            tr class="border-b border-gray-200" {
                                td { a href={ "#/admin/blogs/" (blog.blog_id) } class="underline" { (blog.title) } }
                                td { "@" (blog.author.personal_info.username) }
                                td { (blog.published_at.map(|at| time_ago(at, now)).unwrap_or_default()) }
                                td { (blog.activity.total_likes) }
                                td { (blog.activity.total_reads) }
                                td {
                                    button id={ "delete-" (blog.blog_id) } class="text-red underline" { "Delete" }
                                }
                            }
                        }
                    }
                }
            }
            nav class="flex gap-2 mt-8 items-center" {
                button #page-prev class="btn-light py-1 px-3" disabled[current <= 1] { "Prev" }
                @for slot in page_window(current, total) {
                    @match slot {
                        PageSlot::Page(page) => {
                            @let class = if page == current { "btn-dark py-1 px-3" } else { "btn-light py-1 px-3" };
                            button id={ "page-" (page) } class=(class) { (page) }
                        }
                        PageSlot::Ellipsis => {
                            span class="px-2" { "…" }
                        }
                    }
                }
                button #page-next class="btn-light py-1 px-3" disabled[current >= total] { "Next" }
            }
        },
    )
}

pub fn blog_list_bindings(
    blogs: &[Blog],
    pagination: &BlogPagination,
    filter: &AdminBlogFilter,
) -> Vec<Binding> {
    let current = pagination.current_page.max(1);
    let total = pagination.total_pages.max(1);
    let goto = |page: i64| Action::AdminNavigate {
        page,
        tag: filter.tag.clone(),
        search: filter.search.clone(),
    };

    let mut bindings = vec![
        Binding::new("admin-tag-filter", EventKind::Change, goto(1)),
        Binding::submit("admin-search-form", goto(1)),
    ];
    if current > 1 {
        bindings.push(Binding::click("page-prev", goto(current - 1)));
    }
    if current < total {
        bindings.push(Binding::click("page-next", goto(current + 1)));
    }
    for slot in page_window(current, total) {
        if let PageSlot::Page(page) = slot {
            bindings.push(Binding::click(format!("page-{}", page), goto(page)));
        }
    }
    for blog in blogs {
        bindings.push(Binding::click(
            format!("delete-{}", blog.blog_id),
            Action::DeleteBlog(blog.blog_id.clone()),
        ));
    }
    bindings
}

pub fn blog_detail(blog: &Blog) -> Markup {
    shell(
        "blogs",
        html! {
            a href="#/admin/blogs" class="underline text-gray-600" { "Back to blogs" }
            div class="max-w-[900px] mt-6" {
                img src=(blog.banner) alt="Blog banner" class="aspect-video";
                h1 class="text-4xl font-bold mt-8" { (blog.title) }
                p class="text-gray-600 mt-2" {
                    "@" (blog.author.personal_info.username)
                    " - " (blog.activity.total_likes) " likes"
                    " - " (blog.activity.total_reads) " reads"
                }
                div class="flex gap-2 my-4" {
                    @for tag in &blog.tags {
                        span class="btn-light py-1 px-4" { (tag) }
                    }
                }
                div class="my-8 font-gelasio" { (render_content(&blog.content)) }
                button id={ "delete-" (blog.blog_id) } class="btn-dark bg-red" { "Delete blog" }
            }
        },
    )
}

pub fn blog_detail_bindings(blog: &Blog) -> Vec<Binding> {
    vec![Binding::click(
        format!("delete-{}", blog.blog_id),
        Action::DeleteBlog(blog.blog_id.clone()),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use super::PageSlot::{Ellipsis, Page};

    #[test]
    fn window_around_the_middle_has_two_ellipses() {
        assert_eq!(
            page_window(5, 10),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn window_at_the_edges() {
        assert_eq!(page_window(1, 10), vec![Page(1), Page(2), Ellipsis, Page(10)]);
        assert_eq!(page_window(10, 10), vec![Page(1), Ellipsis, Page(9), Page(10)]);
        assert_eq!(page_window(2, 3), vec![Page(1), Page(2), Page(3)]);
        assert_eq!(page_window(1, 0), vec![Page(1)]);
    }

    #[test]
    fn window_does_not_walk_huge_page_counts() {
        assert_eq!(
            page_window(3, i64::MAX),
            vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(i64::MAX)]
        );
        assert_eq!(
            page_window(i64::MAX, i64::MAX),
            vec![Page(1), Ellipsis, Page(i64::MAX - 1), Page(i64::MAX)]
        );
    }

    #[test]
    fn page_buttons_keep_the_filter() {
        let pagination = BlogPagination {
            total_blogs: 95,
            total_pages: 10,
            current_page: 5,
            limit: 10,
        };
        let filter = AdminBlogFilter {
            page: 5,
            tag: Some("travel".into()),
            search: None,
        };
        let bindings = blog_list_bindings(&[], &pagination, &filter);
        assert!(bindings.contains(&Binding::click(
            "page-10",
            Action::AdminNavigate {
                page: 10,
                tag: Some("travel".into()),
                search: None,
            }
        )));
        assert!(!bindings.iter().any(|b| b.element_id == "page-3"));

        let html = blog_list(&[], &pagination, &filter, Utc::now()).into_string();
        assert!(html.contains(r#"<option value="travel" selected>travel</option>"#));
        assert_eq!(html.matches("…").count(), 2);
    }
}
