//! crates/blog_client/src/router.rs
//!
//! Hash-fragment routing. The route table is static and ordered; the first
//! pattern that matches the path wins and decides both the page and the
//! layout it is mounted in.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use url::form_urlencoded;

use crate::layout::Layout;
use crate::services::AdminBlogFilter;

/// A parsed location fragment such as `#/admin/blogs?page=2`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: HashMap<String, String>,
}

impl Location {
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.trim().trim_start_matches('#');
        let (path, query) = match fragment.split_once('?') {
            Some((path, query)) => (path, query),
            None => (fragment, ""),
        };
        let path = if path.is_empty() { "/" } else { path };

        Self {
            path: path.to_string(),
            query: form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }
}

/// Named captures from the path plus the query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: HashMap<String, String>,
}

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    fn get_owned(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    fn non_empty(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Home,
    Login,
    Register,
    ForgotPassword,
    ResetPassword { token: String },
    /// `resume` keeps the draft in the context instead of reloading it.
    Editor { blog_id: Option<String>, resume: bool },
    Publish,
    BlogDetail { blog_id: String },
    Profile { username: String },
    EditProfile { username: String },
    AdminDashboard,
    AdminBlogs(AdminBlogFilter),
    AdminBlog { blog_id: String },
    NotFound,
}

impl Page {
    pub fn is_editor(&self) -> bool {
        matches!(self, Page::Editor { .. })
    }
}

struct RouteEntry {
    pattern: Regex,
    layout: Layout,
    build: fn(&Params) -> Page,
}

fn route(pattern: &str, layout: Layout, build: fn(&Params) -> Page) -> RouteEntry {
    RouteEntry {
        pattern: Regex::new(pattern).expect("route pattern compiles"),
        layout,
        build,
    }
}

static ROUTES: LazyLock<Vec<RouteEntry>> = LazyLock::new(|| {
    vec![
        route(r"^/$", Layout::Main, |_| Page::Home),
        route(r"^/login$", Layout::Main, |_| Page::Login),
        route(r"^/register$", Layout::Main, |_| Page::Register),
        route(r"^/forgot-password$", Layout::Main, |_| Page::ForgotPassword),
        route(r"^/reset-password$", Layout::Main, |p| Page::ResetPassword {
            token: p.get_owned("token"),
        }),
        route(r"^/editor$", Layout::NoNav, |p| Page::Editor {
            blog_id: None,
            resume: p.get("resume").is_some(),
        }),
        route(r"^/editor/(?P<id>[A-Za-z0-9\-_]+)$", Layout::NoNav, |p| {
            Page::Editor {
                blog_id: p.non_empty("id"),
                resume: p.get("resume").is_some(),
            }
        }),
        route(r"^/publish$", Layout::NoNav, |_| Page::Publish),
        route(r"^/blog/(?P<id>[^/]+)$", Layout::Main, |p| Page::BlogDetail {
            blog_id: p.get_owned("id"),
        }),
        route(r"^/profile/(?P<name>[^/]+)$", Layout::Main, |p| Page::Profile {
            username: p.get_owned("name"),
        }),
        route(r"^/edit-profile/(?P<name>[^/]+)$", Layout::Main, |p| {
            Page::EditProfile {
                username: p.get_owned("name"),
            }
        }),
        route(r"^/admin(/dashboard)?$", Layout::Admin, |_| Page::AdminDashboard),
        route(r"^/admin/blogs$", Layout::Admin, |p| {
            Page::AdminBlogs(AdminBlogFilter {
                page: p.get("page").and_then(|v| v.parse().ok()).unwrap_or(1).max(1),
                tag: p.non_empty("tag"),
                search: p.non_empty("search"),
            })
        }),
        route(r"^/admin/blogs/(?P<id>[^/]+)$", Layout::Admin, |p| {
            Page::AdminBlog {
                blog_id: p.get_owned("id"),
            }
        }),
    ]
});

/// Resolves a fragment to the page it shows and the layout it is mounted in.
/// Unknown paths resolve to `Page::NotFound` in the main layout.
pub fn resolve(fragment: &str) -> (Page, Layout) {
    let location = Location::parse(fragment);

    for entry in ROUTES.iter() {
        let Some(captures) = entry.pattern.captures(&location.path) else {
            continue;
        };

        let mut values = location.query.clone();
        for name in entry.pattern.capture_names().flatten() {
            if let Some(value) = captures.name(name) {
                let decoded = form_urlencoded::parse(format!("v={}", value.as_str()).as_bytes())
                    .next()
                    .map(|(_, v)| v.into_owned())
                    .unwrap_or_default();
                values.insert(name.to_string(), decoded);
            }
        }
        return ((entry.build)(&Params { values }), entry.layout);
    }

    (Page::NotFound, Layout::Main)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn location_defaults_to_root() {
        assert_eq!(Location::parse("").path, "/");
        assert_eq!(Location::parse("#").path, "/");
        let location = Location::parse("#/reset-password?token=abc%20d");
        assert_eq!(location.path, "/reset-password");
        assert_eq!(location.query["token"], "abc d");
    }

    #[test]
    fn captures_become_page_fields() {
        assert_eq!(
            resolve("#/blog/hello-world"),
            (
                Page::BlogDetail {
                    blog_id: "hello-world".into()
                },
                Layout::Main
            )
        );
        assert_eq!(
            resolve("#/editor/abc-123").0,
            Page::Editor {
                blog_id: Some("abc-123".into()),
                resume: false,
            }
        );
        assert_eq!(
            resolve("#/editor?resume=1"),
            (
                Page::Editor {
                    blog_id: None,
                    resume: true
                },
                Layout::NoNav
            )
        );
        assert_eq!(
            resolve("#/profile/s%C3%A1m").0,
            Page::Profile {
                username: "sám".into()
            }
        );
    }

    #[test]
    fn admin_routes_share_a_prefix() {
        assert_eq!(resolve("#/admin"), (Page::AdminDashboard, Layout::Admin));
        assert_eq!(resolve("#/admin/dashboard").0, Page::AdminDashboard);
        assert_eq!(
            resolve("#/admin/blogs?page=3&tag=travel&search=").0,
            Page::AdminBlogs(AdminBlogFilter {
                page: 3,
                tag: Some("travel".into()),
                search: None,
            })
        );
        assert_eq!(
            resolve("#/admin/blogs?page=zero").0,
            Page::AdminBlogs(AdminBlogFilter {
                page: 1,
                ..AdminBlogFilter::default()
            })
        );
        assert_eq!(
            resolve("#/admin/blogs/x1").0,
            Page::AdminBlog {
                blog_id: "x1".into()
            }
        );
    }

    #[test]
    fn unknown_paths_are_not_found_in_main_layout() {
        assert_eq!(resolve("#/nope"), (Page::NotFound, Layout::Main));
        assert_eq!(resolve("#/blog/"), (Page::NotFound, Layout::Main));
        assert_eq!(resolve("#/editor/a/b"), (Page::NotFound, Layout::Main));
    }
}
