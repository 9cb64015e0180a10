//! crates/blog_client/src/views/home.rs

use blog_core::Blog;
use chrono::{DateTime, Utc};
use maud::{html, Markup};

use crate::bindings::{Action, Binding};
use crate::views::components::{blog_card, in_page_nav, minimal_blog_card, nodata, tab_bindings};

pub const CATEGORIES: [&str; 6] = ["travel", "celebrities", "cooking", "programming", "phim", "game"];

/// Element that receives the blogs of the selected category.
pub const CATEGORY_CONTAINER: &str = "category-blog-container";

const TABS: [(&str, &str); 2] = [("home", "home"), ("trending", "trending blogs")];

pub fn home(latest: &[Blog], trending: &[Blog], now: DateTime<Utc>) -> Markup {
    html! {
        section class="h-cover flex justify-center gap-10" {
            div class="w-full" {
                (in_page_nav(&TABS, "home"))
                div #content-home {
                    (blog_list(latest, now))
                    div id=(CATEGORY_CONTAINER) {}
                }
                div #content-trending class="md:hidden hidden" {
                    (trending_list(trending, now))
                }
            }
            div class="min-w-[40%] lg:min-w-[400px] max-w-min border-l border-gray-200 pl-8 pt-3 max-md:hidden" {
                div class="flex flex-col gap-10" {
                    div {
                        h1 class="font-medium text-xl mb-8" { "Stories from all interests" }
                        div class="flex gap-3 flex-wrap" {
                            @for category in CATEGORIES {
                                button id={ "category-" (category) } class="tag" { (category) }
                            }
                        }
                    }
                    div {
                        h1 class="font-medium text-xl mb-8" {
                            "Trending "
                            i class="fa-solid fa-arrow-trend-up" {}
                        }
                        (trending_list(trending, now))
                    }
                }
            }
        }
    }
}

pub fn blog_list(blogs: &[Blog], now: DateTime<Utc>) -> Markup {
    html! {
        @if blogs.is_empty() {
            (nodata("No blogs published"))
        } @else {
            @for blog in blogs {
                (blog_card(blog, now))
            }
        }
    }
}

fn trending_list(blogs: &[Blog], now: DateTime<Utc>) -> Markup {
    html! {
        @if blogs.is_empty() {
            (nodata("No trending blogs"))
        } @else {
            @for (index, blog) in blogs.iter().enumerate() {
                (minimal_blog_card(blog, index, now))
            }
        }
    }
}

/// Blogs of one category, shown under the latest list.
pub fn category_blogs(category: &str, blogs: &[Blog], now: DateTime<Utc>) -> Markup {
    html! {
        h2 class="text-2xl font-medium capitalize mt-10 mb-6" { (category) }
        (blog_list(blogs, now))
    }
}

pub fn home_bindings() -> Vec<Binding> {
    let mut bindings = tab_bindings(&TABS);
    bindings.extend(CATEGORIES.iter().map(|category| {
        Binding::click(
            format!("category-{}", category),
            Action::LoadCategory(category.to_string()),
        )
    }));
    bindings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_lists_show_placeholders() {
        let html = home(&[], &[], Utc::now()).into_string();
        assert!(html.contains("No blogs published"));
        assert!(html.contains("No trending blogs"));
        assert!(html.contains(r#"id="category-blog-container""#));
    }

    #[test]
    fn every_category_has_a_button_and_binding() {
        let html = home(&[], &[], Utc::now()).into_string();
        for category in CATEGORIES {
            assert!(html.contains(&format!(r#"id="category-{}""#, category)));
        }
        assert_eq!(home_bindings().len(), CATEGORIES.len() + TABS.len());
    }
}
