//! crates/blog_client/src/views/blog.rs
//!
//! The public page of one blog. The interaction bar lives in its own
//! container so like state can be patched in after the page is mounted.

use blog_core::Blog;
use maud::{html, Markup};
use url::form_urlencoded;

use crate::bindings::{Action, Binding};
use crate::views::blocks::render_content;
use crate::views::components::DEFAULT_AVATAR;

pub const INTERACTION_CONTAINER: &str = "blog-interaction";

pub fn blog_page(blog: &Blog, interaction: Markup) -> Markup {
    let author = &blog.author.personal_info;
    let avatar = if author.profile_img.is_empty() {
        DEFAULT_AVATAR
    } else {
        author.profile_img.as_str()
    };

    html! {
        div class="max-w-[900px] center py-10 max-lg:px-[5vw]" {
            img src=(blog.banner) alt="Blog banner" class="aspect-video";
            div class="mt-12" {
                h2 class="text-4xl font-bold" { (blog.title) }
                div class="flex max-sm:flex-col justify-between my-8" {
                    div class="flex gap-5 items-start" {
                        img src=(avatar) alt=(author.fullname) class="w-12 h-12 rounded-full";
                        p class="capitalize" {
                            (author.fullname)
                            br;
                            "@"
                            a href={ "#/profile/" (author.username) } class="underline" { (author.username) }
                        }
                    }
                    @if let Some(published) = blog.published_at {
                        p class="text-gray-600 opacity-75 max-sm:mt-6 max-sm:ml-12 max-sm:pl-5" {
                            "Published on " (published.format("%-d %b %Y").to_string())
                        }
                    }
                }
            }
            div id=(INTERACTION_CONTAINER) {
                (interaction)
            }
            div class="my-12 font-gelasio blog-page-content" {
                (render_content(&blog.content))
            }
        }
    }
}

/// Like toggle, read count, author edit link and share link.
pub fn interaction_bar(blog: &Blog, liked: bool, is_author: bool, share_url: &str) -> Markup {
    let tweet: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("text", &format!("Read {}", blog.title))
        .append_pair("url", share_url)
        .finish();
    let (button_class, heart_class) = if liked {
        ("bg-red/20 text-red", "fa-solid fa-heart")
    } else {
        ("bg-gray-100", "fa-regular fa-heart")
    };

    html! {
        hr class="border-gray-200 my-2";
        div class="flex gap-6 justify-between" {
            div class="flex gap-3 items-center" {
                button #like-btn class={ "w-10 h-10 rounded-full flex items-center justify-center " (button_class) } {
                    i class=(heart_class) {}
                }
                p #like-count class="text-xl text-gray-600" { (blog.activity.total_likes) }
                span class="ml-4 flex items-center gap-2 text-gray-600" {
                    i class="fa-regular fa-eye" {}
                    (blog.activity.total_reads)
                }
            }
            div class="flex gap-6 items-center" {
                @if is_author {
                    a #edit-link href={ "#/editor/" (blog.blog_id) } class="underline hover:text-purple" { "Edit" }
                }
                a #share-twitter href={ "https://twitter.com/intent/tweet?" (tweet) } target="_blank" rel="noopener" {
                    i class="fa-brands fa-x-twitter text-xl hover:text-twitter" {}
                }
            }
        }
        hr class="border-gray-200 my-2";
    }
}

pub fn interaction_bindings() -> Vec<Binding> {
    vec![Binding::click("like-btn", Action::ToggleLike)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::{Activity, Content, ContentBlock};

    fn blog() -> Blog {
        Blog {
            blog_id: "a-trip".into(),
            title: "A trip".into(),
            activity: Activity {
                total_likes: 4,
                total_reads: 20,
                ..Activity::default()
            },
            content: Content::from_blocks(vec![ContentBlock::paragraph("Day one")]),
            ..Blog::default()
        }
    }

    #[test]
    fn edit_link_is_only_for_the_author() {
        let blog = blog();
        assert!(interaction_bar(&blog, false, true, "u").into_string().contains("edit-link"));
        assert!(!interaction_bar(&blog, false, false, "u").into_string().contains("edit-link"));
    }

    #[test]
    fn share_link_is_url_encoded() {
        let html = interaction_bar(&blog(), false, false, "https://blog.local/#/blog/a-trip")
            .into_string();
        assert!(html.contains("text=Read+A+trip"));
        assert!(html.contains("url=https%3A%2F%2Fblog.local%2F%23%2Fblog%2Fa-trip"));
    }

    #[test]
    fn page_renders_blocks_inside_the_layout() {
        let blog = blog();
        let html = blog_page(&blog, interaction_bar(&blog, true, false, "u")).into_string();
        assert!(html.contains("Day one"));
        assert!(html.contains(r#"id="blog-interaction""#));
        assert!(html.contains("fa-solid fa-heart"));
    }
}
