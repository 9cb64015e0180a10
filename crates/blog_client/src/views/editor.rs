//! crates/blog_client/src/views/editor.rs
//!
//! The two editor screens: writing the blog, then describing and tagging it
//! before it goes out. Both read everything from the draft in the context.

use blog_core::validation::{DESCRIPTION_LIMIT, TAG_LIMIT};
use blog_core::BlogDraft;
use maud::{html, Markup};

use crate::bindings::{Action, Binding, EventKind};
use crate::views::components::tag_chip;

pub const BANNER_PLACEHOLDER: &str = "/blog-banner.png";
pub const TAGS_CONTAINER: &str = "tags-container";
pub const CHAR_COUNT: &str = "char-count";
pub const TAGS_LEFT: &str = "tags-left";
pub const BANNER_WRAPPER: &str = "banner-wrapper";

/// Content of the banner wrapper; clicking it opens the file picker.
pub fn banner_image(src: &str) -> Markup {
    html! {
        label for="banner-input" {
            img #blog-banner src=(src) alt="Banner" class="z-20";
        }
    }
}

pub fn editor(draft: &BlogDraft) -> Markup {
    let banner = if draft.banner.is_empty() {
        BANNER_PLACEHOLDER
    } else {
        draft.banner.as_str()
    };
    let title = if draft.title.is_empty() {
        "New Blog"
    } else {
        draft.title.as_str()
    };
    let content = serde_json::to_string(&draft.content).unwrap_or_default();

    html! {
        nav class="navbar" {
            a href="#/" class="flex-none w-10 font-gelasio font-semibold" { "Vietnews" }
            p class="max-md:hidden text-black line-clamp-1 w-full" { (title) }
            div class="flex gap-4 ml-auto" {
                button #publish-btn class="btn-dark py-2" { "Publish" }
                button #save-draft-btn class="btn-light py-2" { "Save Draft" }
            }
        }
        section {
            div class="mx-auto max-w-[900px] w-full" {
                div id=(BANNER_WRAPPER) class="relative aspect-video bg-white border-4 border-gray-200 hover:opacity-80" {
                    (banner_image(banner))
                }
                input #banner-input type="file" accept=".png, .jpg, .jpeg" hidden;
                textarea #title-input placeholder="Blog Title"
                    class="text-4xl font-medium w-full h-20 outline-none resize-none mt-10 leading-tight placeholder:opacity-40" {
                    (draft.title)
                }
                hr class="w-full opacity-10 my-5";
                div #editorjs class="font-gelasio" data-content=(content) {}
            }
        }
    }
}

pub fn editor_bindings() -> Vec<Binding> {
    vec![
        Binding::new("banner-input", EventKind::Change, Action::UploadBanner),
        Binding::new("title-input", EventKind::Input, Action::EditTitle),
        Binding::new("editorjs", EventKind::Change, Action::EditContent),
        Binding::click("publish-btn", Action::ProceedToPublish),
        Binding::click("save-draft-btn", Action::SaveDraft),
    ]
}

pub fn publish_form(draft: &BlogDraft) -> Markup {
    html! {
        section class="w-screen min-h-screen grid items-center lg:grid-cols-2 py-16 lg:gap-4" {
            button #close-publish class="w-12 h-12 absolute right-[5vw] z-10 top-[5%] lg:top-[10%]" {
                i class="fa-solid fa-xmark" {}
            }
            div class="max-w-[550px] center" {
                p class="text-gray-600 mb-1" { "Preview" }
                div class="w-full aspect-video rounded-lg overflow-hidden bg-gray-100 mt-4" {
                    img src=(draft.banner) alt="Banner";
                }
                h1 class="text-4xl font-medium mt-2 leading-tight line-clamp-2" { (draft.title) }
                p class="font-gelasio line-clamp-2 text-xl leading-7 mt-4" { (draft.des) }
            }
            div class="border-gray-200 lg:border-1 lg:pl-8" {
                p class="text-gray-600 mb-2 mt-9" { "Blog Title" }
                input type="text" placeholder="Blog Title" value=(draft.title) class="input-box pl-4" disabled;
                p class="text-gray-600 mb-2 mt-9" { "Short description about your blog" }
                textarea #des-input maxlength=(DESCRIPTION_LIMIT) class="h-40 resize-none leading-7 input-box pl-4" {
                    (draft.des)
                }
                (char_count(&draft.des))
                p class="text-gray-600 mb-2 mt-9" { "Topics - ( Helps in searching and ranking your blog post )" }
                div class="relative input-box pl-2 py-2 pb-4" {
                    input #tag-input type="text" placeholder="Topic" class="sticky input-box bg-white top-0 left-0 pl-4 mb-3 focus:bg-white";
                    div id=(TAGS_CONTAINER) { (tag_list(&draft.tags)) }
                }
                p id=(TAGS_LEFT) class="mt-1 mb-4 text-gray-600 text-right" { (tags_left(&draft.tags)) }
                button #publish-submit class="btn-dark px-8" { "Publish" }
            }
        }
    }
}

pub fn char_count(des: &str) -> Markup {
    html! {
        p id=(CHAR_COUNT) class="mt-1 text-gray-600 text-sm text-right" { (chars_left(des)) }
    }
}

pub fn chars_left(des: &str) -> String {
    let left = DESCRIPTION_LIMIT.saturating_sub(des.chars().count());
    format!("{} characters left", left)
}

pub fn tags_left(tags: &[String]) -> String {
    format!("{} Tags left", TAG_LIMIT.saturating_sub(tags.len()))
}

pub fn tag_list(tags: &[String]) -> Markup {
    html! {
        @for (index, tag) in tags.iter().enumerate() {
            (tag_chip(tag, index))
        }
    }
}

pub fn publish_bindings(draft: &BlogDraft) -> Vec<Binding> {
    let mut bindings = vec![
        Binding::click("close-publish", Action::BackToEditor),
        Binding::new("des-input", EventKind::Input, Action::EditDescription),
        Binding::new("tag-input", EventKind::KeyDown, Action::AddTag),
        Binding::click("publish-submit", Action::Publish),
    ];
    bindings.extend(tag_bindings(&draft.tags));
    bindings
}

pub fn tag_bindings(tags: &[String]) -> Vec<Binding> {
    tags.iter()
        .enumerate()
        .map(|(index, tag)| {
            Binding::click(format!("remove-tag-{}", index), Action::RemoveTag(tag.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_falls_back_to_placeholders() {
        let html = editor(&BlogDraft::default()).into_string();
        assert!(html.contains(BANNER_PLACEHOLDER));
        assert!(html.contains("New Blog"));
        assert!(html.contains(r#"data-content="{&quot;blocks&quot;:[]}""#));
    }

    #[test]
    fn char_count_counts_down_from_the_limit() {
        assert!(char_count("").into_string().contains("200 characters left"));
        assert!(char_count("héllo").into_string().contains("195 characters left"));
    }

    #[test]
    fn each_tag_gets_a_remove_binding() {
        let draft = BlogDraft {
            tags: vec!["travel".into(), "food".into()],
            ..BlogDraft::default()
        };
        let bindings = publish_bindings(&draft);
        assert!(bindings.contains(&Binding::click(
            "remove-tag-1",
            Action::RemoveTag("food".into())
        )));
        assert!(publish_form(&draft).into_string().contains("8 Tags left"));
    }
}
