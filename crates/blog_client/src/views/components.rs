//! crates/blog_client/src/views/components.rs
//!
//! Small building blocks shared by the page views.

use blog_core::{AuthorInfo, Blog};
use chrono::{DateTime, Utc};
use maud::{html, Markup};

use crate::bindings::{Action, Binding};
use crate::context::UserContext;

pub const DEFAULT_AVATAR: &str = "/default-avatar.png";

//=========================================================================================
// Navbar
//=========================================================================================

pub fn navbar(user: &UserContext) -> Markup {
    html! {
        nav class="navbar" {
            div class="pr-10 flex items-center justify-center" {
                a class="font-gelasio font-semibold text-xl" href="#/" { "Vietnews" }
            }
            div #searchBox data-search-box class="hide md:show absolute bg-white w-full left-0 top-full border-b border-gray-200 py-4 px-[5vw] md:border-0 md:block md:relative md:inset-0 md:p-0 md:w-auto" {
                input #searchInput type="text" placeholder="Search"
                    class="w-full md:w-auto bg-gray-100 p-4 pl-6 pr-[12%] md:pr-6 rounded-full placeholder:text-gray-500 md:pl-12";
            }
            div class="flex items-center gap-3 md:gap-6 ml-auto" {
                button #toggleSearchBtn class="md:hidden bg-gray-50 w-12 h-12 rounded-full flex items-center justify-center" {
                    i class="fa-solid fa-magnifying-glass" {}
                }
                div #editorBtn {
                    a href="#/editor" class="md:flex gap-2 link" {
                        i class="fa-solid fa-pen-to-square" {}
                        "Write"
                    }
                }
                @if user.is_signed_in() {
                    div class="relative" {
                        button #profileToggleBtn class="w-10 h-10 mt-1" {
                            img class="w-full h-full object-cover rounded-full"
                                src=(user.profile_img.as_deref().unwrap_or(DEFAULT_AVATAR))
                                alt="Profile";
                        }
                        (user_dropdown(user.username.as_deref().unwrap_or_default()))
                    }
                } @else {
                    a href="#/login" class="btn-dark !py-2" { "Sign In" }
                    a href="#/register" class="btn-light !py-2" { "Sign Up" }
                }
            }
        }
    }
}

fn user_dropdown(username: &str) -> Markup {
    html! {
        div #userDropdown class="bg-white absolute right-0 border border-gray-200 w-60 duration-200 hidden z-50" {
            a href="#/editor" {
                div class="flex gap-2 link md:hidden pl-8 py-4" {
                    i class="fa-solid fa-pen-to-square" {}
                    p { "Write" }
                }
            }
            a href={ "#/profile/" (username) } {
                div class="link pl-8 py-4" { "Profile" }
            }
            a href={ "#/edit-profile/" (username) } {
                div class="link pl-8 py-4" { "Settings" }
            }
            button #logoutBtn class="text-left hover:bg-gray-100 w-full pl-8 py-4 border-t border-gray-200" {
                h1 class="font-bold text-xl" { "Logout" }
                p class="text-gray-600" { "@" (username) }
            }
        }
    }
}

pub fn navbar_bindings(user: &UserContext) -> Vec<Binding> {
    let mut bindings = vec![Binding::click(
        "toggleSearchBtn",
        Action::Toggle {
            element_id: "searchBox".into(),
            class: "hide".into(),
        },
    )];
    if user.is_signed_in() {
        bindings.push(Binding::click(
            "profileToggleBtn",
            Action::Toggle {
                element_id: "userDropdown".into(),
                class: "hidden".into(),
            },
        ));
        bindings.push(Binding::click("logoutBtn", Action::Logout));
    }
    bindings
}

//=========================================================================================
// Form inputs
//=========================================================================================

pub struct InputBox<'a> {
    pub name: &'a str,
    pub kind: &'a str,
    pub id: &'a str,
    pub value: &'a str,
    pub placeholder: &'a str,
    pub icon: &'a str,
}

pub fn input_box(input: &InputBox<'_>) -> Markup {
    html! {
        div class="relative w-full mb-4" {
            input name=(input.name) type=(input.kind) placeholder=(input.placeholder)
                value=(input.value) id=(input.id) class="input-box";
            i class={ (input.icon) " input-icon" } {}
            @if input.kind == "password" {
                i id={ "toggle-" (input.id) }
                    class="fa-solid fa-eye-slash input-icon toggle-password left-auto right-4 cursor-pointer"
                    data-target=(input.id) {}
            }
        }
    }
}

/// Shows or hides the characters of the password input `input_id`.
pub fn password_toggle(input_id: &str) -> Binding {
    Binding::click(
        format!("toggle-{}", input_id),
        Action::Toggle {
            element_id: input_id.to_string(),
            class: "password-visible".into(),
        },
    )
}

//=========================================================================================
// Blog cards
//=========================================================================================

fn author_or_unknown(author: &AuthorInfo) -> AuthorInfo {
    if author.username.is_empty() {
        AuthorInfo {
            fullname: "Unknown".into(),
            username: "anonymous".into(),
            profile_img: DEFAULT_AVATAR.into(),
        }
    } else {
        author.clone()
    }
}

fn published(blog: &Blog, now: DateTime<Utc>) -> String {
    blog.published_at
        .map(|at| time_ago(at, now))
        .unwrap_or_default()
}

pub fn blog_card(blog: &Blog, now: DateTime<Utc>) -> Markup {
    let author = author_or_unknown(&blog.author.personal_info);
    html! {
        div class="flex gap-8 items-center border-b border-gray-200 pb-5 mb-4" {
            div class="w-full" {
                div class="flex gap-3 items-center mb-7" {
                    a href={ "#/profile/" (author.username) } class="flex gap-3 items-center" {
                        img src=(author.profile_img) alt=(author.fullname) class="w-6 h-6 rounded-full";
                        p class="line-clamp-1" {
                            span { (author.fullname) }
                            span { " @" (author.username) }
                        }
                    }
                    p class="min-w-fit" { (published(blog, now)) }
                }
                a href={ "#/blog/" (blog.blog_id) } class="no-underline text-gray-900" {
                    h1 class="blog-title" { (blog.title) }
                    p class="my-3 text-xl font-gelasio leading-7 line-clamp-2" { (blog.des) }
                }
                div class="flex gap-4 mt-7" {
                    @if let Some(tag) = blog.tags.first() {
                        span class="btn-light py-1 px-4" { (tag) }
                    }
                    span class="ml-3 flex items-center gap-2 text-gray-600" {
                        i class="fa-regular fa-heart" {}
                        p { (blog.activity.total_likes) }
                    }
                }
            }
            div class="h-28 aspect-square bg-gray-50" {
                a href={ "#/blog/" (blog.blog_id) } {
                    img src=(blog.banner) alt="Blog banner" class="w-full h-full aspect-square object-cover";
                }
            }
        }
    }
}

pub fn minimal_blog_card(blog: &Blog, index: usize, now: DateTime<Utc>) -> Markup {
    let author = author_or_unknown(&blog.author.personal_info);
    html! {
        a href={ "#/blog/" (blog.blog_id) } class="flex gap-5 mb-4 items-center" {
            h1 class="blog-index" { (format!("{:02}", index + 1)) }
            div {
                div class="flex gap-2 items-center mb-2 text-sm text-gray-600" {
                    img src=(author.profile_img) class="w-6 h-6 rounded-full" alt=(author.fullname);
                    p class="line-clamp-1" { (author.fullname) " @" (author.username) }
                    p class="min-w-fit" { (published(blog, now)) }
                }
                h1 class="blog-title" { (blog.title) }
            }
        }
    }
}

//=========================================================================================
// Misc
//=========================================================================================

/// A removable tag chip in the publish form.
pub fn tag_chip(tag: &str, index: usize) -> Markup {
    html! {
        div class="tag-item relative p-2 mt-2 mr-2 px-5 bg-white rounded-full inline-block pr-8" {
            p class="outline-none" { (tag) }
            button id={ "remove-tag-" (index) } class="tag-delete-btn mt-[2px] rounded-full absolute right-3 top-1/2 -translate-y-1/2" {
                i class="fa-solid fa-xmark text-sm pointer-events-none" {}
            }
        }
    }
}

pub fn nodata(message: &str) -> Markup {
    html! {
        div class="text-center w-full p-4 rounded-full bg-gray-50 mt-4" {
            p { (message) }
        }
    }
}

/// Tab strip. Each tab's panel is `content-{key}`.
pub fn in_page_nav(tabs: &[(&str, &str)], active: &str) -> Markup {
    html! {
        div class="relative mb-8 bg-white border-b border-gray-200 flex flex-nowrap overflow-x-auto" {
            @for (key, label) in tabs {
                @let state = if *key == active { "text-black border-b-2 border-black" } else { "text-gray-500" };
                button id={ "tab-" (key) } class={ "p-4 px-5 capitalize " (state) } {
                    (label)
                }
            }
        }
    }
}

pub fn tab_bindings(tabs: &[(&str, &str)]) -> Vec<Binding> {
    tabs.iter()
        .map(|(key, _)| {
            Binding::click(
                format!("tab-{}", key),
                Action::Toggle {
                    element_id: format!("content-{}", key),
                    class: "hidden".into(),
                },
            )
        })
        .collect()
}

/// "3 hours ago" style relative time.
pub fn time_ago(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    const STEPS: [(f64, &str); 7] = [
        (60.0, "second"),
        (60.0, "minute"),
        (24.0, "hour"),
        (7.0, "day"),
        (4.34524, "week"),
        (12.0, "month"),
        (f64::INFINITY, "year"),
    ];

    let mut value = (now - published).num_seconds().max(0) as f64;
    let mut unit = 0;
    while unit < STEPS.len() - 1 && value >= STEPS[unit].0 {
        value /= STEPS[unit].0;
        unit += 1;
    }

    let count = value.floor() as i64;
    let plural = if count == 1 { "" } else { "s" };
    format!("{} {}{} ago", count, STEPS[unit].1, plural)
}
