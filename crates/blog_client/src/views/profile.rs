//! crates/blog_client/src/views/profile.rs

use blog_core::validation::BIO_LIMIT;
use blog_core::{Blog, SocialLinks, User};
use chrono::{DateTime, Utc};
use maud::{html, Markup};

use crate::bindings::{Action, Binding, EventKind};
use crate::views::components::{in_page_nav, input_box, nodata, tab_bindings, InputBox, DEFAULT_AVATAR};
use crate::views::home::blog_list;

pub const BIO_COUNT: &str = "bio-count";
pub const PROFILE_IMG: &str = "profile-img";

const SOCIAL_PLATFORMS: [&str; 6] = ["youtube", "instagram", "facebook", "twitter", "github", "website"];

fn avatar(user: &User) -> &str {
    if user.personal_info.profile_img.is_empty() {
        DEFAULT_AVATAR
    } else {
        &user.personal_info.profile_img
    }
}

fn about(user: &User) -> Markup {
    html! {
        div class="md:w-[90%] md:mt-7" {
            p class="text-xl leading-7" {
                @if user.personal_info.bio.is_empty() {
                    "Nothing to read here"
                } @else {
                    (user.personal_info.bio)
                }
            }
            div class="flex gap-x-7 gap-y-2 flex-wrap my-7 items-center text-gray-600" {
                @for (platform, url) in user.social_links.entries() {
                    a href=(url) target="_blank" rel="noopener" {
                        i class={ "fa-brands fa-" (platform) " text-2xl hover:text-black" } {}
                    }
                }
            }
            p class="text-xl leading-7 text-gray-600" {
                "Joined on " (user.joined_at.format("%-d %b %Y").to_string())
            }
        }
    }
}

/// `drafts` is only given when the viewer owns the profile.
pub fn profile_page(
    user: &User,
    published: &[Blog],
    drafts: Option<&[Blog]>,
    now: DateTime<Utc>,
) -> Markup {
    let info = &user.personal_info;
    let tabs = profile_tabs(drafts.is_some());

    html! {
        section class="h-cover md:flex flex-row-reverse items-start gap-5 min-[1100px]:gap-12" {
            div class="flex flex-col max-md:items-center gap-5 min-w-[250px] md:w-[50%] md:pl-8 md:border-l border-gray-200 md:sticky md:top-[100px] md:py-10" {
                img src=(avatar(user)) alt=(info.fullname) class="w-48 h-48 bg-gray-100 rounded-full md:w-32 md:h-32";
                h1 class="text-2xl font-medium" { "@" (info.username) }
                p class="text-xl capitalize h-6" { (info.fullname) }
                p {
                    (user.account_info.total_posts) " Blogs - "
                    (user.account_info.total_reads) " Reads"
                }
                @if drafts.is_some() {
                    a href={ "#/edit-profile/" (info.username) } class="btn-light rounded-md" { "Edit Profile" }
                }
                div class="max-md:hidden" { (about(user)) }
            }
            div class="max-md:mt-12 w-full" {
                (in_page_nav(&tabs, "published"))
                div #content-published { (blog_list(published, now)) }
                @if let Some(drafts) = drafts {
                    div #content-drafts class="hidden" {
                        @if drafts.is_empty() {
                            (nodata("No draft blogs"))
                        } @else {
                            @for draft in drafts {
                                div class="flex gap-5 border-b border-gray-200 mb-6 pb-6" {
                                    div class="w-full" {
                                        h1 class="blog-title mb-3" { (draft.title) }
                                        p class="line-clamp-2 font-gelasio" {
                                            @if draft.des.is_empty() { "No description" } @else { (draft.des) }
                                        }
                                        a href={ "#/editor/" (draft.blog_id) } class="pr-4 py-2 underline" { "Edit" }
                                    }
                                }
                            }
                        }
                    }
                }
                div #content-about class="hidden md:hidden" { (about(user)) }
            }
        }
    }
}

fn profile_tabs(owner: bool) -> Vec<(&'static str, &'static str)> {
    let mut tabs = vec![("published", "Blogs Published")];
    if owner {
        tabs.push(("drafts", "Drafts"));
    }
    tabs.push(("about", "About"));
    tabs
}

pub fn profile_bindings(owner: bool) -> Vec<Binding> {
    tab_bindings(&profile_tabs(owner))
}

//=========================================================================================
// Edit profile
//=========================================================================================

pub fn edit_profile(user: &User) -> Markup {
    let info = &user.personal_info;
    html! {
        form #editProfileForm {
            h1 class="max-md:hidden" { "Edit Profile" }
            div class="flex flex-col lg:flex-row items-start py-10 gap-8 lg:gap-10" {
                div class="max-lg:center mb-5" {
                    label id=(PROFILE_IMG) for="profile-img-input" class="relative block w-48 h-48 bg-gray-100 rounded-full overflow-hidden" {
                        (profile_image(avatar(user)))
                    }
                    input #profile-img-input type="file" accept=".jpeg, .png, .jpg" hidden;
                }
                div class="w-full" {
                    div class="grid grid-cols-1 md:grid-cols-2 md:gap-5" {
                        (input_box(&InputBox { name: "fullname", kind: "text", id: "fullname", value: &info.fullname, placeholder: "Full Name", icon: "fa-solid fa-user" }))
                        (input_box(&InputBox { name: "email", kind: "email", id: "email", value: &info.email, placeholder: "Email", icon: "fa-solid fa-envelope" }))
                    }
                    (input_box(&InputBox { name: "username", kind: "text", id: "username", value: &info.username, placeholder: "Username", icon: "fa-solid fa-at" }))
                    p class="text-gray-600 -mt-3" { "Username will be used to search user and will be visible to all users" }
                    textarea #bio name="bio" maxlength=(BIO_LIMIT) class="input-box h-64 lg:h-40 resize-none leading-7 mt-5 pl-5" placeholder="Bio" {
                        (info.bio)
                    }
                    (bio_count(&info.bio))
                    p class="my-6 text-gray-600" { "Add your social handles below" }
                    (social_inputs(&user.social_links))
                    button class="btn-dark w-auto px-10" type="submit" { "Update" }
                }
            }
        }
    }
}

fn social_inputs(links: &SocialLinks) -> Markup {
    let current = |platform: &str| -> String {
        links
            .entries()
            .into_iter()
            .find(|(name, _)| *name == platform)
            .map(|(_, url)| url.to_string())
            .unwrap_or_default()
    };
    html! {
        div class="md:grid md:grid-cols-2 gap-x-6" {
            @for platform in SOCIAL_PLATFORMS {
                @let value = current(platform);
                @let icon = if platform == "website" { "fa-solid fa-globe".to_string() } else { format!("fa-brands fa-{}", platform) };
                (input_box(&InputBox { name: platform, kind: "text", id: platform, value: &value, placeholder: "https://", icon: &icon }))
            }
        }
    }
}

pub fn profile_image(src: &str) -> Markup {
    html! {
        img src=(src) alt="Profile image" class="w-full h-full object-cover";
    }
}

pub fn bio_count(bio: &str) -> Markup {
    html! {
        p id=(BIO_COUNT) class="mt-1 text-gray-600" { (bio_left(bio)) }
    }
}

pub fn bio_left(bio: &str) -> String {
    format!("{} characters left", BIO_LIMIT.saturating_sub(bio.chars().count()))
}

pub fn edit_profile_bindings() -> Vec<Binding> {
    vec![
        Binding::submit("editProfileForm", Action::SubmitProfile),
        Binding::new("bio", EventKind::Input, Action::EditBio),
        Binding::new("profile-img-input", EventKind::Change, Action::UploadProfileImage),
    ]
}

/// Reads the social link inputs out of a submitted form.
pub fn social_links_from(values: impl Fn(&str) -> String) -> SocialLinks {
    SocialLinks {
        youtube: values("youtube"),
        instagram: values("instagram"),
        facebook: values("facebook"),
        twitter: values("twitter"),
        github: values("github"),
        website: values("website"),
    }
}
