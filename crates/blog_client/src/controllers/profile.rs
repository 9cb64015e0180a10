//! crates/blog_client/src/controllers/profile.rs

use blog_core::ProfileUpdate;
use chrono::Utc;

use crate::bindings::UiEvent;
use crate::controllers::{or_placeholder, Deps, Outcome, View};
use crate::error::{ClientError, ClientResult};
use crate::views;
use crate::views::profile::{self as profile_view, BIO_COUNT, PROFILE_IMG};

fn is_owner(deps: &Deps, username: &str) -> bool {
    deps.context.username().as_deref() == Some(username)
}

pub async fn render(deps: &Deps, username: &str) -> ClientResult<View> {
    let result = async {
        let user = deps.users.profile(username).await?;
        let owner = is_owner(deps, username);
        let published = deps.blogs.by_username(username).await?;
        let drafts = if owner {
            Some(deps.blogs.drafts_by_username(username).await?)
        } else {
            None
        };

        let body = profile_view::profile_page(&user, &published, drafts.as_deref(), Utc::now());
        Ok::<_, ClientError>(View::new(body, profile_view::profile_bindings(owner)))
    }
    .await;
    or_placeholder(result, "User not found")
}

pub async fn render_edit(deps: &Deps, username: &str) -> ClientResult<View> {
    if !is_owner(deps, username) {
        return Ok(View::inert(views::placeholder(
            "You can only edit your own profile",
        )));
    }
    let result = async {
        let user = deps.users.profile(username).await?;
        Ok::<_, ClientError>(View::new(
            profile_view::edit_profile(&user),
            profile_view::edit_profile_bindings(),
        ))
    }
    .await;
    or_placeholder(result, "User not found")
}

pub fn edit_bio(deps: &Deps, event: &UiEvent) -> ClientResult<Outcome> {
    deps.host
        .patch(BIO_COUNT, &profile_view::bio_left(&event.value("bio")));
    Ok(Outcome::Done)
}

pub async fn submit(deps: &Deps, event: &UiEvent) -> ClientResult<Outcome> {
    let update = ProfileUpdate {
        username: event.value("username"),
        bio: event.value("bio"),
        social_links: profile_view::social_links_from(|name| event.value(name)),
    };

    deps.host.loading("Updating...");
    let result = deps.users.update_profile(&update).await;
    deps.host.dismiss_loading();

    match result {
        Ok(user) => {
            let username = user.personal_info.username;
            if deps.context.username().as_deref() != Some(username.as_str()) {
                deps.context.set_username(Some(username.clone()))?;
                deps.host.navigate(&format!("/edit-profile/{}", username));
            }
            deps.host.success("Profile updated");
        }
        Err(e) => deps.report(&e, "Could not update the profile"),
    }
    Ok(Outcome::Done)
}

pub async fn upload_image(deps: &Deps, event: &UiEvent) -> ClientResult<Outcome> {
    let Some(file) = event.file.clone() else {
        return Ok(Outcome::Done);
    };

    deps.host.loading("Uploading...");
    let result = async {
        let url = deps.uploads.upload(file).await?;
        deps.users.update_profile_img(&url).await?;
        Ok::<_, ClientError>(url)
    }
    .await;
    deps.host.dismiss_loading();

    match result {
        Ok(url) => {
            deps.context.set_profile_img(Some(url.clone()))?;
            deps.host
                .patch(PROFILE_IMG, &profile_view::profile_image(&url).into_string());
            deps.host.success("Profile image updated");
        }
        Err(e) => deps.report(&e, "Image upload failed"),
    }
    Ok(Outcome::Done)
}
