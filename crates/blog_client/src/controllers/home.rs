//! crates/blog_client/src/controllers/home.rs

use chrono::Utc;

use crate::controllers::{Deps, Outcome, View};
use crate::error::ClientResult;
use crate::views::home::{self as home_view, CATEGORY_CONTAINER};

pub async fn render(deps: &Deps) -> ClientResult<View> {
    let (latest, trending) = tokio::join!(deps.blogs.latest(), deps.blogs.trending());
    let body = home_view::home(&latest?, &trending?, Utc::now());
    Ok(View::new(body, home_view::home_bindings()))
}

pub async fn load_category(deps: &Deps, category: &str) -> ClientResult<Outcome> {
    let blogs = deps.blogs.by_tag(category).await?;
    let markup = home_view::category_blogs(category, &blogs, Utc::now());
    deps.host.patch(CATEGORY_CONTAINER, &markup.into_string());
    Ok(Outcome::Done)
}
