//! crates/blog_client/src/services/blog.rs

use std::sync::Arc;

use blog_core::validation::check_blog;
use blog_core::{Blog, BlogDraft, BlogInput, BlogPagination};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::services::with_query;

pub const ADMIN_PAGE_SIZE: i64 = 10;

#[derive(Deserialize)]
struct BlogsResponse {
    #[serde(default)]
    blogs: Vec<Blog>,
}

#[derive(Deserialize)]
struct BlogResponse {
    blog: Blog,
}

#[derive(Deserialize)]
struct CreatedResponse {
    id: String,
}

#[derive(Deserialize)]
struct LikeResponse {
    likes_count: i64,
}

#[derive(Deserialize)]
struct LikedResponse {
    #[serde(default)]
    result: bool,
}

/// One page of the admin listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogPage {
    #[serde(default)]
    pub blogs: Vec<Blog>,
    #[serde(default)]
    pub pagination: BlogPagination,
}

/// The filter the admin listing keeps in its URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminBlogFilter {
    pub page: i64,
    pub tag: Option<String>,
    pub search: Option<String>,
}

impl AdminBlogFilter {
    /// The route fragment that shows this filter.
    pub fn fragment(&self) -> String {
        with_query(
            "/admin/blogs",
            &[
                ("page", Some(self.page.max(1).to_string())),
                ("tag", self.tag.clone()),
                ("search", self.search.clone()),
            ],
        )
    }
}

#[derive(Clone)]
pub struct BlogService {
    api: Arc<ApiClient>,
}

impl BlogService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn latest(&self) -> ClientResult<Vec<Blog>> {
        let response: BlogsResponse = self.api.get("/latest-blogs").await?;
        Ok(response.blogs)
    }

    pub async fn trending(&self) -> ClientResult<Vec<Blog>> {
        let response: BlogsResponse = self.api.get("/trending-blogs").await?;
        Ok(response.blogs)
    }

    pub async fn by_tag(&self, tag: &str) -> ClientResult<Vec<Blog>> {
        let response: BlogsResponse = self
            .api
            .post("/search-blogs", &json!({ "tag": tag }))
            .await?;
        Ok(response.blogs)
    }

    /// Fetches one blog. `draft` allows drafts through; `for_edit` stops the
    /// read from being counted.
    pub async fn get(&self, blog_id: &str, draft: bool, for_edit: bool) -> ClientResult<Blog> {
        let mut body = json!({ "blog_id": blog_id, "draft": draft });
        if for_edit {
            body["mode"] = json!("edit");
        }
        let response: BlogResponse = self.api.post("/get-blog", &body).await?;
        Ok(response.blog)
    }

    pub async fn by_username(&self, username: &str) -> ClientResult<Vec<Blog>> {
        let path = with_query("/get-by-username", &[("username", Some(username.to_string()))]);
        let response: BlogsResponse = self.api.get(&path).await?;
        Ok(response.blogs)
    }

    pub async fn drafts_by_username(&self, username: &str) -> ClientResult<Vec<Blog>> {
        let path = with_query(
            "/get-drafts-by-username",
            &[("username", Some(username.to_string()))],
        );
        let response: BlogsResponse = self.api.get(&path).await?;
        Ok(response.blogs)
    }

    pub async fn all(&self, filter: &AdminBlogFilter) -> ClientResult<BlogPage> {
        let path = with_query(
            "/get-all-blogs",
            &[
                ("page", Some(filter.page.max(1).to_string())),
                ("limit", Some(ADMIN_PAGE_SIZE.to_string())),
                ("tag", filter.tag.clone()),
                ("search", filter.search.clone()),
            ],
        );
        self.api.get(&path).await
    }

    pub async fn create(&self, input: &BlogInput) -> ClientResult<String> {
        check_blog(input, input.draft)?;
        let response: CreatedResponse = self.api.post("/create-blog", input).await?;
        Ok(response.id)
    }

    pub async fn update(&self, blog_id: &str, input: &BlogInput) -> ClientResult<String> {
        check_blog(input, input.draft)?;
        let response: CreatedResponse = self
            .api
            .put(&format!("/update-blog/{}", blog_id), input)
            .await?;
        Ok(response.id)
    }

    /// Saves the editor draft, creating the blog on first save and updating
    /// it afterwards. Returns the blog id.
    pub async fn save(&self, draft: &BlogDraft, as_draft: bool) -> ClientResult<String> {
        let input = draft.to_input(as_draft);
        match draft.blog_id.as_deref() {
            Some(blog_id) => self.update(blog_id, &input).await,
            None => self.create(&input).await,
        }
    }

    pub async fn delete(&self, blog_id: &str) -> ClientResult<()> {
        let _: Value = self.api.delete(&format!("/delete-blog/{}", blog_id)).await?;
        Ok(())
    }

    /// Toggles the like; `liked_by_user` is the state before the click.
    pub async fn like(&self, blog_id: &str, liked_by_user: bool) -> ClientResult<i64> {
        let response: LikeResponse = self
            .api
            .post(
                "/like-blog",
                &json!({ "_id": blog_id, "islikedByUser": liked_by_user }),
            )
            .await?;
        Ok(response.likes_count)
    }

    pub async fn is_liked(&self, blog_id: &str) -> ClientResult<bool> {
        let response: LikedResponse = self
            .api
            .post("/isliked-by-user", &json!({ "_id": blog_id }))
            .await?;
        Ok(response.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_fragment_keeps_filters_in_the_url() {
        let filter = AdminBlogFilter {
            page: 3,
            tag: Some("travel".into()),
            search: None,
        };
        assert_eq!(filter.fragment(), "/admin/blogs?page=3&tag=travel");
        assert_eq!(AdminBlogFilter::default().fragment(), "/admin/blogs?page=1");
    }
}
