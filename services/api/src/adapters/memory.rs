//! services/api/src/adapters/memory.rs
//!
//! An in-memory implementation of the `DatabaseService` port. It backs the
//! router tests and lets the service run without a database.

use async_trait::async_trait;
use blog_core::domain::{
    AccountInfo, Author, AuthorInfo, Blog, BlogInput, BlogOrder, BlogQuery, LikeOutcome, NewUser,
    PersonalInfo, ProfileUpdate, Role, SocialLinks, StoredBlog, User, UserCredentials, UserQuery,
};
use blog_core::ports::{DatabaseService, PortError, PortResult};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tokio::sync::RwLock;
use uuid::Uuid;

//=========================================================================================
// Stored Rows
//=========================================================================================

struct UserRow {
    user: User,
    hashed_password: Option<String>,
    reset_token: Option<(String, DateTime<Utc>)>,
}

struct BlogRow {
    id: Uuid,
    author_id: Uuid,
    blog: Blog,
}

#[derive(Default)]
struct Store {
    users: Vec<UserRow>,
    blogs: Vec<BlogRow>,
    /// `(blog row id, user id)` pairs.
    likes: HashSet<(Uuid, Uuid)>,
}

impl Store {
    fn user(&self, user_id: Uuid) -> PortResult<&UserRow> {
        self.users
            .iter()
            .find(|row| row.user.id == user_id)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }

    fn user_mut(&mut self, user_id: Uuid) -> PortResult<&mut UserRow> {
        self.users
            .iter_mut()
            .find(|row| row.user.id == user_id)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }

    fn blog_index(&self, blog_id: &str) -> PortResult<usize> {
        self.blogs
            .iter()
            .position(|row| row.blog.blog_id == blog_id)
            .ok_or_else(|| PortError::NotFound(format!("Blog {} not found", blog_id)))
    }

    fn author(&self, author_id: Uuid) -> Author {
        let personal_info = self
            .user(author_id)
            .map(|row| AuthorInfo {
                fullname: row.user.personal_info.fullname.clone(),
                username: row.user.personal_info.username.clone(),
                profile_img: row.user.personal_info.profile_img.clone(),
            })
            .unwrap_or_default();
        Author { personal_info }
    }

    /// The blog with its author's current details filled in.
    fn stored(&self, index: usize) -> StoredBlog {
        let row = &self.blogs[index];
        StoredBlog {
            id: row.id,
            author_id: row.author_id,
            blog: Blog {
                author: self.author(row.author_id),
                ..row.blog.clone()
            },
        }
    }

    fn bump_posts(&mut self, author_id: Uuid, delta: i64) {
        if let Ok(row) = self.user_mut(author_id) {
            row.user.account_info.total_posts = (row.user.account_info.total_posts + delta).max(0);
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Slices one 1-based page out of `items`; a non-positive limit keeps all.
fn page_of<T>(items: Vec<T>, page: i64, limit: i64) -> Vec<T> {
    if limit <= 0 {
        return items;
    }
    let skip = ((page.max(1) - 1) * limit) as usize;
    items.into_iter().skip(skip).take(limit as usize).collect()
}

//=========================================================================================
// The Adapter
//=========================================================================================

#[derive(Default)]
pub struct MemoryDb {
    store: RwLock<Store>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes a user's role. Roles are granted out of band, never through
    /// the API.
    pub async fn set_role(&self, user_id: Uuid, role: Role) -> PortResult<()> {
        self.store.write().await.user_mut(user_id)?.user.role = role;
        Ok(())
    }
}

#[async_trait]
impl DatabaseService for MemoryDb {
    // --- Users ---
    async fn create_user(&self, user: NewUser) -> PortResult<User> {
        let mut store = self.store.write().await;
        if store
            .users
            .iter()
            .any(|row| row.user.personal_info.email == user.email)
        {
            return Err(PortError::Conflict(format!("Email {} is taken", user.email)));
        }
        if store
            .users
            .iter()
            .any(|row| row.user.personal_info.username == user.username)
        {
            return Err(PortError::Conflict(format!(
                "Username {} is taken",
                user.username
            )));
        }

        let created = User {
            id: Uuid::new_v4(),
            personal_info: PersonalInfo {
                fullname: user.fullname,
                email: user.email,
                username: user.username,
                bio: String::new(),
                profile_img: user.profile_img,
            },
            social_links: SocialLinks::default(),
            account_info: AccountInfo::default(),
            google_auth: user.google_auth,
            role: Role::User,
            joined_at: Utc::now(),
        };
        store.users.push(UserRow {
            user: created.clone(),
            hashed_password: user.hashed_password,
            reset_token: None,
        });
        Ok(created)
    }

    async fn get_credentials_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let store = self.store.read().await;
        store
            .users
            .iter()
            .find(|row| row.user.personal_info.email == email)
            .map(|row| UserCredentials {
                user_id: row.user.id,
                email: row.user.personal_info.email.clone(),
                hashed_password: row.hashed_password.clone(),
                google_auth: row.user.google_auth,
            })
            .ok_or_else(|| PortError::NotFound(format!("No user with email {}", email)))
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        Ok(self.store.read().await.user(user_id)?.user.clone())
    }

    async fn get_user_by_username(&self, username: &str) -> PortResult<User> {
        let store = self.store.read().await;
        store
            .users
            .iter()
            .find(|row| row.user.personal_info.username == username)
            .map(|row| row.user.clone())
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", username)))
    }

    async fn username_exists(&self, username: &str) -> PortResult<bool> {
        let store = self.store.read().await;
        Ok(store
            .users
            .iter()
            .any(|row| row.user.personal_info.username == username))
    }

    async fn list_users(&self, query: &UserQuery) -> PortResult<(Vec<User>, i64)> {
        let store = self.store.read().await;
        let mut users: Vec<User> = store
            .users
            .iter()
            .map(|row| &row.user)
            .filter(|user| match query.search.as_deref() {
                Some(search) => {
                    contains_ignore_case(&user.personal_info.username, search)
                        || contains_ignore_case(&user.personal_info.fullname, search)
                }
                None => true,
            })
            .cloned()
            .collect();
        users.sort_by(|a, b| b.joined_at.cmp(&a.joined_at));

        let total = users.len() as i64;
        Ok((page_of(users, query.page, query.limit), total))
    }

    async fn update_profile(&self, user_id: Uuid, update: &ProfileUpdate) -> PortResult<User> {
        let mut store = self.store.write().await;
        if store.users.iter().any(|row| {
            row.user.id != user_id && row.user.personal_info.username == update.username
        }) {
            return Err(PortError::Conflict(format!(
                "Username {} is taken",
                update.username
            )));
        }
        let row = store.user_mut(user_id)?;
        row.user.personal_info.username = update.username.clone();
        row.user.personal_info.bio = update.bio.clone();
        row.user.social_links = update.social_links.clone();
        Ok(row.user.clone())
    }

    async fn update_profile_img(&self, user_id: Uuid, url: &str) -> PortResult<()> {
        self.store.write().await.user_mut(user_id)?.user.personal_info.profile_img =
            url.to_string();
        Ok(())
    }

    // --- Password reset ---
    async fn set_reset_token(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        self.store.write().await.user_mut(user_id)?.reset_token =
            Some((token.to_string(), expires_at));
        Ok(())
    }

    async fn redeem_reset_token(
        &self,
        token: &str,
        hashed_password: &str,
        now: DateTime<Utc>,
    ) -> PortResult<()> {
        let mut store = self.store.write().await;
        let row = store
            .users
            .iter_mut()
            .find(|row| {
                row.reset_token
                    .as_ref()
                    .is_some_and(|(stored, expires_at)| stored == token && *expires_at > now)
            })
            .ok_or_else(|| PortError::NotFound("Reset token is invalid or expired".to_string()))?;
        row.hashed_password = Some(hashed_password.to_string());
        row.reset_token = None;
        Ok(())
    }

    // --- Blogs ---
    async fn blog_id_exists(&self, blog_id: &str) -> PortResult<bool> {
        Ok(self.store.read().await.blog_index(blog_id).is_ok())
    }

    async fn create_blog(
        &self,
        author_id: Uuid,
        blog_id: &str,
        input: &BlogInput,
    ) -> PortResult<Blog> {
        let mut store = self.store.write().await;
        store.user(author_id)?;
        if store.blog_index(blog_id).is_ok() {
            return Err(PortError::Conflict(format!("Blog {} exists", blog_id)));
        }

        store.blogs.push(BlogRow {
            id: Uuid::new_v4(),
            author_id,
            blog: Blog {
                blog_id: blog_id.to_string(),
                title: input.title.clone(),
                des: input.des.clone(),
                banner: input.banner.clone(),
                tags: input.tags.clone(),
                published_at: Some(Utc::now()),
                content: input.content.clone(),
                draft: input.draft,
                ..Blog::default()
            },
        });
        if !input.draft {
            store.bump_posts(author_id, 1);
        }
        Ok(store.stored(store.blogs.len() - 1).blog)
    }

    async fn get_blog(&self, blog_id: &str) -> PortResult<StoredBlog> {
        let store = self.store.read().await;
        let index = store.blog_index(blog_id)?;
        Ok(store.stored(index))
    }

    async fn read_blog(&self, blog_id: &str, count_read: bool) -> PortResult<StoredBlog> {
        let mut store = self.store.write().await;
        let index = store.blog_index(blog_id)?;
        if count_read {
            store.blogs[index].blog.activity.total_reads += 1;
            let author_id = store.blogs[index].author_id;
            if let Ok(author) = store.user_mut(author_id) {
                author.user.account_info.total_reads += 1;
            }
        }
        Ok(store.stored(index))
    }

    async fn update_blog(
        &self,
        blog_id: &str,
        new_blog_id: &str,
        input: &BlogInput,
    ) -> PortResult<Blog> {
        let mut store = self.store.write().await;
        let index = store.blog_index(blog_id)?;
        if new_blog_id != blog_id && store.blog_index(new_blog_id).is_ok() {
            return Err(PortError::Conflict(format!("Blog {} exists", new_blog_id)));
        }

        let was_draft = store.blogs[index].blog.draft;
        let author_id = store.blogs[index].author_id;
        {
            let blog = &mut store.blogs[index].blog;
            blog.blog_id = new_blog_id.to_string();
            blog.title = input.title.clone();
            blog.des = input.des.clone();
            blog.banner = input.banner.clone();
            blog.tags = input.tags.clone();
            blog.content = input.content.clone();
            blog.draft = input.draft;
            if was_draft && !input.draft {
                blog.published_at = Some(Utc::now());
            }
        }
        match (was_draft, input.draft) {
            (true, false) => store.bump_posts(author_id, 1),
            (false, true) => store.bump_posts(author_id, -1),
            _ => {}
        }
        Ok(store.stored(index).blog)
    }

    async fn delete_blog(&self, blog_id: &str) -> PortResult<()> {
        let mut store = self.store.write().await;
        let index = store.blog_index(blog_id)?;
        let row = store.blogs.remove(index);
        store.likes.retain(|(liked_blog, _)| *liked_blog != row.id);
        if !row.blog.draft {
            store.bump_posts(row.author_id, -1);
        }
        Ok(())
    }

    async fn list_blogs(&self, query: &BlogQuery) -> PortResult<(Vec<Blog>, i64)> {
        let store = self.store.read().await;
        let mut matches: Vec<StoredBlog> = (0..store.blogs.len())
            .filter(|index| {
                let row = &store.blogs[*index];
                (query.include_drafts || row.blog.draft == query.draft)
                    && query.author_id.is_none_or(|author| author == row.author_id)
                    && query
                        .tag
                        .as_ref()
                        .is_none_or(|tag| row.blog.tags.contains(tag))
                    && query
                        .search
                        .as_deref()
                        .is_none_or(|search| contains_ignore_case(&row.blog.title, search))
            })
            .map(|index| store.stored(index))
            .collect();

        let newest_first = |a: &Blog, b: &Blog| b.published_at.cmp(&a.published_at);
        match query.order {
            BlogOrder::Latest => matches.sort_by(|a, b| newest_first(&a.blog, &b.blog)),
            BlogOrder::Trending => matches.sort_by(|a, b| {
                let (a, b) = (&a.blog, &b.blog);
                b.activity
                    .total_reads
                    .cmp(&a.activity.total_reads)
                    .then(b.activity.total_likes.cmp(&a.activity.total_likes))
                    .then(newest_first(a, b))
            }),
        }

        let total = matches.len() as i64;
        let blogs = page_of(matches, query.page, query.limit)
            .into_iter()
            .map(|stored| stored.blog)
            .collect();
        Ok((blogs, total))
    }

    // --- Likes ---
    async fn set_like(&self, blog_id: &str, user_id: Uuid, like: bool) -> PortResult<LikeOutcome> {
        let mut store = self.store.write().await;
        let index = store.blog_index(blog_id)?;
        let row_id = store.blogs[index].id;
        if like {
            store.likes.insert((row_id, user_id));
        } else {
            store.likes.remove(&(row_id, user_id));
        }

        let likes_count = store.likes.iter().filter(|(b, _)| *b == row_id).count() as i64;
        store.blogs[index].blog.activity.total_likes = likes_count;
        Ok(LikeOutcome {
            liked: like,
            likes_count,
        })
    }

    async fn is_liked(&self, blog_id: &str, user_id: Uuid) -> PortResult<bool> {
        let store = self.store.read().await;
        let index = store.blog_index(blog_id)?;
        Ok(store.likes.contains(&(store.blogs[index].id, user_id)))
    }
}
