//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `blog_core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use blog_core::domain::{
    AccountInfo, Activity, Author, AuthorInfo, Blog, BlogInput, BlogOrder, BlogQuery,
    LikeOutcome, NewUser, PersonalInfo, ProfileUpdate, Role, SocialLinks, StoredBlog, User,
    UserCredentials, UserQuery,
};
use blog_core::ports::{DatabaseService, PortError, PortResult};
use blog_core::Content;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

const USER_COLUMNS: &str = "id, fullname, email, username, bio, profile_img, \
     youtube, instagram, facebook, twitter, github, website, \
     total_posts, total_reads, google_auth, role, joined_at";

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    fullname: String,
    email: String,
    username: String,
    bio: String,
    profile_img: String,
    youtube: String,
    instagram: String,
    facebook: String,
    twitter: String,
    github: String,
    website: String,
    total_posts: i64,
    total_reads: i64,
    google_auth: bool,
    role: String,
    joined_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            personal_info: PersonalInfo {
                fullname: self.fullname,
                email: self.email,
                username: self.username,
                bio: self.bio,
                profile_img: self.profile_img,
            },
            social_links: SocialLinks {
                youtube: self.youtube,
                instagram: self.instagram,
                facebook: self.facebook,
                twitter: self.twitter,
                github: self.github,
                website: self.website,
            },
            account_info: AccountInfo {
                total_posts: self.total_posts,
                total_reads: self.total_reads,
            },
            google_auth: self.google_auth,
            role: Role::parse(&self.role),
            joined_at: self.joined_at,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: Uuid,
    email: String,
    password: Option<String>,
    google_auth: bool,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.id,
            email: self.email,
            hashed_password: self.password,
            google_auth: self.google_auth,
        }
    }
}

/// Blog columns joined with the author's public details.
const BLOG_SELECT: &str = "SELECT b.id, b.blog_id, b.author_id, b.title, b.des, b.banner, \
     b.content, b.tags, b.total_likes, b.total_comments, b.total_reads, \
     b.total_parent_comments, b.draft, b.published_at, \
     u.fullname, u.username, u.profile_img \
     FROM blogs b JOIN users u ON u.id = b.author_id";

#[derive(FromRow)]
struct BlogRecord {
    id: Uuid,
    blog_id: String,
    author_id: Uuid,
    title: String,
    des: String,
    banner: String,
    content: Json<Content>,
    tags: Vec<String>,
    total_likes: i64,
    total_comments: i64,
    total_reads: i64,
    total_parent_comments: i64,
    draft: bool,
    published_at: DateTime<Utc>,
    fullname: String,
    username: String,
    profile_img: String,
}
impl BlogRecord {
    fn to_domain(self) -> StoredBlog {
        StoredBlog {
            id: self.id,
            author_id: self.author_id,
            blog: Blog {
                blog_id: self.blog_id,
                title: self.title,
                des: self.des,
                banner: self.banner,
                tags: self.tags,
                published_at: Some(self.published_at),
                author: Author {
                    personal_info: AuthorInfo {
                        fullname: self.fullname,
                        username: self.username,
                        profile_img: self.profile_img,
                    },
                },
                activity: Activity {
                    total_likes: self.total_likes,
                    total_comments: self.total_comments,
                    total_reads: self.total_reads,
                    total_parent_comments: self.total_parent_comments,
                },
                content: self.content.0,
                draft: self.draft,
            },
        }
    }
}

//=========================================================================================
// Query Helpers
//=========================================================================================

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

/// Maps a missing row to `NotFound` and a unique violation to `Conflict`.
fn write_error(e: sqlx::Error, what: &str) -> PortError {
    match e {
        sqlx::Error::RowNotFound => PortError::NotFound(format!("{} not found", what)),
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            PortError::Conflict(format!("{} already exists", what))
        }
        _ => PortError::Unexpected(e.to_string()),
    }
}

/// `%search%` with the LIKE wildcards in `search` escaped.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// `LIMIT`/`OFFSET` values for a 1-based page. A NULL limit returns every row.
fn limit_offset(page: i64, limit: i64) -> (Option<i64>, i64) {
    if limit <= 0 {
        return (None, 0);
    }
    (Some(limit), (page.max(1) - 1) * limit)
}

async fn select_blog<'e, E: PgExecutor<'e>>(executor: E, blog_id: &str) -> PortResult<StoredBlog> {
    let sql = format!("{} WHERE b.blog_id = $1", BLOG_SELECT);
    let record = sqlx::query_as::<_, BlogRecord>(&sql)
        .bind(blog_id)
        .fetch_one(executor)
        .await
        .map_err(|e| write_error(e, &format!("Blog {}", blog_id)))?;
    Ok(record.to_domain())
}

async fn adjust_post_count<'e, E: PgExecutor<'e>>(
    executor: E,
    author_id: Uuid,
    delta: i64,
) -> PortResult<()> {
    sqlx::query("UPDATE users SET total_posts = GREATEST(total_posts + $2, 0) WHERE id = $1")
        .bind(author_id)
        .bind(delta)
        .execute(executor)
        .await
        .map_err(unexpected)?;
    Ok(())
}

const BLOG_FILTER: &str = "WHERE ($1 OR b.draft = $2) \
     AND ($3::uuid IS NULL OR b.author_id = $3) \
     AND ($4::text IS NULL OR $4 = ANY(b.tags)) \
     AND ($5::text IS NULL OR b.title ILIKE $5)";

const USER_FILTER: &str = "WHERE ($1::text IS NULL OR username ILIKE $1 OR fullname ILIKE $1)";

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    // --- Users ---
    async fn create_user(&self, user: NewUser) -> PortResult<User> {
        let sql = format!(
            "INSERT INTO users (id, fullname, email, username, password, profile_img, google_auth) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            USER_COLUMNS
        );
        let record = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.fullname)
            .bind(&user.email)
            .bind(&user.username)
            .bind(&user.hashed_password)
            .bind(&user.profile_img)
            .bind(user.google_auth)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| write_error(e, &format!("User {}", user.email)))?;
        Ok(record.to_domain())
    }

    async fn get_credentials_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, email, password, google_auth FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("No user with email {}", email)),
            _ => PortError::Unexpected(e.to_string()),
        })?;
        Ok(record.to_domain())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let record = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", user_id)),
                _ => PortError::Unexpected(e.to_string()),
            })?;
        Ok(record.to_domain())
    }

    async fn get_user_by_username(&self, username: &str) -> PortResult<User> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let record = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    PortError::NotFound(format!("User {} not found", username))
                }
                _ => PortError::Unexpected(e.to_string()),
            })?;
        Ok(record.to_domain())
    }

    async fn username_exists(&self, username: &str) -> PortResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)
    }

    async fn list_users(&self, query: &UserQuery) -> PortResult<(Vec<User>, i64)> {
        let pattern = query.search.as_deref().map(like_pattern);
        let (limit, offset) = limit_offset(query.page, query.limit);

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM users {}",
            USER_FILTER
        ))
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;

        let sql = format!(
            "SELECT {} FROM users {} ORDER BY joined_at DESC LIMIT $2 OFFSET $3",
            USER_COLUMNS, USER_FILTER
        );
        let records = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        Ok((records.into_iter().map(|r| r.to_domain()).collect(), total))
    }

    async fn update_profile(&self, user_id: Uuid, update: &ProfileUpdate) -> PortResult<User> {
        let links = &update.social_links;
        let sql = format!(
            "UPDATE users SET username = $2, bio = $3, youtube = $4, instagram = $5, \
             facebook = $6, twitter = $7, github = $8, website = $9 \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let record = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(user_id)
            .bind(&update.username)
            .bind(&update.bio)
            .bind(&links.youtube)
            .bind(&links.instagram)
            .bind(&links.facebook)
            .bind(&links.twitter)
            .bind(&links.github)
            .bind(&links.website)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| write_error(e, &format!("Username {}", update.username)))?;
        Ok(record.to_domain())
    }

    async fn update_profile_img(&self, user_id: Uuid, url: &str) -> PortResult<()> {
        let result = sqlx::query("UPDATE users SET profile_img = $2 WHERE id = $1")
            .bind(user_id)
            .bind(url)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }

    // --- Password reset ---
    async fn set_reset_token(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query(
            "UPDATE users SET reset_token = $2, reset_token_expires_at = $3 WHERE id = $1",
        )
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn redeem_reset_token(
        &self,
        token: &str,
        hashed_password: &str,
        now: DateTime<Utc>,
    ) -> PortResult<()> {
        let result = sqlx::query(
            "UPDATE users SET password = $2, reset_token = NULL, reset_token_expires_at = NULL \
             WHERE reset_token = $1 AND reset_token_expires_at > $3",
        )
        .bind(token)
        .bind(hashed_password)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(
                "Reset token is invalid or expired".to_string(),
            ));
        }
        Ok(())
    }

    // --- Blogs ---
    async fn blog_id_exists(&self, blog_id: &str) -> PortResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM blogs WHERE blog_id = $1)")
            .bind(blog_id)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)
    }

    async fn create_blog(
        &self,
        author_id: Uuid,
        blog_id: &str,
        input: &BlogInput,
    ) -> PortResult<Blog> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query(
            "INSERT INTO blogs (id, blog_id, author_id, title, des, banner, content, tags, draft) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(Uuid::new_v4())
        .bind(blog_id)
        .bind(author_id)
        .bind(&input.title)
        .bind(&input.des)
        .bind(&input.banner)
        .bind(Json(input.content.clone()))
        .bind(&input.tags[..])
        .bind(input.draft)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(e, &format!("Blog {}", blog_id)))?;

        if !input.draft {
            adjust_post_count(&mut *tx, author_id, 1).await?;
        }
        let stored = select_blog(&mut *tx, blog_id).await?;
        tx.commit().await.map_err(unexpected)?;
        Ok(stored.blog)
    }

    async fn get_blog(&self, blog_id: &str) -> PortResult<StoredBlog> {
        select_blog(&self.pool, blog_id).await
    }

    async fn read_blog(&self, blog_id: &str, count_read: bool) -> PortResult<StoredBlog> {
        if !count_read {
            return select_blog(&self.pool, blog_id).await;
        }

        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let author_id = sqlx::query_scalar::<_, Uuid>(
            "UPDATE blogs SET total_reads = total_reads + 1 WHERE blog_id = $1 RETURNING author_id",
        )
        .bind(blog_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, &format!("Blog {}", blog_id)))?;

        sqlx::query("UPDATE users SET total_reads = total_reads + 1 WHERE id = $1")
            .bind(author_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        let stored = select_blog(&mut *tx, blog_id).await?;
        tx.commit().await.map_err(unexpected)?;
        Ok(stored)
    }

    async fn update_blog(
        &self,
        blog_id: &str,
        new_blog_id: &str,
        input: &BlogInput,
    ) -> PortResult<Blog> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let (author_id, was_draft) = sqlx::query_as::<_, (Uuid, bool)>(
            "SELECT author_id, draft FROM blogs WHERE blog_id = $1 FOR UPDATE",
        )
        .bind(blog_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, &format!("Blog {}", blog_id)))?;

        // SET expressions see the row as it was before the update.
        sqlx::query(
            "UPDATE blogs SET blog_id = $2, title = $3, des = $4, banner = $5, content = $6, \
             tags = $7, draft = $8, \
             published_at = CASE WHEN draft AND NOT $8 THEN NOW() ELSE published_at END \
             WHERE blog_id = $1",
        )
        .bind(blog_id)
        .bind(new_blog_id)
        .bind(&input.title)
        .bind(&input.des)
        .bind(&input.banner)
        .bind(Json(input.content.clone()))
        .bind(&input.tags[..])
        .bind(input.draft)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(e, &format!("Blog {}", new_blog_id)))?;

        match (was_draft, input.draft) {
            (true, false) => adjust_post_count(&mut *tx, author_id, 1).await?,
            (false, true) => adjust_post_count(&mut *tx, author_id, -1).await?,
            _ => {}
        }

        let stored = select_blog(&mut *tx, new_blog_id).await?;
        tx.commit().await.map_err(unexpected)?;
        Ok(stored.blog)
    }

    async fn delete_blog(&self, blog_id: &str) -> PortResult<()> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let (author_id, draft) = sqlx::query_as::<_, (Uuid, bool)>(
            "DELETE FROM blogs WHERE blog_id = $1 RETURNING author_id, draft",
        )
        .bind(blog_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, &format!("Blog {}", blog_id)))?;

        if !draft {
            adjust_post_count(&mut *tx, author_id, -1).await?;
        }
        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }

    async fn list_blogs(&self, query: &BlogQuery) -> PortResult<(Vec<Blog>, i64)> {
        let pattern = query.search.as_deref().map(like_pattern);
        let (limit, offset) = limit_offset(query.page, query.limit);

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM blogs b {}",
            BLOG_FILTER
        ))
        .bind(query.include_drafts)
        .bind(query.draft)
        .bind(query.author_id)
        .bind(&query.tag)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;

        let order = match query.order {
            BlogOrder::Latest => "b.published_at DESC",
            BlogOrder::Trending => "b.total_reads DESC, b.total_likes DESC, b.published_at DESC",
        };
        let sql = format!(
            "{} {} ORDER BY {} LIMIT $6 OFFSET $7",
            BLOG_SELECT, BLOG_FILTER, order
        );
        let records = sqlx::query_as::<_, BlogRecord>(&sql)
            .bind(query.include_drafts)
            .bind(query.draft)
            .bind(query.author_id)
            .bind(&query.tag)
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        let blogs = records.into_iter().map(|r| r.to_domain().blog).collect();
        Ok((blogs, total))
    }

    // --- Likes ---
    async fn set_like(&self, blog_id: &str, user_id: Uuid, like: bool) -> PortResult<LikeOutcome> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let row_id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM blogs WHERE blog_id = $1 FOR UPDATE")
            .bind(blog_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| write_error(e, &format!("Blog {}", blog_id)))?;

        let statement = if like {
            "INSERT INTO blog_likes (blog_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING"
        } else {
            "DELETE FROM blog_likes WHERE blog_id = $1 AND user_id = $2"
        };
        sqlx::query(statement)
            .bind(row_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        let likes_count = sqlx::query_scalar::<_, i64>(
            "UPDATE blogs SET total_likes = \
             (SELECT COUNT(*) FROM blog_likes WHERE blog_id = $1) \
             WHERE id = $1 RETURNING total_likes",
        )
        .bind(row_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;
        Ok(LikeOutcome {
            liked: like,
            likes_count,
        })
    }

    async fn is_liked(&self, blog_id: &str, user_id: Uuid) -> PortResult<bool> {
        let liked = sqlx::query_scalar::<_, Option<bool>>(
            "SELECT EXISTS(SELECT 1 FROM blog_likes l WHERE l.blog_id = b.id AND l.user_id = $2) \
             FROM blogs b WHERE b.blog_id = $1",
        )
        .bind(blog_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        liked
            .flatten()
            .ok_or_else(|| PortError::NotFound(format!("Blog {} not found", blog_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
    }

    #[test]
    fn limit_offset_pages_from_one() {
        assert_eq!(limit_offset(1, 5), (Some(5), 0));
        assert_eq!(limit_offset(3, 10), (Some(10), 20));
        assert_eq!(limit_offset(0, 10), (Some(10), 0));
        assert_eq!(limit_offset(4, 0), (None, 0));
    }
}
