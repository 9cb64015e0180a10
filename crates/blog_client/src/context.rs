//! crates/blog_client/src/context.rs
//!
//! The application context: who is signed in and which blog is being drafted.
//!
//! One `AppContext` is built at startup and cloned into every service and
//! controller; all clones share the same state. Every setter writes session
//! storage first and only updates the in-memory copy when that write worked,
//! so the two never disagree.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use blog_core::{AuthResponse, Author, BlogDraft, Content};
use serde::{Deserialize, Serialize};

use crate::session::{SessionStore, StorageError, BLOG_KEY, USER_KEY};

//=========================================================================================
// User context
//=========================================================================================

/// The signed-in user as far as the client cares. Absent fields are omitted
/// from storage rather than stored as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl UserContext {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.profile_img.is_none() && self.username.is_none()
    }

    pub fn is_signed_in(&self) -> bool {
        self.access_token.is_some()
    }

    /// Empty strings read back from storage count as missing.
    fn normalized(self) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.is_empty());
        Self {
            access_token: keep(self.access_token),
            profile_img: keep(self.profile_img),
            username: keep(self.username),
        }
    }
}

/// A single editable field of the blog draft.
#[derive(Debug, Clone, PartialEq)]
pub enum BlogField {
    BlogId(Option<String>),
    Title(String),
    Banner(String),
    Content(Content),
    Tags(Vec<String>),
    Des(String),
    Author(Author),
    Draft(bool),
}

impl BlogField {
    fn apply(self, blog: &mut BlogDraft) {
        match self {
            BlogField::BlogId(id) => blog.blog_id = id,
            BlogField::Title(title) => blog.title = title,
            BlogField::Banner(banner) => blog.banner = banner,
            BlogField::Content(content) => blog.content = content,
            BlogField::Tags(tags) => blog.tags = tags,
            BlogField::Des(des) => blog.des = des,
            BlogField::Author(author) => blog.author = author,
            BlogField::Draft(draft) => blog.draft = draft,
        }
    }
}

//=========================================================================================
// AppContext
//=========================================================================================

#[derive(Debug, Default)]
struct ContextState {
    user: UserContext,
    blog: BlogDraft,
}

#[derive(Clone)]
pub struct AppContext {
    store: SessionStore,
    state: Arc<Mutex<ContextState>>,
}

impl AppContext {
    /// Restores the context from storage. Missing or unreadable entries fall
    /// back to an empty user and the default draft.
    pub fn load(store: SessionStore) -> Self {
        let user = store
            .get_json::<UserContext>(USER_KEY)
            .map(UserContext::normalized)
            .unwrap_or_default();
        let blog = store.get_json::<BlogDraft>(BLOG_KEY).unwrap_or_default();

        Self {
            store,
            state: Arc::new(Mutex::new(ContextState { user, blog })),
        }
    }

    fn state(&self) -> MutexGuard<'_, ContextState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn user(&self) -> UserContext {
        self.state().user.clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.state().user.access_token.clone()
    }

    pub fn username(&self) -> Option<String> {
        self.state().user.username.clone()
    }

    pub fn blog(&self) -> BlogDraft {
        self.state().blog.clone()
    }

    // --- User setters ---

    pub fn set_access_token(&self, token: Option<String>) -> Result<(), StorageError> {
        self.update_user(|user| user.access_token = token)
    }

    pub fn set_profile_img(&self, url: Option<String>) -> Result<(), StorageError> {
        self.update_user(|user| user.profile_img = url)
    }

    pub fn set_username(&self, username: Option<String>) -> Result<(), StorageError> {
        self.update_user(|user| user.username = username)
    }

    /// Installs the identity returned by a successful sign-in.
    pub fn set_user(&self, auth: &AuthResponse) -> Result<(), StorageError> {
        self.update_user(|user| {
            *user = UserContext {
                access_token: Some(auth.access_token.clone()),
                profile_img: Some(auth.profile_img.clone()),
                username: Some(auth.username.clone()),
            }
            .normalized();
        })
    }

    pub fn clear_user(&self) {
        let mut state = self.state();
        self.store.remove(USER_KEY);
        state.user = UserContext::default();
    }

    fn update_user(&self, change: impl FnOnce(&mut UserContext)) -> Result<(), StorageError> {
        let mut state = self.state();
        let mut next = state.user.clone();
        change(&mut next);

        if next.is_empty() {
            self.store.remove(USER_KEY);
        } else {
            self.store.store_json(USER_KEY, &next)?;
        }
        state.user = next;
        Ok(())
    }

    // --- Blog draft setters ---

    pub fn set_blog(&self, blog: BlogDraft) -> Result<(), StorageError> {
        self.update_blog(|draft| *draft = blog)
    }

    pub fn set_blog_field(&self, field: BlogField) -> Result<(), StorageError> {
        self.update_blog(|draft| field.apply(draft))
    }

    pub fn reset_blog(&self) -> Result<(), StorageError> {
        self.update_blog(|draft| *draft = BlogDraft::default())
    }

    fn update_blog(&self, change: impl FnOnce(&mut BlogDraft)) -> Result<(), StorageError> {
        let mut state = self.state();
        let mut next = state.blog.clone();
        change(&mut next);

        self.store.store_json(BLOG_KEY, &next)?;
        state.blog = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryBackend, SessionStore};
    use blog_core::ContentBlock;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fresh() -> (SessionStore, AppContext) {
        let store = SessionStore::in_memory();
        let context = AppContext::load(store.clone());
        (store, context)
    }

    #[test]
    fn token_only_round_trips_without_nulls() {
        let (store, context) = fresh();
        context.set_access_token(Some("abc".into())).unwrap();

        assert_eq!(store.get(USER_KEY).as_deref(), Some(r#"{"accessToken":"abc"}"#));

        let reloaded = AppContext::load(store);
        assert_eq!(
            reloaded.user(),
            UserContext {
                access_token: Some("abc".into()),
                profile_img: None,
                username: None,
            }
        );
    }

    #[test]
    fn clearing_every_field_removes_the_key() {
        let (store, context) = fresh();
        context.set_access_token(Some("abc".into())).unwrap();
        context.set_username(Some("sam".into())).unwrap();

        context.set_access_token(None).unwrap();
        assert!(store.get(USER_KEY).is_some());
        context.set_username(None).unwrap();
        assert_eq!(store.get(USER_KEY), None);
        assert!(context.user().is_empty());
    }

    #[test]
    fn failed_write_leaves_memory_untouched() {
        let store = SessionStore::new(Arc::new(MemoryBackend::with_quota(40)));
        let context = AppContext::load(store.clone());
        context.set_access_token(Some("short".into())).unwrap();

        let result = context.set_access_token(Some("x".repeat(100)));

        assert!(result.is_err());
        assert_eq!(context.access_token().as_deref(), Some("short"));
        assert_eq!(AppContext::load(store).access_token().as_deref(), Some("short"));
    }

    #[test]
    fn clones_share_state() {
        let (_, context) = fresh();
        let other = context.clone();
        context.set_username(Some("sam".into())).unwrap();
        assert_eq!(other.username().as_deref(), Some("sam"));
    }

    #[test]
    fn corrupt_storage_falls_back_to_defaults() {
        let store = SessionStore::in_memory();
        store.store(USER_KEY, "not json").unwrap();
        store.store(BLOG_KEY, "[[[").unwrap();

        let context = AppContext::load(store);
        assert!(context.user().is_empty());
        assert_eq!(context.blog(), BlogDraft::default());
    }

    #[test]
    fn empty_strings_load_as_missing() {
        let store = SessionStore::in_memory();
        store
            .store_json(USER_KEY, &json!({ "accessToken": "t", "username": "" }))
            .unwrap();
        let context = AppContext::load(store);
        assert_eq!(context.username(), None);
        assert!(context.user().is_signed_in());
    }

    #[test]
    fn reset_blog_is_idempotent_and_clears_staged_fields() {
        let (store, context) = fresh();
        context.set_blog_field(BlogField::Tags(vec!["rust".into()])).unwrap();
        context
            .set_blog_field(BlogField::Content(Content::from_blocks(vec![
                ContentBlock::paragraph("draft text"),
            ])))
            .unwrap();

        context.reset_blog().unwrap();
        let first = context.blog();
        context.reset_blog().unwrap();
        let second = context.blog();

        assert_eq!(first, BlogDraft::default());
        assert_eq!(first, second);
        assert!(first.tags.is_empty());
        assert!(first.content.is_empty());
        assert_eq!(AppContext::load(store).blog(), BlogDraft::default());
    }

    #[test]
    fn stored_blog_with_wrapped_content_is_normalized() {
        let store = SessionStore::in_memory();
        store
            .store_json(
                BLOG_KEY,
                &json!({
                    "title": "t",
                    "content": [{ "blocks": [{ "type": "paragraph", "data": { "text": "hi" } }] }],
                    "draft": false
                }),
            )
            .unwrap();

        let blog = AppContext::load(store).blog();
        assert_eq!(blog.content.blocks, vec![ContentBlock::paragraph("hi")]);
        assert!(!blog.draft);
    }

    #[test]
    fn set_user_writes_all_fields_at_once() {
        let (store, context) = fresh();
        context
            .set_user(&AuthResponse {
                access_token: "tok".into(),
                profile_img: "a.png".into(),
                username: "sam".into(),
                email: "sam@example.com".into(),
                role: Default::default(),
            })
            .unwrap();

        let reloaded = AppContext::load(store).user();
        assert_eq!(reloaded.username.as_deref(), Some("sam"));
        assert_eq!(reloaded.profile_img.as_deref(), Some("a.png"));

        context.clear_user();
        assert!(context.user().is_empty());
    }
}
