//! crates/blog_client/src/controllers/mod.rs
//!
//! Controllers glue pages together: they call the services, feed the results
//! to the pure views and react to bound actions.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use blog_core::{Blog, BlogDraft};
use maud::Markup;

use crate::api::ApiClient;
use crate::bindings::{Action, Binding, UiEvent};
use crate::config::ClientConfig;
use crate::context::AppContext;
use crate::error::{ClientError, ClientResult};
use crate::host::Host;
use crate::router::Page;
use crate::services::{AuthService, BlogService, UploadService, UserService};
use crate::views;

pub mod admin;
pub mod auth;
pub mod blog;
pub mod editor;
pub mod home;
pub mod profile;

/// A rendered page: markup plus the bindings for the ids it introduces.
#[derive(Debug, Clone)]
pub struct View {
    pub body: Markup,
    pub bindings: Vec<Binding>,
    /// State loaded by the render. Applied only once the page is mounted.
    pub commit: Option<Commit>,
}

impl View {
    pub fn new(body: Markup, bindings: Vec<Binding>) -> Self {
        Self { body, bindings, commit: None }
    }

    /// A view with nothing to bind.
    pub fn inert(body: Markup) -> Self {
        Self::new(body, Vec::new())
    }

    pub fn with_commit(mut self, commit: Commit) -> Self {
        self.commit = Some(commit);
        self
    }
}

/// Shared state a render wants to replace. Renders never write it
/// themselves; a render superseded by a later navigation must leave it alone.
#[derive(Debug, Clone)]
pub enum Commit {
    /// The blog on the detail page, not yet known to be liked.
    ShowBlog(Blog),
    /// The draft the editor works on.
    SetDraft(BlogDraft),
}

/// What an action did to the mounted page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Parts of the page were re-rendered; these replace the page bindings.
    Rebind(Vec<Binding>),
}

/// State of the blog currently shown on the detail page.
#[derive(Debug, Clone, Default)]
pub struct ShownBlog {
    pub blog: Option<Blog>,
    pub liked: bool,
}

/// Everything controllers need, cloned into each call.
#[derive(Clone)]
pub struct Deps {
    pub config: ClientConfig,
    pub context: AppContext,
    pub host: Arc<dyn Host>,
    pub auth: AuthService,
    pub blogs: BlogService,
    pub users: UserService,
    pub uploads: UploadService,
    shown: Arc<Mutex<ShownBlog>>,
}

impl Deps {
    pub fn new(config: ClientConfig, context: AppContext, host: Arc<dyn Host>) -> ClientResult<Self> {
        let api = Arc::new(ApiClient::new(&config, context.clone(), host.clone())?);
        Ok(Self {
            config,
            context,
            host,
            auth: AuthService::new(api.clone()),
            blogs: BlogService::new(api.clone()),
            users: UserService::new(api.clone()),
            uploads: UploadService::new(api),
            shown: Arc::new(Mutex::new(ShownBlog::default())),
        })
    }

    pub(crate) fn shown(&self) -> MutexGuard<'_, ShownBlog> {
        self.shown.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Shows `error` as a toast. Session expiry has already redirected.
    pub(crate) fn report(&self, error: &ClientError, fallback: &str) {
        if !matches!(error, ClientError::SessionExpired) {
            self.host.error(&error.user_message(fallback));
        }
    }
}

/// Renders `page`. Missing resources become inline placeholders; other
/// failures are returned for the router to handle.
pub async fn render(page: &Page, deps: &Deps) -> ClientResult<View> {
    match page {
        Page::Home => home::render(deps).await,
        Page::Login => Ok(auth::render_login(deps)),
        Page::Register => Ok(auth::render_register(deps)),
        Page::ForgotPassword => Ok(auth::render_forgot_password()),
        Page::ResetPassword { token } => Ok(auth::render_reset_password(token)),
        Page::Editor { blog_id, resume } => editor::render(deps, blog_id.as_deref(), *resume).await,
        Page::Publish => Ok(editor::render_publish(deps)),
        Page::BlogDetail { blog_id } => blog::render(deps, blog_id).await,
        Page::Profile { username } => profile::render(deps, username).await,
        Page::EditProfile { username } => profile::render_edit(deps, username).await,
        Page::AdminDashboard => admin::render_dashboard(deps).await,
        Page::AdminBlogs(filter) => admin::render_blogs(deps, filter).await,
        Page::AdminBlog { blog_id } => admin::render_blog(deps, blog_id).await,
        Page::NotFound => Ok(View::inert(views::not_found())),
    }
}

/// Applies the state a current render loaded.
pub fn commit(commit: Commit, deps: &Deps) -> ClientResult<()> {
    match commit {
        Commit::ShowBlog(blog) => {
            *deps.shown() = ShownBlog {
                blog: Some(blog),
                liked: false,
            };
        }
        Commit::SetDraft(draft) => deps.context.set_blog(draft)?,
    }
    Ok(())
}

/// Work that needs the page to be mounted first.
pub async fn after_render(page: &Page, deps: &Deps) -> ClientResult<()> {
    match page {
        Page::BlogDetail { .. } => blog::after_render(deps).await,
        _ => Ok(()),
    }
}

pub async fn handle(action: &Action, event: &UiEvent, deps: &Deps) -> ClientResult<Outcome> {
    match action {
        Action::Toggle { element_id, class } => {
            deps.host.toggle_class(element_id, class);
            Ok(Outcome::Done)
        }
        Action::Logout => auth::logout(deps).await,

        Action::SubmitLogin => auth::submit_login(deps, event).await,
        Action::SubmitRegister => auth::submit_register(deps, event).await,
        Action::GoogleSignIn => auth::google_sign_in(deps, event).await,
        Action::ForgotPassword => {
            deps.host.navigate("/forgot-password");
            Ok(Outcome::Done)
        }
        Action::SubmitForgotPassword => auth::submit_forgot_password(deps, event).await,
        Action::SubmitResetPassword { token } => {
            auth::submit_reset_password(deps, event, token).await
        }

        Action::LoadCategory(category) => home::load_category(deps, category).await,
        Action::ToggleLike => blog::toggle_like(deps).await,

        Action::UploadBanner => editor::upload_banner(deps, event).await,
        Action::EditTitle => editor::edit_title(deps, event),
        Action::EditContent => editor::edit_content(deps, event),
        Action::ProceedToPublish => editor::proceed_to_publish(deps),
        Action::SaveDraft => editor::save_draft(deps).await,
        Action::BackToEditor => editor::back_to_editor(deps),
        Action::EditDescription => editor::edit_description(deps, event),
        Action::AddTag => editor::add_tag(deps, event),
        Action::RemoveTag(tag) => editor::remove_tag(deps, tag),
        Action::Publish => editor::publish(deps).await,

        Action::EditBio => profile::edit_bio(deps, event),
        Action::SubmitProfile => profile::submit(deps, event).await,
        Action::UploadProfileImage => profile::upload_image(deps, event).await,

        Action::AdminNavigate { page, tag, search } => {
            admin::navigate(deps, event, *page, tag.as_deref(), search.as_deref())
        }
        Action::DeleteBlog(blog_id) => admin::delete_blog(deps, blog_id).await,
    }
}

/// Turns a missing resource into an inline message instead of an error.
pub(crate) fn or_placeholder(result: ClientResult<View>, message: &str) -> ClientResult<View> {
    match result {
        Err(e) if e.is_not_found() => Ok(View::inert(views::placeholder(message))),
        other => other,
    }
}
