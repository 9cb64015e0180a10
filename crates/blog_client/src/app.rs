//! crates/blog_client/src/app.rs
//!
//! The client's entry point. The host calls `handle_location` whenever the
//! location fragment changes and `dispatch` for every DOM event it forwards.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use crate::bindings::{lookup, Binding, UiEvent};
use crate::config::{ClientConfig, EditorInit};
use crate::context::AppContext;
use crate::controllers::{self, Deps, Outcome, View};
use crate::error::{ClientError, ClientResult};
use crate::host::Host;
use crate::layout::Layout;
use crate::router::{self, Page};
use crate::session::{SessionBackend, SessionStore, EDITOR_RELOADED_KEY};
use crate::views;

struct Mounted {
    layout: Layout,
    bindings: Vec<Binding>,
}

pub struct App {
    deps: Deps,
    generation: AtomicU64,
    mounted: Mutex<Mounted>,
}

impl App {
    pub fn new(
        config: ClientConfig,
        backend: Arc<dyn SessionBackend>,
        host: Arc<dyn Host>,
    ) -> ClientResult<Self> {
        let context = AppContext::load(SessionStore::new(backend));
        info!(
            "Client ready (api: {}, signed in: {})",
            config.server_domain,
            context.user().is_signed_in()
        );
        Ok(Self {
            deps: Deps::new(config, context, host)?,
            generation: AtomicU64::new(0),
            mounted: Mutex::new(Mounted {
                layout: Layout::Main,
                bindings: Vec::new(),
            }),
        })
    }

    pub fn context(&self) -> &AppContext {
        &self.deps.context
    }

    /// Bindings of the page currently mounted.
    pub fn bindings(&self) -> Vec<Binding> {
        self.mounted().bindings.clone()
    }

    fn mounted(&self) -> MutexGuard<'_, Mounted> {
        self.mounted.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Routes to `fragment`, renders the page and mounts it.
    pub async fn handle_location(&self, fragment: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (page, layout) = router::resolve(fragment);
        debug!("Navigation {} to {:?}", generation, page);

        if self.reload_for_editor(&page) {
            return;
        }

        let rendered = controllers::render(&page, &self.deps).await;
        if !self.is_current(generation) {
            debug!("Dropping stale render of {:?}", page);
            return;
        }

        let (view, run_after) = match rendered {
            Ok(mut view) => match view.commit.take().map(|c| controllers::commit(c, &self.deps)) {
                Some(Err(e)) => {
                    error!("Failed to keep the state of {:?}: {}", page, e);
                    (View::inert(views::server_error()), false)
                }
                _ => (view, true),
            },
            // The API client already signed out and redirected.
            Err(ClientError::SessionExpired) => return,
            Err(e) => {
                error!("Failed to render {:?}: {}", page, e);
                (View::inert(views::server_error()), false)
            }
        };

        self.mount(layout, view);

        if run_after {
            if let Err(e) = controllers::after_render(&page, &self.deps).await {
                if self.is_current(generation) {
                    warn!("After-render of {:?} failed: {}", page, e);
                }
            }
        }
    }

    fn mount(&self, layout: Layout, view: View) {
        let user = self.deps.context.user();
        let html = layout.wrap(view.body, &user).into_string();
        self.deps.host.mount(&html);

        let mut bindings = layout.bindings(&user);
        bindings.extend(view.bindings);
        *self.mounted() = Mounted { layout, bindings };
    }

    /// Returns true when the host was asked to reload instead of rendering.
    fn reload_for_editor(&self, page: &Page) -> bool {
        if self.deps.config.editor_init != EditorInit::ForceReloadOnce {
            return false;
        }
        let store = self.deps.context.store();
        if !page.is_editor() {
            store.remove(EDITOR_RELOADED_KEY);
            return false;
        }
        if store.get(EDITOR_RELOADED_KEY).is_some() {
            return false;
        }
        match store.store(EDITOR_RELOADED_KEY, "true") {
            Ok(()) => {
                self.deps.host.reload();
                true
            }
            Err(e) => {
                // Without the flag the reload would loop.
                warn!("Skipping editor reload: {}", e);
                false
            }
        }
    }

    /// Runs the action bound to the event's target, if any.
    pub async fn dispatch(&self, event: UiEvent) {
        let action = lookup(&self.mounted().bindings, &event).cloned();
        let Some(action) = action else {
            debug!("No binding for {:?} on '{}'", event.event, event.target);
            return;
        };

        match controllers::handle(&action, &event, &self.deps).await {
            Ok(Outcome::Done) => {}
            Ok(Outcome::Rebind(view_bindings)) => {
                let user = self.deps.context.user();
                let mut mounted = self.mounted();
                let mut bindings = mounted.layout.bindings(&user);
                bindings.extend(view_bindings);
                mounted.bindings = bindings;
            }
            Err(e) => {
                warn!("Action {:?} failed: {}", action, e);
                self.deps.report(&e, "Something went wrong");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::EventKind;
    use crate::host::{MemoryHost, ToastLevel};
    use crate::session::MemoryBackend;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app(server: &MockServer, editor_init: EditorInit) -> (App, Arc<MemoryHost>) {
        let host = Arc::new(MemoryHost::new());
        let config = ClientConfig::new(server.uri()).with_editor_init(editor_init);
        let app = App::new(config, Arc::new(MemoryBackend::new()), host.clone()).unwrap();
        (app, host)
    }

    fn sign_in(app: &App) {
        app.context()
            .set_access_token(Some("token".into()))
            .unwrap();
        app.context().set_username(Some("sam".into())).unwrap();
    }

    #[tokio::test]
    async fn unknown_route_mounts_not_found_once_in_main_layout() {
        let server = MockServer::start().await;
        let (app, host) = app(&server, EditorInit::Idempotent);

        app.handle_location("#/definitely/not/here").await;

        assert_eq!(host.mount_count(), 1);
        let html = host.mounted().unwrap();
        assert!(html.contains("<h1>404 - Page Not Found</h1>"));
        assert!(html.contains("navbar"));
        assert_eq!(html.matches("404 - Page Not Found").count(), 1);
    }

    #[tokio::test]
    async fn weak_register_password_is_rejected_without_a_request() {
        let server = MockServer::start().await;
        let (app, host) = app(&server, EditorInit::Idempotent);
        app.handle_location("#/register").await;

        app.dispatch(
            UiEvent::new("authForm", EventKind::Submit)
                .with_value("fullname", "Jane Doe")
                .with_value("email", "jane@example.com")
                .with_value("password", "abc"),
        )
        .await;

        let toast = host.last_toast().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(
            toast.message,
            "Password must be 6-20 chars, include uppercase, lowercase, number"
        );
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn successful_login_stores_the_user_and_goes_home() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": "fresh",
                "profile_img": "sam.png",
                "username": "sam",
                "email": "sam@example.com",
                "role": "user"
            })))
            .expect(1)
            .mount(&server)
            .await;
        let (app, host) = app(&server, EditorInit::Idempotent);
        app.handle_location("#/login").await;

        app.dispatch(
            UiEvent::new("authForm", EventKind::Submit)
                .with_value("email", "sam@example.com")
                .with_value("password", "Secret1"),
        )
        .await;

        assert_eq!(app.context().access_token().as_deref(), Some("fresh"));
        assert_eq!(host.last_toast().unwrap().message, "Login successful!");
        assert_eq!(host.navigations(), vec!["/".to_string()]);
    }

    #[tokio::test]
    async fn superseded_render_is_discarded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get-blog"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "blog": { "blog_id": "slow", "title": "Slow" } }))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;
        let (app, host) = app(&server, EditorInit::Idempotent);

        tokio::join!(
            app.handle_location("#/blog/slow"),
            app.handle_location("#/nowhere")
        );

        assert_eq!(host.mount_count(), 1);
        assert!(host.mounted().unwrap().contains("404 - Page Not Found"));
        assert!(!app
            .bindings()
            .iter()
            .any(|b| b.element_id == "like-btn"));
    }

    #[tokio::test]
    async fn like_after_a_superseded_blog_render_targets_the_mounted_blog() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get-blog"))
            .and(body_partial_json(json!({ "blog_id": "slow" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "blog": { "blog_id": "slow", "title": "Slow" } }))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/get-blog"))
            .and(body_partial_json(json!({ "blog_id": "fast" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "blog": { "blog_id": "fast", "title": "Fast" } })),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/isliked-by-user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": false })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/like-blog"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "likes_count": 1 })))
            .mount(&server)
            .await;
        let (app, host) = app(&server, EditorInit::Idempotent);
        sign_in(&app);

        tokio::join!(app.handle_location("#/blog/slow"), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            app.handle_location("#/blog/fast").await;
        });

        assert_eq!(host.mount_count(), 1);
        assert!(host.mounted().unwrap().contains("Fast"));
        assert_eq!(
            app.deps.shown().blog.as_ref().map(|b| b.blog_id.clone()).as_deref(),
            Some("fast")
        );

        app.dispatch(UiEvent::new("like-btn", EventKind::Click)).await;

        let likes: Vec<serde_json::Value> = server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == "/like-blog")
            .map(|r| r.body_json().unwrap())
            .collect();
        assert_eq!(likes.len(), 1);
        assert_eq!(likes[0]["_id"], "fast");
    }

    #[tokio::test]
    async fn superseded_editor_load_leaves_the_new_draft_alone() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get-blog"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "blog": { "blog_id": "old-post", "title": "Old post" }
                    }))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;
        let (app, host) = app(&server, EditorInit::Idempotent);
        sign_in(&app);

        tokio::join!(app.handle_location("#/editor/old-post"), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            app.handle_location("#/editor").await;
        });

        assert_eq!(host.mount_count(), 1);
        let draft = app.context().blog();
        assert_eq!(draft.blog_id, None);
        assert!(draft.title.is_empty());
    }

    #[tokio::test]
    async fn editor_reloads_once_per_session_when_configured() {
        let server = MockServer::start().await;
        let (app, host) = app(&server, EditorInit::ForceReloadOnce);
        sign_in(&app);

        app.handle_location("#/editor").await;
        assert_eq!(host.reload_count(), 1);
        assert_eq!(host.mount_count(), 0);

        app.handle_location("#/editor").await;
        assert_eq!(host.reload_count(), 1);
        assert_eq!(host.mount_count(), 1);

        app.handle_location("#/login").await;
        assert!(app.context().store().get(EDITOR_RELOADED_KEY).is_none());
    }

    #[tokio::test]
    async fn idempotent_editor_never_reloads() {
        let server = MockServer::start().await;
        let (app, host) = app(&server, EditorInit::Idempotent);
        sign_in(&app);

        app.handle_location("#/editor").await;
        app.handle_location("#/editor").await;

        assert_eq!(host.reload_count(), 0);
        assert_eq!(host.mount_count(), 2);
        assert!(host.mounted().unwrap().contains("editorjs"));
    }

    #[tokio::test]
    async fn failed_render_shows_the_error_view_in_its_layout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest-blogs"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/trending-blogs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "blogs": [] })))
            .mount(&server)
            .await;
        let (app, host) = app(&server, EditorInit::Idempotent);

        app.handle_location("#/").await;

        let html = host.mounted().unwrap();
        assert!(html.contains("500 - Something went wrong"));
        assert!(html.contains("navbar"));
    }

    #[tokio::test]
    async fn admin_page_strip_rewrites_the_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get-all-blogs"))
            .and(query_param("page", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "blogs": [{ "blog_id": "b1", "title": "One" }],
                "pagination": { "totalBlogs": 95, "totalPages": 10, "currentPage": 5, "limit": 10 }
            })))
            .expect(1)
            .mount(&server)
            .await;
        let (app, host) = app(&server, EditorInit::Idempotent);
        sign_in(&app);

        app.handle_location("#/admin/blogs?page=5&tag=travel").await;

        let html = host.mounted().unwrap();
        for present in ["page-1", "page-4", "page-5", "page-6", "page-10"] {
            assert!(html.contains(&format!(r#"id="{}""#, present)), "{}", present);
        }
        assert!(!html.contains(r#"id="page-3""#));

        app.dispatch(UiEvent::new("page-6", EventKind::Click)).await;
        app.dispatch(
            UiEvent::new("admin-search-form", EventKind::Submit).with_value("search", "rust"),
        )
        .await;

        assert_eq!(
            host.navigations(),
            vec![
                "/admin/blogs?page=6&tag=travel".to_string(),
                "/admin/blogs?page=1&tag=travel&search=rust".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn failed_like_is_rolled_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get-blog"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "blog": {
                    "blog_id": "hello",
                    "title": "Hello",
                    "activity": { "total_likes": 3 }
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/isliked-by-user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": false })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/like-blog"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "error": "database down" })),
            )
            .mount(&server)
            .await;
        let (app, host) = app(&server, EditorInit::Idempotent);
        sign_in(&app);
        app.handle_location("#/blog/hello").await;

        app.dispatch(UiEvent::new("like-btn", EventKind::Click)).await;

        let bars: Vec<String> = host
            .patches()
            .into_iter()
            .filter(|(id, _)| id == "blog-interaction")
            .map(|(_, html)| html)
            .collect();
        // after-render, optimistic, rollback
        assert_eq!(bars.len(), 3);
        assert!(bars[1].contains(">4</p>"));
        assert!(bars[2].contains(">3</p>"));
        assert!(bars[2].contains("fa-regular fa-heart"));
        assert_eq!(host.last_toast().unwrap().message, "database down");
    }

    #[tokio::test]
    async fn publishing_tags_are_rebound_after_each_change() {
        let server = MockServer::start().await;
        let (app, host) = app(&server, EditorInit::Idempotent);
        sign_in(&app);
        app.handle_location("#/publish").await;

        app.dispatch(
            UiEvent::new("tag-input", EventKind::KeyDown)
                .with_value("key", "Enter")
                .with_value("tag", "Travel"),
        )
        .await;
        assert_eq!(app.context().blog().tags, vec!["travel".to_string()]);
        assert!(app.bindings().iter().any(|b| b.element_id == "remove-tag-0"));

        app.dispatch(
            UiEvent::new("tag-input", EventKind::KeyDown)
                .with_value("key", "Enter")
                .with_value("tag", "travel"),
        )
        .await;
        assert_eq!(host.last_toast().unwrap().message, "Tag already exists.");

        app.dispatch(UiEvent::new("remove-tag-0", EventKind::Click)).await;
        assert!(app.context().blog().tags.is_empty());
        assert_eq!(host.patched("tags-left").as_deref(), Some("10 Tags left"));
    }
}
