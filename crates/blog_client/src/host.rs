//! crates/blog_client/src/host.rs
//!
//! The seam between the client core and whatever displays it.
//!
//! A browser host implements `Host` on top of the DOM (`innerHTML`,
//! `location.hash`, a toast container). `MemoryHost` records every call so
//! the router and controllers can be exercised without a DOM.

use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Warning,
    Info,
    Loading,
}

impl ToastLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ToastLevel::Success => "success",
            ToastLevel::Error => "error",
            ToastLevel::Warning => "warning",
            ToastLevel::Info => "info",
            ToastLevel::Loading => "loading",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Show(Toast),
    /// Removes the pending loading toast, if any.
    DismissLoading,
}

pub trait Host: Send + Sync {
    /// Replaces the content of the root node.
    fn mount(&self, html: &str);

    /// Replaces the content of one element of the mounted page.
    fn patch(&self, element_id: &str, html: &str);

    /// Flips a CSS class on one element.
    fn toggle_class(&self, element_id: &str, class: &str);

    /// Moves to another route by rewriting the location fragment. Routing
    /// runs again even when the fragment is unchanged.
    fn navigate(&self, fragment: &str);

    /// Full page reload.
    fn reload(&self);

    fn notify(&self, notification: Notification);

    fn success(&self, message: &str) {
        self.toast(ToastLevel::Success, message);
    }

    fn error(&self, message: &str) {
        self.toast(ToastLevel::Error, message);
    }

    fn warning(&self, message: &str) {
        self.toast(ToastLevel::Warning, message);
    }

    fn info(&self, message: &str) {
        self.toast(ToastLevel::Info, message);
    }

    fn loading(&self, message: &str) {
        self.toast(ToastLevel::Loading, message);
    }

    fn dismiss_loading(&self) {
        self.notify(Notification::DismissLoading);
    }

    fn toast(&self, level: ToastLevel, message: &str) {
        self.notify(Notification::Show(Toast {
            level,
            message: message.to_string(),
        }));
    }
}

//=========================================================================================
// MemoryHost
//=========================================================================================

#[derive(Debug, Default)]
struct Recorded {
    mounted: Option<String>,
    mount_count: usize,
    patches: Vec<(String, String)>,
    toggles: Vec<(String, String)>,
    navigations: Vec<String>,
    reloads: usize,
    notifications: Vec<Notification>,
}

/// A host that keeps everything it is asked to do.
#[derive(Debug, Default)]
pub struct MemoryHost {
    recorded: Mutex<Recorded>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mounted(&self) -> Option<String> {
        self.recorded().mounted.clone()
    }

    pub fn mount_count(&self) -> usize {
        self.recorded().mount_count
    }

    pub fn patches(&self) -> Vec<(String, String)> {
        self.recorded().patches.clone()
    }

    /// The most recent content patched into `element_id`.
    pub fn patched(&self, element_id: &str) -> Option<String> {
        self.recorded()
            .patches
            .iter()
            .rev()
            .find(|(id, _)| id == element_id)
            .map(|(_, html)| html.clone())
    }

    pub fn toggles(&self) -> Vec<(String, String)> {
        self.recorded().toggles.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.recorded().navigations.clone()
    }

    pub fn reload_count(&self) -> usize {
        self.recorded().reloads
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.recorded().notifications.clone()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.recorded()
            .notifications
            .iter()
            .filter_map(|n| match n {
                Notification::Show(toast) => Some(toast.clone()),
                Notification::DismissLoading => None,
            })
            .collect()
    }

    pub fn last_toast(&self) -> Option<Toast> {
        self.toasts().pop()
    }
}

impl Host for MemoryHost {
    fn mount(&self, html: &str) {
        let mut recorded = self.recorded();
        recorded.mounted = Some(html.to_string());
        recorded.mount_count += 1;
    }

    fn patch(&self, element_id: &str, html: &str) {
        self.recorded()
            .patches
            .push((element_id.to_string(), html.to_string()));
    }

    fn toggle_class(&self, element_id: &str, class: &str) {
        self.recorded()
            .toggles
            .push((element_id.to_string(), class.to_string()));
    }

    fn navigate(&self, fragment: &str) {
        self.recorded().navigations.push(fragment.to_string());
    }

    fn reload(&self) {
        self.recorded().reloads += 1;
    }

    fn notify(&self, notification: Notification) {
        self.recorded().notifications.push(notification);
    }
}
