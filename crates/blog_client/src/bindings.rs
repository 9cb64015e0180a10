//! crates/blog_client/src/bindings.rs
//!
//! The interactive half of a page. A render produces markup plus a table of
//! bindings keyed by element id; the host forwards DOM events as `UiEvent`s
//! and `App::dispatch` looks the matching action up in the current table.

use std::collections::HashMap;

use crate::services::ImageFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Submit,
    Input,
    Change,
    KeyDown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // --- Layout ---
    /// Flip a CSS class on another element (menus, password visibility).
    Toggle { element_id: String, class: String },
    Logout,

    // --- Auth ---
    SubmitLogin,
    SubmitRegister,
    GoogleSignIn,
    ForgotPassword,
    SubmitForgotPassword,
    SubmitResetPassword { token: String },

    // --- Home and blog detail ---
    LoadCategory(String),
    ToggleLike,

    // --- Editor ---
    UploadBanner,
    EditTitle,
    EditContent,
    ProceedToPublish,
    SaveDraft,
    BackToEditor,
    EditDescription,
    AddTag,
    RemoveTag(String),
    Publish,

    // --- Profile ---
    EditBio,
    SubmitProfile,
    UploadProfileImage,

    // --- Admin ---
    /// Rewrite the admin listing URL; `tag`/`search` are the values to keep
    /// unless the event supplies new ones.
    AdminNavigate {
        page: i64,
        tag: Option<String>,
        search: Option<String>,
    },
    DeleteBlog(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub element_id: String,
    pub event: EventKind,
    pub action: Action,
}

impl Binding {
    pub fn new(element_id: impl Into<String>, event: EventKind, action: Action) -> Self {
        Self {
            element_id: element_id.into(),
            event,
            action,
        }
    }

    pub fn click(element_id: impl Into<String>, action: Action) -> Self {
        Self::new(element_id, EventKind::Click, action)
    }

    pub fn submit(element_id: impl Into<String>, action: Action) -> Self {
        Self::new(element_id, EventKind::Submit, action)
    }
}

/// A DOM event forwarded by the host, with the form values it carried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiEvent {
    pub target: String,
    pub event: Option<EventKind>,
    pub values: HashMap<String, String>,
    pub file: Option<ImageFile>,
}

impl UiEvent {
    pub fn new(target: impl Into<String>, event: EventKind) -> Self {
        Self {
            target: target.into(),
            event: Some(event),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn with_file(mut self, file: ImageFile) -> Self {
        self.file = Some(file);
        self
    }

    /// A trimmed form value, empty when absent.
    pub fn value(&self, name: &str) -> String {
        self.values
            .get(name)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }
}

/// Finds the action bound to the event's target.
pub fn lookup<'a>(bindings: &'a [Binding], event: &UiEvent) -> Option<&'a Action> {
    bindings
        .iter()
        .find(|b| b.element_id == event.target && Some(b.event) == event.event)
        .map(|b| &b.action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_matches_id_and_event_kind() {
        let table = vec![
            Binding::submit("authForm", Action::SubmitLogin),
            Binding::click("googleAuth", Action::GoogleSignIn),
        ];

        let submit = UiEvent::new("authForm", EventKind::Submit);
        assert_eq!(lookup(&table, &submit), Some(&Action::SubmitLogin));

        let click_on_form = UiEvent::new("authForm", EventKind::Click);
        assert_eq!(lookup(&table, &click_on_form), None);
    }

    #[test]
    fn values_are_trimmed() {
        let event = UiEvent::new("f", EventKind::Submit).with_value("email", "  a@b.com ");
        assert_eq!(event.value("email"), "a@b.com");
        assert_eq!(event.value("missing"), "");
    }
}
