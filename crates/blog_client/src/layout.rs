//! crates/blog_client/src/layout.rs
//!
//! The frame a page is mounted in.

use maud::{html, Markup};

use crate::bindings::Binding;
use crate::context::UserContext;
use crate::views::components::{navbar, navbar_bindings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Navbar on top of the page.
    Main,
    /// Full-screen pages such as the editor.
    NoNav,
    /// Admin pages draw their own sidebar.
    Admin,
}

impl Layout {
    pub fn wrap(self, content: Markup, user: &UserContext) -> Markup {
        match self {
            Layout::Main => html! {
                div {
                    (navbar(user))
                    main { (content) }
                }
            },
            Layout::NoNav => content,
            Layout::Admin => html! {
                div class="admin-layout" {
                    main { (content) }
                }
            },
        }
    }

    /// Bindings the frame itself needs, installed after every mount.
    pub fn bindings(self, user: &UserContext) -> Vec<Binding> {
        match self {
            Layout::Main => navbar_bindings(user),
            Layout::NoNav | Layout::Admin => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_main_layout_has_a_navbar() {
        let user = UserContext::default();
        let body = html! { p { "hi" } };

        assert!(Layout::Main.wrap(body.clone(), &user).into_string().contains("navbar"));
        assert_eq!(Layout::NoNav.wrap(body.clone(), &user).into_string(), "<p>hi</p>");
        assert!(!Layout::Admin.wrap(body, &user).into_string().contains("navbar"));
        assert!(Layout::Admin.bindings(&user).is_empty());
        assert!(!Layout::Main.bindings(&user).is_empty());
    }
}
