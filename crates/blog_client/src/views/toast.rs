//! crates/blog_client/src/views/toast.rs
//!
//! Markup for the toast stack a browser host keeps in its own container.

use maud::{html, Markup};

use crate::host::{Toast, ToastLevel};

fn icon(level: ToastLevel) -> &'static str {
    match level {
        ToastLevel::Success => "fa-solid fa-circle-check",
        ToastLevel::Error => "fa-solid fa-circle-xmark",
        ToastLevel::Warning => "fa-solid fa-triangle-exclamation",
        ToastLevel::Info => "fa-solid fa-circle-info",
        ToastLevel::Loading => "fa-solid fa-spinner fa-spin",
    }
}

pub fn toast(toast: &Toast) -> Markup {
    html! {
        div class={ "toast toast-" (toast.level.as_str()) } role="status" {
            i class=(icon(toast.level)) {}
            span { (toast.message) }
        }
    }
}

pub fn toast_stack(toasts: &[Toast]) -> Markup {
    html! {
        div #toast-container class="fixed top-4 right-4 z-50 flex flex-col gap-2" {
            @for item in toasts {
                (toast(item))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_carries_its_level() {
        let html = toast(&Toast {
            level: ToastLevel::Error,
            message: "Nope".into(),
        })
        .into_string();
        assert!(html.contains("toast-error"));
        assert!(html.contains("Nope"));
    }
}
