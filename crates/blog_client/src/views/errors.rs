//! crates/blog_client/src/views/errors.rs

use maud::{html, Markup};

pub fn not_found() -> Markup {
    html! {
        h1 { "404 - Page Not Found" }
    }
}

/// Shown in place of a page whose render failed.
pub fn server_error() -> Markup {
    html! {
        section class="h-cover flex flex-col items-center justify-center gap-6 text-center" {
            h1 class="text-4xl font-gelasio" { "500 - Something went wrong" }
            p class="text-gray-600" { "We could not load this page. Please try again later." }
            a href="#/" class="btn-dark" { "Back to home" }
        }
    }
}

/// Inline message for content that could not be loaded or does not exist.
pub fn placeholder(message: &str) -> Markup {
    html! {
        div class="text-center w-full p-10 text-gray-600" {
            p { (message) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_a_single_heading() {
        assert_eq!(not_found().into_string(), "<h1>404 - Page Not Found</h1>");
    }

    #[test]
    fn server_error_links_home() {
        let html = server_error().into_string();
        assert!(html.contains("500 - Something went wrong"));
        assert!(html.contains(r##"href="#/""##));
    }
}
