//! crates/blog_client/src/views/auth.rs
//!
//! Sign-in, sign-up and password recovery forms.

use maud::{html, Markup};

use crate::bindings::{Action, Binding};
use crate::views::components::{input_box, password_toggle, InputBox};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

pub fn auth_form(mode: AuthMode) -> Markup {
    let (heading, submit, switch_text, switch_href, switch_label) = match mode {
        AuthMode::Login => (
            "Welcome back",
            "Sign In",
            "Don't have an account?",
            "#/register",
            "Join us today",
        ),
        AuthMode::Register => (
            "Join us today",
            "Sign Up",
            "Already a member?",
            "#/login",
            "Sign in here",
        ),
    };

    html! {
        section class="h-cover flex items-center justify-center" {
            form #authForm class="w-[80%] max-w-[400px]" {
                h1 class="text-4xl font-gelasio capitalize text-center mb-24" { (heading) }
                @if mode == AuthMode::Register {
                    (input_box(&InputBox {
                        name: "fullname",
                        kind: "text",
                        id: "fullname",
                        value: "",
                        placeholder: "Full Name",
                        icon: "fa-solid fa-user",
                    }))
                }
                (input_box(&InputBox {
                    name: "email",
                    kind: "email",
                    id: "email",
                    value: "",
                    placeholder: "Email",
                    icon: "fa-solid fa-envelope",
                }))
                (input_box(&InputBox {
                    name: "password",
                    kind: "password",
                    id: "password",
                    value: "",
                    placeholder: "Password",
                    icon: "fa-solid fa-key",
                }))
                @if mode == AuthMode::Login {
                    div class="text-right" {
                        button #forgotPasswordLink type="button" class="underline text-gray-600" {
                            "Forgot password?"
                        }
                    }
                }
                button class="btn-dark center mt-14" type="submit" { (submit) }
                div class="relative w-full flex items-center gap-2 my-10 opacity-10 uppercase text-black font-bold" {
                    hr class="w-1/2 border-black";
                    p { "or" }
                    hr class="w-1/2 border-black";
                }
                button #googleAuth type="button" class="btn-dark flex items-center justify-center gap-4 w-[90%] center" {
                    i class="fa-brands fa-google" {}
                    "Continue with Google"
                }
                p class="mt-6 text-gray-600 text-xl text-center" {
                    (switch_text) " "
                    a href=(switch_href) class="underline text-black text-xl ml-1" { (switch_label) }
                }
            }
        }
    }
}

pub fn auth_bindings(mode: AuthMode) -> Vec<Binding> {
    let submit = match mode {
        AuthMode::Login => Action::SubmitLogin,
        AuthMode::Register => Action::SubmitRegister,
    };
    let mut bindings = vec![
        Binding::submit("authForm", submit),
        Binding::click("googleAuth", Action::GoogleSignIn),
        password_toggle("password"),
    ];
    if mode == AuthMode::Login {
        bindings.push(Binding::click("forgotPasswordLink", Action::ForgotPassword));
    }
    bindings
}

pub fn forgot_password_form() -> Markup {
    html! {
        section class="h-cover flex items-center justify-center" {
            form #forgotForm class="w-[80%] max-w-[400px]" {
                h1 class="text-4xl font-gelasio text-center mb-12" { "Forgot password" }
                p class="text-gray-600 text-center mb-8" {
                    "Enter the email you signed up with and we will send you a reset link."
                }
                (input_box(&InputBox {
                    name: "email",
                    kind: "email",
                    id: "email",
                    value: "",
                    placeholder: "Email",
                    icon: "fa-solid fa-envelope",
                }))
                button class="btn-dark center mt-10" type="submit" { "Send reset link" }
                p class="mt-6 text-center" {
                    a href="#/login" class="underline" { "Back to sign in" }
                }
            }
        }
    }
}

pub fn forgot_password_bindings() -> Vec<Binding> {
    vec![Binding::submit("forgotForm", Action::SubmitForgotPassword)]
}

pub fn reset_password_form(token: &str) -> Markup {
    html! {
        section class="h-cover flex items-center justify-center" {
            @if token.is_empty() {
                div class="text-center" {
                    h1 class="text-3xl font-gelasio mb-6" { "This reset link is not valid" }
                    a href="#/forgot-password" class="underline" { "Request a new one" }
                }
            } @else {
                form #resetForm class="w-[80%] max-w-[400px]" {
                    h1 class="text-4xl font-gelasio text-center mb-12" { "Reset password" }
                    (input_box(&InputBox {
                        name: "new-password",
                        kind: "password",
                        id: "new-password",
                        value: "",
                        placeholder: "New password",
                        icon: "fa-solid fa-key",
                    }))
                    (input_box(&InputBox {
                        name: "confirm-password",
                        kind: "password",
                        id: "confirm-password",
                        value: "",
                        placeholder: "Confirm password",
                        icon: "fa-solid fa-key",
                    }))
                    button class="btn-dark center mt-10" type="submit" { "Reset password" }
                }
            }
        }
    }
}

pub fn reset_password_bindings(token: &str) -> Vec<Binding> {
    if token.is_empty() {
        return Vec::new();
    }
    vec![
        Binding::submit(
            "resetForm",
            Action::SubmitResetPassword {
                token: token.to_string(),
            },
        ),
        password_toggle("new-password"),
        password_toggle("confirm-password"),
    ]
}
