//! crates/blog_core/src/validation.rs
//!
//! Input rules shared by the client (checked before any request is sent) and
//! the API service (checked again on arrival). The `Display` text of each
//! variant is the message shown to the user.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{BlogInput, ProfileUpdate};

pub const DESCRIPTION_LIMIT: usize = 200;
pub const TAG_LIMIT: usize = 10;
pub const BIO_LIMIT: usize = 150;
pub const FULLNAME_MIN: usize = 3;
pub const USERNAME_MIN: usize = 3;

// ASCII word characters only.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)^\w+([\.-]?\w+)*@\w+([\.-]?\w+)*(\.\w{2,3})+$").expect("email pattern compiles")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Enter your email")]
    MissingEmail,
    #[error("Enter your password")]
    MissingPassword,
    #[error("Fullname must be at least 3 characters")]
    FullnameTooShort,
    #[error("Email is not valid")]
    InvalidEmail,
    #[error("Password must be 6-20 chars, include uppercase, lowercase, number")]
    WeakPassword,
    #[error("Please fill in all password fields")]
    MissingPasswordFields,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Write a title for your blog")]
    MissingTitle,
    #[error("Write some content before publishing")]
    MissingContent,
    #[error("Write a short description for your blog")]
    MissingDescription,
    #[error("Description is too long (max 200 characters)")]
    DescriptionTooLong,
    #[error("Upload a blog banner to publish it")]
    MissingBanner,
    #[error("Blog must have between 1 and 10 tags")]
    TagCount,
    #[error("Tag already exists.")]
    DuplicateTag,
    #[error("You can only add up to 10 tags.")]
    TooManyTags,
    #[error("Username should be at least 3 letters long")]
    UsernameTooShort,
    #[error("Bio should not be more than 150 characters")]
    BioTooLong,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// 6 to 20 characters with at least one digit, one lowercase and one
/// uppercase letter.
pub fn is_strong_password(password: &str) -> bool {
    let len = password.chars().count();
    (6..=20).contains(&len)
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
}

/// Checks a sign-in or sign-up form. `fullname` is only consulted when
/// registering.
pub fn check_credentials(
    email: &str,
    password: &str,
    fullname: Option<&str>,
) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if password.is_empty() {
        return Err(ValidationError::MissingPassword);
    }
    if let Some(name) = fullname {
        if name.chars().count() < FULLNAME_MIN {
            return Err(ValidationError::FullnameTooShort);
        }
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !is_strong_password(password) {
        return Err(ValidationError::WeakPassword);
    }
    Ok(())
}

pub fn check_password_reset(new_password: &str, confirm: &str) -> Result<(), ValidationError> {
    if new_password.is_empty() || confirm.is_empty() {
        return Err(ValidationError::MissingPasswordFields);
    }
    if new_password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    if !is_strong_password(new_password) {
        return Err(ValidationError::WeakPassword);
    }
    Ok(())
}

/// Drafts only need a title and some content; publishing also needs a
/// description, a banner and a sane number of tags.
pub fn check_blog(input: &BlogInput, draft: bool) -> Result<(), ValidationError> {
    if input.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if !draft {
        if input.des.trim().is_empty() {
            return Err(ValidationError::MissingDescription);
        }
        if input.des.chars().count() > DESCRIPTION_LIMIT {
            return Err(ValidationError::DescriptionTooLong);
        }
        if input.banner.is_empty() {
            return Err(ValidationError::MissingBanner);
        }
        if input.tags.is_empty() || input.tags.len() > TAG_LIMIT {
            return Err(ValidationError::TagCount);
        }
    }
    if input.content.is_empty() {
        return Err(ValidationError::MissingContent);
    }
    Ok(())
}

/// Rules for adding one more tag to an existing list.
pub fn check_new_tag(existing: &[String], tag: &str) -> Result<(), ValidationError> {
    if existing.iter().any(|t| t == tag) {
        return Err(ValidationError::DuplicateTag);
    }
    if existing.len() >= TAG_LIMIT {
        return Err(ValidationError::TooManyTags);
    }
    Ok(())
}

pub fn check_profile(update: &ProfileUpdate) -> Result<(), ValidationError> {
    if update.username.chars().count() < USERNAME_MIN {
        return Err(ValidationError::UsernameTooShort);
    }
    if update.bio.chars().count() > BIO_LIMIT {
        return Err(ValidationError::BioTooLong);
    }
    Ok(())
}
