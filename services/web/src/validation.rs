//! Input validation utilities

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use crate::{
    error::{FieldErrors, ServiceResult},
    models::{
        MovieForm, MovieInput, NewUser,
        movie::embed_trailer_url,
        vote::{MAX_RATING, MIN_RATING},
    },
    paths::message,
};

/// Minimum length of a user name
pub const USER_LENGTH: usize = 4;
/// Minimum length of a password
pub const PWD_LENGTH: usize = 6;

/// Validate user name
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.trim().chars().count() < USER_LENGTH {
        return Err(message::USER_MIN);
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$",
        )
        .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(message::EMAIL_INVALID);
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < PWD_LENGTH {
        return Err(message::PASSWORD_MIN);
    }

    Ok(())
}

/// Validate a review comment
pub fn validate_comment(comment: &str) -> Result<(), &'static str> {
    if comment.trim().is_empty() {
        return Err(message::COMMENT_MIN);
    }

    Ok(())
}

/// Validate a rating value
pub fn validate_rating(rating: i32) -> Result<(), &'static str> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(message::RATING_RANGE);
    }

    Ok(())
}

/// Field checks of the registration form
///
/// Name and email availability need the user store and are checked by the
/// caller on top of this.
pub fn validate_new_user(user: &NewUser) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Err(msg) = validate_username(&user.name) {
        errors.add("name", msg);
    }
    if let Err(msg) = validate_email(&user.email) {
        errors.add("email", msg);
    }
    if let Err(msg) = validate_password(&user.password) {
        errors.add("password", msg);
    }

    errors
}

/// Validate and normalize the movie management form
///
/// Surrounding blanks are stripped, blank optional fields become `None` and
/// trailer links are stored in embeddable form.
pub fn validate_movie(form: &MovieForm) -> ServiceResult<MovieInput> {
    let mut errors = FieldErrors::new();

    let title = form.title.trim().to_string();
    if title.is_empty() {
        errors.add("title", message::TITLE_MIN);
    }

    let published_date = match non_blank(&form.published_date) {
        Some(raw) => match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.add("published_date", message::DATE_INVALID);
                None
            }
        },
        None => None,
    };

    errors.into_result()?;

    Ok(MovieInput {
        code: non_blank(&form.code),
        title,
        published_date,
        synopsis: non_blank(&form.synopsis),
        trailer_url: non_blank(&form.trailer_url).map(|url| embed_trailer_url(&url)),
    })
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
