//! Input validation functions
//!
//! This module provides validation and normalization utilities for user input.
//! Validators return `Result<(), String>`; callers attach the field name
//! through [`ValidationError`].

use rust_decimal::Decimal;
use std::sync::OnceLock;

/// Maximum length of names, titles and emails
pub const MAX_TEXT_LENGTH: usize = 255;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 5;

/// Recipe prices are stored as NUMERIC(5, 2)
const MAX_PRICE_SCALE: u32 = 2;
const MAX_PRICE: i64 = 1000;

fn email_regex() -> &'static regex_lite::Regex {
    static EMAIL_REGEX: OnceLock<regex_lite::Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
    })
}

/// Normalize an email address by lowercasing its domain part.
///
/// The local part is left untouched since it may be case-sensitive.
/// Surrounding whitespace is removed. Applying it twice gives the same result.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > MAX_TEXT_LENGTH {
        return Err("Email too long".to_string());
    }
    if !email_regex().is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate a tag or ingredient name
pub fn validate_name(name: &str) -> Result<(), String> {
    validate_text(name, "Name")
}

/// Validate a recipe title
pub fn validate_title(title: &str) -> Result<(), String> {
    validate_text(title, "Title")
}

fn validate_text(value: &str, label: &str) -> Result<(), String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("{} cannot be blank", label));
    }
    if value.chars().count() > MAX_TEXT_LENGTH {
        return Err(format!(
            "{} must be at most {} characters",
            label, MAX_TEXT_LENGTH
        ));
    }
    Ok(())
}

/// Validate preparation time in minutes
pub fn validate_time_minutes(minutes: i32) -> Result<(), String> {
    if minutes < 0 {
        return Err("Time cannot be negative".to_string());
    }
    Ok(())
}

/// Validate a recipe price (at most 3 integer digits and 2 decimal places)
pub fn validate_price(price: &Decimal) -> Result<(), String> {
    if price.is_sign_negative() {
        return Err("Price cannot be negative".to_string());
    }
    if *price >= Decimal::from(MAX_PRICE) {
        return Err(format!("Price must be less than {}", MAX_PRICE));
    }
    if price.normalize().scale() > MAX_PRICE_SCALE {
        return Err("Price must have at most 2 decimal places".to_string());
    }
    Ok(())
}

/// Validate the link attached to a recipe (empty means no link)
pub fn validate_link(link: &str) -> Result<(), String> {
    if link.len() > MAX_TEXT_LENGTH {
        return Err(format!(
            "Link must be at most {} characters",
            MAX_TEXT_LENGTH
        ));
    }
    Ok(())
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Attach a field name to the result of a validator
    pub fn check(field: &str, result: Result<(), String>) -> Result<(), Self> {
        result.map_err(|message| Self::new(field, &message))
    }
}
