//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Validate a login handle: 3 to 20 ASCII letters or digits
pub fn validate_login(login: &str) -> Result<(), String> {
    if login.is_empty() {
        return Err("Login is required".to_string());
    }

    if login.len() < 3 {
        return Err("Login must be at least 3 characters long".to_string());
    }

    if login.len() > 20 {
        return Err("Login must be at most 20 characters long".to_string());
    }

    static LOGIN_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    let regex = LOGIN_REGEX.get_or_init(|| Regex::new(r"^[a-zA-Z0-9]+$").ok());

    if !regex.as_ref().is_some_and(|re| re.is_match(login)) {
        return Err("Login can only contain letters and numbers".to_string());
    }

    Ok(())
}

/// Validate password: 8 to 32 characters with at least one letter and one digit
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    let length = password.chars().count();

    if length < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if length > 32 {
        return Err("Password must be at most 32 characters long".to_string());
    }

    let mut has_letter = false;
    let mut has_digit = false;

    for c in password.chars() {
        if c.is_ascii_alphabetic() {
            has_letter = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        }
    }

    if !has_letter {
        return Err("Password must contain at least one letter".to_string());
    }

    if !has_digit {
        return Err("Password must contain at least one digit".to_string());
    }

    Ok(())
}
