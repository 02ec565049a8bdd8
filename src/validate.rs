//! Field-level validation for incoming user and recipe payloads.
//!
//! Validators are pure: they take the raw (possibly absent) field and return
//! either the cleaned value or a [`ValidationError`]. Username uniqueness is
//! deliberately not checked here; the store enforces it at insert time.

use thiserror::Error;

pub const MIN_INSTRUCTIONS_LEN: usize = 50;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field was present but blank.
    #[error("{0} is required")]
    EmptyField(&'static str),
    /// Field was missing from the request body.
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} must be at least {min} characters long")]
    TooShort { field: &'static str, min: usize },
}

pub fn username(value: Option<&str>) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::EmptyField("Username")),
    }
}

/// Signup requires a password but imposes no length or complexity rule.
pub fn password(value: Option<&str>) -> Result<String, ValidationError> {
    match value {
        Some(v) => Ok(v.to_string()),
        None => Err(ValidationError::MissingField("Password")),
    }
}

pub fn recipe_title(value: Option<&str>) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::EmptyField("Title")),
    }
}

/// Instructions must carry at least [`MIN_INSTRUCTIONS_LEN`] characters;
/// the boundary is inclusive, so exactly 50 passes.
pub fn recipe_instructions(value: Option<&str>) -> Result<String, ValidationError> {
    let v = value.unwrap_or("");
    if v.chars().count() < MIN_INSTRUCTIONS_LEN {
        return Err(ValidationError::TooShort {
            field: "Instructions",
            min: MIN_INSTRUCTIONS_LEN,
        });
    }
    Ok(v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rejects_absent_and_blank() {
        assert_eq!(username(None), Err(ValidationError::EmptyField("Username")));
        assert_eq!(username(Some("")), Err(ValidationError::EmptyField("Username")));
        assert_eq!(username(Some("   ")), Err(ValidationError::EmptyField("Username")));
        assert_eq!(username(Some("amy")).unwrap(), "amy");
    }

    #[test]
    fn username_error_message() {
        let err = username(None).unwrap_err();
        assert_eq!(err.to_string(), "Username is required");
    }

    #[test]
    fn password_only_requires_presence() {
        assert_eq!(password(None), Err(ValidationError::MissingField("Password")));
        // No complexity rule: even an empty password passes the validator.
        assert_eq!(password(Some("")).unwrap(), "");
        assert_eq!(password(Some("pw1")).unwrap(), "pw1");
    }

    #[test]
    fn title_rejects_blank() {
        assert_eq!(recipe_title(Some(" ")), Err(ValidationError::EmptyField("Title")));
        assert_eq!(recipe_title(Some("Toast")).unwrap(), "Toast");
    }

    #[test]
    fn instructions_boundary_is_inclusive() {
        let too_short = "x".repeat(49);
        let exactly = "x".repeat(50);
        assert!(recipe_instructions(Some(&too_short)).is_err());
        assert_eq!(recipe_instructions(Some(&exactly)).unwrap(), exactly);
    }

    #[test]
    fn instructions_absent_counts_as_too_short() {
        let err = recipe_instructions(None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Instructions must be at least 50 characters long"
        );
    }

    #[test]
    fn instructions_length_counts_characters_not_bytes() {
        let fifty_multibyte = "å".repeat(50);
        assert!(recipe_instructions(Some(&fifty_multibyte)).is_ok());
    }
}
