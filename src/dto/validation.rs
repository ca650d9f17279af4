//! Validation helpers for DTOs.

use validator::{Validate, ValidationError};

use crate::error::ServiceError;

/// Run derive-based validation and fold the failures into one message.
pub fn check<T: Validate>(payload: &T) -> Result<(), ServiceError> {
    payload.validate().map_err(|errors| {
        let mut parts: Vec<String> = errors
            .to_string()
            .lines()
            .map(str::to_string)
            .collect();
        parts.sort();
        ServiceError::validation(parts.join("; "))
    })
}

/// Charset check for squad tags; the service normalizes case afterwards.
pub fn validate_tag(tag: &str) -> Result<(), ValidationError> {
    let trimmed = tag.trim();
    if !(2..=5).contains(&trimmed.len()) {
        let mut err = ValidationError::new("tag_length");
        err.message = Some("tag must be 2-5 characters".into());
        return Err(err);
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        let mut err = ValidationError::new("tag_charset");
        err.message = Some("tag must be alphanumeric".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tag_valid() {
        assert!(validate_tag("GG").is_ok());
        assert!(validate_tag("ab1").is_ok());
        assert!(validate_tag("FIVER").is_ok());
    }

    #[test]
    fn test_validate_tag_invalid() {
        assert!(validate_tag("a").is_err()); // too short
        assert!(validate_tag("SIXSIX").is_err()); // too long
        assert!(validate_tag("AB-C").is_err()); // punctuation
        assert!(validate_tag("").is_err());
    }
}
