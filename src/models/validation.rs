use thiserror::Error;

/// Client-side rejection of a creation payload before it reaches a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("invalid email format: {0}")]
    InvalidEmail(String),
}

/// Fail with `MissingField` when `value` is blank.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }
    let (local, domain) = (parts[0], parts[1]);
    !local.is_empty() && !domain.is_empty() && domain.contains('.')
}

pub(crate) fn check_email(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert!(require("name", "Rahul").is_ok());
        assert_eq!(require("name", "   "), Err(ValidationError::MissingField("name")));
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("rahul@company.com"));
        assert!(!is_valid_email("rahul"));
        assert!(!is_valid_email("rahul@company"));
        assert!(!is_valid_email("@company.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(ValidationError::MissingField("email").to_string(), "email is required");
        assert_eq!(
            ValidationError::InvalidEmail("x".into()).to_string(),
            "invalid email format: x"
        );
    }
}
