use thiserror::Error;

use crate::models::ValidationError;

/// Failure of one call to the user API.
///
/// Transport errors, non-success statuses and undecodable bodies all collapse
/// into the variant for the operation; the detail is logged, not carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Failed to fetch users from the server.")]
    Fetch,
    #[error("Failed to add the user on the server.")]
    Add,
    #[error("Failed to update the user on the server.")]
    Update,
    #[error("Failed to delete the user on the server.")]
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("operation cancelled")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid mode '{0}' (expected 'mock' or 'live')")]
    InvalidMode(String),
    #[error("invalid API URL '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("API URL must use http or https: {0}")]
    UnsupportedScheme(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("unknown setting '{0}'")]
    UnknownKey(String),
    #[error(transparent)]
    Settings(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_messages_are_fixed() {
        assert_eq!(ApiError::Fetch.to_string(), "Failed to fetch users from the server.");
        assert_eq!(ApiError::Add.to_string(), "Failed to add the user on the server.");
        assert_eq!(ApiError::Update.to_string(), "Failed to update the user on the server.");
        assert_eq!(ApiError::Delete.to_string(), "Failed to delete the user on the server.");
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err = StoreError::from(ApiError::Add);
        assert_eq!(err.to_string(), "Failed to add the user on the server.");

        let err = StoreError::from(ValidationError::MissingField("name"));
        assert_eq!(err.to_string(), "name is required");
    }
}
