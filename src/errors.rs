use serde::Serialize;

/// Error type shared by every service in the crate.
///
/// All failures here are local, synchronous validation failures returned to
/// the immediate caller; none is transient and none triggers a retry.
#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl ServiceError {
    /// Returns the message suitable for showing to an end user.
    /// Configuration problems surface a generic message to avoid leaking
    /// deployment details.
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(_) => "Internal configuration error".to_string(),
            _ => self.to_string(),
        }
    }

    /// True when the error was caused by the submitted data rather than the
    /// state of the system.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidDate(_) | Self::CapacityExceeded(_)
        )
    }
}
