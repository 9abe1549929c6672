//! Error types for the DecisionIQ client.

use thiserror::Error;

/// A shared error type for the entire DecisionIQ client.
///
/// The first five variants are the taxonomy surfaced by remote operations;
/// the rest cover local concerns (storage, configuration, store consistency).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiqError {
    /// Missing, invalid or expired credential
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A client-side precondition was not met; no request was sent
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// The server answered with a non-2xx status
    #[error("Server rejected request ({status}): {message}")]
    ServerRejected { status: u16, message: String },

    /// The request never completed
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// A body was expected but could not be parsed
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Another mutation on the same record has not resolved yet
    #[error("Operation already in progress for '{0}'")]
    OperationInProgress(String),

    /// The session a request belonged to ended before its answer arrived
    #[error("Session changed: {0}")]
    SessionChanged(String),

    /// Local persistence error (credential file, config file)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DiqError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates a ValidationFailed error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed(message.into())
    }

    /// Creates a ServerRejected error
    pub fn server_rejected(status: u16, message: impl Into<String>) -> Self {
        Self::ServerRejected {
            status,
            message: message.into(),
        }
    }

    /// Creates a NetworkFailure error
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkFailure(message.into())
    }

    /// Creates a MalformedResponse error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailed(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::NetworkFailure(_))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::OperationInProgress(_))
    }

    pub fn is_session_changed(&self) -> bool {
        matches!(self, Self::SessionChanged(_))
    }

    /// Message suitable for a user-facing notification.
    ///
    /// Server-provided messages are passed through verbatim; everything else
    /// uses the `Display` rendering.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized(message)
            | Self::ValidationFailed(message)
            | Self::ServerRejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for DiqError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for DiqError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DiqError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for DiqError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, DiqError>`.
pub type Result<T> = std::result::Result<T, DiqError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_passes_server_text_through() {
        let err = DiqError::server_rejected(401, "No active account found");
        assert_eq!(err.user_message(), "No active account found");

        let err = DiqError::validation("Please fill in situation and decision");
        assert_eq!(err.user_message(), "Please fill in situation and decision");
    }

    #[test]
    fn test_user_message_falls_back_to_display() {
        let err = DiqError::network("connection refused");
        assert_eq!(err.user_message(), "Network failure: connection refused");
    }

    #[test]
    fn test_io_error_becomes_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DiqError = io.into();
        assert!(matches!(err, DiqError::Storage(_)));
    }
}
