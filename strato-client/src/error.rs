//! Client error types.

use thiserror::Error;

/// Errors surfaced by control plane operations.
///
/// Transport implementations must map remote "does not exist" responses to
/// [`ClientError::NotFound`]; the resource handlers rely on that distinction
/// instead of inspecting message text.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The referenced resource does not exist on the control plane.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other control plane failure (transport, auth, server-side).
    #[error("remote error: {0}")]
    Remote(String),
}

impl ClientError {
    /// Whether this error means the resource is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
