//! Error types for remote API calls

use std::fmt;

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that can occur while talking to the remote API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Network or HTTP-layer failure without a structured body
    Transport { message: String },

    /// The server rejected the operation and supplied a diagnostic
    Remote { status: u16, message: String },
}

impl GatewayError {
    pub fn transport(message: impl ToString) -> Self {
        GatewayError::Transport {
            message: message.to_string(),
        }
    }

    pub fn remote(status: u16, message: impl ToString) -> Self {
        GatewayError::Remote {
            status,
            message: message.to_string(),
        }
    }

    /// Diagnostic suitable for display next to a retry affordance
    pub fn message(&self) -> &str {
        match self {
            GatewayError::Transport { message } => message,
            GatewayError::Remote { message, .. } => message,
        }
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Transport { message } => write!(f, "transport error: {}", message),
            GatewayError::Remote { status, message } => {
                write!(f, "remote error (HTTP {}): {}", status, message)
            }
        }
    }
}

impl std::error::Error for GatewayError {}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::transport(err)
    }
}
