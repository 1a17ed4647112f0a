//! Error type shared by the token exchange and every flow-service call.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AepError {
    /// The IMS token endpoint refused the credentials.
    #[error("access token request failed with status {status}: {body}")]
    Authentication { status: u16, body: String },

    /// Any other non-2xx response from the platform. The body is kept verbatim.
    #[error("platform request failed with status {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("failed to reach the platform: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode {context}: {message}")]
    Decode { context: String, message: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AepError {
    pub fn decode(context: impl Into<String>, err: impl std::fmt::Display) -> Self {
        AepError::Decode {
            context: context.into(),
            message: err.to_string(),
        }
    }

    /// HTTP status of the failed response, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            AepError::Authentication { status, .. } | AepError::Remote { status, .. } => {
                Some(*status)
            }
            AepError::Transport(e) => e.status().map(|s| s.as_u16()),
            AepError::Decode { .. } | AepError::InvalidInput(_) => None,
        }
    }

    /// Raw response body for authentication and remote failures.
    pub fn body(&self) -> Option<&str> {
        match self {
            AepError::Authentication { body, .. } | AepError::Remote { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, AepError::Authentication { .. })
    }
}
