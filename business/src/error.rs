//! Error taxonomy shared by the credential flow and flag synchronization.

use thiserror::Error;

use crate::http::HttpError;

/// Input rejected locally. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please enter a new password.")]
    EmptyPassword,
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("Please enter your current password.")]
    MissingCurrentPassword,
}

/// The backend did not accept a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("server did not confirm the update")]
    Falsy,
}

impl From<HttpError> for RemoteError {
    fn from(err: HttpError) -> Self {
        Self::Transport(err.message)
    }
}

/// Failure reported by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no signed-in user")]
    NoCurrentUser,
    #[error("authentication provider rejected the request ({code}): {message}")]
    Rejected { code: u16, message: String },
    #[error("signed in as a different user")]
    UserMismatch,
    #[error("authentication provider unreachable: {0}")]
    Transport(String),
    #[error("unexpected authentication provider response: {0}")]
    Decode(String),
}

impl From<HttpError> for AuthError {
    fn from(err: HttpError) -> Self {
        Self::Transport(err.message)
    }
}

/// Why a credential controller operation did not start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{operation} is not available while {state:?}")]
    InvalidState {
        operation: &'static str,
        state: crate::CredentialState,
    },
    #[error("a submission is already in progress")]
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    #[error("flag {0} already has an update in flight")]
    InFlight(ustr::Ustr),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
