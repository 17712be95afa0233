//! Account credential change flow.
//!
//! A dialog walks the signed-in user through a new email address, then a new
//! password. The password step reauthenticates against the authentication provider
//! before updating, and falls back to emailing a reset link when anything fails.
//!
//! ```text
//! CollectingEmail ──submit_email ok──▶ CollectingPassword ──submit_password ok──▶ Complete
//!                                              │
//!                                              └──── reauth/update failed ────▶ PasswordFailed
//! ```
//!
//! There is no way back to `CollectingEmail`, and `PasswordFailed` needs a fresh
//! controller to retry.

mod commands;
mod controller;
mod validation;

use std::any::Any;

use backoffice_states::{Compute, State, assign_impl};

pub use commands::{SubmitEmailCommand, SubmitPasswordCommand};
pub use controller::CredentialChangeController;
pub use validation::{validate_email, validate_passwords};

use crate::CredentialError;

pub(crate) const EMAIL_FAILED_TITLE: &str =
    "Failed to register the email address. Please submit again.";
pub(crate) const EMAIL_UPDATED_TITLE: &str = "Registered the new email address.";
pub(crate) const PASSWORD_FAILED_TITLE: &str = "An error occurred while updating the password. Contact an administrator to reset your password.";
pub(crate) const PASSWORD_UPDATED_TITLE: &str = "Password updated successfully.";
pub(crate) const PASSWORD_UPDATED_MESSAGE: &str = "Password updated";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialState {
    #[default]
    CollectingEmail,
    CollectingPassword,
    PasswordFailed,
    Complete,
}

impl CredentialState {
    /// Forward-only transitions.
    pub fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::CollectingEmail, Self::CollectingPassword)
                | (Self::CollectingPassword, Self::Complete | Self::PasswordFailed)
        )
    }
}

/// Which submission is currently waiting on the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStep {
    Email,
    Password,
}

/// Identity of the user the dialog was opened for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub uid: String,
}

impl SessionContext {
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into() }
    }
}

impl State for SessionContext {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

/// Editable fields of the dialog.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialInput {
    pub candidate_email: String,
    pub candidate_password: String,
    pub candidate_password_confirm: String,
    /// Only read when reauthenticating with [`ReauthMode::CurrentPassword`](crate::ReauthMode).
    pub current_password: String,
}

impl std::fmt::Debug for CredentialInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialInput")
            .field("candidate_email", &self.candidate_email)
            .finish_non_exhaustive()
    }
}

impl State for CredentialInput {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

/// What the dialog renders. Replaced wholesale by the submit commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialCompute {
    pub state: CredentialState,
    /// Last email known to be accepted by the backend.
    pub current_email: String,
    pub status_message: Option<String>,
    pub in_flight: Option<CredentialStep>,
}

impl CredentialCompute {
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Move to `next`, refusing anything but a forward step.
    pub fn advance(&mut self, next: CredentialState) -> Result<(), CredentialError> {
        if self.state.can_advance_to(next) {
            self.state = next;
            Ok(())
        } else {
            Err(CredentialError::InvalidState {
                operation: "advance",
                state: self.state,
            })
        }
    }
}

impl Compute for CredentialCompute {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }
}
