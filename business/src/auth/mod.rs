//! Authentication provider seam.
//!
//! The credential flow only needs four operations from the provider. Production uses
//! [`IdentityToolkitProvider`]; tests plug in a recording fake.

mod identity_toolkit;

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use backoffice_states::State;

pub use identity_toolkit::IdentityToolkitProvider;

use crate::{AuthError, ResetRedirect};

/// The signed-in account as the provider sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    /// Short-lived token proving a recent sign-in. Required by `update_password`.
    pub id_token: Option<String>,
}

/// Email/password pair used to re-prove identity.
#[derive(Clone, PartialEq, Eq)]
pub struct EmailCredential {
    pub email: String,
    pub password: String,
}

impl Debug for EmailCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailCredential")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync + Debug {
    fn current_user(&self) -> Option<AuthUser>;

    async fn reauthenticate(
        &self,
        user: &AuthUser,
        credential: &EmailCredential,
    ) -> Result<AuthUser, AuthError>;

    async fn update_password(&self, user: &AuthUser, new_password: &str) -> Result<(), AuthError>;

    async fn send_password_reset_email(
        &self,
        email: &str,
        redirect: &ResetRedirect,
    ) -> Result<(), AuthError>;
}

/// Shared provider handle stored in the state context.
#[derive(Debug, Clone)]
pub struct AuthProviderState {
    pub inner: Arc<dyn AuthProvider>,
}

impl AuthProviderState {
    pub fn new(inner: Arc<dyn AuthProvider>) -> Self {
        Self { inner }
    }
}

impl State for AuthProviderState {
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
