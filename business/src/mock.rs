//! Scriptable [`AuthProvider`] for tests.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::auth::{AuthProvider, AuthUser, EmailCredential};
use crate::{AuthError, ResetRedirect};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCall {
    Reauthenticate { email: String, password: String },
    UpdatePassword { password: String },
    SendPasswordReset { email: String, redirect: ResetRedirect },
}

/// Records every call and answers with preconfigured results.
#[derive(Debug)]
pub struct RecordingAuthProvider {
    user: Option<AuthUser>,
    reauth: Result<(), AuthError>,
    update: Result<(), AuthError>,
    reset: Result<(), AuthError>,
    calls: Mutex<Vec<AuthCall>>,
}

impl RecordingAuthProvider {
    pub fn new(uid: &str, email: &str) -> Self {
        Self {
            user: Some(AuthUser {
                uid: uid.to_owned(),
                email: Some(email.to_owned()),
                id_token: None,
            }),
            reauth: Ok(()),
            update: Ok(()),
            reset: Ok(()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            user: None,
            ..Self::new("", "")
        }
    }

    pub fn failing_reauth(mut self, err: AuthError) -> Self {
        self.reauth = Err(err);
        self
    }

    pub fn failing_update(mut self, err: AuthError) -> Self {
        self.update = Err(err);
        self
    }

    pub fn failing_reset(mut self, err: AuthError) -> Self {
        self.reset = Err(err);
        self
    }

    pub fn calls(&self) -> Vec<AuthCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Addresses that were sent a password reset email.
    pub fn reset_emails(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                AuthCall::SendPasswordReset { email, .. } => Some(email),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: AuthCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

#[async_trait]
impl AuthProvider for RecordingAuthProvider {
    fn current_user(&self) -> Option<AuthUser> {
        self.user.clone()
    }

    async fn reauthenticate(
        &self,
        user: &AuthUser,
        credential: &EmailCredential,
    ) -> Result<AuthUser, AuthError> {
        self.record(AuthCall::Reauthenticate {
            email: credential.email.clone(),
            password: credential.password.clone(),
        });
        self.reauth.clone().map(|()| AuthUser {
            id_token: Some("token".to_owned()),
            ..user.clone()
        })
    }

    async fn update_password(&self, _user: &AuthUser, new_password: &str) -> Result<(), AuthError> {
        self.record(AuthCall::UpdatePassword {
            password: new_password.to_owned(),
        });
        self.update.clone()
    }

    async fn send_password_reset_email(
        &self,
        email: &str,
        redirect: &ResetRedirect,
    ) -> Result<(), AuthError> {
        self.record(AuthCall::SendPasswordReset {
            email: email.to_owned(),
            redirect: redirect.clone(),
        });
        self.reset.clone()
    }
}
