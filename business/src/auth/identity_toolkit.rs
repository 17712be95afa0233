//! Identity Toolkit REST implementation of [`AuthProvider`].
//!
//! Endpoints (all `POST {base}/v1/accounts:<op>`, api key in the `X-Goog-Api-Key` header):
//! - `signInWithPassword` for reauthentication
//! - `update` to change the password
//! - `sendOobCode` with `requestType = PASSWORD_RESET` for the reset email

use std::sync::RwLock;

use async_trait::async_trait;
use log::{error, info};
use serde::{Deserialize, Serialize};

use super::{AuthProvider, AuthUser, EmailCredential};
use crate::http::{Client, Response};
use crate::{AuthError, BusinessConfig, ResetRedirect};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: Option<String>,
    id_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePasswordRequest<'a> {
    id_token: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePasswordResponse {
    id_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendOobCodeRequest<'a> {
    request_type: &'static str,
    email: &'a str,
    continue_url: &'a str,
    can_handle_code_in_app: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

#[derive(Debug)]
pub struct IdentityToolkitProvider {
    base_url: String,
    api_key: String,
    current: RwLock<Option<AuthUser>>,
}

impl IdentityToolkitProvider {
    pub fn new(config: &BusinessConfig) -> Self {
        Self {
            base_url: config.identity_api_url.trim_end_matches('/').to_owned(),
            api_key: config.identity_api_key.clone(),
            current: RwLock::new(None),
        }
    }

    /// Start with an already signed-in user, e.g. restored from the session.
    pub fn with_user(self, user: AuthUser) -> Self {
        self.set_current(Some(user));
        self
    }

    pub fn sign_out(&self) {
        self.set_current(None);
    }

    fn set_current(&self, user: Option<AuthUser>) {
        match self.current.write() {
            Ok(mut current) => *current = user,
            Err(_) => error!("IdentityToolkitProvider: current user lock poisoned"),
        }
    }

    fn url(&self, op: &str) -> String {
        format!("{}/v1/accounts:{op}", self.base_url)
    }

    async fn post<T: Serialize>(&self, op: &str, body: &T) -> Result<Response, AuthError> {
        let response = Client::post(&self.url(op), body)
            .map_err(|e| AuthError::Decode(format!("failed to serialize request: {e}")))?
            .header(API_KEY_HEADER, self.api_key.as_str())
            .send()
            .await?;

        if response.is_success() {
            Ok(response)
        } else {
            Err(rejection(&response))
        }
    }
}

fn rejection(response: &Response) -> AuthError {
    match response.json::<ErrorEnvelope>() {
        Ok(envelope) => AuthError::Rejected {
            code: envelope.error.code,
            message: envelope.error.message,
        },
        Err(_) => AuthError::Rejected {
            code: response.status,
            message: "unknown error".to_owned(),
        },
    }
}

#[async_trait]
impl AuthProvider for IdentityToolkitProvider {
    fn current_user(&self) -> Option<AuthUser> {
        self.current.read().ok().and_then(|current| current.clone())
    }

    async fn reauthenticate(
        &self,
        user: &AuthUser,
        credential: &EmailCredential,
    ) -> Result<AuthUser, AuthError> {
        let response = self
            .post(
                "signInWithPassword",
                &SignInRequest {
                    email: &credential.email,
                    password: &credential.password,
                    return_secure_token: true,
                },
            )
            .await?;
        let signed_in: SignInResponse = response
            .json()
            .map_err(|e| AuthError::Decode(e.to_string()))?;

        if signed_in.local_id != user.uid {
            error!(
                "reauthenticate: credential belongs to {} instead of {}",
                signed_in.local_id, user.uid
            );
            return Err(AuthError::UserMismatch);
        }

        info!("reauthenticate: uid {} reauthenticated", user.uid);
        let refreshed = AuthUser {
            uid: signed_in.local_id,
            email: signed_in.email.or_else(|| user.email.clone()),
            id_token: Some(signed_in.id_token),
        };
        self.set_current(Some(refreshed.clone()));
        Ok(refreshed)
    }

    async fn update_password(&self, user: &AuthUser, new_password: &str) -> Result<(), AuthError> {
        let Some(id_token) = user.id_token.as_deref() else {
            return Err(AuthError::Rejected {
                code: 401,
                message: "CREDENTIAL_TOO_OLD_LOGIN_AGAIN".to_owned(),
            });
        };

        let response = self
            .post(
                "update",
                &UpdatePasswordRequest {
                    id_token,
                    password: new_password,
                    return_secure_token: true,
                },
            )
            .await?;
        let updated: UpdatePasswordResponse = response
            .json()
            .map_err(|e| AuthError::Decode(e.to_string()))?;

        info!("update_password: password updated for uid {}", user.uid);
        if let Some(id_token) = updated.id_token {
            self.set_current(Some(AuthUser {
                id_token: Some(id_token),
                ..user.clone()
            }));
        }
        Ok(())
    }

    async fn send_password_reset_email(
        &self,
        email: &str,
        redirect: &ResetRedirect,
    ) -> Result<(), AuthError> {
        self.post(
            "sendOobCode",
            &SendOobCodeRequest {
                request_type: "PASSWORD_RESET",
                email,
                continue_url: &redirect.url,
                can_handle_code_in_app: redirect.handle_code_in_app,
            },
        )
        .await?;
        info!("send_password_reset_email: reset email requested for {email}");
        Ok(())
    }
}
