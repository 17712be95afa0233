//! Back-office client logic: the account credential change dialog and invoice flag
//! controls, independent of any rendering toolkit.

pub mod auth;
mod backend;
mod config;
mod credential;
mod error;
mod flag;
pub mod http;
mod links;
pub mod notification;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

#[cfg(test)]
mod test_utils;

pub use auth::{AuthProvider, AuthProviderState, AuthUser, EmailCredential, IdentityToolkitProvider};
pub use backend::{BackendApi, UpdateEmailRequest, is_truthy};
pub use config::{BusinessConfig, ConfigError, Env, ReauthMode, ResetRedirect};
pub use credential::{
    CredentialChangeController, CredentialCompute, CredentialInput, CredentialState,
    CredentialStep, SessionContext, SubmitEmailCommand, SubmitPasswordCommand, validate_email,
    validate_passwords,
};
pub use error::{AuthError, CredentialError, FlagError, RemoteError, ValidationError};
pub use flag::{FlagKind, FlagSync, ToggleFlag};
pub use links::{NavLink, POST_SIGNIN_LABELS, POST_SIGNIN_URLS, link_list};
pub use notification::{
    Notification, NotificationCenter, NotificationPosition, NotificationStatus, Notifier,
};
