//! Fixtures for driving a [`CredentialChangeController`] against a mock backend.

#![cfg(test)]

use std::sync::Arc;
use std::time::Duration;

use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

use crate::mock::RecordingAuthProvider;
use crate::notification::{Notification, NotificationCenter};
use crate::{BusinessConfig, CredentialChangeController, CredentialState, ReauthMode, SessionContext};

pub const UID: &str = "uid-42";
pub const OLD_EMAIL: &str = "old@x.com";
pub const NEW_EMAIL: &str = "new@x.com";
pub const NEW_PASSWORD: &str = "Aa1!Aa1!";

/// Mock backend plus a mounted controller wired to it.
pub struct TestContext {
    pub mock_server: MockServer,
    pub auth: Arc<RecordingAuthProvider>,
    pub center: NotificationCenter,
    pub controller: CredentialChangeController,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_auth(
            RecordingAuthProvider::new(UID, OLD_EMAIL),
            ReauthMode::CurrentPassword,
        )
        .await
    }

    pub async fn with_auth(auth: RecordingAuthProvider, reauth_mode: ReauthMode) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let mock_server = MockServer::start().await;
        let config = BusinessConfig {
            reauth_mode,
            ..BusinessConfig::new(mock_server.uri())
        };
        let auth = Arc::new(auth);
        let center = NotificationCenter::new();
        let controller = CredentialChangeController::mount(
            SessionContext::new(UID),
            config,
            auth.clone(),
            center.notifier(),
        );

        Self {
            mock_server,
            auth,
            center,
            controller,
        }
    }

    /// Answer `PUT /api/userActions/updateEmail` for `NEW_EMAIL` with `status`.
    pub async fn mock_update_email(&self, status: u16) {
        self.mock_update_email_with(ResponseTemplate::new(status))
            .await;
    }

    pub async fn mock_update_email_with(&self, response: ResponseTemplate) {
        Mock::given(method("PUT"))
            .and(path("/api/userActions/updateEmail"))
            .and(body_json(serde_json::json!({
                "uid": UID,
                "newEmail": NEW_EMAIL
            })))
            .respond_with(response)
            .mount(&self.mock_server)
            .await;
    }

    /// Wait for every in-flight submission and apply its result.
    pub async fn settle(&mut self) {
        tokio::time::timeout(Duration::from_secs(5), self.controller.settle())
            .await
            .expect("Submissions should finish within 5 seconds");
    }

    /// Walk the dialog through a successful email submission.
    pub async fn reach_password_step(&mut self) {
        self.mock_update_email(200).await;
        self.controller
            .submit_email(NEW_EMAIL)
            .expect("Email submission should start");
        self.settle().await;
        assert_eq!(
            self.controller.state(),
            CredentialState::CollectingPassword,
            "Email step should have succeeded"
        );
        self.center.drain();
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.center.drain()
    }
}
