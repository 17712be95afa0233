use std::sync::Arc;

use backoffice_business::mock::RecordingAuthProvider;
use backoffice_ui::BackofficeApp;
use backoffice_ui::state::State;
use egui_kittest::Harness;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const UID: &str = "uid-42";
pub const OLD_EMAIL: &str = "old@x.com";
pub const NEW_EMAIL: &str = "new@x.com";

#[allow(unused)]
/// Frames to let a response travel from the mock server back into the UI.
pub async fn wait_for_response<T>(harness: &mut Harness<'_, T>) {
    harness.step();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    harness.step();
    harness.step();
}

pub struct TestCtx<'a, T = State> {
    mock_server: MockServer,
    auth: Arc<RecordingAuthProvider>,
    harness: Harness<'a, T>,
}

impl<'a, T> TestCtx<'a, T> {
    pub fn harness_mut(&mut self) -> &mut Harness<'a, T> {
        &mut self.harness
    }

    #[allow(unused)]
    pub fn mock_server(&self) -> &MockServer {
        &self.mock_server
    }

    #[allow(unused)]
    pub fn auth(&self) -> &RecordingAuthProvider {
        &self.auth
    }
}

impl<'a> TestCtx<'a, State> {
    #[allow(unused)]
    pub async fn new(app: impl FnMut(&mut egui::Ui, &mut State) + 'a) -> Self {
        Self::with_auth(RecordingAuthProvider::new(UID, OLD_EMAIL), app).await
    }

    #[allow(unused)]
    pub async fn with_auth(
        auth: RecordingAuthProvider,
        app: impl FnMut(&mut egui::Ui, &mut State) + 'a,
    ) -> Self {
        let (mock_server, auth, state) = setup_test_state(auth).await;
        let harness = Harness::new_ui_state(app, state);

        Self {
            mock_server,
            auth,
            harness,
        }
    }
}

impl<'a> TestCtx<'a, BackofficeApp> {
    #[allow(unused)]
    pub async fn new_app() -> Self {
        let (mock_server, auth, state) =
            setup_test_state(RecordingAuthProvider::new(UID, OLD_EMAIL)).await;
        let app = BackofficeApp::new(state);
        let harness = Harness::new_eframe(|_| app);

        Self {
            mock_server,
            auth,
            harness,
        }
    }
}

async fn setup_test_state(
    auth: RecordingAuthProvider,
) -> (MockServer, Arc<RecordingAuthProvider>, State) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/userActions/updateEmail"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let auth = Arc::new(auth);
    let state = State::test(mock_server.uri(), UID, auth.clone());

    (mock_server, auth, state)
}
