use backoffice_business::CredentialState;
use backoffice_business::mock::RecordingAuthProvider;
use backoffice_business::{AuthError, NotificationStatus};
use backoffice_ui::state::State;
use backoffice_ui::widgets::credential_dialog;
use kittest::Queryable;

use crate::common::{NEW_EMAIL, OLD_EMAIL, TestCtx, UID, wait_for_response};

mod common;

fn dialog_app(ui: &mut egui::Ui, state: &mut State) {
    state.open_credential_dialog();
    if let Some(controller) = state.dialog.as_mut() {
        credential_dialog(ui, controller);
    }
}

fn dialog_state(state: &State) -> CredentialState {
    state
        .dialog
        .as_ref()
        .expect("Dialog should be open")
        .state()
}

/// Tests that the email step shows the email read from the provider.
#[tokio::test]
async fn test_email_step_displayed() {
    let mut ctx = TestCtx::new(dialog_app).await;

    let harness = ctx.harness_mut();
    harness.step();

    assert!(
        harness.query_by_label_contains(OLD_EMAIL).is_some(),
        "Current email should be displayed"
    );
    assert!(
        harness.query_by_label_contains("New email").is_some(),
        "New email field should be displayed"
    );
    assert!(
        harness.query_by_label("Register email").is_some(),
        "Register button should be displayed"
    );
}

/// Tests that an invalid email never leaves the email step.
#[tokio::test]
async fn test_invalid_email_warns_and_stays() {
    let mut ctx = TestCtx::new(dialog_app).await;

    let harness = ctx.harness_mut();
    harness.step();
    harness
        .state_mut()
        .dialog
        .as_mut()
        .expect("Dialog should be open")
        .input_mut()
        .candidate_email = "not-an-email".to_owned();

    harness.get_by_label("Register email").click();
    wait_for_response(harness).await;

    assert_eq!(dialog_state(harness.state()), CredentialState::CollectingEmail);
    let notes = harness.state().center.drain();
    assert_eq!(notes.len(), 1, "Exactly one warning should be raised");
    assert_eq!(notes[0].status, NotificationStatus::Warning);
}

/// Tests that a registered email moves the dialog to the password step.
#[tokio::test]
async fn test_registered_email_opens_password_step() {
    let mut ctx = TestCtx::new(dialog_app).await;

    let harness = ctx.harness_mut();
    harness.step();
    harness
        .state_mut()
        .dialog
        .as_mut()
        .expect("Dialog should be open")
        .input_mut()
        .candidate_email = NEW_EMAIL.to_owned();

    harness.get_by_label("Register email").click();
    wait_for_response(harness).await;

    assert_eq!(
        dialog_state(harness.state()),
        CredentialState::CollectingPassword
    );
    assert!(
        harness.query_by_label_contains(NEW_EMAIL).is_some(),
        "Displayed email should follow the registered one"
    );
    assert!(
        harness.query_by_label_contains("New password").is_some(),
        "Password fields should be displayed"
    );
    assert!(
        harness.query_by_label_contains("Current password").is_some(),
        "Current password should be asked for by default"
    );
}

async fn submit_passwords(ctx: &mut TestCtx<'_, State>) {
    let harness = ctx.harness_mut();
    harness.step();
    harness
        .state_mut()
        .dialog
        .as_mut()
        .expect("Dialog should be open")
        .input_mut()
        .candidate_email = NEW_EMAIL.to_owned();
    harness.get_by_label("Register email").click();
    wait_for_response(harness).await;

    {
        let input = harness
            .state_mut()
            .dialog
            .as_mut()
            .expect("Dialog should be open")
            .input_mut();
        input.current_password = "old-secret".to_owned();
        input.candidate_password = "Aa1!Aa1!".to_owned();
        input.candidate_password_confirm = "Aa1!Aa1!".to_owned();
    }
    harness.get_by_label("Update password").click();
    wait_for_response(harness).await;
}

/// Tests that a successful password change shows the follow-up links.
#[tokio::test]
async fn test_password_update_shows_links() {
    let mut ctx = TestCtx::new(dialog_app).await;
    submit_passwords(&mut ctx).await;

    let harness = ctx.harness_mut();
    assert_eq!(dialog_state(harness.state()), CredentialState::Complete);
    assert!(
        harness.query_by_label("Password updated").is_some(),
        "Success message should be displayed"
    );
    assert!(
        harness.query_by_label("Invoices").is_some(),
        "Post sign-in links should be displayed"
    );
}

/// Tests that a failed password change names the address the reset link went to.
#[tokio::test]
async fn test_password_failure_shows_reset_notice() {
    let auth = RecordingAuthProvider::new(UID, OLD_EMAIL).failing_update(AuthError::Rejected {
        code: 400,
        message: "WEAK_PASSWORD".to_owned(),
    });
    let mut ctx = TestCtx::with_auth(auth, dialog_app).await;
    submit_passwords(&mut ctx).await;

    assert_eq!(ctx.auth().reset_emails(), vec![NEW_EMAIL.to_owned()]);

    let harness = ctx.harness_mut();
    assert_eq!(
        dialog_state(harness.state()),
        CredentialState::PasswordFailed
    );
    assert!(
        harness
            .query_by_label_contains("A password reset email has been sent to new@x.com")
            .is_some(),
        "Reset notice should name the new email"
    );
    assert!(
        harness.query_by_label("Update password").is_none(),
        "No retry from the failed state"
    );
}
