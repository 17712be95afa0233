use kittest::Queryable;

use crate::common::{OLD_EMAIL, TestCtx};

mod common;

/// Tests that the app renders its shell without invoices.
#[tokio::test]
async fn test_app_shell_displayed() {
    let mut ctx = TestCtx::new_app().await;

    let harness = ctx.harness_mut();
    harness.step();

    assert!(
        harness.query_by_label("Invoices").is_some(),
        "Invoices heading should be displayed"
    );
    assert!(
        harness.query_by_label("No invoices loaded.").is_some(),
        "Empty list hint should be displayed"
    );
}

/// Tests that the account button opens the credential dialog.
#[tokio::test]
async fn test_account_settings_opens_dialog() {
    let mut ctx = TestCtx::new_app().await;

    let harness = ctx.harness_mut();
    harness.step();
    harness.get_by_label("Account settings").click();
    harness.step();
    harness.step();

    assert!(harness.state().state().dialog.is_some());
    assert!(
        harness.query_by_label_contains(OLD_EMAIL).is_some(),
        "Dialog should show the current email"
    );
}

/// Tests that notifications are rendered as toasts.
#[tokio::test]
async fn test_notifications_render_as_toasts() {
    let mut ctx = TestCtx::new_app().await;

    let harness = ctx.harness_mut();
    harness
        .state()
        .state()
        .center
        .notifier()
        .warning("Check removed.");
    harness.step();

    assert!(
        harness.query_by_label("Check removed.").is_some(),
        "Toast should be displayed"
    );
}
