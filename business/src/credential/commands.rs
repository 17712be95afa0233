use backoffice_states::{Command, CommandFuture, CommandSnapshot, Updater};
use log::{error, info, warn};
use tokio_util::sync::CancellationToken;

use super::{
    CredentialCompute, CredentialInput, CredentialState, EMAIL_FAILED_TITLE, EMAIL_UPDATED_TITLE,
    PASSWORD_FAILED_TITLE, PASSWORD_UPDATED_MESSAGE, PASSWORD_UPDATED_TITLE, SessionContext,
};
use crate::auth::{AuthProvider, AuthProviderState, EmailCredential};
use crate::notification::{Notification, NotificationPosition, NotificationStatus, Notifier};
use crate::{AuthError, BackendApi, BusinessConfig, ReauthMode, ResetRedirect};

/// Manual-only command that sends `CredentialInput.candidate_email` to the backend.
///
/// On success the dialog moves to `CollectingPassword` and the displayed email
/// follows the candidate. On failure nothing but `in_flight` changes, so the user can
/// resubmit.
#[derive(Default, Debug)]
pub struct SubmitEmailCommand;

impl Command for SubmitEmailCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        cancel: CancellationToken,
    ) -> CommandFuture {
        let input = snap.state::<CredentialInput>().clone();
        let session = snap.state::<SessionContext>().clone();
        let config = snap.state::<BusinessConfig>().clone();
        let notifier = snap.state::<Notifier>().clone();
        let compute = snap.compute::<CredentialCompute>().clone();

        Box::pin(async move {
            let new_email = input.candidate_email;
            info!("SubmitEmailCommand: updating email for uid {}", session.uid);

            let result = BackendApi::new(&config)
                .update_email(&session.uid, &new_email)
                .await;

            if cancel.is_cancelled() {
                info!("SubmitEmailCommand: dialog closed, discarding result");
                return;
            }

            let mut next = CredentialCompute {
                in_flight: None,
                ..compute
            };
            match result {
                Ok(()) => match next.advance(CredentialState::CollectingPassword) {
                    Ok(()) => {
                        next.current_email = new_email;
                        next.status_message = None;
                        notifier.success(EMAIL_UPDATED_TITLE);
                    }
                    Err(err) => error!("SubmitEmailCommand: {err}"),
                },
                Err(err) => {
                    error!("SubmitEmailCommand: email update failed: {err}");
                    notifier.error(EMAIL_FAILED_TITLE);
                }
            }
            updater.set(next);
        })
    }
}

/// Manual-only command that reauthenticates and then updates the password.
///
/// ## Flow
///
/// 1. Reauthenticate with the candidate email and the configured secret
/// 2. Only after that succeeds, update the password
/// 3. On any failure, request a reset email for the candidate email (its own failure
///    is logged and dropped) and end in `PasswordFailed`
#[derive(Default, Debug)]
pub struct SubmitPasswordCommand;

impl Command for SubmitPasswordCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        cancel: CancellationToken,
    ) -> CommandFuture {
        let input = snap.state::<CredentialInput>().clone();
        let session = snap.state::<SessionContext>().clone();
        let config = snap.state::<BusinessConfig>().clone();
        let notifier = snap.state::<Notifier>().clone();
        let auth = snap.state::<AuthProviderState>().inner.clone();
        let compute = snap.compute::<CredentialCompute>().clone();

        Box::pin(async move {
            let result = change_password(auth.as_ref(), &config, &session, &input).await;

            let mut next = CredentialCompute {
                in_flight: None,
                ..compute
            };
            match result {
                Ok(()) => {
                    if cancel.is_cancelled() {
                        info!("SubmitPasswordCommand: dialog closed, discarding result");
                        return;
                    }
                    if let Err(err) = next.advance(CredentialState::Complete) {
                        error!("SubmitPasswordCommand: {err}");
                    } else {
                        next.status_message = Some(PASSWORD_UPDATED_MESSAGE.to_owned());
                        notifier.notify(
                            Notification::new(PASSWORD_UPDATED_TITLE, NotificationStatus::Success)
                                .at(NotificationPosition::TopRight),
                        );
                    }
                }
                Err(err) => {
                    error!("SubmitPasswordCommand: password update failed: {err}");
                    send_reset_fallback(
                        auth.as_ref(),
                        &input.candidate_email,
                        &config.reset_redirect(),
                    )
                    .await;

                    if cancel.is_cancelled() {
                        info!("SubmitPasswordCommand: dialog closed, discarding result");
                        return;
                    }
                    if let Err(advance_err) = next.advance(CredentialState::PasswordFailed) {
                        error!("SubmitPasswordCommand: {advance_err}");
                    } else {
                        next.status_message = Some(format!(
                            "An error occurred while updating the password: {err}"
                        ));
                        notifier.notify(
                            Notification::new(PASSWORD_FAILED_TITLE, NotificationStatus::Error)
                                .at(NotificationPosition::TopRight),
                        );
                    }
                }
            }
            updater.set(next);
        })
    }
}

async fn change_password(
    auth: &dyn AuthProvider,
    config: &BusinessConfig,
    session: &SessionContext,
    input: &CredentialInput,
) -> Result<(), AuthError> {
    let user = auth.current_user().ok_or(AuthError::NoCurrentUser)?;

    let secret = match config.reauth_mode {
        ReauthMode::CurrentPassword => input.current_password.clone(),
        ReauthMode::SessionIdentifier => session.uid.clone(),
    };
    let credential = EmailCredential {
        email: input.candidate_email.clone(),
        password: secret,
    };

    let user = auth.reauthenticate(&user, &credential).await?;
    auth.update_password(&user, &input.candidate_password).await
}

async fn send_reset_fallback(auth: &dyn AuthProvider, email: &str, redirect: &ResetRedirect) {
    match auth.send_password_reset_email(email, redirect).await {
        Ok(()) => info!("SubmitPasswordCommand: reset email sent to {email}"),
        Err(err) => warn!("SubmitPasswordCommand: reset email to {email} failed: {err}"),
    }
}
