use std::sync::Arc;

use backoffice_states::StateCtx;
use log::{info, warn};

use super::{
    CredentialCompute, CredentialInput, CredentialState, CredentialStep, SessionContext,
    SubmitEmailCommand, SubmitPasswordCommand, validate_email, validate_passwords,
};
use crate::auth::{AuthProvider, AuthProviderState};
use crate::links::{NavLink, POST_SIGNIN_LABELS, POST_SIGNIN_URLS, link_list};
use crate::notification::{Notification, NotificationPosition, NotificationStatus, Notifier};
use crate::{AuthError, BusinessConfig, CredentialError, ReauthMode, ValidationError};

/// One credential change dialog.
///
/// Owns a [`StateCtx`] holding the session, the editable input and the rendered
/// [`CredentialCompute`]. Submissions validate synchronously, then run as commands
/// whose results land on the next [`poll`](Self::poll). Dropping the controller
/// discards anything still in flight.
#[derive(Debug)]
pub struct CredentialChangeController {
    ctx: StateCtx,
}

impl CredentialChangeController {
    /// Open a dialog for `session`. The displayed email is read from the provider once,
    /// here, and afterwards only follows successful email submissions.
    pub fn mount(
        session: SessionContext,
        config: BusinessConfig,
        auth: Arc<dyn AuthProvider>,
        notifier: Notifier,
    ) -> Self {
        let current_email = auth
            .current_user()
            .and_then(|user| user.email)
            .unwrap_or_default();
        info!(
            "CredentialChangeController: mounted for uid {} ({:?})",
            session.uid, config.reauth_mode
        );

        let mut ctx = StateCtx::new();
        ctx.add_state(session);
        ctx.add_state(config);
        ctx.add_state(AuthProviderState::new(auth));
        ctx.add_state(notifier);
        ctx.add_state(CredentialInput::default());
        ctx.record_compute(CredentialCompute {
            current_email,
            ..Default::default()
        });
        ctx.record_command(SubmitEmailCommand);
        ctx.record_command(SubmitPasswordCommand);

        Self { ctx }
    }

    fn compute(&self) -> &CredentialCompute {
        self.ctx.compute::<CredentialCompute>()
    }

    pub fn state(&self) -> CredentialState {
        self.compute().state
    }

    pub fn current_email(&self) -> &str {
        &self.compute().current_email
    }

    pub fn status_message(&self) -> Option<&str> {
        self.compute().status_message.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.compute().is_loading()
    }

    pub fn reauth_mode(&self) -> ReauthMode {
        self.ctx.state::<BusinessConfig>().reauth_mode
    }

    pub fn input(&self) -> &CredentialInput {
        self.ctx.state::<CredentialInput>()
    }

    pub fn input_mut(&mut self) -> &mut CredentialInput {
        self.ctx.state_mut::<CredentialInput>()
    }

    /// Apply finished submissions. Call once per frame.
    pub fn poll(&mut self) -> bool {
        self.ctx.sync_computes() > 0
    }

    /// Wait until every submission has finished and been applied.
    pub async fn settle(&mut self) {
        self.ctx.settle().await;
    }

    /// Close the dialog, discarding whatever is still in flight.
    pub async fn unmount(mut self) {
        self.ctx.shutdown().await;
    }

    /// Links for the post-completion view. `None` until the flow is complete.
    pub fn link_list(&self) -> Option<Vec<NavLink>> {
        (self.state() == CredentialState::Complete)
            .then(|| link_list(POST_SIGNIN_LABELS, POST_SIGNIN_URLS))
    }

    /// Validate `candidate` and send it to the backend.
    ///
    /// # Errors
    /// `InvalidState` outside `CollectingEmail`, `Busy` while a submission is in
    /// flight, `Validation` for a malformed address. Network failures are not
    /// returned here; they surface as a notification once [`poll`](Self::poll)
    /// applies the result.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn submit_email(&mut self, candidate: impl Into<String>) -> Result<(), CredentialError> {
        self.ensure_ready("submit_email", CredentialState::CollectingEmail)?;

        let candidate = candidate.into();
        if let Err(err) = validate_email(&candidate) {
            warn!("submit_email: rejected {candidate:?}");
            self.notifier().warning(err.to_string());
            return Err(err.into());
        }

        self.ctx.update::<CredentialInput>(|input| {
            input.candidate_email = candidate;
        });
        self.start(CredentialStep::Email);
        self.ctx.dispatch::<SubmitEmailCommand>();
        Ok(())
    }

    /// Validate the new password pair, then reauthenticate and update.
    ///
    /// # Errors
    /// `InvalidState` outside `CollectingPassword`, `Busy` while a submission is in
    /// flight, `Validation` for an empty or mismatched pair or a missing current
    /// password, `Auth(NoCurrentUser)` when nobody is signed in. None of these reach
    /// the provider or send a reset email.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn submit_password(
        &mut self,
        password: impl Into<String>,
        confirm: impl Into<String>,
    ) -> Result<(), CredentialError> {
        self.ensure_ready("submit_password", CredentialState::CollectingPassword)?;

        let password = password.into();
        let confirm = confirm.into();
        if let Err(err) = validate_passwords(&password, &confirm) {
            self.notifier().notify(
                Notification::new(err.to_string(), NotificationStatus::Warning)
                    .at(NotificationPosition::TopRight),
            );
            return Err(err.into());
        }
        if self.reauth_mode() == ReauthMode::CurrentPassword
            && self.input().current_password.is_empty()
        {
            let err = ValidationError::MissingCurrentPassword;
            self.notifier().notify(
                Notification::new(err.to_string(), NotificationStatus::Warning)
                    .at(NotificationPosition::TopRight),
            );
            return Err(err.into());
        }
        if self.ctx.state::<AuthProviderState>().inner.current_user().is_none() {
            warn!("submit_password: no signed-in user");
            return Err(AuthError::NoCurrentUser.into());
        }

        self.ctx.update::<CredentialInput>(|input| {
            input.candidate_password = password;
            input.candidate_password_confirm = confirm;
        });
        self.start(CredentialStep::Password);
        self.ctx.dispatch::<SubmitPasswordCommand>();
        Ok(())
    }

    fn notifier(&self) -> &Notifier {
        self.ctx.state::<Notifier>()
    }

    fn ensure_ready(
        &mut self,
        operation: &'static str,
        expected: CredentialState,
    ) -> Result<(), CredentialError> {
        self.poll();
        let compute = self.compute();
        if compute.state != expected {
            return Err(CredentialError::InvalidState {
                operation,
                state: compute.state,
            });
        }
        if compute.is_loading() {
            return Err(CredentialError::Busy);
        }
        Ok(())
    }

    fn start(&mut self, step: CredentialStep) {
        let next = CredentialCompute {
            in_flight: Some(step),
            ..self.compute().clone()
        };
        self.ctx.updater().set(next);
        self.ctx.sync_computes();
    }
}
