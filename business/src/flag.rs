//! Boolean flags on invoices, kept in sync with the backend.
//!
//! A control shows `displayed`. Toggling asks the backend to store the negation and
//! only applies it once the backend confirms, so after every resolved attempt
//! `displayed == confirmed`.

use flume::{Receiver, TryRecvError};
use log::{error, info};
use tokio::task::JoinHandle;
use ustr::Ustr;

use crate::notification::{Notification, NotificationPosition, NotificationStatus, Notifier};
use crate::{BackendApi, FlagError, RemoteError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Checked,
    Published,
    Paid,
}

impl FlagKind {
    /// Path below the api root.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Checked => "/invoice/updateIsChecked",
            Self::Published => "/invoice/updateIsPublished",
            Self::Paid => "/invoice/updateIsPayed",
        }
    }

    /// JSON field carrying the new value.
    pub fn field(self) -> &'static str {
        match self {
            Self::Checked => "isChecked",
            Self::Published => "isPublished",
            Self::Paid => "isPayed",
        }
    }

    pub fn set_title(self) -> &'static str {
        match self {
            Self::Checked => "Check applied.",
            Self::Published => "Published.",
            Self::Paid => "Marked as paid.",
        }
    }

    pub fn cleared_title(self) -> &'static str {
        match self {
            Self::Checked => "Check removed.",
            Self::Published => "Unpublished.",
            Self::Paid => "Marked as unpaid.",
        }
    }

    pub fn failed_title(self) -> &'static str {
        match self {
            Self::Checked => "Failed to update the check state.",
            Self::Published => "Failed to update the publish state.",
            Self::Paid => "Failed to update the payment state.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleFlag {
    pub id: Ustr,
    pub displayed: bool,
    pub confirmed: bool,
}

impl ToggleFlag {
    pub fn new(id: Ustr, value: bool) -> Self {
        Self {
            id,
            displayed: value,
            confirmed: value,
        }
    }
}

#[derive(Debug)]
struct PendingToggle {
    next: bool,
    recv: Receiver<Result<(), RemoteError>>,
    task: JoinHandle<()>,
}

/// One rendered flag control.
///
/// Only one update per flag is in flight at a time; the result is picked up by
/// [`poll`](Self::poll) on the UI thread. Dropping the sync aborts the request and
/// nothing is applied.
#[derive(Debug)]
pub struct FlagSync {
    kind: FlagKind,
    flag: ToggleFlag,
    backend: BackendApi,
    notifier: Notifier,
    pending: Option<PendingToggle>,
}

impl FlagSync {
    pub fn new(
        kind: FlagKind,
        id: impl Into<Ustr>,
        initial: bool,
        backend: BackendApi,
        notifier: Notifier,
    ) -> Self {
        Self {
            kind,
            flag: ToggleFlag::new(id.into(), initial),
            backend,
            notifier,
            pending: None,
        }
    }

    pub fn kind(&self) -> FlagKind {
        self.kind
    }

    pub fn flag(&self) -> &ToggleFlag {
        &self.flag
    }

    pub fn displayed(&self) -> bool {
        self.flag.displayed
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Ask the backend to store the negation of the displayed value.
    ///
    /// # Errors
    /// `FlagError::InFlight` while a previous toggle of this flag is unresolved.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn toggle(&mut self) -> Result<(), FlagError> {
        if self.pending.is_some() {
            return Err(FlagError::InFlight(self.flag.id));
        }

        let next = !self.flag.displayed;
        let kind = self.kind;
        let id = self.flag.id;
        let backend = self.backend.clone();
        let (send, recv) = flume::bounded(1);

        info!("FlagSync: {} {id} -> {next}", kind.field());
        let task = tokio::spawn(async move {
            let result = backend.update_flag(kind, &id, next).await;
            if send.send_async(result).await.is_err() {
                info!("FlagSync: control for {id} is gone, dropping result");
            }
        });

        self.pending = Some(PendingToggle { next, recv, task });
        Ok(())
    }

    /// Apply a finished toggle, if any. Returns the confirmed value on success.
    pub fn poll(&mut self) -> Option<Result<bool, FlagError>> {
        let pending = self.pending.as_ref()?;
        let result = match pending.recv.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(task_lost()),
        };
        let next = pending.next;
        self.pending = None;
        Some(self.resolve(next, result))
    }

    /// Wait for the in-flight toggle, if any, and apply it.
    pub async fn settle(&mut self) -> Option<Result<bool, FlagError>> {
        let pending = self.pending.take()?;
        let result = pending
            .recv
            .recv_async()
            .await
            .unwrap_or_else(|_| Err(task_lost()));
        Some(self.resolve(pending.next, result))
    }

    fn resolve(&mut self, next: bool, result: Result<(), RemoteError>) -> Result<bool, FlagError> {
        match result {
            Ok(()) => {
                self.flag.confirmed = next;
                self.flag.displayed = next;
                if next {
                    self.notify(self.kind.set_title(), NotificationStatus::Success);
                } else {
                    self.notify(self.kind.cleared_title(), NotificationStatus::Warning);
                }
                Ok(next)
            }
            Err(err) => {
                error!("FlagSync: {} {} failed: {err}", self.kind.field(), self.flag.id);
                self.flag.displayed = self.flag.confirmed;
                self.notify(self.kind.failed_title(), NotificationStatus::Error);
                Err(err.into())
            }
        }
    }

    fn notify(&self, title: &str, status: NotificationStatus) {
        self.notifier
            .notify(Notification::new(title, status).at(NotificationPosition::TopRight));
    }
}

impl Drop for FlagSync {
    fn drop(&mut self) {
        if let Some(pending) = &self.pending {
            pending.task.abort();
        }
    }
}

fn task_lost() -> RemoteError {
    RemoteError::Transport("update task ended without a result".to_owned())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::BusinessConfig;
    use crate::notification::NotificationCenter;

    fn sync_for(server_uri: String, kind: FlagKind, initial: bool) -> (FlagSync, NotificationCenter) {
        let _ = env_logger::builder().is_test(true).try_init();
        let center = NotificationCenter::new();
        let backend = BackendApi::new(&BusinessConfig::new(server_uri));
        let sync = FlagSync::new(kind, "inv-1", initial, backend, center.notifier());
        (sync, center)
    }

    #[tokio::test]
    async fn truthy_response_confirms_and_displays_new_value() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/invoice/updateIsPayed"))
            .and(body_json(json!({"id": "inv-1", "isPayed": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let (mut sync, center) = sync_for(server.uri(), FlagKind::Paid, false);
        sync.toggle().expect("Should start toggle");
        assert!(sync.is_pending());
        assert!(!sync.displayed(), "value must not change before confirmation");

        let result = sync.settle().await.expect("Should have a pending toggle");
        assert_eq!(result, Ok(true));
        assert_eq!(*sync.flag(), ToggleFlag::new(Ustr::from("inv-1"), true));
        assert!(!sync.is_pending());

        let notes = center.drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].status, NotificationStatus::Success);
        assert_eq!(notes[0].title, "Marked as paid.");
        assert_eq!(notes[0].position, Some(NotificationPosition::TopRight));
    }

    #[tokio::test]
    async fn clearing_a_flag_warns() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/invoice/updateIsChecked"))
            .and(body_json(json!({"id": "inv-1", "isChecked": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(1)))
            .mount(&server)
            .await;

        let (mut sync, center) = sync_for(server.uri(), FlagKind::Checked, true);
        sync.toggle().expect("Should start toggle");
        let result = sync.settle().await.expect("Should have a pending toggle");

        assert_eq!(result, Ok(false));
        assert!(!sync.flag().confirmed);
        let notes = center.drain();
        assert_eq!(notes[0].status, NotificationStatus::Warning);
        assert_eq!(notes[0].title, "Check removed.");
        assert_eq!(notes[0].position, Some(NotificationPosition::TopRight));
    }

    #[tokio::test]
    async fn falsy_response_changes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/invoice/updateIsPublished"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(false)))
            .mount(&server)
            .await;

        let (mut sync, center) = sync_for(server.uri(), FlagKind::Published, false);
        sync.toggle().expect("Should start toggle");
        let result = sync.settle().await.expect("Should have a pending toggle");

        assert_eq!(result, Err(FlagError::Remote(RemoteError::Falsy)));
        assert_eq!(*sync.flag(), ToggleFlag::new(Ustr::from("inv-1"), false));
        let notes = center.drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].status, NotificationStatus::Error);
        assert_eq!(notes[0].title, "Failed to update the publish state.");
        assert_eq!(notes[0].position, Some(NotificationPosition::TopRight));
    }

    #[tokio::test]
    async fn server_error_changes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/invoice/updateIsPayed"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (mut sync, _center) = sync_for(server.uri(), FlagKind::Paid, true);
        sync.toggle().expect("Should start toggle");
        let result = sync.settle().await.expect("Should have a pending toggle");

        assert_eq!(result, Err(FlagError::Remote(RemoteError::Status(500))));
        assert!(sync.flag().displayed);
        assert!(sync.flag().confirmed);
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let (mut sync, _center) = sync_for("http://127.0.0.1:1".to_owned(), FlagKind::Paid, false);
        sync.toggle().expect("Should start toggle");
        let result = sync.settle().await.expect("Should have a pending toggle");

        assert!(matches!(
            result,
            Err(FlagError::Remote(RemoteError::Transport(_)))
        ));
        assert!(!sync.displayed());
    }

    #[tokio::test]
    async fn second_toggle_while_pending_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/invoice/updateIsPayed"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!(true))
                    .set_delay(std::time::Duration::from_millis(100)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (mut sync, _center) = sync_for(server.uri(), FlagKind::Paid, false);
        sync.toggle().expect("Should start toggle");

        let err = sync.toggle().expect_err("Should reject while in flight");
        assert_eq!(err, FlagError::InFlight(Ustr::from("inv-1")));
        assert!(sync.is_pending());

        sync.settle().await;
        assert!(sync.displayed());
    }

    #[tokio::test]
    async fn two_successful_toggles_restore_the_original_value() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/invoice/updateIsChecked"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
            .expect(2)
            .mount(&server)
            .await;

        let (mut sync, _center) = sync_for(server.uri(), FlagKind::Checked, false);
        sync.toggle().expect("Should start first toggle");
        sync.settle().await;
        sync.toggle().expect("Should start second toggle");
        sync.settle().await;

        assert_eq!(*sync.flag(), ToggleFlag::new(Ustr::from("inv-1"), false));
    }

    #[test]
    fn every_kind_targets_its_own_endpoint() {
        for kind in [FlagKind::Checked, FlagKind::Published, FlagKind::Paid] {
            assert!(kind.endpoint().starts_with("/invoice/update"));
            assert!(kind.endpoint().ends_with(&kind.field()[2..]));
        }
    }
}
