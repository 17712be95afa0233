//! One-way notification channel.
//!
//! Business code only ever sends; whoever owns the [`NotificationCenter`] decides how
//! (and whether) to render.

use std::any::Any;

use backoffice_states::State;
use flume::{Receiver, Sender};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStatus {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationPosition {
    #[default]
    Bottom,
    TopRight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub status: NotificationStatus,
    pub position: Option<NotificationPosition>,
}

impl Notification {
    pub fn new(title: impl Into<String>, status: NotificationStatus) -> Self {
        Self {
            title: title.into(),
            status,
            position: None,
        }
    }

    pub fn at(mut self, position: NotificationPosition) -> Self {
        self.position = Some(position);
        self
    }
}

/// Cloneable send side. Sending never fails from the caller's point of view.
#[derive(Debug, Clone)]
pub struct Notifier {
    send: Sender<Notification>,
}

impl Notifier {
    pub fn notify(&self, notification: Notification) {
        if self.send.send(notification).is_err() {
            debug!("Notifier: notification surface is gone");
        }
    }

    pub fn success(&self, title: impl Into<String>) {
        self.notify(Notification::new(title, NotificationStatus::Success));
    }

    pub fn warning(&self, title: impl Into<String>) {
        self.notify(Notification::new(title, NotificationStatus::Warning));
    }

    pub fn error(&self, title: impl Into<String>) {
        self.notify(Notification::new(title, NotificationStatus::Error));
    }
}

impl State for Notifier {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

/// Receiving end owned by the rendering layer.
#[derive(Debug)]
pub struct NotificationCenter {
    send: Sender<Notification>,
    recv: Receiver<Notification>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self { send, recv }
    }

    pub fn notifier(&self) -> Notifier {
        Notifier {
            send: self.send.clone(),
        }
    }

    /// Everything sent since the last drain, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        self.recv.try_iter().collect()
    }
}
