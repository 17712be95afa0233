use std::{any::Any, future::Future, pin::Pin};

use tokio_util::sync::CancellationToken;

use crate::{CommandSnapshot, Updater};

pub type CommandFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Manual-only unit of work that reads context states and publishes computes.
///
/// A command reads a [`CommandSnapshot`] taken when it was flushed, performs its side
/// effects on a spawned task, and reports results through the [`Updater`]. Results
/// must not be published once `cancel` fired: the view that asked for them is gone.
pub trait Command: Any + Send + Sync {
    fn run(&self, snap: CommandSnapshot, updater: Updater, cancel: CancellationToken)
    -> CommandFuture;
}
