use std::any::{Any, TypeId};

use flume::Sender;
use log::debug;

use crate::Compute;

pub(crate) type UpdateMessage = (TypeId, Box<dyn Any + Send>);

/// Send-side handle used by commands to replace a compute.
///
/// Updates are queued and only become visible after
/// [`StateCtx::sync_computes`](crate::StateCtx::sync_computes).
#[derive(Debug, Clone)]
pub struct Updater {
    send: Sender<UpdateMessage>,
}

impl Updater {
    pub(crate) fn new(send: Sender<UpdateMessage>) -> Self {
        Self { send }
    }

    pub fn set<T: Compute>(&self, value: T) {
        if self
            .send
            .send((TypeId::of::<T>(), Box::new(value)))
            .is_err()
        {
            // The owning context has been dropped.
            debug!(
                "Updater: dropping {} update, receiver is gone",
                std::any::type_name::<T>()
            );
        }
    }
}
