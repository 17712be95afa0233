//! Bookkeeping for spawned command runs.

use std::any::TypeId;
use std::fmt;

use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;

/// One spawned run of a command. `run` counts runs of the same command, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId {
    command: TypeId,
    name: &'static str,
    run: u64,
}

impl TaskId {
    pub(crate) fn new(command: TypeId, name: &'static str, run: u64) -> Self {
        Self { command, name, run }
    }

    pub fn command(&self) -> TypeId {
        self.command
    }

    /// Short type name of the command, for logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn run(&self) -> u64 {
        self.run
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.run)
    }
}

/// Kept by the context for every run it spawned until the task is reaped. Commands
/// see only the token and must check it before publishing.
#[derive(Debug)]
pub struct TaskHandle {
    id: TaskId,
    token: CancellationToken,
    task: AbortHandle,
}

impl TaskHandle {
    pub(crate) fn new(id: TaskId, token: CancellationToken, task: AbortHandle) -> Self {
        Self { id, token, task }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// `a::b::Command` -> `Command`.
pub(crate) fn short_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
