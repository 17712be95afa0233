use std::{
    any::{TypeId, type_name},
    collections::BTreeMap,
    sync::Arc,
};

use flume::{Receiver, Sender};
use log::{debug, warn};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::{
    Command, CommandSnapshot, Compute, State, TaskHandle, TaskId, Updater, task::short_name,
    updater::UpdateMessage,
};

/// Owner of every state, compute and command registered for one view.
///
/// The UI thread mutates states, enqueues commands and calls
/// [`sync_computes`](Self::sync_computes) once per frame. Commands run as tokio tasks
/// and report back through [`Updater`]s. Dropping the context cancels all of its tasks
/// and closes the update channel, so late results are discarded.
pub struct StateCtx {
    states: BTreeMap<TypeId, Box<dyn State>>,
    computes: BTreeMap<TypeId, Box<dyn Compute>>,
    commands: BTreeMap<TypeId, Arc<dyn Command>>,
    queue: Vec<(TypeId, &'static str)>,
    runs: BTreeMap<TypeId, u64>,
    handles: Vec<TaskHandle>,
    tasks: JoinSet<()>,
    cancel: CancellationToken,
    send: Sender<UpdateMessage>,
    recv: Receiver<UpdateMessage>,
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCtx")
            .field("states", &self.states.len())
            .field("computes", &self.computes.len())
            .field("commands", &self.commands.len())
            .field("queued", &self.queue.len())
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            states: BTreeMap::new(),
            computes: BTreeMap::new(),
            commands: BTreeMap::new(),
            queue: Vec::new(),
            runs: BTreeMap::new(),
            handles: Vec::new(),
            tasks: JoinSet::new(),
            cancel: CancellationToken::new(),
            send,
            recv,
        }
    }

    pub fn add_state<T: State>(&mut self, state: T) {
        self.states.insert(TypeId::of::<T>(), Box::new(state));
    }

    pub fn record_compute<T: Compute>(&mut self, compute: T) {
        self.computes.insert(TypeId::of::<T>(), Box::new(compute));
    }

    pub fn record_command<T: Command>(&mut self, command: T) {
        self.commands.insert(TypeId::of::<T>(), Arc::new(command));
    }

    pub fn try_state<T: State>(&self) -> Option<&T> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|state| state.as_any().downcast_ref::<T>())
    }

    /// # Panics
    /// Panics if `T` was never added.
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>()
            .unwrap_or_else(|| panic!("State {} is not registered", type_name::<T>()))
    }

    /// # Panics
    /// Panics if `T` was never added.
    pub fn state_mut<T: State>(&mut self) -> &mut T {
        self.states
            .get_mut(&TypeId::of::<T>())
            .and_then(|state| state.as_any_mut().downcast_mut::<T>())
            .unwrap_or_else(|| panic!("State {} is not registered", type_name::<T>()))
    }

    pub fn update<T: State>(&mut self, f: impl FnOnce(&mut T)) {
        f(self.state_mut::<T>());
    }

    pub fn cached<T: Compute>(&self) -> Option<&T> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|compute| compute.as_any().downcast_ref::<T>())
    }

    /// # Panics
    /// Panics if `T` was never recorded.
    pub fn compute<T: Compute>(&self) -> &T {
        self.cached::<T>()
            .unwrap_or_else(|| panic!("Compute {} is not registered", type_name::<T>()))
    }

    pub fn updater(&self) -> Updater {
        Updater::new(self.send.clone())
    }

    /// Apply every queued compute update and reap finished command tasks. Returns how
    /// many updates were applied.
    pub fn sync_computes(&mut self) -> usize {
        let mut applied = 0;
        while let Ok((id, value)) = self.recv.try_recv() {
            match self.computes.get_mut(&id) {
                Some(compute) => {
                    compute.assign_box(value);
                    applied += 1;
                }
                None => warn!("sync_computes: update for unregistered compute {id:?}"),
            }
        }

        while let Some(joined) = self.tasks.try_join_next() {
            if let Err(err) = joined {
                warn!("sync_computes: command task ended abnormally: {err}");
            }
        }
        self.handles.retain(|handle| !handle.is_finished());
        applied
    }

    pub fn enqueue_command<T: Command>(&mut self) {
        self.queue.push((TypeId::of::<T>(), short_name::<T>()));
    }

    /// Enqueue and immediately flush.
    pub fn dispatch<T: Command>(&mut self) {
        self.enqueue_command::<T>();
        self.flush_commands();
    }

    /// Spawn every queued command on the current tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn flush_commands(&mut self) {
        if self.queue.is_empty() {
            return;
        }

        let queue = std::mem::take(&mut self.queue);
        for (id, name) in queue {
            let Some(command) = self.commands.get(&id).cloned() else {
                warn!("flush_commands: command {name} is not registered");
                continue;
            };

            let run = self.runs.entry(id).or_default();
            *run += 1;
            let id = TaskId::new(id, name, *run);
            debug!("flush_commands: spawning {id}");

            let token = self.cancel.child_token();
            let future = command.run(self.snapshot(), self.updater(), token.clone());
            let task = self.tasks.spawn(future);
            self.handles.push(TaskHandle::new(id, token, task));
        }
    }

    fn snapshot(&self) -> CommandSnapshot {
        let states = self
            .states
            .iter()
            .filter_map(|(id, state)| state.snapshot().map(|snap| (*id, snap)))
            .collect();
        let computes = self
            .computes
            .iter()
            .filter_map(|(id, compute)| compute.snapshot().map(|snap| (*id, snap)))
            .collect();
        CommandSnapshot::new(states, computes)
    }

    /// Number of spawned tasks that have not been joined yet.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for every spawned task, syncing computes as each one finishes.
    pub async fn settle(&mut self) {
        self.flush_commands();
        while self.tasks.join_next().await.is_some() {
            self.sync_computes();
        }
        self.handles.clear();
        self.sync_computes();
    }

    /// Cancel every running command and wait for the tasks to stop.
    pub async fn shutdown(&mut self) {
        self.cancel.cancel();
        self.queue.clear();
        self.tasks.abort_all();
        while self.tasks.join_next().await.is_some() {}
        self.handles.clear();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Identifiers of the command runs that have not been reaped yet.
    pub fn running(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.handles.iter().map(TaskHandle::id)
    }
}

impl Drop for StateCtx {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
