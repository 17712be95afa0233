//! State runtime shared by the business and UI crates.
//!
//! UI code owns a [`StateCtx`], edits [`State`]s in place, dispatches [`Command`]s for
//! anything that touches the network, and renders from [`Compute`]s that commands
//! replace through an [`Updater`].

mod command;
mod ctx;
mod snapshot;
mod state;
mod task;
mod updater;

pub use command::{Command, CommandFuture};
pub use ctx::StateCtx;
pub use snapshot::CommandSnapshot;
pub use state::{Compute, State, assign_impl};
pub use task::{TaskHandle, TaskId};
pub use updater::Updater;
