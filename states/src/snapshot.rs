use std::any::{Any, TypeId, type_name};
use std::collections::BTreeMap;

use crate::{Compute, State};

/// Cloned states and computes a command reads from.
///
/// Taken once per flush, so a command never observes UI edits made while it runs.
#[derive(Default)]
pub struct CommandSnapshot {
    states: BTreeMap<TypeId, Box<dyn Any + Send>>,
    computes: BTreeMap<TypeId, Box<dyn Any + Send>>,
}

impl CommandSnapshot {
    pub(crate) fn new(
        states: BTreeMap<TypeId, Box<dyn Any + Send>>,
        computes: BTreeMap<TypeId, Box<dyn Any + Send>>,
    ) -> Self {
        Self { states, computes }
    }

    pub fn try_state<T: State>(&self) -> Option<&T> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    pub fn try_compute<T: Compute>(&self) -> Option<&T> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    /// # Panics
    /// Panics if the state was not registered or does not implement `snapshot`.
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>()
            .unwrap_or_else(|| panic!("State snapshot for {} is missing", type_name::<T>()))
    }

    /// # Panics
    /// Panics if the compute was not registered or does not implement `snapshot`.
    pub fn compute<T: Compute>(&self) -> &T {
        self.try_compute::<T>()
            .unwrap_or_else(|| panic!("Compute snapshot for {} is missing", type_name::<T>()))
    }
}
