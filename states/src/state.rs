use std::any::Any;

/// A value owned by [`StateCtx`](crate::StateCtx) that UI code mutates directly.
///
/// Inputs (form fields, configuration, injected services) are states. A state that
/// commands need to read must return a clone from [`State::snapshot`].
pub trait State: Any + Send {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Cloned copy handed to commands when they are flushed.
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        None
    }
}

/// A cached result that only changes through an [`Updater`](crate::Updater).
///
/// Commands own the side effects; computes hold whatever the UI renders from them.
pub trait Compute: Any + Send {
    fn as_any(&self) -> &dyn Any;

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        None
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>);
}

/// Replace `target` with the boxed value when the types line up.
pub fn assign_impl<T: Any>(target: &mut T, new_self: Box<dyn Any + Send>) {
    match new_self.downcast::<T>() {
        Ok(value) => *target = *value,
        Err(_) => log::error!(
            "assign_impl: type mismatch while assigning {}",
            std::any::type_name::<T>()
        ),
    }
}
