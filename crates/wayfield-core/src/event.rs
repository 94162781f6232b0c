//! Observer-style update notification: [`Signal`].
//!
//! A `Signal` is a clonable handle to a shared list of listeners. Cloning
//! yields another handle to the **same** listener list (the same shared-
//! storage convention the rest of the workspace uses for live handles), so
//! a producer and any number of consumers can hold the signal independently.

use std::cell::RefCell;
use std::rc::Rc;

/// A subscribable notification channel carrying no payload.
#[derive(Clone, Default)]
pub struct Signal {
    listeners: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl Signal {
    /// Create a new signal with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener, called on every [`notify`](Self::notify).
    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Invoke every registered listener, in subscription order.
    ///
    /// Listeners are snapshotted first, so a listener may subscribe further
    /// listeners without observing them during the current dispatch.
    pub fn notify(&self) {
        let snapshot: Vec<Rc<dyn Fn()>> = self.listeners.borrow().clone();
        for listener in snapshot {
            listener();
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl std::fmt::Debug for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
