//! Type aliases for commonly used shared-state types.
//!
//! The viewer runs entirely on the UI thread, so shared state is
//! `Rc<RefCell<T>>` rather than a lock. Callbacks registered with the UI
//! toolkit hold [`WeakShared`] handles so that dropping the owner ends them.
//!
//! ```rust,ignore
//! use millview_core::types::*;
//!
//! let state: Shared<Counter> = shared(Counter::default());
//! let weak: WeakShared<Counter> = Rc::downgrade(&state);
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
pub type Shared<T> = Rc<RefCell<T>>;

/// Non-owning counterpart of [`Shared`].
pub type WeakShared<T> = Weak<RefCell<T>>;

/// An optional shared reference, for lazily-initialized shared state.
pub type SharedOption<T> = Rc<RefCell<Option<T>>>;

/// Boxed UI-thread callback without arguments.
pub type UiCallback = Box<dyn FnMut()>;

/// Boxed UI-thread callback receiving one value.
pub type UiDataCallback<T> = Box<dyn FnMut(T)>;

/// Wrap a value in a [`Shared`].
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Create an empty [`SharedOption`].
pub fn shared_none<T>() -> SharedOption<T> {
    Rc::new(RefCell::new(None))
}
