//! Callback registries for the GTK viewport container

use millview_visualizer::CallbackId;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Callbacks keyed by registration id.
///
/// Dispatch takes the callbacks out while they run, so a callback may
/// register or remove handlers without a double borrow.
pub(crate) struct HandlerRegistry<F: ?Sized> {
    next_id: u64,
    handlers: BTreeMap<u64, Box<F>>,
    dispatching: bool,
    removed_while_dispatching: Vec<u64>,
}

impl<F: ?Sized> Default for HandlerRegistry<F> {
    fn default() -> Self {
        Self {
            next_id: 0,
            handlers: BTreeMap::new(),
            dispatching: false,
            removed_while_dispatching: Vec::new(),
        }
    }
}

impl<F: ?Sized> HandlerRegistry<F> {
    pub(crate) fn insert(&mut self, handler: Box<F>) -> CallbackId {
        self.next_id += 1;
        self.handlers.insert(self.next_id, handler);
        CallbackId(self.next_id)
    }

    pub(crate) fn remove(&mut self, id: CallbackId) -> bool {
        if self.handlers.remove(&id.0).is_some() {
            return true;
        }
        if self.dispatching && id.0 <= self.next_id {
            self.removed_while_dispatching.push(id.0);
            return true;
        }
        false
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.len()
    }

    pub(crate) fn dispatch(registry: &RefCell<Self>, mut call: impl FnMut(&mut F)) {
        let taken = match registry.try_borrow_mut() {
            Ok(mut registry) if !registry.dispatching => {
                registry.dispatching = true;
                std::mem::take(&mut registry.handlers)
            }
            _ => return,
        };

        let mut ran = Vec::with_capacity(taken.len());
        for (id, mut handler) in taken {
            call(&mut handler);
            ran.push((id, handler));
        }

        let mut registry = registry.borrow_mut();
        let removed = std::mem::take(&mut registry.removed_while_dispatching);
        for (id, handler) in ran {
            if !removed.contains(&id) {
                registry.handlers.insert(id, handler);
            }
        }
        registry.dispatching = false;
    }
}
