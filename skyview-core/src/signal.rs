//! Single-threaded notification channels.
//!
//! A [`Signal`] holds callbacks registered by observers. [`Signal::emit`]
//! invokes them synchronously, in registration order, before returning.
//! Each registration yields a [`Connection`] guard which removes the
//! callback when dropped, so observers never outlive what they observe.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Slot<T> = Rc<dyn Fn(&T)>;

struct Slots<T> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Slot<T>)>>,
}

/// A named notification channel carrying values of type `T`.
pub struct Signal<T> {
    slots: Rc<Slots<T>>,
}

impl<T: 'static> Signal<T> {
    /// Creates a signal with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Rc::new(Slots {
                next_id: Cell::new(0),
                entries: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Registers `callback`; it stays registered while the returned guard lives.
    pub fn connect<F>(&self, callback: F) -> Connection
    where
        F: Fn(&T) + 'static,
    {
        let id = self.slots.next_id.get();
        self.slots.next_id.set(id + 1);
        self.slots
            .entries
            .borrow_mut()
            .push((id, Rc::new(callback)));

        let weak: Weak<Slots<T>> = Rc::downgrade(&self.slots);
        Connection {
            disconnect: Some(Box::new(move || {
                if let Some(slots) = weak.upgrade() {
                    slots.entries.borrow_mut().retain(|(slot_id, _)| *slot_id != id);
                }
            })),
        }
    }

    /// Invokes every registered callback with `value`.
    ///
    /// The callback list is snapshotted first, so callbacks may read the
    /// emitter, connect new observers or drop their own connection.
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<Slot<T>> = self
            .slots
            .entries
            .borrow()
            .iter()
            .map(|(_, slot)| Rc::clone(slot))
            .collect();
        for slot in snapshot {
            slot(value);
        }
    }

    /// Number of live observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.slots.entries.borrow().len()
    }
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("observers", &self.slots.entries.borrow().len())
            .finish()
    }
}

/// Registration guard returned by [`Signal::connect`].
#[must_use = "dropping a Connection disconnects the callback immediately"]
pub struct Connection {
    disconnect: Option<Box<dyn FnOnce()>>,
}

impl Connection {
    /// Removes the callback now.
    pub fn disconnect(mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("connected", &self.disconnect.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_observers_in_order() {
        let signal: Signal<i32> = Signal::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&seen);
        let _a = signal.connect(move |v| first.borrow_mut().push(("a", *v)));
        let second = Rc::clone(&seen);
        let _b = signal.connect(move |v| second.borrow_mut().push(("b", *v)));

        signal.emit(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_dropping_connection_disconnects() {
        let signal: Signal<()> = Signal::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let conn = signal.connect(move |()| counter.set(counter.get() + 1));

        signal.emit(&());
        drop(conn);
        signal.emit(&());

        assert_eq!(hits.get(), 1);
        assert_eq!(signal.observer_count(), 0);
    }

    #[test]
    fn test_connection_outliving_signal_is_harmless() {
        let signal: Signal<u8> = Signal::new();
        let conn = signal.connect(|_| {});
        drop(signal);
        conn.disconnect();
    }

    #[test]
    fn test_observer_may_connect_during_emit() {
        let signal: Rc<Signal<u8>> = Rc::new(Signal::new());
        let late = Rc::new(RefCell::new(Vec::new()));

        let emitter = Rc::clone(&signal);
        let store = Rc::clone(&late);
        let _c = signal.connect(move |_| {
            store.borrow_mut().push(emitter.connect(|_| {}));
        });

        signal.emit(&1);
        assert_eq!(signal.observer_count(), 2);
    }
}
