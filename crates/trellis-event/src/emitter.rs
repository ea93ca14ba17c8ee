//! Generic pub/sub emitter.
//!
//! The [`Emitter`] is the smallest building block of the runtime: a map
//! of event kinds to ordered handler lists. The orchestrator uses one to
//! surface its lifecycle, error, warning, and message events to
//! observers that are not components themselves.
//!
//! # Dispatch Contract
//!
//! - Handlers run in **registration order**.
//! - [`fire`](Emitter::fire) iterates a **snapshot** of the handler list
//!   taken before dispatch begins, so a handler that subscribes or
//!   unsubscribes handlers mid-fire never affects the current dispatch.
//! - Registering the exact same handler allocation twice for one kind is
//!   silently ignored.
//! - [`off`](Emitter::off) removes the first matching handler and is a
//!   no-op when the handler was never registered.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use trellis_event::{Emitter, Handler};
//!
//! let emitter: Emitter<u32> = Emitter::new();
//! let seen = Rc::new(Cell::new(0));
//!
//! let counter = seen.clone();
//! let handler: Handler<u32> = Rc::new(move |event| {
//!     counter.set(counter.get() + event.data);
//! });
//!
//! emitter.on("tick", handler.clone());
//! emitter.on("tick", handler.clone()); // duplicate, ignored
//! emitter.fire("tick", 5);
//! assert_eq!(seen.get(), 5);
//!
//! emitter.off("tick", &handler);
//! emitter.fire("tick", 5);
//! assert_eq!(seen.get(), 5);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// An event delivered to emitter handlers.
///
/// Carries the kind it was fired under and an arbitrary payload. The
/// payload type is the emitter's type parameter; the orchestrator uses
/// `serde_json::Value` so observers can consume structured data without
/// downcasting.
#[derive(Debug, Clone)]
pub struct Event<P> {
    /// The kind this event was fired under (e.g. `"error"`).
    pub kind: String,
    /// Payload attached by the firing side.
    pub data: P,
}

/// A subscribed handler.
///
/// Handler identity is the `Rc` allocation: clones of the same `Rc`
/// count as the same handler for duplicate suppression and removal.
pub type Handler<P> = Rc<dyn Fn(&Event<P>)>;

/// Ordered pub/sub emitter over string event kinds.
///
/// Single-threaded by design: the whole runtime executes on the one
/// logical UI thread, so handler lists live behind a `RefCell` and the
/// emitter is neither `Send` nor `Sync`.
pub struct Emitter<P> {
    handlers: RefCell<HashMap<String, Vec<Handler<P>>>>,
}

impl<P> Emitter<P> {
    /// Creates an emitter with no subscriptions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(HashMap::new()),
        }
    }

    /// Subscribes `handler` to `kind`.
    ///
    /// Exact duplicates (same kind, same handler allocation) are
    /// silently ignored so accidental double-subscription cannot cause
    /// double delivery.
    pub fn on(&self, kind: &str, handler: Handler<P>) {
        let mut handlers = self.handlers.borrow_mut();
        let list = handlers.entry(kind.to_string()).or_default();

        if list.iter().any(|existing| Rc::ptr_eq(existing, &handler)) {
            return;
        }

        list.push(handler);
    }

    /// Unsubscribes the first registration of `handler` from `kind`.
    ///
    /// No-op when the handler is not subscribed.
    pub fn off(&self, kind: &str, handler: &Handler<P>) {
        let mut handlers = self.handlers.borrow_mut();
        if let Some(list) = handlers.get_mut(kind) {
            if let Some(pos) = list.iter().position(|existing| Rc::ptr_eq(existing, handler)) {
                list.remove(pos);
            }
        }
    }

    /// Fires an event, invoking every handler subscribed to `kind` in
    /// registration order.
    ///
    /// The handler list is snapshotted before iteration: handlers added
    /// or removed during the fire do not affect the current dispatch.
    /// Handlers may therefore call [`on`](Self::on), [`off`](Self::off),
    /// or even [`fire`](Self::fire) re-entrantly.
    pub fn fire(&self, kind: &str, data: P) {
        let snapshot: Vec<Handler<P>> = self
            .handlers
            .borrow()
            .get(kind)
            .cloned()
            .unwrap_or_default();

        let event = Event {
            kind: kind.to_string(),
            data,
        };

        for handler in snapshot {
            handler(&event);
        }
    }

    /// Returns the number of handlers subscribed to `kind`.
    #[must_use]
    pub fn handler_count(&self, kind: &str) -> usize {
        self.handlers
            .borrow()
            .get(kind)
            .map_or(0, |list| list.len())
    }
}

impl<P> Default for Emitter<P> {
    fn default() -> Self {
        Self::new()
    }
}
