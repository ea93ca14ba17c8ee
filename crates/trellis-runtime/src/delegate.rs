//! Per-element event delegation.
//!
//! One [`EventDelegate`] binds exactly one element to one handler
//! source (a module or one of its behaviors). It subscribes only to
//! event kinds that are both in the active allow-list and declared by
//! the handler, so idle components carry no listeners at all.
//!
//! # Routing
//!
//! On each observed event the delegate walks upward from the event's
//! origin looking for the nearest ancestor carrying a routing-type
//! marker. The walk never crosses a component boundary - an element
//! carrying the component marker stops the search, so delegation never
//! leaks into an enclosing component's subtree.
//!
//! ```text
//! <div data-module="files">          ◄─ delegate bound here
//!   <ul data-type="tableOfContents"> ◄─ nearest routing target
//!     <li>…</li>                     ◄─ event origin
//!   </ul>
//! </div>
//! ```

use crate::runtime::Core;
use serde_json::json;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use trellis_component::{Behavior, Module, ModuleError, RuntimeError};
use trellis_dom::{Dom, Listener, ListenerId, NodeId, UiEvent, MODULE_ATTRIBUTE, TYPE_ATTRIBUTE};
use trellis_event::EventKind;

/// A handler source a delegate dispatches into.
#[derive(Clone)]
pub(crate) enum HandlerRef {
    Module(Rc<RefCell<Box<dyn Module>>>),
    Behavior(Rc<RefCell<Box<dyn Behavior>>>),
}

/// Outcome of one dispatch attempt.
enum Dispatch {
    Done,
    Failed(ModuleError),
    /// The handler is already on the call stack (re-entrant event).
    Busy,
}

impl HandlerRef {
    fn interests(&self) -> Vec<EventKind> {
        match self {
            Self::Module(module) => module
                .try_borrow()
                .map(|module| module.event_interests().to_vec())
                .unwrap_or_default(),
            Self::Behavior(behavior) => behavior
                .try_borrow()
                .map(|behavior| behavior.event_interests().to_vec())
                .unwrap_or_default(),
        }
    }

    fn dispatch(&self, event: &UiEvent, target: Option<NodeId>, routing_type: &str) -> Dispatch {
        let outcome = match self {
            Self::Module(module) => match module.try_borrow_mut() {
                Ok(mut module) => module.on_event(event, target, routing_type),
                Err(_) => return Dispatch::Busy,
            },
            Self::Behavior(behavior) => match behavior.try_borrow_mut() {
                Ok(mut behavior) => behavior.on_event(event, target, routing_type),
                Err(_) => return Dispatch::Busy,
            },
        };
        match outcome {
            Ok(()) => Dispatch::Done,
            Err(err) => Dispatch::Failed(err),
        }
    }
}

/// Finds the nearest ancestor of `origin` (inclusive) carrying the
/// routing-type marker, without crossing a component boundary.
///
/// Returns the matched element and its routing type, or `(None, "")`
/// when the boundary or the root is reached first. The boundary element
/// itself still counts as a routing target when it carries both
/// markers.
pub(crate) fn nearest_routing_target(dom: &dyn Dom, origin: NodeId) -> (Option<NodeId>, String) {
    let mut current = Some(origin);
    while let Some(node) = current {
        if let Some(routing_type) = dom.attribute(node, TYPE_ATTRIBUTE) {
            return (Some(node), routing_type);
        }
        if dom.attribute(node, MODULE_ATTRIBUTE).is_some() {
            break;
        }
        current = dom.parent(node);
    }
    (None, String::new())
}

/// Bubbling-event router binding one handler source to one element.
///
/// `attach_events` and `detach_events` are idempotent; detaching is the
/// cancellation primitive for event subscriptions.
pub struct EventDelegate {
    dom: Rc<dyn Dom>,
    element: NodeId,
    handler: HandlerRef,
    /// Name used to attribute handler failures (module type or
    /// behavior name).
    label: String,
    kinds: Vec<EventKind>,
    core: Weak<Core>,
    listeners: Vec<ListenerId>,
    attached: bool,
}

impl EventDelegate {
    pub(crate) fn new(
        dom: Rc<dyn Dom>,
        element: NodeId,
        handler: HandlerRef,
        label: String,
        kinds: Vec<EventKind>,
        core: Weak<Core>,
    ) -> Self {
        Self {
            dom,
            element,
            handler,
            label,
            kinds,
            core,
            listeners: Vec::new(),
            attached: false,
        }
    }

    /// Attaches listeners for every allow-listed kind the handler
    /// declares. No-op when already attached.
    pub fn attach_events(&mut self) {
        if self.attached {
            return;
        }

        let interests = self.handler.interests();
        for kind in self
            .kinds
            .iter()
            .copied()
            .filter(|kind| interests.contains(kind))
        {
            let handler = self.handler.clone();
            let label = self.label.clone();
            let core = self.core.clone();
            let dom = Rc::downgrade(&self.dom);

            let listener: Listener = Rc::new(move |event: &UiEvent| {
                let Some(dom) = dom.upgrade() else {
                    return;
                };
                let (target, routing_type) = nearest_routing_target(dom.as_ref(), event.origin);

                match handler.dispatch(event, target, &routing_type) {
                    Dispatch::Done => {}
                    Dispatch::Failed(err) => {
                        if let Some(core) = core.upgrade() {
                            let failure = RuntimeError::ComponentFailure {
                                object: label.clone(),
                                method: format!("on_{}", event.kind.as_str()),
                                message: err.to_string(),
                            };
                            if let Err(err) = core.report(failure) {
                                // A host event callback has no caller to
                                // receive a debug-mode error.
                                tracing::error!(error = %err, "unhandled event handler failure");
                            }
                        }
                    }
                    Dispatch::Busy => {
                        if let Some(core) = core.upgrade() {
                            core.warn(json!({
                                "reason": "re-entrant event delivery skipped",
                                "handler": label,
                                "kind": event.kind.as_str(),
                            }));
                        }
                    }
                }
            });

            self.listeners.push(self.dom.listen(self.element, kind, listener));
        }

        self.attached = true;
    }

    /// Removes every listener this delegate attached. No-op when
    /// already detached.
    pub fn detach_events(&mut self) {
        for listener in self.listeners.drain(..) {
            self.dom.unlisten(listener);
        }
        self.attached = false;
    }
}
