//! Module trait for lifecycle participants.
//!
//! A module is the unit the runtime manages: one instance bound to one
//! component-marked element, created by a registered factory, taken
//! through `init`/`destroy`, and fed delegated UI events and broadcast
//! messages.
//!
//! # Module vs Behavior
//!
//! | Aspect | Module | Behavior |
//! |--------|--------|----------|
//! | Bound to | one marked element | the owning module's element |
//! | Declares behaviors | Yes | No |
//! | Init order | after its behaviors | before the module |
//! | Destroy order | after its behaviors (reverse) | before the module, reverse declaration order |
//!
//! # Declared Interests
//!
//! Instead of probing for dynamically named methods, a module declares
//! finite interest sets up front: [`event_interests`](Module::event_interests)
//! for delegated UI events and [`messages`](Module::messages) for
//! broadcast names. The runtime only routes what is declared - idle
//! modules cost no subscriptions.

use crate::{Context, ModuleError};
use serde_json::Value;
use trellis_dom::{NodeId, UiEvent};
use trellis_event::EventKind;
use std::rc::Rc;

/// A component instance managed by the runtime.
///
/// # Handler Dispatch
///
/// - [`on_event`](Module::on_event) fires for declared
///   [`event_interests`](Module::event_interests) observed at the
///   module's element, with the nearest routing target resolved for it.
/// - [`on_message`](Module::on_message) fires for broadcast names
///   listed in [`messages`](Module::messages); dispatch on the name is
///   a `match` inside the handler.
///
/// # Failure Containment
///
/// In production mode the runtime wraps every module entry point in an
/// isolation boundary: a returned [`ModuleError`] or a panic becomes an
/// `"error"` event attributed to this module, and siblings keep
/// running. In debug mode failures propagate so development fails fast.
pub trait Module {
    /// Behavior names this module composes, in initialization order.
    ///
    /// Defaults to none.
    fn behaviors(&self) -> &[&str] {
        &[]
    }

    /// Called once after the module's behaviors have initialized and
    /// before any events are routed to it.
    fn init(&mut self) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Called once on teardown, after this module's behaviors have been
    /// destroyed and after event delegates are detached.
    fn destroy(&mut self) {}

    /// UI event kinds this module wants delegated.
    ///
    /// Defaults to none. Kinds outside the runtime's active allow-list
    /// are ignored even when declared.
    fn event_interests(&self) -> &[EventKind] {
        &[]
    }

    /// Handles a delegated UI event.
    ///
    /// # Arguments
    ///
    /// * `event` - the observed event
    /// * `target` - nearest ancestor of the event origin carrying a
    ///   routing-type marker, bounded by the component boundary
    /// * `routing_type` - that ancestor's routing type, or `""` when
    ///   none was found
    fn on_event(
        &mut self,
        _event: &UiEvent,
        _target: Option<NodeId>,
        _routing_type: &str,
    ) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Broadcast message names this module wants delivered.
    ///
    /// Defaults to none.
    fn messages(&self) -> &[&str] {
        &[]
    }

    /// Handles a broadcast message whose name is listed in
    /// [`messages`](Module::messages).
    fn on_message(&mut self, _name: &str, _data: &Value) -> Result<(), ModuleError> {
        Ok(())
    }
}

/// Factory minting module instances.
///
/// Registered per type name; invoked once per started element with a
/// context bound to that element. Shared (`Rc`) so the registry can
/// hand the factory out without holding its own borrow across the
/// call.
pub type ModuleFactory = Rc<dyn Fn(Box<dyn Context>) -> Box<dyn Module>>;
