//! Behavior trait for reusable capability mixins.
//!
//! A behavior packages a cross-cutting capability (tracking, shortcut
//! keys, drag handling) that modules opt into by name via
//! [`Module::behaviors`](crate::Module::behaviors). Each composing
//! module gets its own behavior instance, created with the module's
//! context and memoized for that module's lifetime - two modules never
//! share one behavior instance.
//!
//! # Lifecycle Ordering
//!
//! For behaviors `[A, B]` on one module:
//!
//! ```text
//! start:  A.init, B.init, module.init, delegates attached
//! stop:   delegates detached, B.destroy, A.destroy, module.destroy
//! ```
//!
//! Teardown mirrors stack unwinding: last initialized, first destroyed.

use crate::{Context, ModuleError};
use serde_json::Value;
use trellis_dom::{NodeId, UiEvent};
use trellis_event::EventKind;
use std::rc::Rc;

/// A capability mixin attached to one module instance.
///
/// The handler surface matches [`Module`](crate::Module): behaviors get
/// their own event delegate on the module's element and receive
/// broadcasts after the module itself.
pub trait Behavior {
    /// Called before the owning module's `init`, in declaration order.
    fn init(&mut self) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Called after event delegates are detached, in reverse
    /// declaration order, before the owning module's `destroy`.
    fn destroy(&mut self) {}

    /// UI event kinds this behavior wants delegated.
    fn event_interests(&self) -> &[EventKind] {
        &[]
    }

    /// Handles a delegated UI event. See
    /// [`Module::on_event`](crate::Module::on_event) for the argument
    /// contract.
    fn on_event(
        &mut self,
        _event: &UiEvent,
        _target: Option<NodeId>,
        _routing_type: &str,
    ) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Broadcast message names this behavior wants delivered.
    fn messages(&self) -> &[&str] {
        &[]
    }

    /// Handles a broadcast message whose name is listed in
    /// [`messages`](Behavior::messages).
    fn on_message(&mut self, _name: &str, _data: &Value) -> Result<(), ModuleError> {
        Ok(())
    }
}

/// Factory minting behavior instances.
///
/// Invoked once per (module instance, behavior name) with the owning
/// module's context.
pub type BehaviorFactory = Rc<dyn Fn(Box<dyn Context>) -> Box<dyn Behavior>>;

#[cfg(test)]
mod tests {
    use super::*;

    struct Quiet;

    impl Behavior for Quiet {}

    #[test]
    fn defaults_declare_nothing() {
        let mut behavior = Quiet;
        assert!(behavior.event_interests().is_empty());
        assert!(behavior.messages().is_empty());
        assert!(behavior.init().is_ok());
        assert!(behavior.on_message("anything", &Value::Null).is_ok());
        behavior.destroy();
    }
}
