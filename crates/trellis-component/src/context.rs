//! Context facade for runtime interaction.
//!
//! The context is the *only* handle a module or behavior holds on its
//! environment. It is constructed per `(runtime, element)` pair and
//! exposes a deliberately small capability set - broadcasting, service
//! lookup, config and global reads, error reporting, and the bound
//! element. A component never receives the runtime itself, which
//! bounds the blast radius of what any one component can do.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                   Runtime                     │
//! │   registries · lifecycle · broadcast · gate   │
//! └──────────────────────────────────────────────┘
//!                      ▲
//!                      │ narrow facade
//!            ┌─────────┴─────────┐
//!            │      Context      │
//!            └─────────┬─────────┘
//!                      │ injected at creation
//!                      ▼
//!            ┌───────────────────┐
//!            │  Module/Behavior  │
//!            └───────────────────┘
//! ```

use crate::RuntimeError;
use serde_json::Value;
use std::any::Any;
use std::rc::Rc;
use trellis_dom::NodeId;

/// Shared handle to a lazily constructed service singleton.
///
/// Consumers downcast to the concrete service type:
///
/// ```
/// use std::rc::Rc;
/// use trellis_component::ServiceRef;
///
/// struct Heading {
///     prefix: &'static str,
/// }
///
/// let service: ServiceRef = Rc::new(Heading { prefix: "h" });
/// let heading = service
///     .downcast_ref::<Heading>()
///     .expect("registered as Heading");
/// assert_eq!(heading.prefix, "h");
/// ```
pub type ServiceRef = Rc<dyn Any>;

/// Capability-scoped facade handed to exactly one component.
///
/// # Error Propagation
///
/// Fallible methods follow the runtime's gate policy: in debug mode
/// the underlying error is returned; in production it has already been
/// converted into an `"error"` event and the method yields its null
/// result.
pub trait Context {
    /// Broadcasts a message to every started component.
    fn broadcast(&self, name: &str, data: Value) -> Result<(), RuntimeError>;

    /// Returns the named service singleton, constructing it on first
    /// access.
    fn get_service(&self, name: &str) -> Result<Option<ServiceRef>, RuntimeError>;

    /// Returns `true` when a service with this name is registered.
    fn has_service(&self, name: &str) -> bool;

    /// Returns this component's embedded config - the whole object for
    /// `None`, one key's value for `Some(name)`. `Ok(None)` when the
    /// config or key is missing.
    fn get_config(&self, name: Option<&str>) -> Result<Option<Value>, RuntimeError>;

    /// Returns a host-scope global variable, or `None` when undefined.
    fn get_global(&self, name: &str) -> Option<Value>;

    /// Returns global configuration - the whole object for `None`, one
    /// key's value for `Some(name)`.
    fn get_global_config(&self, name: Option<&str>) -> Option<Value>;

    /// Routes an error through the runtime's error gate.
    fn report_error(&self, error: RuntimeError) -> Result<(), RuntimeError>;

    /// Returns the element this component is bound to.
    fn element(&self) -> NodeId;

    /// Clones this context into a boxed trait object.
    fn clone_box(&self) -> Box<dyn Context>;
}

impl Clone for Box<dyn Context> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
