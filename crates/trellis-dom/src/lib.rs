//! Host-tree abstraction for the Trellis component runtime.
//!
//! The runtime never touches a concrete UI tree. Everything it needs -
//! attribute reads, upward walks, subtree queries, embedded config,
//! event listeners, host globals - goes through the object-safe [`Dom`]
//! trait, so the same orchestrator drives a browser DOM adapter, a
//! server-side tree, or the bundled [`MemoryDom`] fixture.
//!
//! # Crate Architecture
//!
//! This crate is part of the **SDK** layer:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SDK Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  trellis-types     : ErrorCode, test assertions             │
//! │  trellis-event     : Emitter, EventKind                     │
//! │  trellis-dom       : Dom abstraction, MemoryDom  ◄── HERE   │
//! │  trellis-component : Module, Behavior, Context              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Markup Contract
//!
//! | Marker | Meaning |
//! |--------|---------|
//! | [`MODULE_ATTRIBUTE`] | element participates in the lifecycle; first whitespace token is the module type |
//! | [`TYPE_ATTRIBUTE`] | element is a routing target for delegated events |
//! | [`ID_ATTRIBUTE`] | instance key; minted by the runtime when absent |
//! | [`CONFIG_CONTENT_TYPE`] | content-type of the embedded per-module JSON config child |

mod memory;

pub use memory::MemoryDom;

use serde_json::Value;
use std::rc::Rc;
use trellis_event::EventKind;

/// Attribute marking an element as a module host.
///
/// The attribute value's first whitespace-delimited token is the
/// registered module type; additional tokens are reserved.
pub const MODULE_ATTRIBUTE: &str = "data-module";

/// Attribute marking an element as a delegated-event routing target.
pub const TYPE_ATTRIBUTE: &str = "data-type";

/// Attribute holding the element id that keys instance records.
pub const ID_ATTRIBUTE: &str = "id";

/// Content-type marker of the embedded config child element.
///
/// Hosts surface the text of a `script` child carrying this type
/// through [`Dom::config_text`].
pub const CONFIG_CONTENT_TYPE: &str = "text/x-config";

/// Opaque handle to one element of the host tree.
///
/// The meaning of the inner value is private to the host adapter; the
/// runtime only ever compares, stores, and passes handles back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Handle to a registered event listener, used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A UI event observed by a listener.
///
/// `origin` is the element the event was fired at; listeners higher up
/// the tree receive the same origin while the event bubbles.
#[derive(Debug, Clone)]
pub struct UiEvent {
    /// What happened.
    pub kind: EventKind,
    /// Element the event originated at.
    pub origin: NodeId,
    /// Host-specific event details (coordinates, key, ...).
    pub data: Value,
}

/// A registered event listener.
pub type Listener = Rc<dyn Fn(&UiEvent)>;

/// Host-tree adapter.
///
/// Implementations wrap whatever hierarchical structure the host
/// renders and expose the minimal surface the runtime needs. All
/// methods take `&self`; adapters use interior mutability, matching the
/// single-threaded execution model.
///
/// # Bubbling
///
/// [`listen`](Dom::listen) subscribes to events of one kind observed at
/// one element, **including** events originating at descendants of that
/// element - the adapter is responsible for bubbling delivery. This is
/// the only event guarantee delegates rely on.
pub trait Dom {
    /// Returns the root element of the tree.
    fn root(&self) -> NodeId;

    /// Returns the value of an attribute, or `None` when absent.
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Sets an attribute value.
    fn set_attribute(&self, node: NodeId, name: &str, value: &str);

    /// Returns the parent element, or `None` for the root.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Returns every descendant of `root` carrying `name`, in document
    /// order. `root` itself is not included.
    fn descendants_with_attribute(&self, root: NodeId, name: &str) -> Vec<NodeId>;

    /// Returns the text of the embedded config child of `node`, if any.
    ///
    /// Hosts resolve this as the text of a `script` child whose
    /// content-type is [`CONFIG_CONTENT_TYPE`].
    fn config_text(&self, node: NodeId) -> Option<String>;

    /// Subscribes `listener` to `kind` events observed at `node`.
    fn listen(&self, node: NodeId, kind: EventKind, listener: Listener) -> ListenerId;

    /// Removes a previously registered listener. No-op for unknown ids.
    fn unlisten(&self, listener: ListenerId);

    /// Returns a host-scope global variable, or `None` when undefined.
    fn global(&self, name: &str) -> Option<Value>;
}
