//! Component SDK for the Trellis runtime.
//!
//! This crate defines the traits a host implements to participate in
//! the component lifecycle: [`Module`] for per-element components,
//! [`Behavior`] for reusable capability mixins, and [`Context`] - the
//! capability-scoped facade each component uses to reach the runtime.
//!
//! # Crate Architecture
//!
//! This crate is the top of the **SDK** layer:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SDK Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  trellis-types     : ErrorCode, test assertions             │
//! │  trellis-event     : Emitter, EventKind                     │
//! │  trellis-dom       : Dom abstraction, MemoryDom             │
//! │  trellis-component : Module, Behavior, Context   ◄── HERE   │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Runtime Layer                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  trellis-runtime   : Runtime, EventDelegate, isolation      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Lifecycle Ordering
//!
//! For one `start` call the runtime guarantees:
//!
//! ```text
//! behavior.init()  (declaration order)
//!     │
//!     ▼
//! module.init()
//!     │
//!     ▼
//! event delegates attached  (module first, then behaviors)
//! ```
//!
//! and the exact reverse on `stop`: delegates detached, behaviors
//! destroyed in reverse declaration order, then the module destroyed.
//!
//! # Example
//!
//! ```
//! use serde_json::Value;
//! use trellis_component::{Context, Module, ModuleError};
//! use trellis_event::EventKind;
//!
//! struct Navbar {
//!     ctx: Box<dyn Context>,
//! }
//!
//! impl Module for Navbar {
//!     fn init(&mut self) -> Result<(), ModuleError> {
//!         Ok(())
//!     }
//!
//!     fn event_interests(&self) -> &[EventKind] {
//!         &[EventKind::Click]
//!     }
//!
//!     fn on_event(
//!         &mut self,
//!         _event: &trellis_dom::UiEvent,
//!         _target: Option<trellis_dom::NodeId>,
//!         routing_type: &str,
//!     ) -> Result<(), ModuleError> {
//!         if routing_type == "filesToggler" {
//!             self.ctx.broadcast("toggleFiles", Value::Null)?;
//!         }
//!         Ok(())
//!     }
//! }
//! ```

mod behavior;
mod context;
mod error;
mod module;

pub use behavior::{Behavior, BehaviorFactory};
pub use context::{Context, ServiceRef};
pub use error::{ModuleError, RegistryKind, RuntimeError};
pub use module::{Module, ModuleFactory};
