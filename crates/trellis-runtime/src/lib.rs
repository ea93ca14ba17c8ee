//! Trellis runtime - the registry and lifecycle orchestrator.
//!
//! This crate is the internal runtime layer beneath the Trellis SDK.
//! Hosts construct one [`Runtime`] per process (or per test), register
//! module/service/behavior factories, and call
//! [`init`](Runtime::init); the runtime then owns every component's
//! lifecycle and all communication between them.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SDK Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  trellis-types     : ErrorCode, test assertions             │
//! │  trellis-event     : Emitter, EventKind                     │
//! │  trellis-dom       : Dom abstraction, MemoryDom             │
//! │  trellis-component : Module, Behavior, Context              │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Runtime Layer (THIS CRATE)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  runtime   : Runtime, registries, lifecycle, broadcast      │
//! │  delegate  : EventDelegate, routing-target resolution       │
//! │  isolation : failure boundary around module entry points    │
//! │  context   : the Context facade implementation              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Control Flow
//!
//! ```text
//! host                       Runtime                      components
//!  │  register_module ────────►│                               │
//!  │  register_service ───────►│                               │
//!  │  register_behavior ──────►│                               │
//!  │  init ───────────────────►│── start (per marked element) ►│
//!  │                           │   behaviors.init → module.init│
//!  │                           │   delegates attached          │
//!  │                           │◄── ctx.broadcast ─────────────│
//!  │◄── "init"/"error"/       │── on_message (one pass) ─────►│
//!  │    "message" events       │                               │
//!  │  destroy ────────────────►│── stop (reverse teardown) ───►│
//! ```
//!
//! Components never hold references to each other; every cross-component
//! interaction flows through [`Runtime::broadcast`].
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use serde_json::Map;
//! use trellis_component::Module;
//! use trellis_dom::{Dom, MemoryDom, MODULE_ATTRIBUTE};
//! use trellis_runtime::Runtime;
//!
//! struct Navbar;
//! impl Module for Navbar {}
//!
//! let dom = Rc::new(MemoryDom::new());
//! dom.add_element(dom.root(), &[(MODULE_ATTRIBUTE, "navbar")]);
//!
//! let runtime = Runtime::new(dom);
//! runtime.register_module("navbar", |_ctx| Box::new(Navbar))?;
//! runtime.init(Map::new())?;
//! runtime.destroy()?;
//! # Ok::<(), trellis_component::RuntimeError>(())
//! ```

mod context;
mod delegate;
mod isolation;
mod runtime;

pub use delegate::EventDelegate;
pub use runtime::{ErrorHandler, Runtime, ServiceFactory};
