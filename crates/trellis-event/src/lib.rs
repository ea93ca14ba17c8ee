//! Event system for the Trellis component runtime.
//!
//! This crate provides the two event primitives everything else builds
//! on: the generic pub/sub [`Emitter`] and the [`EventKind`] allow-list
//! of bubbling UI event kinds.
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
//! │  trellis-event     : Emitter, EventKind          ◄── HERE   │
//! │  trellis-dom       : Dom abstraction, MemoryDom             │
//! │  trellis-component : Module, Behavior, Context              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Two Kinds of Events
//!
//! | Primitive | Direction | Use Case |
//! |-----------|-----------|----------|
//! | [`Emitter`] | runtime → observers | lifecycle, error, warning, message notifications |
//! | [`EventKind`] | host tree → delegates | bubbling UI events routed to module handlers |
//!
//! The orchestrator owns one `Emitter<serde_json::Value>` for its own
//! `"init"` / `"error"` / `"warning"` / `"message"` events; UI events
//! never pass through the emitter - they are routed per-element by the
//! runtime's event delegates.

mod emitter;
mod kind;

pub use emitter::{Emitter, Event, Handler};
pub use kind::{EventKind, UnknownEventKind, DEFAULT_EVENT_KINDS};
