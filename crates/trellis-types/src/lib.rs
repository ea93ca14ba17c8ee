//! Core types for the Trellis component runtime.
//!
//! This crate provides the foundational error-code interface shared by
//! every layer of the Trellis architecture.
//!
//! # Crate Architecture
//!
//! This crate sits at the bottom of the **SDK** layer:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SDK Layer                             │
//! │  (stable, safe for host pages and modules to depend on)     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  trellis-types     : ErrorCode, test assertions  ◄── HERE   │
//! │  trellis-event     : Emitter, EventKind                     │
//! │  trellis-dom       : Dom abstraction, MemoryDom             │
//! │  trellis-component : Module, Behavior, Context              │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Runtime Layer                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  trellis-runtime   : Runtime, EventDelegate, isolation      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Why a Unified Error Interface?
//!
//! Trellis routes every failure through a single error gate: in debug
//! mode errors propagate to the caller, in production they are converted
//! into observable `"error"` events so the host page keeps running.
//! For that conversion to be useful to observers, every error carries a
//! stable machine-readable code via [`ErrorCode`].
//!
//! # Example
//!
//! ```
//! use trellis_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum LookupError {
//!     Missing(String),
//! }
//!
//! impl ErrorCode for LookupError {
//!     fn code(&self) -> &'static str {
//!         "LOOKUP_MISSING"
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         false
//!     }
//! }
//!
//! let err = LookupError::Missing("navbar".into());
//! assert_eq!(err.code(), "LOOKUP_MISSING");
//! ```

mod error;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
