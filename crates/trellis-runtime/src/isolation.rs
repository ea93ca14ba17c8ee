//! Component error isolation boundary.
//!
//! [`IsolatedModule`] decorates a module so that every entry point runs
//! inside a failure boundary. A returned [`ModuleError`] or a panic is
//! converted into a [`RuntimeError::ComponentFailure`] - its message
//! prefixed with the failing object and method - and routed through the
//! error gate instead of unwinding into sibling components or the
//! orchestrator loop.
//!
//! The decorator is installed by `start` unless the runtime is in debug
//! mode; in debug mode modules run bare so failures propagate and
//! development fails fast.
//!
//! ```text
//! production:  caller ─► IsolatedModule ─► module code
//!                              │ panic / Err
//!                              ▼
//!                        error gate ─► "error" event
//!
//! debug:       caller ─────────────────► module code
//!                              panic / Err propagate
//! ```

use crate::runtime::Core;
use serde_json::Value;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Weak;
use trellis_component::{Module, ModuleError, RuntimeError};
use trellis_dom::{NodeId, UiEvent};
use trellis_event::EventKind;

/// Extracts a readable message from a panic payload.
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "panic".to_string()
    }
}

/// Failure-boundary decorator around a module instance.
pub(crate) struct IsolatedModule {
    inner: Box<dyn Module>,
    name: String,
    core: Weak<Core>,
}

impl IsolatedModule {
    pub(crate) fn new(inner: Box<dyn Module>, name: String, core: Weak<Core>) -> Self {
        Self { inner, name, core }
    }

    /// Annotates a failure with this module's name and the failing
    /// method, then routes it through the error gate.
    fn capture(&self, method: &str, message: String) {
        let failure = RuntimeError::ComponentFailure {
            object: self.name.clone(),
            method: method.to_string(),
            message,
        };
        if let Some(core) = self.core.upgrade() {
            if let Err(err) = core.report(failure) {
                tracing::error!(error = %err, "failure escaped the isolation gate");
            }
        }
    }
}

impl Module for IsolatedModule {
    fn behaviors(&self) -> &[&str] {
        match catch_unwind(AssertUnwindSafe(|| self.inner.behaviors())) {
            Ok(behaviors) => behaviors,
            Err(payload) => {
                self.capture("behaviors", panic_message(payload));
                &[]
            }
        }
    }

    fn init(&mut self) -> Result<(), ModuleError> {
        match catch_unwind(AssertUnwindSafe(|| self.inner.init())) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => {
                self.capture("init", err.to_string());
                Ok(())
            }
            Err(payload) => {
                self.capture("init", panic_message(payload));
                Ok(())
            }
        }
    }

    fn destroy(&mut self) {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| self.inner.destroy())) {
            self.capture("destroy", panic_message(payload));
        }
    }

    fn event_interests(&self) -> &[EventKind] {
        match catch_unwind(AssertUnwindSafe(|| self.inner.event_interests())) {
            Ok(interests) => interests,
            Err(payload) => {
                self.capture("event_interests", panic_message(payload));
                &[]
            }
        }
    }

    fn on_event(
        &mut self,
        event: &UiEvent,
        target: Option<NodeId>,
        routing_type: &str,
    ) -> Result<(), ModuleError> {
        let method = format!("on_{}", event.kind.as_str());
        match catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_event(event, target, routing_type)
        })) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => {
                self.capture(&method, err.to_string());
                Ok(())
            }
            Err(payload) => {
                self.capture(&method, panic_message(payload));
                Ok(())
            }
        }
    }

    fn messages(&self) -> &[&str] {
        match catch_unwind(AssertUnwindSafe(|| self.inner.messages())) {
            Ok(messages) => messages,
            Err(payload) => {
                self.capture("messages", panic_message(payload));
                &[]
            }
        }
    }

    fn on_message(&mut self, name: &str, data: &Value) -> Result<(), ModuleError> {
        match catch_unwind(AssertUnwindSafe(|| self.inner.on_message(name, data))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => {
                self.capture("on_message", err.to_string());
                Ok(())
            }
            Err(payload) => {
                self.capture("on_message", panic_message(payload));
                Ok(())
            }
        }
    }
}
