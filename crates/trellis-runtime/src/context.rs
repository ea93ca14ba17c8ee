//! Context facade implementation.
//!
//! [`ContextHandle`] is the runtime-side implementation of the SDK's
//! [`Context`] trait: a weak handle on the runtime core plus the bound
//! element. Holding the core weakly keeps instance records (which own
//! contexts through their modules) from forming reference cycles with
//! the runtime that owns the records; a context that outlives its
//! runtime degrades to null results.

use crate::runtime::{Core, Runtime};
use serde_json::Value;
use std::rc::{Rc, Weak};
use trellis_component::{Context, RuntimeError, ServiceRef};
use trellis_dom::NodeId;

pub(crate) struct ContextHandle {
    core: Weak<Core>,
    element: NodeId,
}

impl ContextHandle {
    pub(crate) fn new(core: Weak<Core>, element: NodeId) -> Self {
        Self { core, element }
    }

    fn runtime(&self) -> Option<Runtime> {
        self.core.upgrade().map(Runtime::from_core)
    }
}

impl Context for ContextHandle {
    fn broadcast(&self, name: &str, data: Value) -> Result<(), RuntimeError> {
        match self.runtime() {
            Some(runtime) => runtime.broadcast(name, data),
            None => Ok(()),
        }
    }

    fn get_service(&self, name: &str) -> Result<Option<ServiceRef>, RuntimeError> {
        match self.runtime() {
            Some(runtime) => runtime.get_service(name),
            None => Ok(None),
        }
    }

    fn has_service(&self, name: &str) -> bool {
        self.runtime()
            .map_or(false, |runtime| runtime.has_service(name))
    }

    fn get_config(&self, name: Option<&str>) -> Result<Option<Value>, RuntimeError> {
        match self.runtime() {
            Some(runtime) => runtime.get_module_config(self.element, name),
            None => Ok(None),
        }
    }

    fn get_global(&self, name: &str) -> Option<Value> {
        self.runtime().and_then(|runtime| runtime.get_global(name))
    }

    fn get_global_config(&self, name: Option<&str>) -> Option<Value> {
        self.runtime()
            .and_then(|runtime| runtime.get_global_config(name))
    }

    fn report_error(&self, error: RuntimeError) -> Result<(), RuntimeError> {
        match self.core.upgrade() {
            Some(core) => core.report(error),
            None => Ok(()),
        }
    }

    fn element(&self) -> NodeId {
        self.element
    }

    fn clone_box(&self) -> Box<dyn Context> {
        Box::new(Self {
            core: Weak::clone(&self.core),
            element: self.element,
        })
    }
}
