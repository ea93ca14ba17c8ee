//! Registry and lifecycle orchestrator.
//!
//! One [`Runtime`] owns four registries (module types, services,
//! behaviors, live instances), the global configuration, and the event
//! emitter observers subscribe to. It is an explicit value - construct
//! one per process or per test - never a hidden singleton.
//!
//! # Lifecycle States
//!
//! ```text
//! new ──register_*──► configured ──init──► initialized ──destroy──► new
//!                                   │
//!                                   └─ global config frozen here
//! ```
//!
//! # The Error Gate
//!
//! Every failure funnels through one gate:
//!
//! | Condition | Outcome |
//! |-----------|---------|
//! | custom handler installed | handler consumes the error, caller gets the null result |
//! | debug mode | error returned to the caller (fail fast) |
//! | production | `"error"` event fired, caller gets the null result |
//!
//! Production pages therefore degrade gracefully: a broken component or
//! registration never halts the rest of the page.

use crate::context::ContextHandle;
use crate::delegate::{EventDelegate, HandlerRef};
use crate::isolation::IsolatedModule;
use serde_json::{json, Map, Value};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;
use trellis_component::{
    Behavior, BehaviorFactory, Context, Module, ModuleFactory, RegistryKind, RuntimeError,
    ServiceRef,
};
use trellis_dom::{Dom, NodeId, ID_ATTRIBUTE, MODULE_ATTRIBUTE};
use trellis_event::{Emitter, EventKind, Handler, DEFAULT_EVENT_KINDS};
use trellis_types::ErrorCode;

/// Factory constructing a service singleton.
///
/// Receives the runtime so a service can resolve other services; the
/// in-flight construction stack turns mutual recursion into a
/// diagnosable [`RuntimeError::CircularDependency`] instead of a stack
/// overflow.
pub type ServiceFactory = Rc<dyn Fn(&Runtime) -> Result<ServiceRef, RuntimeError>>;

/// Custom error handler, consuming errors instead of the default gate.
pub type ErrorHandler = Rc<dyn Fn(&RuntimeError)>;

struct ModuleRegistration {
    factory: ModuleFactory,
    /// Mints `mod-<type>-<n>` ids; never resets while the registry lives.
    counter: u64,
}

struct ServiceRegistration {
    factory: ServiceFactory,
    instance: Option<ServiceRef>,
}

struct BehaviorRegistration {
    factory: BehaviorFactory,
}

pub(crate) struct InstanceRecord {
    pub(crate) type_name: String,
    #[allow(dead_code)]
    pub(crate) element: NodeId,
    pub(crate) module: Rc<RefCell<Box<dyn Module>>>,
    /// Resolved behaviors in declaration order; memoized for the life
    /// of this record.
    pub(crate) behaviors: Vec<(String, Rc<RefCell<Box<dyn Behavior>>>)>,
    pub(crate) delegates: RefCell<Vec<EventDelegate>>,
    /// Embedded config cache: outer `None` until first read.
    pub(crate) config: RefCell<Option<Option<Value>>>,
}

pub(crate) struct Core {
    pub(crate) dom: Rc<dyn Dom>,
    pub(crate) emitter: Emitter<Value>,
    global_config: RefCell<Map<String, Value>>,
    modules: RefCell<HashMap<String, ModuleRegistration>>,
    services: RefCell<HashMap<String, ServiceRegistration>>,
    service_stack: RefCell<Vec<String>>,
    behaviors: RefCell<HashMap<String, BehaviorRegistration>>,
    /// Live instances keyed by element id. A `BTreeMap` keeps broadcast
    /// iteration order stable.
    instances: RefCell<BTreeMap<String, Rc<InstanceRecord>>>,
    initialized: Cell<bool>,
    error_handler: RefCell<Option<ErrorHandler>>,
}

impl Core {
    pub(crate) fn debug(&self) -> bool {
        matches!(
            self.global_config.borrow().get("debug"),
            Some(Value::Bool(true))
        )
    }

    /// The single error gate (see module docs for the policy table).
    pub(crate) fn report(&self, error: RuntimeError) -> Result<(), RuntimeError> {
        let handler = self.error_handler.borrow().clone();
        if let Some(handler) = handler {
            handler(&error);
            return Ok(());
        }

        if self.debug() {
            return Err(error);
        }

        self.emitter.fire(
            "error",
            json!({
                "code": error.code(),
                "message": error.to_string(),
                "detail": serde_json::to_value(&error).unwrap_or(Value::Null),
            }),
        );
        Ok(())
    }

    /// Warning channel: logged in debug mode, an observable `"warning"`
    /// event in production.
    pub(crate) fn warn(&self, data: Value) {
        if self.debug() {
            tracing::warn!(%data, "runtime warning");
        } else {
            self.emitter.fire("warning", data);
        }
    }
}

/// Reads the element id used to key instance records. Empty ids count
/// as absent.
fn element_id(dom: &dyn Dom, element: NodeId) -> Option<String> {
    dom.attribute(element, ID_ATTRIBUTE)
        .filter(|id| !id.is_empty())
}

/// Resolves the module type declared by an element: the first
/// whitespace-delimited token of the marker attribute. Additional
/// tokens are reserved.
fn module_type(dom: &dyn Dom, element: NodeId) -> String {
    dom.attribute(element, MODULE_ATTRIBUTE)
        .and_then(|value| value.split_whitespace().next().map(str::to_string))
        .unwrap_or_default()
}

/// The registry and lifecycle orchestrator.
///
/// Cheap to clone; clones share the same underlying state. All methods
/// take `&self` - the runtime executes on the single logical UI thread
/// and is re-entrant only through user code (a message handler calling
/// [`broadcast`](Runtime::broadcast) runs depth-first).
#[derive(Clone)]
pub struct Runtime {
    pub(crate) core: Rc<Core>,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime").finish_non_exhaustive()
    }
}

impl Runtime {
    /// Creates a runtime over the given host tree.
    #[must_use]
    pub fn new(dom: Rc<dyn Dom>) -> Self {
        Self {
            core: Rc::new(Core {
                dom,
                emitter: Emitter::new(),
                global_config: RefCell::new(Map::new()),
                modules: RefCell::new(HashMap::new()),
                services: RefCell::new(HashMap::new()),
                service_stack: RefCell::new(Vec::new()),
                behaviors: RefCell::new(HashMap::new()),
                instances: RefCell::new(BTreeMap::new()),
                initialized: Cell::new(false),
                error_handler: RefCell::new(None),
            }),
        }
    }

    pub(crate) fn from_core(core: Rc<Core>) -> Self {
        Self { core }
    }

    /// Routes `error` through the gate and yields `fallback` when the
    /// gate absorbed it.
    fn fail<T>(&self, error: RuntimeError, fallback: T) -> Result<T, RuntimeError> {
        self.core.report(error)?;
        Ok(fallback)
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Registers a module type.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::DuplicateRegistration`] when the name is taken;
    /// the first registration stays intact.
    pub fn register_module(
        &self,
        name: &str,
        factory: impl Fn(Box<dyn Context>) -> Box<dyn Module> + 'static,
    ) -> Result<&Self, RuntimeError> {
        if self.core.modules.borrow().contains_key(name) {
            return self.fail(
                RuntimeError::DuplicateRegistration {
                    kind: RegistryKind::Module,
                    name: name.to_string(),
                },
                self,
            );
        }

        self.core.modules.borrow_mut().insert(
            name.to_string(),
            ModuleRegistration {
                factory: Rc::new(factory),
                counter: 1,
            },
        );
        Ok(self)
    }

    /// Registers a service.
    ///
    /// The factory runs once, on first [`get_service`](Runtime::get_service).
    ///
    /// # Errors
    ///
    /// [`RuntimeError::DuplicateRegistration`] when the name is taken.
    pub fn register_service(
        &self,
        name: &str,
        factory: impl Fn(&Runtime) -> Result<ServiceRef, RuntimeError> + 'static,
    ) -> Result<&Self, RuntimeError> {
        if self.core.services.borrow().contains_key(name) {
            return self.fail(
                RuntimeError::DuplicateRegistration {
                    kind: RegistryKind::Service,
                    name: name.to_string(),
                },
                self,
            );
        }

        self.core.services.borrow_mut().insert(
            name.to_string(),
            ServiceRegistration {
                factory: Rc::new(factory),
                instance: None,
            },
        );
        Ok(self)
    }

    /// Registers a behavior.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::DuplicateRegistration`] when the name is taken.
    pub fn register_behavior(
        &self,
        name: &str,
        factory: impl Fn(Box<dyn Context>) -> Box<dyn Behavior> + 'static,
    ) -> Result<&Self, RuntimeError> {
        if self.core.behaviors.borrow().contains_key(name) {
            return self.fail(
                RuntimeError::DuplicateRegistration {
                    kind: RegistryKind::Behavior,
                    name: name.to_string(),
                },
                self,
            );
        }

        self.core.behaviors.borrow_mut().insert(
            name.to_string(),
            BehaviorRegistration {
                factory: Rc::new(factory),
            },
        );
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Module lifecycle
    // ------------------------------------------------------------------

    /// Returns `true` when the element has a live instance record.
    #[must_use]
    pub fn is_started(&self, element: NodeId) -> bool {
        element_id(self.core.dom.as_ref(), element)
            .is_some_and(|id| self.core.instances.borrow().contains_key(&id))
    }

    /// Begins the lifecycle of the module declared by `element`.
    ///
    /// No-op when the element already has a live instance. Ordering for
    /// one call: id minting, factory, behavior `init` hooks in
    /// declaration order, module `init`, then event binding - delegates
    /// attach only after every `init` hook completed, so no event can
    /// fire into a half-initialized component.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::UnknownType`] for unregistered types;
    /// [`RuntimeError::DuplicateBehavior`] / [`RuntimeError::UnknownBehavior`]
    /// for bad behavior declarations (the offending names are skipped in
    /// production).
    pub fn start(&self, element: NodeId) -> Result<(), RuntimeError> {
        let type_name = module_type(self.core.dom.as_ref(), element);
        if !self.core.modules.borrow().contains_key(&type_name) {
            return self.fail(RuntimeError::UnknownType(type_name), ());
        }
        if self.is_started(element) {
            return Ok(());
        }

        let existing_id = element_id(self.core.dom.as_ref(), element);
        let instance_id = {
            let mut modules = self.core.modules.borrow_mut();
            let counter = match modules.get_mut(&type_name) {
                Some(registration) => {
                    let counter = registration.counter;
                    registration.counter += 1;
                    counter
                }
                None => 1,
            };
            existing_id
                .clone()
                .unwrap_or_else(|| format!("mod-{type_name}-{counter}"))
        };
        if existing_id.is_none() {
            self.core
                .dom
                .set_attribute(element, ID_ATTRIBUTE, &instance_id);
        }

        let context: Box<dyn Context> =
            Box::new(ContextHandle::new(Rc::downgrade(&self.core), element));

        let factory = self
            .core
            .modules
            .borrow()
            .get(&type_name)
            .map(|registration| registration.factory.clone());
        let Some(factory) = factory else {
            return self.fail(RuntimeError::UnknownType(type_name), ());
        };

        let mut module = factory(context.clone_box());
        if !self.core.debug() {
            module = Box::new(IsolatedModule::new(
                module,
                type_name.clone(),
                Rc::downgrade(&self.core),
            ));
        }

        let declared: Vec<String> = module
            .behaviors()
            .iter()
            .map(|name| (*name).to_string())
            .collect();
        let mut behaviors: Vec<(String, Rc<RefCell<Box<dyn Behavior>>>)> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for name in declared {
            if !seen.insert(name.clone()) {
                self.fail(RuntimeError::DuplicateBehavior(name), ())?;
                continue;
            }
            let behavior_factory = self
                .core
                .behaviors
                .borrow()
                .get(&name)
                .map(|registration| registration.factory.clone());
            match behavior_factory {
                Some(behavior_factory) => {
                    let instance = behavior_factory(context.clone_box());
                    behaviors.push((name, Rc::new(RefCell::new(instance))));
                }
                None => {
                    self.fail(RuntimeError::UnknownBehavior(name), ())?;
                }
            }
        }

        let record = Rc::new(InstanceRecord {
            type_name: type_name.clone(),
            element,
            module: Rc::new(RefCell::new(module)),
            behaviors,
            delegates: RefCell::new(Vec::new()),
            config: RefCell::new(None),
        });
        self.core
            .instances
            .borrow_mut()
            .insert(instance_id.clone(), record.clone());

        // Behavior init strictly precedes module init.
        for (name, behavior) in &record.behaviors {
            let hook = behavior.borrow_mut().init();
            if let Err(err) = hook {
                self.fail(
                    RuntimeError::ComponentFailure {
                        object: name.clone(),
                        method: "init".to_string(),
                        message: err.to_string(),
                    },
                    (),
                )?;
            }
        }

        let hook = record.module.borrow_mut().init();
        if let Err(err) = hook {
            self.fail(
                RuntimeError::ComponentFailure {
                    object: type_name.clone(),
                    method: "init".to_string(),
                    message: err.to_string(),
                },
                (),
            )?;
        }

        // Bind events only after every init hook has completed.
        let kinds = self.event_kinds();
        {
            let mut delegates = record.delegates.borrow_mut();
            let mut delegate = EventDelegate::new(
                self.core.dom.clone(),
                element,
                HandlerRef::Module(record.module.clone()),
                type_name.clone(),
                kinds.clone(),
                Rc::downgrade(&self.core),
            );
            delegate.attach_events();
            delegates.push(delegate);

            for (name, behavior) in &record.behaviors {
                let mut delegate = EventDelegate::new(
                    self.core.dom.clone(),
                    element,
                    HandlerRef::Behavior(behavior.clone()),
                    name.clone(),
                    kinds.clone(),
                    Rc::downgrade(&self.core),
                );
                delegate.attach_events();
                delegates.push(delegate);
            }
        }

        tracing::debug!(module = %type_name, id = %instance_id, "module started");
        Ok(())
    }

    /// Ends the lifecycle of the module bound to `element`.
    ///
    /// Teardown mirrors startup in reverse: delegates detach, behaviors
    /// destroy in reverse declaration order, then the module destroys,
    /// then the record is removed.
    ///
    /// # Errors
    ///
    /// In debug mode, stopping an element without a live instance is a
    /// [`RuntimeError::Lifecycle`] error; in production it is a no-op.
    pub fn stop(&self, element: NodeId) -> Result<(), RuntimeError> {
        let instance_id = element_id(self.core.dom.as_ref(), element);
        let record = instance_id
            .as_ref()
            .and_then(|id| self.core.instances.borrow().get(id).cloned());

        let Some(record) = record else {
            if self.core.debug() {
                let id = instance_id.unwrap_or_default();
                return self.fail(
                    RuntimeError::Lifecycle(format!(
                        "unable to stop module associated with element \"{id}\""
                    )),
                    (),
                );
            }
            return Ok(());
        };

        {
            let mut delegates = record.delegates.borrow_mut();
            for delegate in delegates.iter_mut() {
                delegate.detach_events();
            }
            delegates.clear();
        }

        for (name, behavior) in record.behaviors.iter().rev() {
            match behavior.try_borrow_mut() {
                Ok(mut behavior) => behavior.destroy(),
                Err(_) => self.core.warn(json!({
                    "reason": "behavior busy during stop",
                    "behavior": name,
                })),
            }
        }

        match record.module.try_borrow_mut() {
            Ok(mut module) => module.destroy(),
            Err(_) => self.core.warn(json!({
                "reason": "module busy during stop",
                "module": record.type_name,
            })),
        }

        if let Some(id) = &instance_id {
            self.core.instances.borrow_mut().remove(id);
            tracing::debug!(module = %record.type_name, id = %id, "module stopped");
        }
        Ok(())
    }

    /// Starts every component-marked descendant of `root`, in document
    /// order.
    pub fn start_all(&self, root: NodeId) -> Result<(), RuntimeError> {
        for element in self
            .core
            .dom
            .descendants_with_attribute(root, MODULE_ATTRIBUTE)
        {
            self.start(element)?;
        }
        Ok(())
    }

    /// Stops every component-marked descendant of `root`, in document
    /// order.
    pub fn stop_all(&self, root: NodeId) -> Result<(), RuntimeError> {
        for element in self
            .core
            .dom
            .descendants_with_attribute(root, MODULE_ATTRIBUTE)
        {
            self.stop(element)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Services
    // ------------------------------------------------------------------

    /// Returns the named service singleton, constructing it on first
    /// access.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::ServiceNotFound`] for unregistered names;
    /// [`RuntimeError::CircularDependency`] when construction re-enters
    /// a service already on the in-flight stack - the error names the
    /// full chain and the lookup yields `None` instead of recursing.
    pub fn get_service(&self, name: &str) -> Result<Option<ServiceRef>, RuntimeError> {
        let registered = {
            let services = self.core.services.borrow();
            services
                .get(name)
                .map(|registration| (registration.instance.clone(), registration.factory.clone()))
        };
        let Some((instance, factory)) = registered else {
            return self.fail(RuntimeError::ServiceNotFound(name.to_string()), None);
        };
        if let Some(instance) = instance {
            return Ok(Some(instance));
        }

        if self
            .core
            .service_stack
            .borrow()
            .iter()
            .any(|entry| entry == name)
        {
            let mut path = self.core.service_stack.borrow().clone();
            path.push(name.to_string());
            return self.fail(RuntimeError::CircularDependency { path }, None);
        }

        self.core.service_stack.borrow_mut().push(name.to_string());
        let constructed = factory(self);
        self.core.service_stack.borrow_mut().pop();

        let instance = match constructed {
            Ok(instance) => instance,
            Err(err) => return self.fail(err, None),
        };
        if let Some(registration) = self.core.services.borrow_mut().get_mut(name) {
            registration.instance = Some(instance.clone());
        }
        Ok(Some(instance))
    }

    /// Returns `true` when a service with this name is registered.
    #[must_use]
    pub fn has_service(&self, name: &str) -> bool {
        self.core.services.borrow().contains_key(name)
    }

    // ------------------------------------------------------------------
    // Messaging
    // ------------------------------------------------------------------

    /// Broadcasts a message to every started component in one pass.
    ///
    /// Per instance (stable element-id order): the module's handler
    /// first when it declared the name, then each behavior's handler in
    /// declaration order. Afterwards one generic `"message"` event
    /// fires with `{message, messageData}` so non-component observers
    /// can react.
    ///
    /// Re-entrant broadcasts run depth-first against a snapshot of the
    /// live instances; delivery to the one component whose handler is
    /// currently on the stack is skipped and reported on the warning
    /// channel.
    pub fn broadcast(&self, name: &str, data: Value) -> Result<(), RuntimeError> {
        let records: Vec<Rc<InstanceRecord>> =
            self.core.instances.borrow().values().cloned().collect();

        for record in records {
            let failed = match record.module.try_borrow_mut() {
                Ok(mut module) => {
                    if module.messages().contains(&name) {
                        module.on_message(name, &data).err()
                    } else {
                        None
                    }
                }
                Err(_) => {
                    self.core.warn(json!({
                        "reason": "re-entrant broadcast delivery skipped",
                        "module": record.type_name,
                        "message": name,
                    }));
                    None
                }
            };
            if let Some(err) = failed {
                self.fail(
                    RuntimeError::ComponentFailure {
                        object: record.type_name.clone(),
                        method: "on_message".to_string(),
                        message: err.to_string(),
                    },
                    (),
                )?;
            }

            for (behavior_name, behavior) in &record.behaviors {
                let failed = match behavior.try_borrow_mut() {
                    Ok(mut behavior) => {
                        if behavior.messages().contains(&name) {
                            behavior.on_message(name, &data).err()
                        } else {
                            None
                        }
                    }
                    Err(_) => {
                        self.core.warn(json!({
                            "reason": "re-entrant broadcast delivery skipped",
                            "behavior": behavior_name,
                            "message": name,
                        }));
                        None
                    }
                };
                if let Some(err) = failed {
                    self.fail(
                        RuntimeError::ComponentFailure {
                            object: behavior_name.clone(),
                            method: "on_message".to_string(),
                            message: err.to_string(),
                        },
                        (),
                    )?;
                }
            }
        }

        self.core.emitter.fire(
            "message",
            json!({ "message": name, "messageData": data }),
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Returns the embedded config of the module bound to `element` -
    /// the whole object for `None`, one key for `Some(name)`.
    ///
    /// The config is read lazily and cached once per instance record.
    /// Missing configs yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::MalformedConfig`] when the embedded text exists
    /// but is not valid JSON; the lookup still yields `None`.
    pub fn get_module_config(
        &self,
        element: NodeId,
        name: Option<&str>,
    ) -> Result<Option<Value>, RuntimeError> {
        let instance_id = element_id(self.core.dom.as_ref(), element);
        let record = instance_id
            .as_ref()
            .and_then(|id| self.core.instances.borrow().get(id).cloned());

        let cached = record.as_ref().and_then(|record| record.config.borrow().clone());
        let config = match cached {
            Some(config) => config,
            None => {
                let parsed = match self.core.dom.config_text(element) {
                    Some(text) => match serde_json::from_str::<Value>(&text) {
                        Ok(value) => Some(value),
                        Err(_) => {
                            self.fail(
                                RuntimeError::MalformedConfig {
                                    element: instance_id.clone().unwrap_or_default(),
                                },
                                (),
                            )?;
                            None
                        }
                    },
                    None => None,
                };
                if let Some(record) = &record {
                    *record.config.borrow_mut() = Some(parsed.clone());
                }
                parsed
            }
        };

        match (config, name) {
            (None, _) => Ok(None),
            (Some(config), None) => Ok(Some(config)),
            (Some(config), Some(key)) => Ok(config.get(key).cloned()),
        }
    }

    /// Merges into the global configuration.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::Lifecycle`] once [`init`](Runtime::init) has
    /// completed; the configuration is not mutated.
    pub fn set_global_config(&self, config: Map<String, Value>) -> Result<(), RuntimeError> {
        if self.core.initialized.get() {
            return self.fail(
                RuntimeError::Lifecycle(
                    "cannot set global configuration after runtime initialization".to_string(),
                ),
                (),
            );
        }
        self.core.global_config.borrow_mut().extend(config);
        Ok(())
    }

    /// Returns global configuration - the whole object for `None`, one
    /// key for `Some(name)`.
    #[must_use]
    pub fn get_global_config(&self, name: Option<&str>) -> Option<Value> {
        let config = self.core.global_config.borrow();
        match name {
            None => Some(Value::Object(config.clone())),
            Some(key) => config.get(key).cloned(),
        }
    }

    /// Returns a host-scope global variable, or `None` when undefined.
    #[must_use]
    pub fn get_global(&self, name: &str) -> Option<Value> {
        self.core.dom.global(name)
    }

    /// The active delegate allow-list: the `event_kinds` global-config
    /// entry when present, the default list otherwise. Unknown names in
    /// the override are reported on the warning channel and skipped.
    fn event_kinds(&self) -> Vec<EventKind> {
        let configured = self.core.global_config.borrow().get("event_kinds").cloned();
        let Some(Value::Array(entries)) = configured else {
            return DEFAULT_EVENT_KINDS.to_vec();
        };

        let mut kinds = Vec::new();
        for entry in entries {
            match entry.as_str().map(str::parse::<EventKind>) {
                Some(Ok(kind)) => kinds.push(kind),
                _ => self.core.warn(json!({
                    "reason": "unknown event kind in event_kinds",
                    "value": entry,
                })),
            }
        }
        kinds
    }

    // ------------------------------------------------------------------
    // Runtime lifecycle
    // ------------------------------------------------------------------

    /// Initializes the runtime: merges `params` into global config,
    /// starts every component in the tree, fires `"init"`, and freezes
    /// global configuration.
    pub fn init(&self, params: Map<String, Value>) -> Result<(), RuntimeError> {
        self.core.global_config.borrow_mut().extend(params);
        self.start_all(self.core.dom.root())?;
        self.core.emitter.fire("init", Value::Null);
        self.core.initialized.set(true);
        tracing::debug!("runtime initialized");
        Ok(())
    }

    /// Stops every component and resets all registries and state - a
    /// full teardown, after which the runtime can be configured afresh.
    pub fn destroy(&self) -> Result<(), RuntimeError> {
        self.stop_all(self.core.dom.root())?;

        self.core.modules.borrow_mut().clear();
        self.core.services.borrow_mut().clear();
        self.core.service_stack.borrow_mut().clear();
        self.core.behaviors.borrow_mut().clear();
        self.core.instances.borrow_mut().clear();
        self.core.global_config.borrow_mut().clear();
        self.core.initialized.set(false);
        tracing::debug!("runtime destroyed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Error reporting & observation
    // ------------------------------------------------------------------

    /// Routes an error through the gate (see module docs).
    pub fn report_error(&self, error: RuntimeError) -> Result<(), RuntimeError> {
        self.core.report(error)
    }

    /// Reports a warning: logged in debug mode, a `"warning"` event in
    /// production.
    pub fn report_warning(&self, data: Value) {
        self.core.warn(data);
    }

    /// Reports informational data; logged in debug mode only.
    pub fn report_info(&self, data: Value) {
        if self.core.debug() {
            tracing::info!(%data, "runtime info");
        }
    }

    /// Installs a custom error handler that consumes all errors
    /// exclusively, replacing the debug/production gate behavior.
    pub fn set_error_handler(&self, handler: impl Fn(&RuntimeError) + 'static) {
        *self.core.error_handler.borrow_mut() = Some(Rc::new(handler));
    }

    /// Subscribes an observer to runtime events (`"init"`, `"error"`,
    /// `"warning"`, `"message"`).
    pub fn on(&self, kind: &str, handler: Handler<Value>) {
        self.core.emitter.on(kind, handler);
    }

    /// Removes a previously subscribed observer.
    pub fn off(&self, kind: &str, handler: &Handler<Value>) {
        self.core.emitter.off(kind, handler);
    }

    /// Fires a custom event to observers.
    pub fn fire(&self, kind: &str, data: Value) {
        self.core.emitter.fire(kind, data);
    }
}
