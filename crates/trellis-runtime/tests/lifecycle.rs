//! Lifecycle integration tests: registration, start/stop ordering,
//! id minting, behavior composition, and full teardown.

mod common;

use common::{collect, debug_config, hook_log, runtime, HookLog};
use serde_json::{json, Map, Value};
use std::cell::Cell;
use std::rc::Rc;
use trellis_component::{Behavior, Module, ModuleError};
use trellis_dom::{Dom, ID_ATTRIBUTE, MODULE_ATTRIBUTE};
use trellis_types::ErrorCode;

struct Recording {
    log: HookLog,
    tag: &'static str,
}

impl Module for Recording {
    fn init(&mut self) -> Result<(), ModuleError> {
        self.log.borrow_mut().push(format!("{}:init", self.tag));
        Ok(())
    }

    fn destroy(&mut self) {
        self.log.borrow_mut().push(format!("{}:destroy", self.tag));
    }
}

struct Composed {
    log: HookLog,
}

impl Module for Composed {
    fn behaviors(&self) -> &[&str] {
        &["first", "second"]
    }

    fn init(&mut self) -> Result<(), ModuleError> {
        self.log.borrow_mut().push("module:init".to_string());
        Ok(())
    }

    fn destroy(&mut self) {
        self.log.borrow_mut().push("module:destroy".to_string());
    }
}

struct RecordingBehavior {
    log: HookLog,
    tag: &'static str,
}

impl Behavior for RecordingBehavior {
    fn init(&mut self) -> Result<(), ModuleError> {
        self.log.borrow_mut().push(format!("{}:init", self.tag));
        Ok(())
    }

    fn destroy(&mut self) {
        self.log.borrow_mut().push(format!("{}:destroy", self.tag));
    }
}

fn register_recording_behaviors(rt: &trellis_runtime::Runtime, log: &HookLog) {
    for tag in ["first", "second"] {
        let log = log.clone();
        rt.register_behavior(tag, move |_ctx| {
            Box::new(RecordingBehavior {
                log: log.clone(),
                tag,
            })
        })
        .expect("register behavior");
    }
}

#[test]
fn duplicate_registration_reports_and_keeps_first() {
    let (rt, dom) = runtime();
    let errors = collect(&rt, "error");
    let log = hook_log();

    let first_log = log.clone();
    rt.register_module("hello", move |_ctx| {
        Box::new(Recording {
            log: first_log.clone(),
            tag: "first",
        })
    })
    .expect("first registration");

    // Production mode: the duplicate is reported, not returned.
    let second_log = log.clone();
    rt.register_module("hello", move |_ctx| {
        Box::new(Recording {
            log: second_log.clone(),
            tag: "second",
        })
    })
    .expect("production registration absorbs the error");

    assert_eq!(errors.borrow().len(), 1);
    assert_eq!(
        errors.borrow()[0]["code"],
        json!("RUNTIME_DUPLICATE_REGISTRATION")
    );

    // The first factory is still the one that runs.
    let element = dom.add_element(dom.root(), &[(MODULE_ATTRIBUTE, "hello")]);
    rt.start(element).expect("start");
    assert_eq!(*log.borrow(), vec!["first:init"]);
}

#[test]
fn start_stop_restores_pristine_state() {
    let (rt, dom) = runtime();
    let log = hook_log();

    let module_log = log.clone();
    rt.register_module("hello", move |_ctx| {
        Box::new(Recording {
            log: module_log.clone(),
            tag: "hello",
        })
    })
    .expect("register");

    let element = dom.add_element(dom.root(), &[(MODULE_ATTRIBUTE, "hello")]);
    rt.start(element).expect("start");
    assert!(rt.is_started(element));

    rt.stop(element).expect("stop");
    assert!(!rt.is_started(element));
    assert_eq!(*log.borrow(), vec!["hello:init", "hello:destroy"]);

    // Restarting works and runs a fresh lifecycle.
    rt.start(element).expect("restart");
    assert!(rt.is_started(element));
    assert_eq!(
        *log.borrow(),
        vec!["hello:init", "hello:destroy", "hello:init"]
    );
}

#[test]
fn start_twice_instantiates_once() {
    let (rt, dom) = runtime();
    let created = Rc::new(Cell::new(0u32));

    let counter = created.clone();
    rt.register_module("hello", move |_ctx| {
        counter.set(counter.get() + 1);
        Box::new(Recording {
            log: hook_log(),
            tag: "hello",
        })
    })
    .expect("register");

    let element = dom.add_element(dom.root(), &[(MODULE_ATTRIBUTE, "hello")]);
    rt.start(element).expect("first start");
    rt.start(element).expect("second start is a no-op");

    assert_eq!(created.get(), 1);
    assert_eq!(
        dom.attribute(element, ID_ATTRIBUTE).as_deref(),
        Some("mod-hello-1")
    );
}

#[test]
fn counter_never_resets_while_registry_lives() {
    let (rt, dom) = runtime();
    rt.register_module("hello", |_ctx| {
        Box::new(Recording {
            log: hook_log(),
            tag: "hello",
        })
    })
    .expect("register");

    let first = dom.add_element(dom.root(), &[(MODULE_ATTRIBUTE, "hello")]);
    rt.start(first).expect("start");
    rt.stop(first).expect("stop");

    let second = dom.add_element(dom.root(), &[(MODULE_ATTRIBUTE, "hello")]);
    rt.start(second).expect("start");

    assert_eq!(
        dom.attribute(second, ID_ATTRIBUTE).as_deref(),
        Some("mod-hello-2")
    );
}

#[test]
fn behaviors_init_before_module_and_destroy_in_reverse() {
    let (rt, dom) = runtime();
    let log = hook_log();

    register_recording_behaviors(&rt, &log);
    let module_log = log.clone();
    rt.register_module("composed", move |_ctx| {
        Box::new(Composed {
            log: module_log.clone(),
        })
    })
    .expect("register module");

    let element = dom.add_element(dom.root(), &[(MODULE_ATTRIBUTE, "composed")]);
    rt.start(element).expect("start");

    assert_eq!(
        *log.borrow(),
        vec!["first:init", "second:init", "module:init"]
    );

    rt.stop(element).expect("stop");
    assert_eq!(
        *log.borrow(),
        vec![
            "first:init",
            "second:init",
            "module:init",
            "second:destroy",
            "first:destroy",
            "module:destroy",
        ]
    );
}

#[test]
fn unknown_behavior_is_reported_and_skipped() {
    let (rt, dom) = runtime();
    let errors = collect(&rt, "error");
    let log = hook_log();

    // Only "first" exists; "second" was never registered.
    let behavior_log = log.clone();
    rt.register_behavior("first", move |_ctx| {
        Box::new(RecordingBehavior {
            log: behavior_log.clone(),
            tag: "first",
        })
    })
    .expect("register behavior");

    let module_log = log.clone();
    rt.register_module("composed", move |_ctx| {
        Box::new(Composed {
            log: module_log.clone(),
        })
    })
    .expect("register module");

    let element = dom.add_element(dom.root(), &[(MODULE_ATTRIBUTE, "composed")]);
    rt.start(element).expect("start survives in production");

    assert_eq!(errors.borrow().len(), 1);
    assert_eq!(errors.borrow()[0]["code"], json!("RUNTIME_UNKNOWN_BEHAVIOR"));
    assert_eq!(*log.borrow(), vec!["first:init", "module:init"]);
}

#[test]
fn stop_without_instance_is_silent_in_production_and_fails_in_debug() {
    let (rt, dom) = runtime();
    let errors = collect(&rt, "error");
    let element = dom.add_element(dom.root(), &[(MODULE_ATTRIBUTE, "hello")]);

    rt.stop(element).expect("production no-op");
    assert!(errors.borrow().is_empty());

    rt.set_global_config(debug_config()).expect("config");
    let err = rt.stop(element).expect_err("debug fails fast");
    assert!(err.to_string().contains("unable to stop module"));
}

#[test]
fn init_starts_whole_tree_and_freezes_global_config() {
    let (rt, dom) = runtime();
    let inits = collect(&rt, "init");
    let errors = collect(&rt, "error");
    let log = hook_log();

    let module_log = log.clone();
    rt.register_module("hello", move |_ctx| {
        Box::new(Recording {
            log: module_log.clone(),
            tag: "hello",
        })
    })
    .expect("register");

    let section = dom.add_element(dom.root(), &[]);
    dom.add_element(section, &[(MODULE_ATTRIBUTE, "hello")]);
    dom.add_element(dom.root(), &[(MODULE_ATTRIBUTE, "hello")]);

    let mut params = Map::new();
    params.insert("theme".to_string(), Value::String("dark".into()));
    rt.init(params).expect("init");

    assert_eq!(inits.borrow().len(), 1);
    assert_eq!(log.borrow().len(), 2);
    assert_eq!(
        rt.get_global_config(Some("theme")),
        Some(Value::String("dark".into()))
    );

    // Frozen after init: the merge is rejected and nothing changes.
    let mut late = Map::new();
    late.insert("theme".to_string(), Value::String("light".into()));
    rt.set_global_config(late).expect("production absorbs the error");

    assert_eq!(errors.borrow().len(), 1);
    assert_eq!(errors.borrow()[0]["code"], json!("RUNTIME_LIFECYCLE"));
    assert_eq!(
        rt.get_global_config(Some("theme")),
        Some(Value::String("dark".into()))
    );
}

#[test]
fn destroy_resets_every_registry() {
    let (rt, dom) = runtime();
    let log = hook_log();

    let module_log = log.clone();
    rt.register_module("hello", move |_ctx| {
        Box::new(Recording {
            log: module_log.clone(),
            tag: "hello",
        })
    })
    .expect("register");
    rt.register_service("heading", |_rt| {
        Ok(Rc::new("svc".to_string()) as trellis_component::ServiceRef)
    })
    .expect("register service");

    dom.add_element(dom.root(), &[(MODULE_ATTRIBUTE, "hello")]);
    rt.init(Map::new()).expect("init");
    rt.destroy().expect("destroy");

    assert!(log.borrow().contains(&"hello:destroy".to_string()));
    assert!(!rt.has_service("heading"));

    // Registries are empty again: the same names register cleanly and
    // global config is writable once more.
    rt.register_module("hello", |_ctx| {
        Box::new(Recording {
            log: hook_log(),
            tag: "hello",
        })
    })
    .expect("re-register after destroy");
    rt.set_global_config(Map::new()).expect("config writable again");
}

#[test]
fn module_config_is_read_lazily_and_cached() {
    let (rt, dom) = runtime();
    rt.register_module("files", |_ctx| {
        Box::new(Recording {
            log: hook_log(),
            tag: "files",
        })
    })
    .expect("register");

    let element = dom.add_element(dom.root(), &[(MODULE_ATTRIBUTE, "files")]);
    dom.set_config(element, r#"{"speed": 2, "label": "Files"}"#);
    rt.start(element).expect("start");

    assert_eq!(
        rt.get_module_config(element, Some("speed")).expect("read"),
        Some(json!(2))
    );
    assert_eq!(
        rt.get_module_config(element, Some("missing")).expect("read"),
        None
    );
    let whole = rt
        .get_module_config(element, None)
        .expect("read")
        .expect("whole object");
    assert_eq!(whole["label"], json!("Files"));

    // Cached once per instance: later markup changes are not observed.
    dom.set_config(element, r#"{"speed": 9}"#);
    assert_eq!(
        rt.get_module_config(element, Some("speed")).expect("read"),
        Some(json!(2))
    );
}

#[test]
fn malformed_config_reports_and_yields_null() {
    let (rt, dom) = runtime();
    let errors = collect(&rt, "error");
    rt.register_module("files", |_ctx| {
        Box::new(Recording {
            log: hook_log(),
            tag: "files",
        })
    })
    .expect("register");

    let element = dom.add_element(dom.root(), &[(MODULE_ATTRIBUTE, "files")]);
    dom.set_config(element, "{ not json");
    rt.start(element).expect("start");

    assert_eq!(
        rt.get_module_config(element, None).expect("null result"),
        None
    );
    assert_eq!(errors.borrow().len(), 1);
    assert_eq!(errors.borrow()[0]["code"], json!("RUNTIME_MALFORMED_CONFIG"));
}

#[test]
fn module_init_failure_is_contained_in_production() {
    struct FailsInit;
    impl Module for FailsInit {
        fn init(&mut self) -> Result<(), ModuleError> {
            Err(ModuleError::InitFailed("no anchor element".into()))
        }
    }

    let (rt, dom) = runtime();
    let errors = collect(&rt, "error");
    rt.register_module("fragile", |_ctx| Box::new(FailsInit))
        .expect("register");

    let element = dom.add_element(dom.root(), &[(MODULE_ATTRIBUTE, "fragile")]);
    rt.start(element).expect("start survives");
    assert!(rt.is_started(element));

    assert_eq!(errors.borrow().len(), 1);
    let message = errors.borrow()[0]["message"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    assert!(message.starts_with("fragile.init() - "));
}

#[test]
fn module_panic_in_init_is_contained_in_production() {
    struct PanicsInit;
    impl Module for PanicsInit {
        fn init(&mut self) -> Result<(), ModuleError> {
            panic!("no anchor element")
        }
    }

    let (rt, dom) = runtime();
    let errors = collect(&rt, "error");
    rt.register_module("panicky", |_ctx| Box::new(PanicsInit))
        .expect("register");

    let element = dom.add_element(dom.root(), &[(MODULE_ATTRIBUTE, "panicky")]);
    rt.start(element).expect("start survives the panic");
    assert!(rt.is_started(element));

    assert_eq!(errors.borrow().len(), 1);
    let message = errors.borrow()[0]["message"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    assert_eq!(message, "panicky.init() - no anchor element");
}

#[test]
fn hook_failure_fails_fast_in_debug() {
    struct FailsInit;
    impl Module for FailsInit {
        fn init(&mut self) -> Result<(), ModuleError> {
            Err(ModuleError::InitFailed("no anchor element".into()))
        }
    }

    let (rt, dom) = runtime();
    rt.set_global_config(debug_config()).expect("config");
    rt.register_module("fragile", |_ctx| Box::new(FailsInit))
        .expect("register");

    let element = dom.add_element(dom.root(), &[(MODULE_ATTRIBUTE, "fragile")]);
    let err = rt.start(element).expect_err("debug fails fast");
    assert_eq!(err.code(), "RUNTIME_COMPONENT_FAILURE");
    assert!(err.to_string().starts_with("fragile.init() - "));
}
