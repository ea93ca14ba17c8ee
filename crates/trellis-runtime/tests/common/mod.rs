//! Shared helpers for runtime integration tests.
#![allow(dead_code)]

use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;
use trellis_dom::MemoryDom;
use trellis_event::Event;
use trellis_runtime::Runtime;

/// Builds a runtime over a fresh in-memory tree.
pub fn runtime() -> (Runtime, Rc<MemoryDom>) {
    let dom = Rc::new(MemoryDom::new());
    (Runtime::new(dom.clone()), dom)
}

/// Global config enabling debug (fail-fast) mode.
pub fn debug_config() -> Map<String, Value> {
    let mut config = Map::new();
    config.insert("debug".to_string(), Value::Bool(true));
    config
}

/// Subscribes to a runtime event kind and collects every payload.
pub fn collect(runtime: &Runtime, kind: &str) -> Rc<RefCell<Vec<Value>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    runtime.on(
        kind,
        Rc::new(move |event: &Event<Value>| {
            sink.borrow_mut().push(event.data.clone());
        }),
    );
    log
}

/// Shared string log for observing hook ordering across components.
pub type HookLog = Rc<RefCell<Vec<String>>>;

pub fn hook_log() -> HookLog {
    Rc::new(RefCell::new(Vec::new()))
}
