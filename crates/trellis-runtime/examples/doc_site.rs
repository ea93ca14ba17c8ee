//! Doc-site frontend wiring.
//!
//! Demonstrates:
//! - Module, service, and behavior registration
//! - Delegated click routing into broadcasts
//! - Embedded per-module config and the heading service
//! - Full init/destroy lifecycle over the in-memory host tree

use serde_json::{Map, Value};
use std::rc::Rc;
use trellis_component::{Behavior, Context, Module, ModuleError, ServiceRef};
use trellis_dom::{Dom, MemoryDom, NodeId, UiEvent, MODULE_ATTRIBUTE, TYPE_ATTRIBUTE};
use trellis_event::{Event, EventKind};
use trellis_runtime::Runtime;

/// Page heading collected by the heading service.
struct PageHeading {
    id: String,
    level: u64,
}

/// Service scanning the page for heading elements.
struct HeadingService {
    headings: Vec<PageHeading>,
}

impl HeadingService {
    fn scan(dom: &dyn Dom) -> Self {
        let headings = dom
            .descendants_with_attribute(dom.root(), "data-heading")
            .into_iter()
            .filter_map(|node| {
                let level = dom
                    .attribute(node, "data-heading")?
                    .parse::<u64>()
                    .ok()?;
                let id = dom.attribute(node, "id")?;
                Some(PageHeading { id, level })
            })
            .collect();
        Self { headings }
    }
}

/// Navigation bar: translates routed clicks into broadcasts.
struct Navbar {
    ctx: Box<dyn Context>,
}

impl Module for Navbar {
    fn init(&mut self) -> Result<(), ModuleError> {
        println!("navbar: ready");
        Ok(())
    }

    fn event_interests(&self) -> &[EventKind] {
        &[EventKind::Click]
    }

    fn on_event(
        &mut self,
        _event: &UiEvent,
        _target: Option<NodeId>,
        routing_type: &str,
    ) -> Result<(), ModuleError> {
        let message = match routing_type {
            "filesToggler" => "toggleFiles",
            "tableOfContentsToggler" => "toggleTableOfContents",
            _ => return Ok(()),
        };
        println!("navbar: clicked {routing_type}, broadcasting {message}");
        self.ctx.broadcast(message, Value::Null)?;
        Ok(())
    }
}

/// File explorer panel: opens and closes on broadcast.
struct Files {
    ctx: Box<dyn Context>,
    open: bool,
    speed: u64,
}

impl Module for Files {
    fn behaviors(&self) -> &[&str] {
        &["tracker"]
    }

    fn init(&mut self) -> Result<(), ModuleError> {
        self.speed = self
            .ctx
            .get_config(Some("speed"))?
            .and_then(|value| value.as_u64())
            .unwrap_or(400);

        if let Some(service) = self.ctx.get_service("heading")? {
            let headings = service
                .downcast_ref::<HeadingService>()
                .map(|svc| svc.headings.as_slice())
                .unwrap_or_default();
            println!("files: ready ({} ms), table of contents:", self.speed);
            for heading in headings {
                println!("files:   h{} #{}", heading.level, heading.id);
            }
        }
        Ok(())
    }

    fn destroy(&mut self) {
        println!("files: torn down");
    }

    fn event_interests(&self) -> &[EventKind] {
        &[EventKind::Click]
    }

    fn on_event(
        &mut self,
        _event: &UiEvent,
        _target: Option<NodeId>,
        routing_type: &str,
    ) -> Result<(), ModuleError> {
        if routing_type == "closeButton" || routing_type == "tableOfContents" {
            self.toggle();
        }
        Ok(())
    }

    fn messages(&self) -> &[&str] {
        &["toggleFiles"]
    }

    fn on_message(&mut self, _name: &str, _data: &Value) -> Result<(), ModuleError> {
        self.toggle();
        Ok(())
    }
}

impl Files {
    fn toggle(&mut self) {
        self.open = !self.open;
        println!(
            "files: sliding {} over {} ms",
            if self.open { "open" } else { "closed" },
            self.speed
        );
    }
}

/// Interaction-tracking mixin shared by modules that opt in.
struct Tracker {
    clicks: u32,
}

impl Behavior for Tracker {
    fn event_interests(&self) -> &[EventKind] {
        &[EventKind::Click]
    }

    fn on_event(
        &mut self,
        _event: &UiEvent,
        _target: Option<NodeId>,
        _routing_type: &str,
    ) -> Result<(), ModuleError> {
        self.clicks += 1;
        println!("tracker: {} click(s) inside files", self.clicks);
        Ok(())
    }

    fn destroy(&mut self) {
        println!("tracker: done");
    }
}

fn main() -> Result<(), trellis_component::RuntimeError> {
    // The markup the build pipeline would have generated.
    let dom = Rc::new(MemoryDom::new());
    let root = dom.root();

    let navbar = dom.add_element(root, &[(MODULE_ATTRIBUTE, "navbar")]);
    let files_toggler = dom.add_element(navbar, &[(TYPE_ATTRIBUTE, "filesToggler")]);

    let files = dom.add_element(root, &[(MODULE_ATTRIBUTE, "files")]);
    let close_button = dom.add_element(files, &[(TYPE_ATTRIBUTE, "closeButton")]);
    dom.set_config(files, r#"{"speed": 200}"#);

    let page = dom.add_element(root, &[]);
    dom.add_element(page, &[("data-heading", "1"), ("id", "overview")]);
    dom.add_element(page, &[("data-heading", "2"), ("id", "getting-started")]);

    let runtime = Runtime::new(dom.clone());

    // Non-component observer of the broadcast channel.
    runtime.on(
        "message",
        Rc::new(|event: &Event<Value>| {
            println!("observer: {}", event.data["message"]);
        }),
    );

    let service_dom = dom.clone();
    runtime
        .register_service("heading", move |_rt| {
            Ok(Rc::new(HeadingService::scan(service_dom.as_ref())) as ServiceRef)
        })?
        .register_behavior("tracker", |_ctx| Box::new(Tracker { clicks: 0 }))?
        .register_module("navbar", |ctx| Box::new(Navbar { ctx }))?
        .register_module("files", |ctx| {
            Box::new(Files {
                ctx,
                open: false,
                speed: 0,
            })
        })?;

    runtime.init(Map::new())?;

    println!("--- user clicks the navbar toggler twice ---");
    dom.fire(files_toggler, EventKind::Click, Value::Null);
    dom.fire(files_toggler, EventKind::Click, Value::Null);

    println!("--- user clicks the close button inside the panel ---");
    dom.fire(close_button, EventKind::Click, Value::Null);

    println!("--- page teardown ---");
    runtime.destroy()?;
    Ok(())
}
