//! In-memory host tree.
//!
//! [`MemoryDom`] implements [`Dom`] over a plain parent/children vector
//! with bubbling event dispatch. It exists for tests and headless
//! hosts; nothing in the runtime knows whether it is driving this
//! fixture or a real page.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use serde_json::Value;
//! use trellis_dom::{Dom, MemoryDom, MODULE_ATTRIBUTE};
//! use trellis_event::EventKind;
//!
//! let dom = MemoryDom::new();
//! let root = dom.root();
//! let navbar = dom.add_element(root, &[(MODULE_ATTRIBUTE, "navbar")]);
//! let button = dom.add_element(navbar, &[("data-type", "filesToggler")]);
//!
//! let modules = dom.descendants_with_attribute(root, MODULE_ATTRIBUTE);
//! assert_eq!(modules, vec![navbar]);
//!
//! // Events fired at a descendant bubble to ancestor listeners.
//! let seen = Rc::new(std::cell::Cell::new(false));
//! let flag = seen.clone();
//! dom.listen(navbar, EventKind::Click, Rc::new(move |_| flag.set(true)));
//! dom.fire(button, EventKind::Click, Value::Null);
//! assert!(seen.get());
//! ```

use crate::{Dom, Listener, ListenerId, NodeId, UiEvent};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use trellis_event::EventKind;

struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, String>,
    config: Option<String>,
}

struct ListenerEntry {
    id: ListenerId,
    node: NodeId,
    kind: EventKind,
    listener: Listener,
}

/// In-memory [`Dom`] implementation with bubbling dispatch.
///
/// Construction starts from a bare root; build the tree with
/// [`add_element`](Self::add_element) and drive it with
/// [`fire`](Self::fire).
pub struct MemoryDom {
    nodes: RefCell<Vec<NodeData>>,
    listeners: RefCell<Vec<ListenerEntry>>,
    next_listener: Cell<u64>,
    globals: RefCell<BTreeMap<String, Value>>,
}

impl MemoryDom {
    /// Creates a tree containing only a root element.
    #[must_use]
    pub fn new() -> Self {
        let root = NodeData {
            parent: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            config: None,
        };
        Self {
            nodes: RefCell::new(vec![root]),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(1),
            globals: RefCell::new(BTreeMap::new()),
        }
    }

    /// Appends a child element under `parent` and returns its handle.
    pub fn add_element(&self, parent: NodeId, attributes: &[(&str, &str)]) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len() as u64);
        nodes.push(NodeData {
            parent: Some(parent),
            children: Vec::new(),
            attributes: attributes
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            config: None,
        });
        nodes[parent.0 as usize].children.push(id);
        id
    }

    /// Attaches embedded config text to an element, standing in for a
    /// `script type="text/x-config"` child in real markup.
    pub fn set_config(&self, node: NodeId, text: &str) {
        self.nodes.borrow_mut()[node.0 as usize].config = Some(text.to_string());
    }

    /// Defines a host-scope global variable.
    pub fn set_global(&self, name: &str, value: Value) {
        self.globals.borrow_mut().insert(name.to_string(), value);
    }

    /// Fires an event at `origin` and bubbles it to the root.
    ///
    /// Listeners along the origin-to-root path observe the event in
    /// bubbling order (origin first). The listener set is snapshotted
    /// before delivery, so listeners attached or removed during
    /// dispatch do not affect the current event.
    pub fn fire(&self, origin: NodeId, kind: EventKind, data: Value) {
        let path = self.bubble_path(origin);

        let snapshot: Vec<Listener> = {
            let listeners = self.listeners.borrow();
            path.iter()
                .flat_map(|node| {
                    listeners
                        .iter()
                        .filter(|entry| entry.node == *node && entry.kind == kind)
                        .map(|entry| entry.listener.clone())
                        .collect::<Vec<_>>()
                })
                .collect()
        };

        let event = UiEvent { kind, origin, data };
        for listener in snapshot {
            listener(&event);
        }
    }

    fn bubble_path(&self, origin: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut path = Vec::new();
        let mut current = Some(origin);
        while let Some(node) = current {
            path.push(node);
            current = nodes.get(node.0 as usize).and_then(|data| data.parent);
        }
        path
    }

    fn collect_descendants(
        nodes: &[NodeData],
        node: NodeId,
        name: &str,
        out: &mut Vec<NodeId>,
    ) {
        for child in &nodes[node.0 as usize].children {
            if nodes[child.0 as usize].attributes.contains_key(name) {
                out.push(*child);
            }
            Self::collect_descendants(nodes, *child, name, out);
        }
    }
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom for MemoryDom {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes
            .borrow()
            .get(node.0 as usize)
            .and_then(|data| data.attributes.get(name).cloned())
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(data) = self.nodes.borrow_mut().get_mut(node.0 as usize) {
            data.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes
            .borrow()
            .get(node.0 as usize)
            .and_then(|data| data.parent)
    }

    fn descendants_with_attribute(&self, root: NodeId, name: &str) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        if (root.0 as usize) < nodes.len() {
            Self::collect_descendants(&nodes, root, name, &mut out);
        }
        out
    }

    fn config_text(&self, node: NodeId) -> Option<String> {
        self.nodes
            .borrow()
            .get(node.0 as usize)
            .and_then(|data| data.config.clone())
    }

    fn listen(&self, node: NodeId, kind: EventKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push(ListenerEntry {
            id,
            node,
            kind,
            listener,
        });
        id
    }

    fn unlisten(&self, listener: ListenerId) {
        self.listeners.borrow_mut().retain(|entry| entry.id != listener);
    }

    fn global(&self, name: &str) -> Option<Value> {
        self.globals.borrow().get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell as StdRefCell;
    use std::rc::Rc;

    #[test]
    fn descendants_in_document_order() {
        let dom = MemoryDom::new();
        let root = dom.root();
        let a = dom.add_element(root, &[("data-module", "a")]);
        let inner = dom.add_element(a, &[("data-module", "inner")]);
        let b = dom.add_element(root, &[("data-module", "b")]);
        let _plain = dom.add_element(root, &[]);

        assert_eq!(
            dom.descendants_with_attribute(root, "data-module"),
            vec![a, inner, b]
        );
    }

    #[test]
    fn root_not_included_in_descendant_query() {
        let dom = MemoryDom::new();
        dom.set_attribute(dom.root(), "data-module", "rooty");
        assert!(dom
            .descendants_with_attribute(dom.root(), "data-module")
            .is_empty());
    }

    #[test]
    fn attributes_read_write() {
        let dom = MemoryDom::new();
        let el = dom.add_element(dom.root(), &[("data-type", "closeButton")]);

        assert_eq!(dom.attribute(el, "data-type").as_deref(), Some("closeButton"));
        assert_eq!(dom.attribute(el, "id"), None);

        dom.set_attribute(el, "id", "mod-files-1");
        assert_eq!(dom.attribute(el, "id").as_deref(), Some("mod-files-1"));
    }

    #[test]
    fn events_bubble_origin_first() {
        let dom = MemoryDom::new();
        let root = dom.root();
        let outer = dom.add_element(root, &[]);
        let inner = dom.add_element(outer, &[]);

        let log = Rc::new(StdRefCell::new(Vec::new()));
        for (node, tag) in [(inner, "inner"), (outer, "outer"), (root, "root")] {
            let log = log.clone();
            dom.listen(
                node,
                EventKind::Click,
                Rc::new(move |event: &UiEvent| {
                    log.borrow_mut().push(format!("{}@{:?}", tag, event.origin));
                }),
            );
        }

        dom.fire(inner, EventKind::Click, Value::Null);

        assert_eq!(
            *log.borrow(),
            vec![
                format!("inner@{:?}", inner),
                format!("outer@{:?}", inner),
                format!("root@{:?}", inner),
            ]
        );
    }

    #[test]
    fn unlisten_stops_delivery() {
        let dom = MemoryDom::new();
        let el = dom.add_element(dom.root(), &[]);

        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let id = dom.listen(
            el,
            EventKind::Click,
            Rc::new(move |_| counter.set(counter.get() + 1)),
        );

        dom.fire(el, EventKind::Click, Value::Null);
        dom.unlisten(id);
        dom.fire(el, EventKind::Click, Value::Null);

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn listener_kind_filtering() {
        let dom = MemoryDom::new();
        let el = dom.add_element(dom.root(), &[]);

        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        dom.listen(
            el,
            EventKind::KeyDown,
            Rc::new(move |_| counter.set(counter.get() + 1)),
        );

        dom.fire(el, EventKind::Click, Value::Null);
        assert_eq!(count.get(), 0);

        dom.fire(el, EventKind::KeyDown, Value::Null);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn config_and_globals() {
        let dom = MemoryDom::new();
        let el = dom.add_element(dom.root(), &[]);

        assert_eq!(dom.config_text(el), None);
        dom.set_config(el, r#"{"speed": 2}"#);
        assert_eq!(dom.config_text(el).as_deref(), Some(r#"{"speed": 2}"#));

        assert_eq!(dom.global("theme"), None);
        dom.set_global("theme", Value::String("dark".into()));
        assert_eq!(dom.global("theme"), Some(Value::String("dark".into())));
    }
}
