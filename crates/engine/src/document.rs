//! Headless host document.
//!
//! Models the three page-level facilities the sidebar depends on: an element
//! tree for containment checks, the root element's class list (read by layout
//! rules outside the sidebar), and document-wide event listeners.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;

use railnav_types::{DomEvent, ElementId, EventKind};
use tracing::trace;

type Handler = Rc<dyn Fn(&DomEvent)>;

/// Handle returned by [`Document::add_listener`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listener {
    id: ListenerId,
    kind: EventKind,
    handler: Handler,
}

/// Single-threaded document shared via `Rc`.
pub struct Document {
    root: ElementId,
    /// Element to parent. The root maps to `None`.
    parents: RefCell<HashMap<ElementId, Option<ElementId>>>,
    next_element: Cell<u64>,
    root_classes: RefCell<BTreeSet<String>>,
    listeners: RefCell<Vec<Listener>>,
    next_listener: Cell<u64>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("elements", &self.parents.borrow().len())
            .field("root_classes", &self.root_classes.borrow())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl Document {
    pub fn new() -> Rc<Self> {
        let root = ElementId(0);
        let mut parents = HashMap::new();
        parents.insert(root, None);
        Rc::new(Self {
            root,
            parents: RefCell::new(parents),
            next_element: Cell::new(1),
            root_classes: RefCell::new(BTreeSet::new()),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(1),
        })
    }

    /// The document root element.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Create a new element under `parent`.
    pub fn create_element(&self, parent: ElementId) -> ElementId {
        let id = ElementId(self.next_element.get());
        self.next_element.set(id.0 + 1);
        self.parents.borrow_mut().insert(id, Some(parent));
        id
    }

    /// Remove `id` and its whole subtree. The root cannot be removed.
    pub fn remove_element(&self, id: ElementId) {
        if id == self.root || !self.is_attached(id) {
            return;
        }
        let doomed: Vec<ElementId> = self.parents.borrow().keys().copied().filter(|node| self.contains(id, *node)).collect();
        let mut parents = self.parents.borrow_mut();
        for node in doomed {
            parents.remove(&node);
        }
    }

    pub fn is_attached(&self, id: ElementId) -> bool {
        self.parents.borrow().contains_key(&id)
    }

    /// Inclusive descendant check, like DOM `Node.contains`.
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let parents = self.parents.borrow();
        if !parents.contains_key(&ancestor) {
            return false;
        }
        let mut current = Some(node);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = parents.get(&candidate).copied().flatten();
        }
        false
    }

    pub fn set_root_class(&self, name: &str, present: bool) {
        let mut classes = self.root_classes.borrow_mut();
        if present {
            classes.insert(name.to_string());
        } else {
            classes.remove(name);
        }
    }

    pub fn has_root_class(&self, name: &str) -> bool {
        self.root_classes.borrow().contains(name)
    }

    pub fn root_classes(&self) -> Vec<String> {
        self.root_classes.borrow().iter().cloned().collect()
    }

    /// Register a document-wide listener for `kind`.
    pub fn add_listener(&self, kind: EventKind, handler: impl Fn(&DomEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push(Listener {
            id,
            kind,
            handler: Rc::new(handler),
        });
        trace!(?kind, listener = id.0, "listener added");
        id
    }

    /// Remove a listener. Returns `false` when it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|listener| listener.id != id);
        let removed = listeners.len() != before;
        if removed {
            trace!(listener = id.0, "listener removed");
        }
        removed
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.borrow().iter().filter(|listener| listener.kind == kind).count()
    }

    /// Deliver `event` to every listener of its kind, in registration order.
    ///
    /// Listeners added during dispatch run from the next event on; listeners
    /// removed during dispatch are skipped if they have not run yet.
    pub fn dispatch(&self, event: &DomEvent) {
        let kind = event.kind();
        let snapshot: Vec<(ListenerId, Handler)> = self
            .listeners
            .borrow()
            .iter()
            .filter(|listener| listener.kind == kind)
            .map(|listener| (listener.id, listener.handler.clone()))
            .collect();
        for (id, handler) in snapshot {
            let still_registered = self.listeners.borrow().iter().any(|listener| listener.id == id);
            if still_registered {
                handler(event);
            }
        }
    }
}
