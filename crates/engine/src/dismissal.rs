//! Mobile overlay dismissal.
//!
//! While the overlay is open, a click outside both the panel and its trigger
//! button, or an Escape key press, closes it. Listeners live on the document
//! for as long as the panel is mounted and are removed when the
//! [`DismissalSubscription`] is dropped.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use railnav_types::{DomEvent, ElementId, EventKind, Key};
use tracing::debug;

use crate::document::{Document, ListenerId};
use crate::panel::PanelRuntimeState;

/// The two elements an outside click is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelElements {
    pub panel: ElementId,
    pub trigger: ElementId,
}

impl PanelElements {
    /// Create a panel element and a separate trigger element under the document root.
    pub fn create(document: &Document) -> Self {
        let panel = document.create_element(document.root());
        let trigger = document.create_element(document.root());
        Self { panel, trigger }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DismissalController {
    elements: PanelElements,
}

impl DismissalController {
    pub fn new(elements: PanelElements) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> PanelElements {
        self.elements
    }

    /// Whether `event` should close the overlay.
    ///
    /// A closed overlay never dismisses. Clicks are ignored while either
    /// element is detached, so a check racing with teardown does nothing.
    pub fn should_dismiss(&self, document: &Document, is_open: bool, event: &DomEvent) -> bool {
        if !is_open {
            return false;
        }
        match event {
            DomEvent::Click { target } => {
                let PanelElements { panel, trigger } = self.elements;
                if !document.is_attached(panel) || !document.is_attached(trigger) {
                    return false;
                }
                match target {
                    Some(target) => !document.contains(panel, *target) && !document.contains(trigger, *target),
                    None => true,
                }
            }
            DomEvent::KeyDown { key } => *key == Key::Escape,
        }
    }

    /// Register the click and key listeners. They close the overlay through
    /// `state` and do nothing once it has been dropped.
    pub(crate) fn attach(&self, document: &Rc<Document>, state: Weak<RefCell<PanelRuntimeState>>) -> DismissalSubscription {
        let click = document.add_listener(EventKind::Click, self.handler(Rc::downgrade(document), state.clone()));
        let key = document.add_listener(EventKind::KeyDown, self.handler(Rc::downgrade(document), state));
        debug!(panel = %self.elements.panel, "dismissal listeners attached");
        DismissalSubscription {
            document: Rc::downgrade(document),
            listeners: [click, key],
        }
    }

    fn handler(&self, document: Weak<Document>, state: Weak<RefCell<PanelRuntimeState>>) -> impl Fn(&DomEvent) + 'static {
        let controller = *self;
        move |event| {
            let (Some(document), Some(state)) = (document.upgrade(), state.upgrade()) else {
                return;
            };
            let is_open = state.borrow().is_open_on_mobile;
            if controller.should_dismiss(&document, is_open, event) {
                state.borrow_mut().is_open_on_mobile = false;
                debug!(?event, "mobile overlay dismissed");
            }
        }
    }
}

/// Scoped registration of the dismissal listeners.
#[derive(Debug)]
pub struct DismissalSubscription {
    document: Weak<Document>,
    listeners: [ListenerId; 2],
}

impl Drop for DismissalSubscription {
    fn drop(&mut self) {
        if let Some(document) = self.document.upgrade() {
            for id in self.listeners {
                document.remove_listener(id);
            }
            debug!("dismissal listeners detached");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        document: Rc<Document>,
        controller: DismissalController,
        inside_panel: ElementId,
        inside_trigger: ElementId,
        elsewhere: ElementId,
    }

    fn fixture() -> Fixture {
        let document = Document::new();
        let elements = PanelElements::create(&document);
        let inside_panel = document.create_element(elements.panel);
        let icon = document.create_element(elements.trigger);
        let elsewhere = document.create_element(document.root());
        Fixture {
            controller: DismissalController::new(elements),
            document,
            inside_panel,
            inside_trigger: icon,
            elsewhere,
        }
    }

    #[test]
    fn closed_overlay_never_dismisses() {
        let fx = fixture();
        assert!(!fx.controller.should_dismiss(&fx.document, false, &DomEvent::click(fx.elsewhere)));
        assert!(!fx.controller.should_dismiss(&fx.document, false, &DomEvent::key(Key::Escape)));
    }

    #[test]
    fn outside_click_dismisses_inside_click_does_not() {
        let fx = fixture();
        let elements = fx.controller.elements();
        assert!(fx.controller.should_dismiss(&fx.document, true, &DomEvent::click(fx.elsewhere)));
        assert!(fx.controller.should_dismiss(&fx.document, true, &DomEvent::click(None)));
        assert!(!fx.controller.should_dismiss(&fx.document, true, &DomEvent::click(fx.inside_panel)));
        assert!(!fx.controller.should_dismiss(&fx.document, true, &DomEvent::click(elements.panel)));
        assert!(!fx.controller.should_dismiss(&fx.document, true, &DomEvent::click(fx.inside_trigger)));
        assert!(!fx.controller.should_dismiss(&fx.document, true, &DomEvent::click(elements.trigger)));
    }

    #[test]
    fn only_escape_dismisses() {
        let fx = fixture();
        assert!(fx.controller.should_dismiss(&fx.document, true, &DomEvent::key(Key::Escape)));
        assert!(!fx.controller.should_dismiss(&fx.document, true, &DomEvent::key(Key::Enter)));
        assert!(!fx.controller.should_dismiss(&fx.document, true, &DomEvent::key(Key::Char('q'))));
        assert!(!fx.controller.should_dismiss(&fx.document, true, &DomEvent::key(Key::Other("Tab".into()))));
    }

    #[test]
    fn detached_elements_make_clicks_a_no_op() {
        let fx = fixture();
        fx.document.remove_element(fx.controller.elements().trigger);
        assert!(!fx.controller.should_dismiss(&fx.document, true, &DomEvent::click(fx.elsewhere)));
        // Escape does not depend on the elements.
        assert!(fx.controller.should_dismiss(&fx.document, true, &DomEvent::key(Key::Escape)));
    }

    #[test]
    fn subscription_closes_state_and_detaches_on_drop() {
        let fx = fixture();
        let state = Rc::new(RefCell::new(PanelRuntimeState {
            is_open_on_mobile: true,
            is_expanded_on_desktop: false,
        }));

        let subscription = fx.controller.attach(&fx.document, Rc::downgrade(&state));
        assert_eq!(fx.document.listener_count(EventKind::Click), 1);
        assert_eq!(fx.document.listener_count(EventKind::KeyDown), 1);

        fx.document.dispatch(&DomEvent::click(fx.elsewhere));
        assert!(!state.borrow().is_open_on_mobile);

        drop(subscription);
        assert_eq!(fx.document.listener_count(EventKind::Click), 0);
        assert_eq!(fx.document.listener_count(EventKind::KeyDown), 0);
    }

    #[test]
    fn dropped_state_turns_listeners_into_no_ops() {
        let fx = fixture();
        let state = Rc::new(RefCell::new(PanelRuntimeState {
            is_open_on_mobile: true,
            is_expanded_on_desktop: false,
        }));
        let _subscription = fx.controller.attach(&fx.document, Rc::downgrade(&state));
        drop(state);

        fx.document.dispatch(&DomEvent::click(fx.elsewhere));
        fx.document.dispatch(&DomEvent::key(Key::Escape));
    }
}
