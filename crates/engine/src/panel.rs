//! Sidebar panel controller.
//!
//! Owns the panel flags, every group's accordion state, and the dismissal
//! subscription. Each change to the desktop expansion flag is written through
//! to the preference store and mirrored as the `sidebar-expanded` class on
//! the document root.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;
use railnav_types::{GroupId, NavGroup, NavigationEntry, NavigationTree, SIDEBAR_EXPANDED_CLASS, SimpleLink};
use railnav_util::PreferenceStore;
use thiserror::Error;
use tracing::{debug, warn};

use crate::accordion::AccordionGroupController;
use crate::dismissal::{DismissalController, DismissalSubscription, PanelElements};
use crate::document::Document;
use crate::preference::ExpandedPreference;
use crate::route_matcher::{is_active, link_is_active};
use crate::view_model::{EntryView, GroupView, LinkView, SectionView, SidebarViewModel};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PanelError {
    #[error("unknown navigation group '{0}'")]
    UnknownGroup(String),
}

#[derive(Debug, Default)]
pub(crate) struct PanelRuntimeState {
    pub(crate) is_open_on_mobile: bool,
    pub(crate) is_expanded_on_desktop: bool,
}

#[derive(Debug)]
pub struct SidebarPanelController {
    document: Rc<Document>,
    preference: ExpandedPreference,
    tree: NavigationTree,
    path: String,
    state: Rc<RefCell<PanelRuntimeState>>,
    groups: IndexMap<GroupId, AccordionGroupController>,
    /// Group id for each `(section, entry)` position holding a group.
    group_at: HashMap<(usize, usize), GroupId>,
    dismissal: DismissalController,
    subscription: Option<DismissalSubscription>,
}

impl SidebarPanelController {
    /// Build the controller for `tree` at the mount-time `path`.
    ///
    /// Reads the persisted expansion flag, syncs it back out (normalizing any
    /// unrecognised stored value), and opens every group active for `path`.
    pub fn new(
        document: Rc<Document>,
        store: Rc<dyn PreferenceStore>,
        tree: NavigationTree,
        elements: PanelElements,
        path: impl Into<String>,
    ) -> Self {
        let path = path.into();
        let preference = ExpandedPreference::new(store);
        let expanded = preference.load();

        let mut groups = IndexMap::new();
        let mut group_at = HashMap::new();
        for slot in tree.group_slots() {
            let controller = AccordionGroupController::initialize(slot.id.clone(), is_active(&path, &slot.group.active_when));
            group_at.insert((slot.section, slot.entry), slot.id.clone());
            groups.insert(slot.id, controller);
        }

        let controller = Self {
            document,
            preference,
            tree,
            path,
            state: Rc::new(RefCell::new(PanelRuntimeState {
                is_open_on_mobile: false,
                is_expanded_on_desktop: expanded,
            })),
            groups,
            group_at,
            dismissal: DismissalController::new(elements),
            subscription: None,
        };
        controller.sync_expanded(expanded);
        debug!(path = %controller.path, expanded, groups = controller.groups.len(), "sidebar panel created");
        controller
    }

    /// Attach the dismissal listeners. Calling it again while mounted does nothing.
    pub fn mount(&mut self) {
        if self.subscription.is_some() {
            return;
        }
        self.subscription = Some(self.dismissal.attach(&self.document, Rc::downgrade(&self.state)));
    }

    /// Detach the dismissal listeners. Dropping the controller does the same.
    pub fn unmount(&mut self) {
        self.subscription = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn elements(&self) -> PanelElements {
        self.dismissal.elements()
    }

    pub fn document(&self) -> &Rc<Document> {
        &self.document
    }

    pub fn tree(&self) -> &NavigationTree {
        &self.tree
    }

    pub fn is_open_on_mobile(&self) -> bool {
        self.state.borrow().is_open_on_mobile
    }

    pub fn toggle_panel_open(&mut self) {
        let open = !self.is_open_on_mobile();
        self.set_panel_open(open);
    }

    pub fn set_panel_open(&mut self, open: bool) {
        self.state.borrow_mut().is_open_on_mobile = open;
        debug!(open, "mobile overlay");
    }

    pub fn is_expanded_on_desktop(&self) -> bool {
        self.state.borrow().is_expanded_on_desktop
    }

    pub fn toggle_expanded(&mut self) {
        let expanded = !self.is_expanded_on_desktop();
        self.set_expanded(expanded);
    }

    /// Set the desktop expansion flag. Only an actual change is written through.
    pub fn set_expanded(&mut self, expanded: bool) {
        {
            let mut state = self.state.borrow_mut();
            if state.is_expanded_on_desktop == expanded {
                return;
            }
            state.is_expanded_on_desktop = expanded;
        }
        debug!(expanded, "desktop rail");
        self.sync_expanded(expanded);
    }

    /// Toggle a group from its header. Also forces the rail wide.
    pub fn toggle_group(&mut self, id: &str) -> Result<bool, PanelError> {
        let group = self.groups.get_mut(id).ok_or_else(|| PanelError::UnknownGroup(id.to_string()))?;
        let toggled = group.toggle();
        if toggled.request_expanded {
            self.set_expanded(true);
        }
        Ok(toggled.open)
    }

    pub fn group(&self, id: &str) -> Option<&AccordionGroupController> {
        self.groups.get(id)
    }

    /// Open flag of a group; unknown ids read as closed.
    pub fn is_group_open(&self, id: &str) -> bool {
        self.groups.get(id).is_some_and(AccordionGroupController::is_open)
    }

    pub fn group_ids(&self) -> impl Iterator<Item = &GroupId> {
        self.groups.keys()
    }

    /// Record a route change. Group open state is left alone.
    pub fn navigate(&mut self, path: impl Into<String>) {
        self.path = path.into();
        debug!(path = %self.path, "navigated");
    }

    pub fn current_path(&self) -> &str {
        &self.path
    }

    /// Snapshot of everything the presentation layer renders.
    pub fn view_model(&self) -> SidebarViewModel {
        let sections = self
            .tree
            .sections
            .iter()
            .enumerate()
            .map(|(section_index, section)| SectionView {
                label: section.label.clone(),
                entries: section
                    .entries
                    .iter()
                    .enumerate()
                    .map(|(entry_index, entry)| match entry {
                        NavigationEntry::Link(link) => EntryView::Link(self.link_view(link)),
                        NavigationEntry::Group(group) => EntryView::Group(self.group_view(section_index, entry_index, group)),
                    })
                    .collect(),
            })
            .collect();

        SidebarViewModel {
            path: self.path.clone(),
            is_open_on_mobile: self.is_open_on_mobile(),
            is_expanded_on_desktop: self.is_expanded_on_desktop(),
            sections,
        }
    }

    fn group_view(&self, section: usize, entry: usize, group: &NavGroup) -> GroupView {
        let id = match self.group_at.get(&(section, entry)) {
            Some(id) => id.clone(),
            None => {
                warn!(section, entry, label = %group.label, "Group has no registered id; rendering it closed");
                GroupId::new(group.label.clone())
            }
        };
        GroupView {
            open: self.is_group_open(id.as_str()),
            id,
            label: group.label.clone(),
            active: is_active(&self.path, &group.active_when),
            links: group.links.iter().map(|link| self.link_view(link)).collect(),
        }
    }

    fn link_view(&self, link: &SimpleLink) -> LinkView {
        LinkView {
            path: link.path.clone(),
            label: link.label.clone(),
            active: link_is_active(&self.path, link),
        }
    }

    fn sync_expanded(&self, expanded: bool) {
        self.document.set_root_class(SIDEBAR_EXPANDED_CLASS, expanded);
        if let Err(error) = self.preference.save(expanded) {
            warn!(error = %error, "Failed to persist sidebar expansion; keeping in-memory state");
        }
    }
}
