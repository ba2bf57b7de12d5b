//! Application state for the Railnav TUI.
//!
//! `App` owns the host document and the sidebar controller, assigns a
//! document element to every sidebar row so mouse clicks can be tested for
//! containment, and translates terminal input into controller calls plus
//! document-level events.

use std::collections::HashMap;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use railnav_engine::{Document, EntryView, PanelElements, SidebarPanelController, SidebarViewModel};
use railnav_types::{DomEvent, ElementId, GroupId, Key, NavigationEntry, NavigationTree, SIDEBAR_EXPANDED_CLASS};
use railnav_util::PreferenceStore;
use ratatui::layout::{Position, Rect};
use tracing::{debug, warn};

/// Terminals narrower than this many columns get the mobile overlay layout.
pub const MOBILE_BREAKPOINT: u16 = 100;

/// What activating a sidebar row does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowTarget {
    /// Group header: toggles the group.
    Group(GroupId),
    /// Link: navigates to the path.
    Link(String),
    /// Footer control: toggles the desktop rail width.
    ExpandToggle,
}

/// One rendered line of the sidebar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidebarRow {
    pub element: ElementId,
    pub label: String,
    /// `None` for section headings.
    pub target: Option<RowTarget>,
    pub active: bool,
    pub open: bool,
    pub depth: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Slot {
    Section(usize),
    Entry(usize, usize),
    Child(usize, usize, usize),
}

pub struct App {
    pub panel: SidebarPanelController,
    pub document: Rc<Document>,
    slots: HashMap<Slot, ElementId>,
    expand_toggle: ElementId,
    content: ElementId,
    /// Index into the focusable rows.
    pub selected: usize,
    /// Regions recorded during the last draw, topmost last.
    hit_map: Vec<(Rect, ElementId)>,
    /// First sidebar row drawn; moves to keep the selection in view.
    pub(crate) list_offset: usize,
    viewport_width: u16,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: Rc<dyn PreferenceStore>, tree: NavigationTree, initial_path: &str) -> Self {
        let document = Document::new();
        let elements = PanelElements::create(&document);
        let content = document.create_element(document.root());

        let mut slots = HashMap::new();
        for (section_index, section) in tree.sections.iter().enumerate() {
            slots.insert(Slot::Section(section_index), document.create_element(elements.panel));
            for (entry_index, entry) in section.entries.iter().enumerate() {
                let entry_element = document.create_element(elements.panel);
                slots.insert(Slot::Entry(section_index, entry_index), entry_element);
                if let NavigationEntry::Group(group) = entry {
                    for child_index in 0..group.links.len() {
                        let child = document.create_element(entry_element);
                        slots.insert(Slot::Child(section_index, entry_index, child_index), child);
                    }
                }
            }
        }
        let expand_toggle = document.create_element(elements.panel);

        let mut panel = SidebarPanelController::new(document.clone(), store, tree, elements, initial_path);
        panel.mount();

        Self {
            panel,
            document,
            slots,
            expand_toggle,
            content,
            selected: 0,
            hit_map: Vec::new(),
            list_offset: 0,
            viewport_width: MOBILE_BREAKPOINT,
            should_quit: false,
        }
    }

    pub fn content_element(&self) -> ElementId {
        self.content
    }

    pub fn set_viewport_width(&mut self, width: u16) {
        self.viewport_width = width;
    }

    pub fn is_mobile(&self) -> bool {
        self.viewport_width < MOBILE_BREAKPOINT
    }

    pub fn sidebar_visible(&self) -> bool {
        !self.is_mobile() || self.panel.is_open_on_mobile()
    }

    /// Labels show in the mobile overlay and in the expanded desktop rail.
    /// The rail reads the document root marker, like page-level layout rules do.
    pub fn shows_labels(&self) -> bool {
        self.is_mobile() || self.document.has_root_class(SIDEBAR_EXPANDED_CLASS)
    }

    pub fn view_model(&self) -> SidebarViewModel {
        self.panel.view_model()
    }

    /// Sidebar lines for the current state. Group children are listed only when
    /// the group is open and labels are shown.
    pub fn rows(&self) -> Vec<SidebarRow> {
        let vm = self.panel.view_model();
        let labelled = self.shows_labels();
        let fallback = self.panel.elements().panel;
        let element = |slot: Slot| self.slots.get(&slot).copied().unwrap_or(fallback);

        let mut rows = Vec::new();
        for (section_index, section) in vm.sections.iter().enumerate() {
            rows.push(SidebarRow {
                element: element(Slot::Section(section_index)),
                label: section.label.clone(),
                target: None,
                active: false,
                open: false,
                depth: 0,
            });
            for (entry_index, entry) in section.entries.iter().enumerate() {
                match entry {
                    EntryView::Link(link) => rows.push(SidebarRow {
                        element: element(Slot::Entry(section_index, entry_index)),
                        label: link.label.clone(),
                        target: Some(RowTarget::Link(link.path.clone())),
                        active: link.active,
                        open: false,
                        depth: 0,
                    }),
                    EntryView::Group(group) => {
                        rows.push(SidebarRow {
                            element: element(Slot::Entry(section_index, entry_index)),
                            label: group.label.clone(),
                            target: Some(RowTarget::Group(group.id.clone())),
                            active: group.active,
                            open: group.open,
                            depth: 0,
                        });
                        if group.open && labelled {
                            rows.extend(group.links.iter().enumerate().map(|(child_index, link)| SidebarRow {
                                element: element(Slot::Child(section_index, entry_index, child_index)),
                                label: link.label.clone(),
                                target: Some(RowTarget::Link(link.path.clone())),
                                active: link.active,
                                open: false,
                                depth: 1,
                            }));
                        }
                    }
                }
            }
        }

        if !self.is_mobile() {
            let expanded = self.panel.is_expanded_on_desktop();
            rows.push(SidebarRow {
                element: self.expand_toggle,
                label: if expanded { "Collapse".to_string() } else { "Expand".to_string() },
                target: Some(RowTarget::ExpandToggle),
                active: false,
                open: expanded,
                depth: 0,
            });
        }
        rows
    }

    fn focusable_rows(&self) -> Vec<SidebarRow> {
        self.rows().into_iter().filter(|row| row.target.is_some()).collect()
    }

    pub fn selected_target(&self) -> Option<RowTarget> {
        self.focusable_rows().into_iter().nth(self.selected).and_then(|row| row.target)
    }

    pub fn selected_element(&self) -> Option<ElementId> {
        self.focusable_rows().get(self.selected).map(|row| row.element)
    }

    fn move_selection(&mut self, delta: isize) {
        let count = self.focusable_rows().len();
        if count == 0 {
            return;
        }
        self.selected = (self.selected as isize + delta).rem_euclid(count as isize) as usize;
    }

    fn clamp_selection(&mut self) {
        let count = self.focusable_rows().len();
        if self.selected >= count {
            self.selected = count.saturating_sub(1);
        }
    }

    pub fn activate(&mut self, target: &RowTarget) {
        match target {
            RowTarget::Group(id) => {
                if let Err(error) = self.panel.toggle_group(id.as_str()) {
                    warn!(error = %error, "Ignoring toggle for unknown group");
                }
            }
            RowTarget::Link(path) => self.panel.navigate(path.clone()),
            RowTarget::ExpandToggle => self.panel.toggle_expanded(),
        }
        self.clamp_selection();
    }

    /// Handle a key press, then deliver it to document listeners.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.should_quit = true,
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('m') => self.panel.toggle_panel_open(),
            KeyCode::Char('e') => self.panel.toggle_expanded(),
            KeyCode::Up if self.sidebar_visible() => self.move_selection(-1),
            KeyCode::Down if self.sidebar_visible() => self.move_selection(1),
            KeyCode::Enter if self.sidebar_visible() => {
                if let Some(target) = self.selected_target() {
                    self.activate(&target);
                }
            }
            _ => {}
        }
        self.document.dispatch(&DomEvent::key(map_key(key.code)));
        self.clamp_selection();
    }

    /// Handle a left click: run the clicked element's action, then let the
    /// click reach document listeners, like a bubbling DOM click.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let target = self.hit_test(mouse.column, mouse.row);
        if let Some(element) = target {
            self.click_element(element);
        }
        debug!(column = mouse.column, row = mouse.row, ?target, "click");
        self.document.dispatch(&DomEvent::click(target));
        self.clamp_selection();
    }

    fn click_element(&mut self, element: ElementId) {
        if element == self.panel.elements().trigger {
            self.panel.toggle_panel_open();
            return;
        }
        let hit = self.focusable_rows().into_iter().enumerate().find(|(_, row)| row.element == element);
        if let Some((index, row)) = hit {
            self.selected = index;
            if let Some(target) = row.target {
                self.activate(&target);
            }
        }
    }

    pub(crate) fn clear_hits(&mut self) {
        self.hit_map.clear();
    }

    pub(crate) fn record_hit(&mut self, area: Rect, element: ElementId) {
        self.hit_map.push((area, element));
    }

    /// Topmost element recorded at the position.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<ElementId> {
        let position = Position::new(column, row);
        self.hit_map.iter().rev().find(|(area, _)| area.contains(position)).map(|(_, element)| *element)
    }
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Esc => Key::Escape,
        KeyCode::Enter => Key::Enter,
        KeyCode::Char(ch) => Key::Char(ch),
        other => Key::Other(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use railnav_util::UserPreferences;

    fn app_at(path: &str, width: u16) -> App {
        let tree = NavigationTree::builtin().expect("builtin tree");
        let mut app = App::new(Rc::new(UserPreferences::ephemeral()), tree, path);
        app.set_viewport_width(width);
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn collapsed_desktop_rail_hides_group_children() {
        let app = app_at("/dashboard", 120);
        assert!(!app.shows_labels());
        assert!(app.rows().iter().all(|row| row.depth == 0));
        assert_eq!(app.rows().last().and_then(|row| row.target.clone()), Some(RowTarget::ExpandToggle));
    }

    #[test]
    fn enter_on_group_toggles_and_expands_rail() {
        let mut app = app_at("/", 120);
        assert_eq!(app.selected_target(), Some(RowTarget::Group(GroupId::new("dashboard"))));

        press(&mut app, KeyCode::Enter);
        assert!(!app.panel.is_group_open("dashboard"));
        assert!(app.panel.is_expanded_on_desktop());
        assert!(app.shows_labels());
    }

    #[test]
    fn selecting_a_child_link_navigates() {
        let mut app = app_at("/settings/account", 120);
        app.panel.set_expanded(true);
        let index = app
            .focusable_rows()
            .iter()
            .position(|row| row.target == Some(RowTarget::Link("/settings/feedback".into())))
            .expect("feedback row visible");
        app.selected = index;

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.panel.current_path(), "/settings/feedback");
        assert!(app.panel.is_group_open("settings"));
    }

    #[test]
    fn selection_wraps() {
        let mut app = app_at("/", 120);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_target(), Some(RowTarget::ExpandToggle));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn menu_key_opens_overlay_and_escape_dismisses() {
        let mut app = app_at("/", 60);
        assert!(!app.sidebar_visible());

        press(&mut app, KeyCode::Char('m'));
        assert!(app.sidebar_visible());
        press(&mut app, KeyCode::Char('x'));
        assert!(app.panel.is_open_on_mobile());

        press(&mut app, KeyCode::Esc);
        assert!(!app.panel.is_open_on_mobile());
    }

    #[test]
    fn clicks_follow_containment() {
        let mut app = app_at("/", 60);
        app.panel.set_panel_open(true);
        let trigger = app.panel.elements().trigger;
        let row = app.selected_element().expect("a focusable row");

        app.click_element(row);
        app.document.dispatch(&DomEvent::click(row));
        assert!(app.panel.is_open_on_mobile());

        app.click_element(trigger);
        app.document.dispatch(&DomEvent::click(trigger));
        assert!(!app.panel.is_open_on_mobile());

        app.click_element(trigger);
        app.document.dispatch(&DomEvent::click(trigger));
        assert!(app.panel.is_open_on_mobile());

        let content = app.content_element();
        app.document.dispatch(&DomEvent::click(content));
        assert!(!app.panel.is_open_on_mobile());
    }

    #[test]
    fn quit_keys() {
        let mut app = app_at("/", 120);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);

        let mut app = app_at("/", 120);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
