//! Read-only snapshot of the sidebar for the presentation layer.

use railnav_types::GroupId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarViewModel {
    pub path: String,
    pub is_open_on_mobile: bool,
    pub is_expanded_on_desktop: bool,
    pub sections: Vec<SectionView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub label: String,
    pub entries: Vec<EntryView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryView {
    Link(LinkView),
    Group(GroupView),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkView {
    pub path: String,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupView {
    pub id: GroupId,
    pub label: String,
    pub active: bool,
    pub open: bool,
    pub links: Vec<LinkView>,
}

impl SidebarViewModel {
    pub fn group(&self, id: &str) -> Option<&GroupView> {
        self.sections.iter().flat_map(|section| section.entries.iter()).find_map(|entry| match entry {
            EntryView::Group(group) if group.id.as_str() == id => Some(group),
            _ => None,
        })
    }

    /// Every active link, including group children, in tree order.
    pub fn active_links(&self) -> Vec<&LinkView> {
        let mut active = Vec::new();
        for entry in self.sections.iter().flat_map(|section| section.entries.iter()) {
            match entry {
                EntryView::Link(link) if link.active => active.push(link),
                EntryView::Link(_) => {}
                EntryView::Group(group) => active.extend(group.links.iter().filter(|link| link.active)),
            }
        }
        active
    }
}
