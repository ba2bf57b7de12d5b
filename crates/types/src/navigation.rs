//! Navigation tree model.
//!
//! A [`NavigationTree`] is an ordered list of labelled [`Section`]s, each
//! holding [`NavigationEntry`] values: either a plain link or a collapsible
//! group of links. Trees are plain data and serialize to JSON, e.g.
//!
//! ```json
//! { "sections": [ { "label": "Pages", "entries": [
//!     { "kind": "group", "label": "Settings", "active_when": { "contains": "settings" },
//!       "links": [ { "path": "/settings/account", "label": "My Account" } ] },
//!     { "kind": "link", "path": "/messages", "label": "Messages", "active_when": { "contains": "messages" } }
//! ] } ] }
//! ```

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use heck::ToKebabCase;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUILTIN_TREE_JSON: &str = include_str!("../data/default_tree.json");

/// Errors surfaced when loading a navigation tree.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("navigation tree I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("navigation tree is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Declarative test deciding whether an entry corresponds to the current path.
///
/// Serialized in externally tagged form: `{"exact": "/"}`, `{"contains": "tasks"}`,
/// `{"any": [...]}`, or the bare string `"never"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationPredicate {
    /// Path equals the value.
    Exact(String),
    /// Path starts with the value.
    Prefix(String),
    /// Path contains the value as a substring.
    Contains(String),
    /// True when any inner predicate is true. Empty is false.
    Any(Vec<ActivationPredicate>),
    /// True when every inner predicate is true. Empty is true.
    All(Vec<ActivationPredicate>),
    /// Never active.
    #[default]
    Never,
}

impl ActivationPredicate {
    pub fn exact(path: impl Into<String>) -> Self {
        Self::Exact(path.into())
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    pub fn contains(needle: impl Into<String>) -> Self {
        Self::Contains(needle.into())
    }

    pub fn any(predicates: impl IntoIterator<Item = ActivationPredicate>) -> Self {
        Self::Any(predicates.into_iter().collect())
    }
}

/// A leaf link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleLink {
    /// Route the link navigates to.
    pub path: String,
    /// Display label.
    pub label: String,
    /// Optional activation override. When absent the link is active only on
    /// an exact match of `path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_when: Option<ActivationPredicate>,
}

impl SimpleLink {
    pub fn new(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            active_when: None,
        }
    }

    pub fn active_when(mut self, predicate: ActivationPredicate) -> Self {
        self.active_when = Some(predicate);
        self
    }
}

/// A collapsible group of links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavGroup {
    /// Explicit identifier. Derived from the label when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    /// Decides whether the group is active (and therefore opens at mount).
    #[serde(default)]
    pub active_when: ActivationPredicate,
    #[serde(default)]
    pub links: Vec<SimpleLink>,
}

impl NavGroup {
    pub fn new(label: impl Into<String>, active_when: ActivationPredicate) -> Self {
        Self {
            id: None,
            label: label.into(),
            active_when,
            links: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_link(mut self, link: SimpleLink) -> Self {
        self.links.push(link);
        self
    }

    /// Identifier before de-duplication: the explicit id, or the label in kebab case.
    fn base_id(&self) -> String {
        let base = match &self.id {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => self.label.to_kebab_case(),
        };
        if base.is_empty() { "group".to_string() } else { base }
    }
}

/// One item of a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavigationEntry {
    Link(SimpleLink),
    Group(NavGroup),
}

impl NavigationEntry {
    pub fn label(&self) -> &str {
        match self {
            Self::Link(link) => &link.label,
            Self::Group(group) => &group.label,
        }
    }
}

impl From<SimpleLink> for NavigationEntry {
    fn from(link: SimpleLink) -> Self {
        Self::Link(link)
    }
}

impl From<NavGroup> for NavigationEntry {
    fn from(group: NavGroup) -> Self {
        Self::Group(group)
    }
}

/// Labelled run of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub label: String,
    #[serde(default)]
    pub entries: Vec<NavigationEntry>,
}

impl Section {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            entries: Vec::new(),
        }
    }

    pub fn with_entry(mut self, entry: impl Into<NavigationEntry>) -> Self {
        self.entries.push(entry.into());
        self
    }
}

/// Stable identifier for a group within a tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for GroupId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Whole navigation tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationTree {
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl NavigationTree {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Tree shipped with the binary.
    pub fn builtin() -> Result<Self, TreeError> {
        Self::from_json_str(BUILTIN_TREE_JSON)
    }

    pub fn from_json_str(data: &str) -> Result<Self, TreeError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, TreeError> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn to_json_pretty(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Every group paired with its unique id, in tree order.
    pub fn groups(&self) -> Vec<(GroupId, &NavGroup)> {
        self.group_slots().into_iter().map(|slot| (slot.id, slot.group)).collect()
    }

    /// Every group with its position in the tree and its unique id.
    ///
    /// Ids come from [`NavGroup::id`] or the kebab-cased label. An id already
    /// issued gets `-2`, `-3`, ... appended until it no longer collides with any
    /// earlier id, explicit or derived.
    pub fn group_slots(&self) -> Vec<GroupSlot<'_>> {
        let mut issued: HashSet<String> = HashSet::new();
        let mut slots = Vec::new();
        for (section, entries) in self.sections.iter().map(|section| &section.entries).enumerate() {
            for (entry, item) in entries.iter().enumerate() {
                let NavigationEntry::Group(group) = item else {
                    continue;
                };
                let base = group.base_id();
                let mut id = base.clone();
                let mut suffix = 1;
                while issued.contains(&id) {
                    suffix += 1;
                    id = format!("{base}-{suffix}");
                }
                issued.insert(id.clone());
                slots.push(GroupSlot {
                    section,
                    entry,
                    id: GroupId(id),
                    group,
                });
            }
        }
        slots
    }
}

/// A group located by section index and entry index within that section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSlot<'a> {
    pub section: usize,
    pub entry: usize,
    pub id: GroupId,
    pub group: &'a NavGroup,
}
