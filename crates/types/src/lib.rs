//! Shared type definitions for Railnav.
//!
//! The navigation tree is static data supplied by the host: sections of links
//! and collapsible groups, each carrying a declarative activation predicate.
//! The DOM-flavoured event types describe the global signals the engine's
//! dismissal logic listens to.

pub mod events;
pub mod navigation;

pub use events::{DomEvent, ElementId, EventKind, Key};
pub use navigation::{ActivationPredicate, GroupId, GroupSlot, NavGroup, NavigationEntry, NavigationTree, Section, SimpleLink, TreeError};

/// Persisted preference key holding the desktop rail expansion flag.
pub const SIDEBAR_EXPANDED_KEY: &str = "sidebar-expanded";

/// Class toggled on the document root while the desktop rail is expanded.
pub const SIDEBAR_EXPANDED_CLASS: &str = "sidebar-expanded";
