//! # Railnav Engine
//!
//! Interaction and state controller behind a collapsible, multi-level
//! navigation sidebar. The engine decides which groups are expanded, which
//! entries are active for the current route, and when the mobile overlay
//! dismisses itself. Presentation layers read a [`SidebarViewModel`] and feed
//! user input back through [`SidebarPanelController`] or the shared
//! [`Document`].
//!
//! ## Architecture
//!
//! - **`route_matcher`**: pure activation checks against the current path
//! - **`accordion`**: per-group open/closed state machine
//! - **`dismissal`**: outside-click and Escape handling for the mobile overlay
//! - **`preference`**: the persisted `sidebar-expanded` flag
//! - **`document`**: headless host document (element tree, root classes, global listeners)
//! - **`panel`**: composes the above and owns all runtime state
//!
//! Everything runs on one thread; shared handles are `Rc`/`RefCell`.
//!
//! ## Usage
//!
//! ```rust
//! use std::rc::Rc;
//! use railnav_engine::{Document, PanelElements, SidebarPanelController};
//! use railnav_types::{DomEvent, NavigationTree};
//! use railnav_util::UserPreferences;
//!
//! let document = Document::new();
//! let elements = PanelElements::create(&document);
//! let tree = NavigationTree::builtin()?;
//! let mut panel = SidebarPanelController::new(
//!     document.clone(),
//!     Rc::new(UserPreferences::ephemeral()),
//!     tree,
//!     elements,
//!     "/dashboard",
//! );
//! panel.mount();
//! assert!(panel.is_group_open("dashboard"));
//!
//! panel.toggle_panel_open();
//! document.dispatch(&DomEvent::click(None));
//! assert!(!panel.is_open_on_mobile());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod accordion;
pub mod dismissal;
pub mod document;
pub mod panel;
pub mod preference;
pub mod route_matcher;
pub mod view_model;

pub use accordion::{AccordionGroupController, GroupState, GroupToggled};
pub use dismissal::{DismissalController, DismissalSubscription, PanelElements};
pub use document::{Document, ListenerId};
pub use panel::{PanelError, SidebarPanelController};
pub use preference::{ExpandedPreference, parse_expanded};
pub use route_matcher::{entry_is_active, is_active, link_is_active};
pub use view_model::{EntryView, GroupView, LinkView, SectionView, SidebarViewModel};
