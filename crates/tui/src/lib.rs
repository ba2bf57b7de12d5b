//! # Railnav TUI
//!
//! Terminal shell hosting the sidebar engine. It plays the part of the web
//! page around the sidebar: it owns the [`railnav_engine::Document`], maps
//! terminal input onto document events, and renders the sidebar from the
//! engine's view model.
//!
//! ## Layout
//!
//! - Wide terminals behave like a desktop: the sidebar is a persistent rail,
//!   icon-only when collapsed and labelled when the document root carries the
//!   `sidebar-expanded` class.
//! - Narrow terminals behave like a phone: the sidebar is an overlay opened by
//!   the header trigger and dismissed by Escape or a click outside it.

mod app;
mod runtime;
mod ui;

use std::rc::Rc;

use anyhow::Result;
use railnav_types::NavigationTree;
use railnav_util::PreferenceStore;

pub use app::{App, MOBILE_BREAKPOINT, RowTarget, SidebarRow};

/// Runs the TUI until the user quits.
///
/// # Errors
///
/// Terminal setup, draw, or input failures.
pub fn run(store: Rc<dyn PreferenceStore>, tree: NavigationTree, initial_path: &str) -> Result<()> {
    let mut app = App::new(store, tree, initial_path);
    runtime::run_app(&mut app)
}
