//! Per-group accordion state.
//!
//! A group's open flag is seeded once, when the group is mounted, from
//! whether the group is active for the mount-time path. After that only an
//! explicit toggle changes it; navigation never re-seeds it. Groups are
//! independent of one another.

use railnav_types::GroupId;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    Closed,
    Open,
}

impl GroupState {
    fn flipped(self) -> Self {
        match self {
            Self::Closed => Self::Open,
            Self::Open => Self::Closed,
        }
    }
}

/// Outcome of a header click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupToggled {
    pub id: GroupId,
    /// Open flag after the toggle.
    pub open: bool,
    /// The rail must be wide for a sub-menu to make sense, so every toggle asks
    /// the panel to expand.
    pub request_expanded: bool,
}

#[derive(Debug, Clone)]
pub struct AccordionGroupController {
    id: GroupId,
    state: GroupState,
}

impl AccordionGroupController {
    /// Mount a group. Call once per group lifetime.
    pub fn initialize(id: GroupId, initial_active: bool) -> Self {
        let state = if initial_active { GroupState::Open } else { GroupState::Closed };
        debug!(group = %id, ?state, "group mounted");
        Self { id, state }
    }

    pub fn toggle(&mut self) -> GroupToggled {
        self.state = self.state.flipped();
        debug!(group = %self.id, state = ?self.state, "group toggled");
        GroupToggled {
            id: self.id.clone(),
            open: self.is_open(),
            request_expanded: true,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == GroupState::Open
    }

    pub fn state(&self) -> GroupState {
        self.state
    }

    pub fn id(&self) -> &GroupId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_from_initial_activity() {
        assert!(AccordionGroupController::initialize(GroupId::new("a"), true).is_open());
        assert!(!AccordionGroupController::initialize(GroupId::new("a"), false).is_open());
    }

    #[test]
    fn toggle_alternates_and_requests_expansion() {
        let mut group = AccordionGroupController::initialize(GroupId::new("settings"), false);

        let first = group.toggle();
        assert!(first.open);
        assert!(first.request_expanded);
        assert_eq!(group.state(), GroupState::Open);

        let second = group.toggle();
        assert!(!second.open);
        assert!(second.request_expanded);
        assert_eq!(second.id.as_str(), "settings");
        assert_eq!(group.state(), GroupState::Closed);
    }
}
