use std::fmt;

/// Opaque handle for an element in the host document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Keys the engine distinguishes. Everything else collapses into `Other`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Char(char),
    Other(String),
}

/// Global input signal delivered to document-level listeners.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomEvent {
    /// Pointer click. `target` is `None` when the click landed on no element
    /// (for example, outside every rendered region).
    Click { target: Option<ElementId> },
    /// Key press.
    KeyDown { key: Key },
}

impl DomEvent {
    pub fn click(target: impl Into<Option<ElementId>>) -> Self {
        Self::Click { target: target.into() }
    }

    pub fn key(key: Key) -> Self {
        Self::KeyDown { key }
    }

    /// Listener bucket this event is delivered to.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Click { .. } => EventKind::Click,
            Self::KeyDown { .. } => EventKind::KeyDown,
        }
    }
}

/// Listener categories on the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_follows_variant() {
        assert_eq!(DomEvent::click(ElementId(3)).kind(), EventKind::Click);
        assert_eq!(DomEvent::click(None).kind(), EventKind::Click);
        assert_eq!(DomEvent::key(Key::Escape).kind(), EventKind::KeyDown);
    }
}
