use std::fmt;
use std::rc::Rc;

use railnav_types::SIDEBAR_EXPANDED_KEY;
use railnav_util::{PreferenceStore, PreferencesError};

/// Interpret a stored `sidebar-expanded` value. Only the literal `"true"` is true.
pub fn parse_expanded(raw: Option<&str>) -> bool {
    raw == Some("true")
}

/// The persisted desktop expansion flag.
#[derive(Clone)]
pub struct ExpandedPreference {
    store: Rc<dyn PreferenceStore>,
}

impl fmt::Debug for ExpandedPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpandedPreference").field("value", &self.load()).finish()
    }
}

impl ExpandedPreference {
    pub fn new(store: Rc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    /// Absent, empty, or unrecognised values all read as `false`.
    pub fn load(&self) -> bool {
        parse_expanded(self.store.get(SIDEBAR_EXPANDED_KEY).as_deref())
    }

    pub fn save(&self, expanded: bool) -> Result<(), PreferencesError> {
        self.store.set(SIDEBAR_EXPANDED_KEY, if expanded { "true" } else { "false" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use railnav_util::UserPreferences;

    #[test]
    fn only_literal_true_parses_true() {
        assert!(parse_expanded(Some("true")));
        for raw in [None, Some(""), Some("false"), Some("TRUE"), Some(" true"), Some("1"), Some("yes")] {
            assert!(!parse_expanded(raw), "{raw:?} should read as false");
        }
    }

    #[test]
    fn save_writes_literal_strings() {
        let store = Rc::new(UserPreferences::ephemeral());
        let preference = ExpandedPreference::new(store.clone());
        assert!(!preference.load());

        preference.save(true).unwrap();
        assert_eq!(store.get(SIDEBAR_EXPANDED_KEY).as_deref(), Some("true"));
        assert!(preference.load());

        preference.save(false).unwrap();
        assert_eq!(store.get(SIDEBAR_EXPANDED_KEY).as_deref(), Some("false"));
        assert!(!preference.load());
    }
}
