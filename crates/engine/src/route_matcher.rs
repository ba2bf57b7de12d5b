//! Activation checks for navigation entries.
//!
//! These are evaluated on every read and never cached: the path changes on
//! every navigation and the checks are cheap string comparisons.

use railnav_types::{ActivationPredicate, NavigationEntry, SimpleLink};

/// Evaluate `predicate` against `path`.
pub fn is_active(path: &str, predicate: &ActivationPredicate) -> bool {
    match predicate {
        ActivationPredicate::Exact(expected) => path == expected,
        ActivationPredicate::Prefix(prefix) => path.starts_with(prefix.as_str()),
        ActivationPredicate::Contains(needle) => path.contains(needle.as_str()),
        ActivationPredicate::Any(predicates) => predicates.iter().any(|inner| is_active(path, inner)),
        ActivationPredicate::All(predicates) => predicates.iter().all(|inner| is_active(path, inner)),
        ActivationPredicate::Never => false,
    }
}

/// A link is active on an exact match of its target unless it carries its own predicate.
pub fn link_is_active(path: &str, link: &SimpleLink) -> bool {
    match &link.active_when {
        Some(predicate) => is_active(path, predicate),
        None => path == link.path,
    }
}

pub fn entry_is_active(path: &str, entry: &NavigationEntry) -> bool {
    match entry {
        NavigationEntry::Link(link) => link_is_active(path, link),
        NavigationEntry::Group(group) => is_active(path, &group.active_when),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use railnav_types::NavGroup;

    #[test]
    fn leaf_predicates() {
        assert!(is_active("/", &ActivationPredicate::exact("/")));
        assert!(!is_active("/dashboard", &ActivationPredicate::exact("/")));

        assert!(is_active("/settings/account", &ActivationPredicate::prefix("/settings")));
        assert!(!is_active("/account/settings", &ActivationPredicate::prefix("/settings")));

        assert!(is_active("/community/meetups-post", &ActivationPredicate::contains("meetups")));
        assert!(!is_active("/calendar", &ActivationPredicate::contains("meetups")));

        assert!(!is_active("/anything", &ActivationPredicate::Never));
    }

    #[test]
    fn combinators() {
        let dashboard = ActivationPredicate::any([ActivationPredicate::exact("/"), ActivationPredicate::contains("dashboard")]);
        assert!(is_active("/", &dashboard));
        assert!(is_active("/analytics/dashboard", &dashboard));
        assert!(!is_active("/tasks/list", &dashboard));

        let both = ActivationPredicate::All(vec![ActivationPredicate::prefix("/utility"), ActivationPredicate::contains("faq")]);
        assert!(is_active("/utility/faqs", &both));
        assert!(!is_active("/utility/changelog", &both));

        assert!(!is_active("/", &ActivationPredicate::Any(vec![])));
        assert!(is_active("/", &ActivationPredicate::All(vec![])));
    }

    #[test]
    fn links_default_to_exact_match() {
        let link = SimpleLink::new("/settings/account", "My Account");
        assert!(link_is_active("/settings/account", &link));
        assert!(!link_is_active("/settings/account/edit", &link));

        let messages = SimpleLink::new("/messages", "Messages").active_when(ActivationPredicate::contains("messages"));
        assert!(link_is_active("/messages/42", &messages));
    }

    #[test]
    fn group_entries_use_group_predicate() {
        let entry = NavigationEntry::Group(
            NavGroup::new("Tasks", ActivationPredicate::contains("tasks")).with_link(SimpleLink::new("/tasks/list", "List")),
        );
        assert!(entry_is_active("/tasks/kanban", &entry));
        assert!(!entry_is_active("/inbox", &entry));
    }
}
