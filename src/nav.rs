use crate::session::store::SessionStore;

/// Verdict of the pre-navigation session check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The view may initialize.
    Allow,
    /// No identity is present; the caller must abort initialization and send
    /// the user to the entry view.
    RedirectToEntry,
}

/// Runs before any other component on a view. A session-requiring view with
/// no stored identity is redirected; everything else proceeds.
pub fn guard(store: &dyn SessionStore, requires_session: bool) -> GuardOutcome {
    if requires_session && store.identity().is_none() {
        GuardOutcome::RedirectToEntry
    } else {
        GuardOutcome::Allow
    }
}

/// Clears the whole session and yields the entry-view redirect. The single
/// place `SessionStore::clear` is invoked.
pub fn logout(store: &mut dyn SessionStore) -> GuardOutcome {
    store.clear();
    GuardOutcome::RedirectToEntry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::family::Identity;
    use crate::session::pantry::PantrySelection;
    use crate::session::store::MemorySessionStore;

    #[test]
    fn test_guard_redirects_without_identity() {
        let store = MemorySessionStore::new();
        assert_eq!(guard(&store, true), GuardOutcome::RedirectToEntry);
        assert_eq!(guard(&store, false), GuardOutcome::Allow);
    }

    #[test]
    fn test_guard_allows_with_identity() {
        let mut store = MemorySessionStore::new();
        store.set_identity(Identity::new("a@b.c", "A"));
        assert_eq!(guard(&store, true), GuardOutcome::Allow);
        assert_eq!(guard(&store, false), GuardOutcome::Allow);
    }

    #[test]
    fn test_logout_clears_and_redirects() {
        let mut store = MemorySessionStore::new();
        store.set_identity(Identity::new("a@b.c", "A"));
        let mut pantry = PantrySelection::default();
        pantry.ingredients.insert("Onion".to_string());
        store.set_pantry(pantry);

        assert_eq!(logout(&mut store), GuardOutcome::RedirectToEntry);
        assert!(store.identity().is_none());
        assert_eq!(store.pantry(), PantrySelection::default());
        assert_eq!(guard(&store, true), GuardOutcome::RedirectToEntry);
    }
}
