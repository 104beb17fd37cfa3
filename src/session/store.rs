use crate::session::family::Identity;
use crate::session::pantry::PantrySelection;

pub const DEFAULT_LOCALE: &str = "en";

/// Ephemeral per-session state: current identity, pantry selection and
/// display-language preference.
///
/// Writes are synchronous and durable for the lifetime of the session, so a
/// `set` followed by the matching `get` in the same control flow always
/// observes the new value. All session mutations go through this trait;
/// components never keep private copies of session state.
pub trait SessionStore {
    fn set_identity(&mut self, identity: Identity);
    fn identity(&self) -> Option<&Identity>;

    fn set_pantry(&mut self, pantry: PantrySelection);
    /// Returns the stored selection, or the default (empty set, Dinner) when
    /// nothing has been stored yet. Never absent, so callers need not
    /// null-check before reading.
    fn pantry(&self) -> PantrySelection;

    fn set_locale(&mut self, locale: String);
    fn locale(&self) -> String;

    /// Removes identity, pantry and locale in one call. Called exactly once
    /// on logout and nowhere else; there are no partial clears.
    fn clear(&mut self);
}

/// In-memory session store, one per live session.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    identity: Option<Identity>,
    pantry: Option<PantrySelection>,
    locale: Option<String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        MemorySessionStore::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    fn set_pantry(&mut self, pantry: PantrySelection) {
        self.pantry = Some(pantry);
    }

    fn pantry(&self) -> PantrySelection {
        self.pantry.clone().unwrap_or_default()
    }

    fn set_locale(&mut self, locale: String) {
        self.locale = Some(locale);
    }

    fn locale(&self) -> String {
        self.locale
            .clone()
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
    }

    fn clear(&mut self) {
        self.identity = None;
        self.pantry = None;
        self.locale = None;
    }
}
