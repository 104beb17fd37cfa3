use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::api_connection::connection::{MealApi, MealApiError};
use crate::api_connection::endpoints::SaveFamilyRequest;
use crate::session::pantry::PantrySelection;
use crate::session::store::SessionStore;

/// One member of the household, as captured by the family profile form.
///
/// Optional fields are free text; an empty string and an absent field mean the
/// same thing to the meal-generation service.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FamilyMember {
    pub id: String,
    pub name: String,
    pub birthday: String,
    pub dietary_preference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_goals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dislikes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_conditions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub religious_preferences: Option<String>,
}

/// The authenticated account record cached for the active session.
///
/// The backing account service owns this data; the session holds a copy that
/// is refreshed on every acknowledged save. The pantry snapshot travels with
/// the account so a fresh login starts from the last saved selection, but the
/// session store's pantry slot is authoritative while the session is live.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Identity {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub family: Vec<FamilyMember>,
    #[serde(default)]
    pub pantry: PantrySelection,
}

impl Identity {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Identity {
            email: email.into(),
            name: name.into(),
            family: Vec::new(),
            pantry: PantrySelection::default(),
        }
    }

    /// Inserts a new member or replaces an existing one in place.
    ///
    /// A member arriving with an empty `id` is treated as a new record and
    /// gets a freshly generated identifier. A member with a known `id`
    /// replaces the record holding that id; an unknown non-empty id is
    /// appended as-is. Returns the id under which the member was stored.
    pub fn upsert_member(&mut self, mut member: FamilyMember) -> String {
        if member.id.is_empty() {
            member.id = self.fresh_member_id();
        }
        let id = member.id.clone();
        match self.family.iter_mut().find(|m| m.id == id) {
            Some(existing) => *existing = member,
            None => self.family.push(member),
        }
        id
    }

    /// Removes the member with the given id. Returns whether a record was removed.
    pub fn remove_member(&mut self, id: &str) -> bool {
        let before = self.family.len();
        self.family.retain(|m| m.id != id);
        self.family.len() != before
    }

    pub fn find_member(&self, id: &str) -> Option<&FamilyMember> {
        self.family.iter().find(|m| m.id == id)
    }

    // Millisecond timestamp rendered as a string, bumped on collision so two
    // inserts landing in the same millisecond still get distinct ids.
    fn fresh_member_id(&self) -> String {
        let mut candidate = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        while self.family.iter().any(|m| m.id == candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }
}

/// Whole age in years on `today`, for the member card display.
/// Returns `None` when the birthday string is not a valid `YYYY-MM-DD` date.
pub fn age_on(birthday: &str, today: NaiveDate) -> Option<i32> {
    let birth = NaiveDate::parse_from_str(birthday.trim(), "%Y-%m-%d").ok()?;
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    Some(age)
}

/// Saves the edited roster through the family persistence service and, only
/// on an acknowledged success, refreshes the cached identity in the session
/// store. On failure the store keeps the last acknowledged state.
pub async fn persist_family(
    api: &dyn MealApi,
    store: &mut dyn SessionStore,
    identity: Identity,
) -> Result<(), MealApiError> {
    let request = SaveFamilyRequest {
        email: identity.email.clone(),
        family: identity.family.clone(),
    };
    api.save_family(&request).await?;
    store.set_identity(identity);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, name: &str) -> FamilyMember {
        FamilyMember {
            id: id.to_string(),
            name: name.to_string(),
            birthday: "1990-06-15".to_string(),
            dietary_preference: "veg".to_string(),
            health_goals: None,
            dislikes: None,
            allergies: None,
            medical_conditions: None,
            religious_preferences: None,
        }
    }

    #[test]
    fn test_upsert_generates_unique_ids() {
        let mut identity = Identity::new("a@b.c", "A");
        let first = identity.upsert_member(member("", "Asha"));
        let second = identity.upsert_member(member("", "Ravi"));
        assert_ne!(first, second);
        assert_eq!(identity.family.len(), 2);
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut identity = Identity::new("a@b.c", "A");
        let id = identity.upsert_member(member("", "Asha"));
        let mut edited = member(&id, "Asha Devi");
        edited.dislikes = Some("okra".to_string());
        let stored_id = identity.upsert_member(edited);
        assert_eq!(stored_id, id);
        assert_eq!(identity.family.len(), 1);
        assert_eq!(identity.find_member(&id).unwrap().name, "Asha Devi");
        assert_eq!(
            identity.find_member(&id).unwrap().dislikes.as_deref(),
            Some("okra")
        );
    }

    #[test]
    fn test_remove_member_by_id() {
        let mut identity = Identity::new("a@b.c", "A");
        let id = identity.upsert_member(member("", "Asha"));
        assert!(identity.remove_member(&id));
        assert!(!identity.remove_member(&id));
        assert!(identity.family.is_empty());
    }

    #[test]
    fn test_age_on_counts_whole_years() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 14).unwrap();
        assert_eq!(age_on("1990-06-15", today), Some(35)); // birthday tomorrow
        let today = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        assert_eq!(age_on("1990-06-15", today), Some(36)); // birthday today
        assert_eq!(age_on("not-a-date", today), None);
    }
}
