use serde::{Deserialize, Serialize};

/// A menu item the customer starred for quick reordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteItem {
    pub name: String,
    /// Display price, e.g. `R$ 59,90`.
    #[serde(rename = "price")]
    pub price_text: String,
    #[serde(default)]
    pub description: String,
}

/// Name and phone saved from an earlier order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedContact {
    pub name: String,
    pub phone: String,
}

/// Everything the assistant remembers about a device between visits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub favorites: Vec<FavoriteItem>,
    #[serde(default)]
    pub sound_muted: bool,
    #[serde(default)]
    pub welcome_played: bool,
}

impl CustomerProfile {
    /// Saved contact, present only when both name and phone are known.
    #[must_use]
    pub fn saved_contact(&self) -> Option<SavedContact> {
        let name = self.name.as_deref().filter(|n| !n.is_empty())?;
        let phone = self.phone.as_deref().filter(|p| !p.is_empty())?;
        Some(SavedContact {
            name: name.to_owned(),
            phone: phone.to_owned(),
        })
    }

    pub fn remember_contact(&mut self, name: &str, phone: &str) {
        self.name = Some(name.to_owned());
        self.phone = Some(phone.to_owned());
    }

    #[must_use]
    pub fn is_favorite(&self, name: &str) -> bool {
        self.favorites.iter().any(|fav| fav.name == name)
    }

    /// Stars the item, or unstars it when already present.
    /// Returns `true` when the item was added.
    pub fn toggle_favorite(&mut self, item: FavoriteItem) -> bool {
        if let Some(pos) = self.favorites.iter().position(|fav| fav.name == item.name) {
            self.favorites.remove(pos);
            false
        } else {
            self.favorites.push(item);
            true
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn favorite(name: &str) -> FavoriteItem {
        FavoriteItem {
            name: name.to_owned(),
            price_text: "R$ 59,90".to_owned(),
            description: String::new(),
        }
    }

    #[test]
    fn saved_contact_requires_both_fields() {
        let mut profile = CustomerProfile::default();
        assert!(profile.saved_contact().is_none());

        profile.name = Some("Maria".to_owned());
        assert!(profile.saved_contact().is_none());

        profile.phone = Some("11 98765-4321".to_owned());
        let contact = profile.saved_contact().unwrap();
        assert_eq!(contact.name, "Maria");
        assert_eq!(contact.phone, "11 98765-4321");
    }

    #[test]
    fn empty_strings_do_not_count_as_saved() {
        let profile = CustomerProfile {
            name: Some(String::new()),
            phone: Some("11 98765-4321".to_owned()),
            ..CustomerProfile::default()
        };

        assert!(profile.saved_contact().is_none());
    }

    #[test]
    fn toggle_favorite_adds_then_removes() {
        let mut profile = CustomerProfile::default();

        assert!(profile.toggle_favorite(favorite("Calabresa")));
        assert!(profile.is_favorite("Calabresa"));

        assert!(!profile.toggle_favorite(favorite("Calabresa")));
        assert!(!profile.is_favorite("Calabresa"));
        assert!(profile.favorites.is_empty());
    }

    #[test]
    fn profile_tolerates_missing_fields() {
        let profile: CustomerProfile = serde_json::from_str(r#"{"name": "Maria"}"#).unwrap();

        assert_eq!(profile.name.as_deref(), Some("Maria"));
        assert!(profile.favorites.is_empty());
        assert!(!profile.sound_muted);
    }
}
