use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A person the operator can target for analysis.
///
/// `id` is the thread identifier; unresolved search hits have none.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    pub id: Option<String>,
    pub username: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub last_chat: String,
    pub rizz_score: u8,
    #[serde(default)]
    pub message_count: u32,
}

/// Identity of a contact within one listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContactKey {
    Thread(String),
    Username(String),
}

impl Contact {
    /// Contact with only a username; every other field is empty or zero.
    #[must_use]
    pub fn named(username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            avatar: String::new(),
            last_chat: String::new(),
            rizz_score: 0,
            message_count: 0,
        }
    }

    /// Listing key: the thread id when present, else the username.
    #[must_use]
    pub fn key(&self) -> ContactKey {
        match &self.id {
            Some(id) if !id.is_empty() => ContactKey::Thread(id.clone()),
            _ => ContactKey::Username(self.username.clone()),
        }
    }

    /// Whether the contact points at a concrete thread.
    #[must_use]
    pub fn has_thread(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// Drop contacts whose key was already seen, and any username repeated within
/// the listing. The first occurrence wins and order is preserved.
#[must_use]
pub fn dedup_contacts(contacts: Vec<Contact>) -> Vec<Contact> {
    let mut seen_keys = HashSet::new();
    let mut seen_usernames = HashSet::new();
    contacts
        .into_iter()
        .filter(|contact| {
            let fresh_key = seen_keys.insert(contact.key());
            let fresh_name = seen_usernames.insert(contact.username.clone());
            fresh_key && fresh_name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn contact(id: Option<&str>, username: &str) -> Contact {
        Contact {
            id: id.map(str::to_string),
            ..Contact::named(username)
        }
    }

    #[test]
    fn key_prefers_thread_id() {
        assert_eq!(
            contact(Some("t1"), "sam").key(),
            ContactKey::Thread("t1".into())
        );
        assert_eq!(contact(None, "sam").key(), ContactKey::Username("sam".into()));
        assert_eq!(
            contact(Some(""), "sam").key(),
            ContactKey::Username("sam".into())
        );
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let listing = vec![
            contact(Some("t1"), "sam"),
            contact(Some("t2"), "alex"),
            contact(Some("t1"), "sam_again"),
            contact(None, "alex"),
            contact(None, "kim"),
        ];
        let names: Vec<String> = dedup_contacts(listing)
            .into_iter()
            .map(|c| c.username)
            .collect();
        assert_eq!(names, vec!["sam", "alex", "kim"]);
    }
}
