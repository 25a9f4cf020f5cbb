//! Wire → domain mapping for directory listings.

use rizz_client::{RawContact, RawMessage, RawThread, RawUser};
use rizz_core::{ChatMessage, Contact, clamp_score};

/// Sender label for messages written by the operator.
pub const OWN_SENDER: &str = "You";

/// Inbox contact: server score when present, else `placeholder_score`.
#[must_use]
pub fn contact_from_inbox(raw: RawContact, placeholder_score: u8) -> Contact {
    Contact {
        id: raw.id.filter(|id| !id.is_empty()),
        username: raw.username,
        avatar: raw.avatar.unwrap_or_default(),
        last_chat: raw.last_chat.unwrap_or_default(),
        rizz_score: raw
            .rizz_score
            .and_then(clamp_score)
            .unwrap_or(placeholder_score),
        message_count: raw.message_count.unwrap_or_default(),
    }
}

/// Contact for a thread, taken from its first participant. `None` when the
/// thread has no participants.
#[must_use]
pub fn contact_from_thread(thread: &RawThread, placeholder_score: u8) -> Option<Contact> {
    let user = thread.users.first()?;
    Some(Contact {
        id: Some(thread.id.clone()).filter(|id| !id.is_empty()),
        username: user.username.clone(),
        avatar: user.profile_pic_url.clone().unwrap_or_default(),
        last_chat: thread
            .last_activity_at
            .clone()
            .or_else(|| thread.thread_title.clone())
            .unwrap_or_default(),
        rizz_score: placeholder_score,
        message_count: u32::try_from(thread.messages.len()).unwrap_or(u32::MAX),
    })
}

/// Unresolved contact for a bare user hit. Carries no thread id.
#[must_use]
pub fn contact_from_user(user: RawUser, placeholder_score: u8) -> Contact {
    Contact {
        avatar: user.profile_pic_url.unwrap_or_default(),
        rizz_score: placeholder_score,
        ..Contact::named(user.username)
    }
}

#[must_use]
pub fn chat_message(raw: RawMessage, contact_username: &str) -> ChatMessage {
    let sender = if raw.is_sent_by_viewer.unwrap_or(false) {
        OWN_SENDER.to_string()
    } else {
        contact_username.to_string()
    };
    ChatMessage {
        sender,
        text: raw.text.unwrap_or_default(),
        time: raw.timestamp.unwrap_or_default(),
        sentiment: String::new(),
    }
}
