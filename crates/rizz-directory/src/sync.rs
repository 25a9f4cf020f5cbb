use std::sync::Arc;

use rizz_client::{Backend, RawSearchHit};
use rizz_config::DirectoryConfig;
use rizz_core::{ChatMessage, Contact, DirectoryMode, Session, dedup_contacts};

use crate::{
    error::DirectoryError,
    gate::{ListingGate, ListingTicket},
    mapping,
};

/// Outcome of a gated listing request.
#[derive(Debug)]
pub enum Listing {
    /// The request still held the latest ticket when it resolved.
    Current {
        ticket: ListingTicket,
        result: Result<Vec<Contact>, DirectoryError>,
    },
    /// A later request was issued first. The result was discarded.
    Superseded,
}

/// A contact together with its recent message window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadView {
    pub contact: Contact,
    pub messages: Vec<ChatMessage>,
}

/// Directory sync engine over a [`Backend`].
pub struct DirectorySync {
    backend: Arc<dyn Backend>,
    config: DirectoryConfig,
    gate: ListingGate,
}

impl DirectorySync {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, config: DirectoryConfig) -> Self {
        Self {
            backend,
            config,
            gate: ListingGate::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Listings
    // ---------------------------------------------------------------------

    /// Active inbox contacts, de-duplicated.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Backend`] if `/list_contacts` fails.
    pub async fn load_inbox(&self, session: &Session) -> Result<Vec<Contact>, DirectoryError> {
        let raw = self
            .backend
            .list_contacts(session.token(), self.config.page_size)
            .await
            .map_err(DirectoryError::backend("load inbox"))?;
        let score = self.config.inbox_placeholder_score;
        Ok(dedup_contacts(
            raw.into_iter()
                .map(|contact| mapping::contact_from_inbox(contact, score))
                .collect(),
        ))
    }

    /// Pending-request threads as contacts. Threads without participants are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Backend`] if `/list_pending_chats` fails.
    pub async fn load_pending(&self, session: &Session) -> Result<Vec<Contact>, DirectoryError> {
        let threads = self
            .backend
            .list_pending_chats(session.token(), self.config.page_size)
            .await
            .map_err(DirectoryError::backend("load pending chats"))?;
        let score = self.config.pending_placeholder_score;
        let contacts: Vec<Contact> = threads
            .iter()
            .filter_map(|thread| mapping::contact_from_thread(thread, score))
            .collect();
        if contacts.len() < threads.len() {
            tracing::debug!(
                skipped = threads.len() - contacts.len(),
                "pending threads without participants skipped"
            );
        }
        Ok(dedup_contacts(contacts))
    }

    /// Base listing for `mode`.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying load.
    pub async fn load(
        &self,
        session: &Session,
        mode: DirectoryMode,
    ) -> Result<Vec<Contact>, DirectoryError> {
        match mode {
            DirectoryMode::Inbox => self.load_inbox(session).await,
            DirectoryMode::Pending => self.load_pending(session).await,
        }
    }

    /// Search threads and users. A blank query falls back to the base
    /// listing for `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Backend`] if the search or base load fails.
    pub async fn search(
        &self,
        session: &Session,
        mode: DirectoryMode,
        query: &str,
    ) -> Result<Vec<Contact>, DirectoryError> {
        let query = query.trim();
        if query.is_empty() {
            return self.load(session, mode).await;
        }

        let hits = self
            .backend
            .search_threads(session.token(), query)
            .await
            .map_err(DirectoryError::backend("search"))?;
        let score = self.config.search_placeholder_score;
        Ok(dedup_contacts(
            hits.into_iter()
                .filter_map(|hit| match hit {
                    RawSearchHit::Thread(thread) => mapping::contact_from_thread(&thread, score),
                    RawSearchHit::User(user) => Some(mapping::contact_from_user(user, score)),
                })
                .collect(),
        ))
    }

    // ---------------------------------------------------------------------
    // Gated listings
    // ---------------------------------------------------------------------

    /// Run a listing request under a fresh ticket.
    ///
    /// Errors are gated exactly like successes: a stale failure is
    /// [`Listing::Superseded`], never surfaced.
    pub async fn sync(&self, session: &Session, mode: DirectoryMode, query: &str) -> Listing {
        let ticket = self.gate.issue();
        let result = self.search(session, mode, query).await;
        if self.gate.is_current(ticket) {
            if let Err(error) = &result {
                tracing::warn!(%error, mode = mode.as_str(), "directory listing failed");
            }
            Listing::Current { ticket, result }
        } else {
            tracing::debug!(
                generation = ticket.generation(),
                mode = mode.as_str(),
                "listing superseded"
            );
            Listing::Superseded
        }
    }

    /// Whether `ticket` is still the latest issued.
    #[must_use]
    pub fn is_current(&self, ticket: ListingTicket) -> bool {
        self.gate.is_current(ticket)
    }

    /// Supersede every in-flight listing, e.g. when leaving the directory.
    pub fn invalidate(&self) {
        self.gate.issue();
    }

    // ---------------------------------------------------------------------
    // Threads
    // ---------------------------------------------------------------------

    /// Find or create the thread with exactly these participants.
    ///
    /// Ids are sorted and de-duplicated first, so any ordering of the same
    /// set resolves to the same thread.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::NoParticipants`] for an empty set, before any request.
    /// - [`DirectoryError::Backend`] if the backend call fails or the thread
    ///   has no participants.
    pub async fn resolve_or_create_thread(
        &self,
        session: &Session,
        participant_ids: &[u64],
    ) -> Result<Contact, DirectoryError> {
        let mut ids = participant_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Err(DirectoryError::NoParticipants);
        }

        let thread = self
            .backend
            .thread_by_participants(session.token(), &ids)
            .await
            .map_err(DirectoryError::backend("resolve thread"))?;
        mapping::contact_from_thread(&thread, self.config.search_placeholder_score).ok_or_else(
            || DirectoryError::Backend {
                operation: "resolve thread",
                source: rizz_client::ClientError::Parse(format!(
                    "thread {} has no participants",
                    thread.id
                )),
            },
        )
    }

    /// Fetch the recent message window for `contact`.
    ///
    /// Never fails: a contact without a thread id, or a failed fetch, yields
    /// an empty window.
    pub async fn open_thread(&self, session: &Session, contact: Contact) -> ThreadView {
        let Some(thread_id) = contact.id.clone().filter(|id| !id.is_empty()) else {
            return ThreadView {
                contact,
                messages: Vec::new(),
            };
        };

        let messages = match self
            .backend
            .list_messages(session.token(), &thread_id, self.config.message_window)
            .await
        {
            Ok(raw) => raw
                .into_iter()
                .map(|message| mapping::chat_message(message, &contact.username))
                .collect(),
            Err(error) => {
                tracing::warn!(%error, thread_id, "failed to load messages; showing empty thread");
                Vec::new()
            }
        };
        ThreadView { contact, messages }
    }
}
