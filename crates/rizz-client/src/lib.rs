//! # rizz-client
//!
//! Backend client for rizz.
//!
//! [`Backend`] is the seam every orchestration crate talks through. The
//! production implementation is [`HttpBackend`] (reqwest against the
//! configured base URL); tests use the in-memory `StubBackend` behind the
//! `test-util` feature.
//!
//! Every authenticated call takes the session token explicitly. Nothing in
//! this crate caches a session.

mod error;
mod http;
mod http_backend;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod wire;

pub use error::ClientError;
pub use http_backend::HttpBackend;
pub use wire::{AnalyzeRequest, RawContact, RawMessage, RawSearchHit, RawThread, RawUser};

use async_trait::async_trait;

/// Remote operations exposed by the rizz backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Exchange credentials for a session token.
    async fn login(&self, username: &str, password: &str) -> Result<String, ClientError>;

    /// Active inbox contacts.
    async fn list_contacts(&self, token: &str, amount: u32)
    -> Result<Vec<RawContact>, ClientError>;

    /// Threads waiting in the pending (request) inbox.
    async fn list_pending_chats(
        &self,
        token: &str,
        amount: u32,
    ) -> Result<Vec<RawThread>, ClientError>;

    /// Threads and users matching `query`.
    async fn search_threads(
        &self,
        token: &str,
        query: &str,
    ) -> Result<Vec<RawSearchHit>, ClientError>;

    /// Find the thread with exactly these participants, creating it if needed.
    async fn thread_by_participants(
        &self,
        token: &str,
        user_ids: &[u64],
    ) -> Result<RawThread, ClientError>;

    /// Most recent `amount` messages of a thread.
    async fn list_messages(
        &self,
        token: &str,
        thread_id: &str,
        amount: u32,
    ) -> Result<Vec<RawMessage>, ClientError>;

    /// Run the remote analysis. The payload is returned untyped; see
    /// `rizz_analysis::adapt`.
    async fn analyze_contact(
        &self,
        request: &AnalyzeRequest,
    ) -> Result<serde_json::Value, ClientError>;

    /// Send a direct message to `username`.
    async fn send_message(
        &self,
        token: &str,
        username: &str,
        message: &str,
    ) -> Result<(), ClientError>;
}
