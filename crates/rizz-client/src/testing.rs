//! Deterministic in-memory [`Backend`] for tests.
//!
//! Responses are configured up front with builder methods. Every call is
//! recorded with the token it carried. A request can be held back with a
//! [`Notify`] gate so tests can control the order in which concurrent calls
//! resolve:
//!
//! ```ignore
//! let stub = StubBackend::new().with_search("a", vec![...]);
//! let gate = stub.gate("search:a");
//! // ... issue the search, then release it later:
//! gate.notify_one();
//! ```
//!
//! Gate keys are the endpoint name (`"list_contacts"`, `"analyze_contact"`,
//! ...) or `"search:<query>"` for a specific search.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use crate::{
    AnalyzeRequest, Backend, ClientError, RawContact, RawMessage, RawSearchHit, RawThread, RawUser,
};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubCall {
    pub endpoint: &'static str,
    /// Session token the call carried (`None` for login).
    pub token: Option<String>,
    /// Endpoint-specific argument (query, thread id, username, ...).
    pub detail: String,
}

#[derive(Default)]
struct StubState {
    accounts: HashMap<String, (String, String)>,
    contacts: Vec<RawContact>,
    pending: Vec<RawThread>,
    searches: HashMap<String, Vec<RawSearchHit>>,
    messages: HashMap<String, Vec<RawMessage>>,
    analysis: Option<Value>,
    failures: HashMap<&'static str, ClientError>,
    threads_by_participants: HashMap<Vec<u64>, String>,
    calls: Vec<StubCall>,
}

/// In-memory backend with per-request gates.
#[derive(Default)]
pub struct StubBackend {
    state: Mutex<StubState>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl StubBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    /// Accept `username`/`password` and issue `token`.
    #[must_use]
    pub fn with_account(self, username: &str, password: &str, token: &str) -> Self {
        self.lock()
            .accounts
            .insert(username.to_string(), (password.to_string(), token.to_string()));
        self
    }

    #[must_use]
    pub fn with_contacts(self, contacts: Vec<RawContact>) -> Self {
        self.lock().contacts = contacts;
        self
    }

    #[must_use]
    pub fn with_pending(self, threads: Vec<RawThread>) -> Self {
        self.lock().pending = threads;
        self
    }

    #[must_use]
    pub fn with_search(self, query: &str, hits: Vec<RawSearchHit>) -> Self {
        self.lock().searches.insert(query.to_string(), hits);
        self
    }

    #[must_use]
    pub fn with_messages(self, thread_id: &str, messages: Vec<RawMessage>) -> Self {
        self.lock().messages.insert(thread_id.to_string(), messages);
        self
    }

    #[must_use]
    pub fn with_analysis(self, payload: Value) -> Self {
        self.lock().analysis = Some(payload);
        self
    }

    /// Make every call to `endpoint` fail with `error`.
    #[must_use]
    pub fn failing(self, endpoint: &'static str, error: ClientError) -> Self {
        self.fail(endpoint, error);
        self
    }

    /// Make every later call to `endpoint` fail with `error`.
    pub fn fail(&self, endpoint: &'static str, error: ClientError) {
        self.lock().failures.insert(endpoint, error);
    }

    /// Replace the inbox served by `list_contacts`.
    pub fn set_contacts(&self, contacts: Vec<RawContact>) {
        self.lock().contacts = contacts;
    }

    // -----------------------------------------------------------------------
    // Gates and inspection
    // -----------------------------------------------------------------------

    /// Hold every request matching `key` until the returned gate is notified.
    ///
    /// `notify_one` stores a permit, so releasing before the request arrives
    /// is fine.
    pub fn gate(&self, key: &str) -> Arc<Notify> {
        let mut gates = self.gates.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        Arc::clone(gates.entry(key.to_string()).or_default())
    }

    /// Snapshot of every call made so far.
    pub fn calls(&self) -> Vec<StubCall> {
        self.lock().calls.clone()
    }

    /// Calls made to one endpoint.
    pub fn calls_to(&self, endpoint: &str) -> Vec<StubCall> {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.endpoint == endpoint)
            .cloned()
            .collect()
    }

    /// Tokens carried by authenticated calls, in call order.
    pub fn tokens_seen(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| call.token.clone())
            .collect()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn existing_gate(&self, key: &str) -> Option<Arc<Notify>> {
        self.gates
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Record the call, wait on its gate, then report a configured failure.
    async fn enter(
        &self,
        endpoint: &'static str,
        gate_key: &str,
        token: Option<&str>,
        detail: &str,
    ) -> Result<(), ClientError> {
        self.lock().calls.push(StubCall {
            endpoint,
            token: token.map(str::to_string),
            detail: detail.to_string(),
        });
        if let Some(gate) = self.existing_gate(gate_key) {
            gate.notified().await;
        }
        match self.lock().failures.get(endpoint) {
            Some(error) => Err(clone_error(error)),
            None => Ok(()),
        }
    }
}

fn clone_error(error: &ClientError) -> ClientError {
    match error {
        ClientError::Api { status, message } => ClientError::Api {
            status: *status,
            message: message.clone(),
        },
        ClientError::Rejected(message) => ClientError::Rejected(message.clone()),
        ClientError::RateLimited { retry_after_secs } => ClientError::RateLimited {
            retry_after_secs: *retry_after_secs,
        },
        other => ClientError::Parse(other.to_string()),
    }
}

#[async_trait]
impl Backend for StubBackend {
    async fn login(&self, username: &str, password: &str) -> Result<String, ClientError> {
        self.enter("login", "login", None, username).await?;
        match self.lock().accounts.get(username) {
            Some((expected, token)) if expected == password => Ok(token.clone()),
            _ => Err(ClientError::Rejected(String::new())),
        }
    }

    async fn list_contacts(
        &self,
        token: &str,
        amount: u32,
    ) -> Result<Vec<RawContact>, ClientError> {
        self.enter("list_contacts", "list_contacts", Some(token), &amount.to_string())
            .await?;
        let contacts = self.lock().contacts.clone();
        Ok(contacts.into_iter().take(amount as usize).collect())
    }

    async fn list_pending_chats(
        &self,
        token: &str,
        amount: u32,
    ) -> Result<Vec<RawThread>, ClientError> {
        self.enter(
            "list_pending_chats",
            "list_pending_chats",
            Some(token),
            &amount.to_string(),
        )
        .await?;
        let pending = self.lock().pending.clone();
        Ok(pending.into_iter().take(amount as usize).collect())
    }

    async fn search_threads(
        &self,
        token: &str,
        query: &str,
    ) -> Result<Vec<RawSearchHit>, ClientError> {
        self.enter("search_threads", &format!("search:{query}"), Some(token), query)
            .await?;
        Ok(self.lock().searches.get(query).cloned().unwrap_or_default())
    }

    async fn thread_by_participants(
        &self,
        token: &str,
        user_ids: &[u64],
    ) -> Result<RawThread, ClientError> {
        let detail = user_ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.enter(
            "get_thread_by_participants",
            "get_thread_by_participants",
            Some(token),
            &detail,
        )
        .await?;

        // Keyed on the ids exactly as received: differently ordered input
        // gets a different thread.
        let id = {
            let mut state = self.lock();
            let next = state.threads_by_participants.len() + 1;
            state
                .threads_by_participants
                .entry(user_ids.to_vec())
                .or_insert_with(|| format!("thread-{next}"))
                .clone()
        };
        Ok(RawThread {
            id,
            users: user_ids
                .iter()
                .map(|pk| RawUser {
                    pk: Some(pk.to_string()),
                    username: format!("user{pk}"),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        })
    }

    async fn list_messages(
        &self,
        token: &str,
        thread_id: &str,
        amount: u32,
    ) -> Result<Vec<RawMessage>, ClientError> {
        self.enter("list_messages", "list_messages", Some(token), thread_id)
            .await?;
        let messages = self.lock().messages.get(thread_id).cloned().unwrap_or_default();
        let skip = messages.len().saturating_sub(amount as usize);
        Ok(messages.into_iter().skip(skip).collect())
    }

    async fn analyze_contact(&self, request: &AnalyzeRequest) -> Result<Value, ClientError> {
        self.enter(
            "analyze_contact",
            "analyze_contact",
            Some(&request.session_token),
            &request.username,
        )
        .await?;
        self.lock()
            .analysis
            .clone()
            .ok_or_else(|| ClientError::Api {
                status: 500,
                message: "no analysis configured".to_string(),
            })
    }

    async fn send_message(
        &self,
        token: &str,
        username: &str,
        _message: &str,
    ) -> Result<(), ClientError> {
        self.enter("send_message", "send_message", Some(token), username)
            .await
    }
}
