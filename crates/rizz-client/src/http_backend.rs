//! reqwest implementation of [`Backend`].

use std::time::Duration;

use async_trait::async_trait;
use rizz_config::BackendConfig;
use serde_json::Value;

use crate::{
    Backend,
    error::ClientError,
    http::{check_response, decode_envelope},
    wire::{
        AnalyzeRequest, ContactsResponse, LoginRequest, LoginResponse, MessagesResponse,
        ParticipantsRequest, RawContact, RawMessage, RawSearchHit, RawThread, SearchResponse,
        SendMessageRequest, ThreadResponse, ThreadsResponse,
    },
};

/// HTTP client for the rizz backend.
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a client from the `backend` config section.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client` fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.normalized_base_url().to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, token: &str) -> String {
        format!(
            "{}/{path}?session_token={}",
            self.base_url,
            urlencoding::encode(token)
        )
    }

    async fn read_json(resp: reqwest::Response) -> Result<Value, ClientError> {
        let resp = check_response(resp).await?;
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, username: &str, password: &str) -> Result<String, ClientError> {
        tracing::debug!(endpoint = "login", username, "issuing backend request");
        let resp = self
            .http
            .post(format!("{}/login", self.base_url))
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        let body: LoginResponse = serde_json::from_value(Self::read_json(resp).await?)?;
        match (body.success, body.session_token) {
            (true, Some(token)) if !token.is_empty() => Ok(token),
            _ => Err(ClientError::Rejected(body.message.unwrap_or_default())),
        }
    }

    async fn list_contacts(
        &self,
        token: &str,
        amount: u32,
    ) -> Result<Vec<RawContact>, ClientError> {
        tracing::debug!(endpoint = "list_contacts", amount, "issuing backend request");
        let url = format!("{}&amount={amount}", self.url("list_contacts", token));
        let resp = self.http.get(&url).send().await?;
        let body: ContactsResponse = decode_envelope(Self::read_json(resp).await?)?;
        Ok(body.contacts)
    }

    async fn list_pending_chats(
        &self,
        token: &str,
        amount: u32,
    ) -> Result<Vec<RawThread>, ClientError> {
        tracing::debug!(endpoint = "list_pending_chats", amount, "issuing backend request");
        let url = format!("{}&amount={amount}", self.url("list_pending_chats", token));
        let resp = self.http.get(&url).send().await?;
        let body: ThreadsResponse = decode_envelope(Self::read_json(resp).await?)?;
        Ok(body.threads)
    }

    async fn search_threads(
        &self,
        token: &str,
        query: &str,
    ) -> Result<Vec<RawSearchHit>, ClientError> {
        tracing::debug!(endpoint = "search_threads", "issuing backend request");
        let url = format!(
            "{}&query={}",
            self.url("search_threads", token),
            urlencoding::encode(query)
        );
        let resp = self.http.get(&url).send().await?;
        let body: SearchResponse = decode_envelope(Self::read_json(resp).await?)?;
        Ok(body.results)
    }

    async fn thread_by_participants(
        &self,
        token: &str,
        user_ids: &[u64],
    ) -> Result<RawThread, ClientError> {
        tracing::debug!(
            endpoint = "get_thread_by_participants",
            participants = user_ids.len(),
            "issuing backend request"
        );
        let resp = self
            .http
            .post(self.url("get_thread_by_participants", token))
            .json(&ParticipantsRequest { user_ids })
            .send()
            .await?;
        let body: ThreadResponse = decode_envelope(Self::read_json(resp).await?)?;
        Ok(body.thread)
    }

    async fn list_messages(
        &self,
        token: &str,
        thread_id: &str,
        amount: u32,
    ) -> Result<Vec<RawMessage>, ClientError> {
        tracing::debug!(endpoint = "list_messages", thread_id, amount, "issuing backend request");
        let url = format!(
            "{}&thread_id={}&amount={amount}",
            self.url("list_messages", token),
            urlencoding::encode(thread_id)
        );
        let resp = self.http.get(&url).send().await?;
        let body: MessagesResponse = decode_envelope(Self::read_json(resp).await?)?;
        Ok(body.messages)
    }

    async fn analyze_contact(&self, request: &AnalyzeRequest) -> Result<Value, ClientError> {
        tracing::debug!(
            endpoint = "analyze_contact",
            username = %request.username,
            "issuing backend request"
        );
        let resp = self
            .http
            .post(format!("{}/analyze_contact", self.base_url))
            .json(request)
            .send()
            .await?;
        decode_envelope(Self::read_json(resp).await?)
    }

    async fn send_message(
        &self,
        token: &str,
        username: &str,
        message: &str,
    ) -> Result<(), ClientError> {
        tracing::debug!(endpoint = "send_message", username, "issuing backend request");
        let resp = self
            .http
            .post(self.url("send_message", token))
            .json(&SendMessageRequest { username, message })
            .send()
            .await?;
        decode_envelope::<Value>(Self::read_json(resp).await?).map(|_| ())
    }
}
