//! Wire types exchanged with the backend.
//!
//! These mirror the backend's JSON loosely: optional fields default, camelCase
//! aliases are accepted, and numeric ids are read as strings. Mapping into
//! domain entities happens in `rizz-directory` and `rizz-analysis`.

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ParticipantsRequest<'a> {
    pub user_ids: &'a [u64],
}

#[derive(Debug, Serialize)]
pub(crate) struct SendMessageRequest<'a> {
    pub username: &'a str,
    pub message: &'a str,
}

/// Body of `POST /analyze_contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzeRequest {
    pub session_token: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub session_token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContactsResponse {
    #[serde(default)]
    pub contacts: Vec<RawContact>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ThreadsResponse {
    #[serde(default)]
    pub threads: Vec<RawThread>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: Vec<RawSearchHit>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ThreadResponse {
    pub thread: RawThread,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessagesResponse {
    #[serde(default)]
    pub messages: Vec<RawMessage>,
}

/// One inbox contact as served by `/list_contacts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawContact {
    #[serde(default, deserialize_with = "opt_id")]
    pub id: Option<String>,
    pub username: String,
    #[serde(default, alias = "fullName")]
    pub full_name: Option<String>,
    #[serde(default, alias = "profile_pic_url")]
    pub avatar: Option<String>,
    #[serde(default, alias = "lastChat")]
    pub last_chat: Option<String>,
    #[serde(default, alias = "rizzScore")]
    pub rizz_score: Option<f64>,
    #[serde(default, alias = "messageCount")]
    pub message_count: Option<u32>,
}

/// A conversation as served by the thread endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawThread {
    #[serde(alias = "thread_id", deserialize_with = "id")]
    pub id: String,
    #[serde(default)]
    pub users: Vec<RawUser>,
    #[serde(default)]
    pub thread_title: Option<String>,
    #[serde(default)]
    pub last_activity_at: Option<String>,
    #[serde(default)]
    pub messages: Vec<RawMessage>,
}

/// A participant or a bare user search hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawUser {
    #[serde(default, deserialize_with = "opt_id")]
    pub pk: Option<String>,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
}

/// `/search_threads` returns a mix of resolved threads and bare users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSearchHit {
    Thread(RawThread),
    User(RawUser),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    #[serde(default, deserialize_with = "opt_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "opt_id")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub is_sent_by_viewer: Option<bool>,
}

// ---------------------------------------------------------------------------
// Id helpers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(u64),
}

impl From<IdRepr> for String {
    fn from(repr: IdRepr) -> Self {
        match repr {
            IdRepr::Text(text) => text,
            IdRepr::Number(number) => number.to_string(),
        }
    }
}

fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    IdRepr::deserialize(deserializer).map(String::from)
}

fn opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<IdRepr>::deserialize(deserializer)?.map(String::from))
}
