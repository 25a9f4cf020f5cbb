//! # rizz-auth
//!
//! Session handling for rizz:
//!
//! - [`SessionStore`]: the single current session, shared by handle
//! - [`authenticate`]: credential → token exchange that fills the store
//! - [`token_store`]: CLI persistence (OS keyring, file fallback, env override)

mod error;
mod login;
mod store;
pub mod token_store;

pub use error::AuthError;
pub use login::{FALLBACK_LOGIN_MESSAGE, authenticate};
pub use store::SessionStore;
