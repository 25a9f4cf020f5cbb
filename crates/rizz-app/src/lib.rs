//! Screen navigation and intent handling.
//!
//! [`App`] owns the session, the directory sync engine and the analysis
//! pipeline, and publishes an [`AppSnapshot`] for presentation on every
//! change. Presentation renders snapshots and sends intents; it never
//! mutates state directly.

mod app;
mod error;
mod navigator;
mod state;

pub use app::{AnalysisRun, App};
pub use error::AppError;
pub use navigator::{Navigator, Preconditions};
pub use state::{AppSnapshot, DirectoryView, SendStatus};
