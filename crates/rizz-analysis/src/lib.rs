//! # rizz-analysis
//!
//! The staged analysis pipeline for one selected contact.
//!
//! - [`adapter`]: pure mapping from the backend payload to [`AnalysisResult`]
//! - [`StageBoard`]: per-run stage statuses and progress percentage
//! - [`AnalysisPipeline`]: drives one backend call through observable stage
//!   transitions, absorbs failure into a degraded result, and stops applying
//!   anything once its liveness token is cancelled
//! - [`send_pickup_line`]: deliver the chosen line to the contact
//!
//! [`AnalysisResult`]: rizz_core::AnalysisResult

pub mod adapter;
mod board;
mod error;
mod pipeline;
mod send;

pub use adapter::{INTEREST_ALIASES, adapt, clean_pickup_line};
pub use board::StageBoard;
pub use error::{AnalysisError, SendError};
pub use pipeline::{AnalysisPipeline, PipelineObserver, RunOutcome};
pub use send::send_pickup_line;
