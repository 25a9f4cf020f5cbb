//! # rizz-core
//!
//! Core types and error types shared by every rizz crate.
//!
//! - Entity structs for contacts, chat messages, profiles, analysis results,
//!   and the authenticated session
//! - Stage, directory-mode, and screen enums with their transition rules
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;

pub use entities::{
    AnalysisResult, ChatMessage, Contact, ContactKey, DEGRADED_INSIGHT, PLACEHOLDER_PICKUP_LINE,
    PickupCursor, PickupLines, Profile, RizzGrade, Session, clamp_score, dedup_contacts,
};
pub use enums::{DirectoryMode, Screen, StageId, StageStatus};
pub use errors::CoreError;
