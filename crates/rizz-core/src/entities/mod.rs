//! Entity structs for rizz domain objects.
//!
//! Entities are owned values so they can cross task boundaries freely. All
//! structs derive `Serialize` and `Deserialize` for CLI output and session
//! persistence.

mod analysis;
mod contact;
mod session;

pub use analysis::{
    AnalysisResult, ChatMessage, DEGRADED_INSIGHT, PLACEHOLDER_PICKUP_LINE, PickupCursor,
    PickupLines, Profile, RizzGrade, clamp_score,
};
pub use contact::{Contact, ContactKey, dedup_contacts};
pub use session::Session;
