//! # rizz-directory
//!
//! Contact directory synchronization: inbox and pending listings, search,
//! new-chat resolution by participants, and thread opening.
//!
//! Every listing request (mode load, refresh, search) goes through
//! [`DirectorySync::sync`], which takes a [`ListingTicket`] from one shared
//! [`ListingGate`]. A result is only [`Listing::Current`] if no later request
//! was issued before it resolved; callers apply current listings and drop
//! superseded ones.

mod error;
mod gate;
pub mod mapping;
mod sync;

pub use error::DirectoryError;
pub use gate::{ListingGate, ListingTicket};
pub use sync::{DirectorySync, Listing, ThreadView};
