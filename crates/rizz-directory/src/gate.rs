use std::sync::atomic::{AtomicU64, Ordering};

/// Proof that a listing request was issued at a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListingTicket(u64);

impl ListingTicket {
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.0
    }
}

/// Monotonic generation counter shared by every listing request.
///
/// Only the most recently issued ticket is current.
#[derive(Debug, Default)]
pub struct ListingGate {
    generation: AtomicU64,
}

impl ListingGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, superseding every earlier one.
    pub fn issue(&self) -> ListingTicket {
        ListingTicket(self.generation.fetch_add(1, Ordering::AcqRel) + 1)
    }

    #[must_use]
    pub fn is_current(&self, ticket: ListingTicket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.0
    }
}
