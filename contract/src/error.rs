//! Contract error values.

use crate::types::BookingStatus;
use city_tours_core::TransferError;

/// The kind of entity a lookup failed to find.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    /// A guide record in the registry.
    Guide,
    /// A tour record in the catalog.
    Tour,
    /// A booking record in the ledger.
    Booking,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Guide => write!(f, "guide"),
            Self::Tour => write!(f, "tour"),
            Self::Booking => write!(f, "booking"),
        }
    }
}

/// Failure value returned by every public contract operation.
///
/// Operations are all-or-nothing: whenever one of these is returned, no
/// state was changed and no value moved.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    /// The caller may not perform this action.
    #[error("caller is not authorized to perform this action")]
    Unauthorized,

    /// A referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(EntityKind),

    /// The caller already holds a guide record.
    #[error("caller is already registered as a guide")]
    AlreadyRegistered,

    /// The booking already carries a review.
    #[error("booking has already been reviewed")]
    AlreadyReviewed,

    /// The operation is illegal for the booking's current lifecycle state.
    #[error("operation is not valid while the booking is {actual}")]
    InvalidState {
        /// Status the booking was in when the operation was attempted.
        actual: BookingStatus,
    },

    /// An argument was malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The escrow capture or refund did not complete.
    #[error("value transfer failed")]
    TransferFailed(#[from] TransferError),
}
