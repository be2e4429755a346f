//! Domain records for the City Tours marketplace.
//!
//! Three record families make up the contract's state: guides (reputation
//! and verification), tours (immutable offerings), and bookings (the audit
//! trail of every purchase). All records cross the host boundary, so
//! everything derives serde.

use city_tours_core::{Amount, Principal, Tick};
use serde::{Deserialize, Serialize};

/// Longest accepted tour title, in bytes.
pub const MAX_TITLE_LEN: usize = 100;
/// Longest accepted tour description, in bytes.
pub const MAX_DESCRIPTION_LEN: usize = 500;
/// Longest accepted tour location, in bytes.
pub const MAX_LOCATION_LEN: usize = 100;

/// Lowest accepted review score.
pub const MIN_SCORE: u8 = 1;
/// Highest accepted review score.
pub const MAX_SCORE: u8 = 5;

/// Unique sequential identifier for a tour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TourId(u64);

impl TourId {
    /// Creates a tour id from its raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TourId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tour#{}", self.0)
    }
}

/// Unique sequential identifier for a booking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookingId(u64);

impl BookingId {
    /// Creates a booking id from its raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "booking#{}", self.0)
    }
}

/// A guide's registry record.
///
/// `rating` is a floored running average and only meaningful once
/// `total_reviews > 0`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guide {
    /// Identity of the guide.
    pub identity: Principal,
    /// Whether the administrator has verified this guide.
    pub verified: bool,
    /// Floored running average of review scores.
    pub rating: u64,
    /// Number of reviews folded into `rating`.
    pub total_reviews: u64,
    /// Number of bookings this guide has cancelled.
    pub cancellations: u64,
    /// Tick at which the guide registered.
    pub registered_at: Tick,
}

impl Guide {
    /// Creates a fresh, unverified guide record.
    #[must_use]
    pub const fn new(identity: Principal, registered_at: Tick) -> Self {
        Self {
            identity,
            verified: false,
            rating: 0,
            total_reviews: 0,
            cancellations: 0,
            registered_at,
        }
    }
}

/// An immutable tour offering.
///
/// Tours carry no update or delete operations; once a tour is published its
/// terms cannot shift under travelers who already booked it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tour {
    /// Tour identifier.
    pub id: TourId,
    /// Owning guide (verified at creation time).
    pub guide: Principal,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Price per booking.
    pub price: Amount,
    /// Duration in minutes.
    pub duration_minutes: u32,
    /// Where the tour takes place.
    pub location: String,
    /// Tick at which the tour occurs.
    pub start_tick: Tick,
}

/// Parameters for creating a tour.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTour {
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Price per booking; must be non-zero.
    pub price: Amount,
    /// Duration in minutes.
    pub duration_minutes: u32,
    /// Where the tour takes place.
    pub location: String,
    /// Tick at which the tour occurs; must be strictly in the future.
    pub start_tick: Tick,
}

/// Lifecycle state of a booking.
///
/// Transitions are monotonic:
///
/// ```text
/// Booked --(guide cancels)-----> CancelledByGuide      [terminal]
/// Booked --(traveler cancels)--> CancelledByTraveler   [terminal]
/// Booked --(start_tick passes)-> Completed
/// Completed --(traveler reviews)-> Reviewed            [terminal]
/// ```
///
/// `Completed` is derived from the clock rather than stored while the
/// record still says `Booked`; it is committed when the review lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Escrow captured, tour not yet started.
    Booked,
    /// The traveler cancelled before the tour started.
    CancelledByTraveler,
    /// The guide cancelled before the tour started.
    CancelledByGuide,
    /// The tour's start tick has passed without cancellation.
    Completed,
    /// The traveler reviewed the completed tour.
    Reviewed,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Booked => write!(f, "booked"),
            Self::CancelledByTraveler => write!(f, "cancelled by traveler"),
            Self::CancelledByGuide => write!(f, "cancelled by guide"),
            Self::Completed => write!(f, "completed"),
            Self::Reviewed => write!(f, "reviewed"),
        }
    }
}

/// A booking record. Never deleted; this is the audit trail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking identifier.
    pub id: BookingId,
    /// The tour that was booked.
    pub tour_id: TourId,
    /// Identity of the booker.
    pub traveler: Principal,
    /// True once escrow was captured (always true for stored records;
    /// a failed capture leaves no record behind).
    pub payment_status: bool,
    /// Stored lifecycle state; see [`Booking::effective_status`].
    pub status: BookingStatus,
    /// True if a refund was issued to the traveler.
    pub refund_status: bool,
    /// Review score, present only after a review.
    pub review_score: Option<u8>,
    /// Tick at which the booking was made.
    pub booked_at: Tick,
}

impl Booking {
    /// Lifecycle state as observed at `current`, deriving the lazy
    /// `Booked` → `Completed` transition from the tour's start tick.
    #[must_use]
    pub fn effective_status(&self, tour_start: Tick, current: Tick) -> BookingStatus {
        if self.status == BookingStatus::Booked && tour_start.has_passed(current) {
            BookingStatus::Completed
        } else {
            self.status
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_status_derives_completion_from_clock() {
        let booking = Booking {
            id: BookingId::new(1),
            tour_id: TourId::new(1),
            traveler: Principal::new("wallet_2"),
            payment_status: true,
            status: BookingStatus::Booked,
            refund_status: false,
            review_score: None,
            booked_at: Tick::new(10),
        };

        let start = Tick::new(200);
        assert_eq!(
            booking.effective_status(start, Tick::new(199)),
            BookingStatus::Booked
        );
        assert_eq!(
            booking.effective_status(start, Tick::new(200)),
            BookingStatus::Completed
        );
    }

    #[test]
    fn effective_status_leaves_terminal_states_alone() {
        let booking = Booking {
            id: BookingId::new(1),
            tour_id: TourId::new(1),
            traveler: Principal::new("wallet_2"),
            payment_status: true,
            status: BookingStatus::CancelledByGuide,
            refund_status: true,
            review_score: None,
            booked_at: Tick::new(10),
        };

        // A cancelled booking never becomes completed, even after start.
        assert_eq!(
            booking.effective_status(Tick::new(200), Tick::new(500)),
            BookingStatus::CancelledByGuide
        );
    }
}
