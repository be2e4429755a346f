//! Booking ledger: the central state machine.
//!
//! Follows a validate/apply split: validation is pure and returns either an
//! error or a plan, and the contract facade only applies the plan after the
//! accompanying value transfer (escrow capture or refund) has succeeded.
//! That keeps every transition all-or-nothing even though the transfer runs
//! against an external ledger.

use crate::error::{ContractError, EntityKind};
use crate::types::{Booking, BookingId, BookingStatus, MAX_SCORE, MIN_SCORE, Tour, TourId};
use city_tours_core::{Amount, Principal, Tick};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A validated cancellation, ready to be applied once any refund clears.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CancellationPlan {
    /// Terminal status to commit.
    pub new_status: BookingStatus,
    /// Refund owed to the traveler, if any.
    pub refund: Option<Amount>,
    /// The traveler to refund.
    pub traveler: Principal,
    /// Whether the owning guide initiated the cancellation.
    pub guide_initiated: bool,
}

/// Ledger of all bookings, keyed by sequential id. Records are never
/// deleted; they are the audit trail.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BookingLedger {
    bookings: HashMap<BookingId, Booking>,
    next_id: u64,
}

impl BookingLedger {
    /// Creates an empty booking ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a freshly paid booking and returns its id.
    ///
    /// Called only after the escrow capture succeeded; a failed capture
    /// must leave no record and consume no id.
    pub(crate) fn apply_booking(
        &mut self,
        tour_id: TourId,
        traveler: Principal,
        now: Tick,
    ) -> BookingId {
        self.next_id += 1;
        let id = BookingId::new(self.next_id);
        self.bookings.insert(
            id,
            Booking {
                id,
                tour_id,
                traveler,
                payment_status: true,
                status: BookingStatus::Booked,
                refund_status: false,
                review_score: None,
                booked_at: now,
            },
        );
        id
    }

    /// Validates a cancellation request and computes the refund policy.
    ///
    /// Guide cancellations always refund in full. Traveler cancellations
    /// refund in full only while more than `cancellation_window` ticks
    /// remain before the start; inside the window the escrow is forfeit.
    pub(crate) fn validate_cancellation(
        &self,
        id: BookingId,
        caller: &Principal,
        tour: &Tour,
        now: Tick,
        cancellation_window: u64,
    ) -> Result<CancellationPlan, ContractError> {
        let booking = self
            .bookings
            .get(&id)
            .ok_or(ContractError::NotFound(EntityKind::Booking))?;

        // A started booking is effectively completed; cancellation is only
        // meaningful before the tour begins.
        let effective = booking.effective_status(tour.start_tick, now);
        if effective != BookingStatus::Booked {
            return Err(ContractError::InvalidState { actual: effective });
        }

        if caller == &tour.guide {
            return Ok(CancellationPlan {
                new_status: BookingStatus::CancelledByGuide,
                refund: Some(tour.price),
                traveler: booking.traveler.clone(),
                guide_initiated: true,
            });
        }

        if caller == &booking.traveler {
            let ticks_until_start = now.until(tour.start_tick);
            let refund = if ticks_until_start > cancellation_window {
                Some(tour.price)
            } else {
                // Late cancellation: escrow is forfeit.
                None
            };
            return Ok(CancellationPlan {
                new_status: BookingStatus::CancelledByTraveler,
                refund,
                traveler: booking.traveler.clone(),
                guide_initiated: false,
            });
        }

        Err(ContractError::Unauthorized)
    }

    /// Commits a validated cancellation.
    pub(crate) fn apply_cancellation(&mut self, id: BookingId, plan: &CancellationPlan) {
        if let Some(booking) = self.bookings.get_mut(&id) {
            booking.status = plan.new_status;
            booking.refund_status = plan.refund.is_some();
        }
    }

    /// Validates a review submission against the booking lifecycle.
    pub(crate) fn validate_review(
        &self,
        id: BookingId,
        caller: &Principal,
        tour_start: Tick,
        now: Tick,
        score: u8,
    ) -> Result<(), ContractError> {
        let booking = self
            .bookings
            .get(&id)
            .ok_or(ContractError::NotFound(EntityKind::Booking))?;

        if caller != &booking.traveler {
            return Err(ContractError::Unauthorized);
        }

        // Duplicate-review guard fires before the lifecycle check so a
        // second submission reports the duplicate rather than the state.
        if booking.review_score.is_some() {
            return Err(ContractError::AlreadyReviewed);
        }

        let effective = booking.effective_status(tour_start, now);
        if effective != BookingStatus::Completed {
            return Err(ContractError::InvalidState { actual: effective });
        }

        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(ContractError::InvalidInput(format!(
                "score {score} is outside {MIN_SCORE}..={MAX_SCORE}"
            )));
        }

        Ok(())
    }

    /// Commits a validated review, folding the lazy completion into the
    /// stored status.
    pub(crate) fn apply_review(&mut self, id: BookingId, score: u8) {
        if let Some(booking) = self.bookings.get_mut(&id) {
            booking.review_score = Some(score);
            booking.status = BookingStatus::Reviewed;
        }
    }

    /// Read-only lookup of a booking.
    #[must_use]
    pub fn get(&self, id: BookingId) -> Option<&Booking> {
        self.bookings.get(&id)
    }

    /// Number of bookings ever made.
    #[must_use]
    pub fn count(&self) -> usize {
        self.bookings.len()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;

    const WINDOW: u64 = 144;

    fn tour(start: Tick) -> Tour {
        Tour {
            id: TourId::new(1),
            guide: Principal::new("wallet_1"),
            title: "Paris Walking Tour".to_string(),
            description: "Explore the heart of Paris".to_string(),
            price: Amount::new(100),
            duration_minutes: 180,
            location: "Paris".to_string(),
            start_tick: start,
        }
    }

    fn booked_ledger(traveler: &Principal) -> (BookingLedger, BookingId) {
        let mut ledger = BookingLedger::new();
        let id = ledger.apply_booking(TourId::new(1), traveler.clone(), Tick::new(10));
        (ledger, id)
    }

    #[test]
    fn booking_ids_are_sequential() {
        let mut ledger = BookingLedger::new();
        let traveler = Principal::new("wallet_2");
        let first = ledger.apply_booking(TourId::new(1), traveler.clone(), Tick::new(1));
        let second = ledger.apply_booking(TourId::new(1), traveler, Tick::new(2));
        assert_eq!(first, BookingId::new(1));
        assert_eq!(second, BookingId::new(2));
    }

    #[test]
    fn early_traveler_cancellation_refunds_in_full() {
        let traveler = Principal::new("wallet_2");
        let (ledger, id) = booked_ledger(&traveler);
        let tour = tour(Tick::new(300));

        // 290 ticks until start, window 144.
        let plan = ledger
            .validate_cancellation(id, &traveler, &tour, Tick::new(10), WINDOW)
            .unwrap();
        assert_eq!(plan.new_status, BookingStatus::CancelledByTraveler);
        assert_eq!(plan.refund, Some(Amount::new(100)));
        assert!(!plan.guide_initiated);
    }

    #[test]
    fn late_traveler_cancellation_forfeits_escrow() {
        let traveler = Principal::new("wallet_2");
        let (ledger, id) = booked_ledger(&traveler);
        let tour = tour(Tick::new(300));

        // Exactly the window boundary is already "late".
        let plan = ledger
            .validate_cancellation(id, &traveler, &tour, Tick::new(300 - WINDOW), WINDOW)
            .unwrap();
        assert_eq!(plan.new_status, BookingStatus::CancelledByTraveler);
        assert_eq!(plan.refund, None);
    }

    #[test]
    fn guide_cancellation_always_refunds() {
        let traveler = Principal::new("wallet_2");
        let (ledger, id) = booked_ledger(&traveler);
        let tour = tour(Tick::new(300));
        let guide = tour.guide.clone();

        // Even one tick before the start the guide refunds in full.
        let plan = ledger
            .validate_cancellation(id, &guide, &tour, Tick::new(299), WINDOW)
            .unwrap();
        assert_eq!(plan.new_status, BookingStatus::CancelledByGuide);
        assert_eq!(plan.refund, Some(Amount::new(100)));
        assert!(plan.guide_initiated);
        assert_eq!(plan.traveler, traveler);
    }

    #[test]
    fn stranger_cannot_cancel() {
        let traveler = Principal::new("wallet_2");
        let (ledger, id) = booked_ledger(&traveler);
        let tour = tour(Tick::new(300));

        let err = ledger
            .validate_cancellation(id, &Principal::new("wallet_9"), &tour, Tick::new(10), WINDOW)
            .unwrap_err();
        assert_eq!(err, ContractError::Unauthorized);
    }

    #[test]
    fn started_booking_cannot_be_cancelled() {
        let traveler = Principal::new("wallet_2");
        let (ledger, id) = booked_ledger(&traveler);
        let tour = tour(Tick::new(300));

        let err = ledger
            .validate_cancellation(id, &traveler, &tour, Tick::new(300), WINDOW)
            .unwrap_err();
        assert_eq!(
            err,
            ContractError::InvalidState {
                actual: BookingStatus::Completed
            }
        );
    }

    #[test]
    fn cancelled_booking_cannot_be_cancelled_again() {
        let traveler = Principal::new("wallet_2");
        let (mut ledger, id) = booked_ledger(&traveler);
        let tour = tour(Tick::new(300));

        let plan = ledger
            .validate_cancellation(id, &traveler, &tour, Tick::new(10), WINDOW)
            .unwrap();
        ledger.apply_cancellation(id, &plan);

        let err = ledger
            .validate_cancellation(id, &traveler, &tour, Tick::new(11), WINDOW)
            .unwrap_err();
        assert_eq!(
            err,
            ContractError::InvalidState {
                actual: BookingStatus::CancelledByTraveler
            }
        );
    }

    #[test]
    fn review_requires_completion() {
        let traveler = Principal::new("wallet_2");
        let (ledger, id) = booked_ledger(&traveler);
        let start = Tick::new(300);

        let err = ledger
            .validate_review(id, &traveler, start, Tick::new(299), 5)
            .unwrap_err();
        assert_eq!(
            err,
            ContractError::InvalidState {
                actual: BookingStatus::Booked
            }
        );

        ledger
            .validate_review(id, &traveler, start, Tick::new(300), 5)
            .unwrap();
    }

    #[test]
    fn review_score_bounds_are_enforced() {
        let traveler = Principal::new("wallet_2");
        let (ledger, id) = booked_ledger(&traveler);
        let start = Tick::new(300);
        let after = Tick::new(301);

        for bad in [0_u8, 6] {
            let err = ledger
                .validate_review(id, &traveler, start, after, bad)
                .unwrap_err();
            assert!(matches!(err, ContractError::InvalidInput(_)));
        }
    }

    #[test]
    fn second_review_reports_already_reviewed() {
        let traveler = Principal::new("wallet_2");
        let (mut ledger, id) = booked_ledger(&traveler);
        let start = Tick::new(300);
        let after = Tick::new(301);

        ledger.validate_review(id, &traveler, start, after, 4).unwrap();
        ledger.apply_review(id, 4);

        let err = ledger
            .validate_review(id, &traveler, start, after, 4)
            .unwrap_err();
        assert_eq!(err, ContractError::AlreadyReviewed);
    }

    #[test]
    fn only_the_traveler_may_review() {
        let traveler = Principal::new("wallet_2");
        let (ledger, id) = booked_ledger(&traveler);

        let err = ledger
            .validate_review(id, &Principal::new("wallet_1"), Tick::new(300), Tick::new(301), 5)
            .unwrap_err();
        assert_eq!(err, ContractError::Unauthorized);
    }
}
