//! The contract facade: configuration plus the nine public operations.
//!
//! Wires the guide registry, tour catalog, and booking ledger together and
//! orders every value transfer before the state mutation it accompanies, so
//! each operation is observable only as a whole.

use crate::booking::BookingLedger;
use crate::catalog::TourCatalog;
use crate::environment::HostEnvironment;
use crate::error::{ContractError, EntityKind};
use crate::registry::GuideRegistry;
use crate::types::{Booking, BookingId, Guide, NewTour, Tour, TourId};
use city_tours_core::{Principal, Tick};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Cancellation window the Clarity original used: one day of blocks.
pub const DEFAULT_CANCELLATION_WINDOW: u64 = 144;

/// Deployment-time configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// The designated administrator (the deployer, typically).
    pub admin: Principal,
    /// The contract's own escrow account on the host ledger.
    pub escrow: Principal,
    /// Ticks before a tour's start inside which a traveler cancellation
    /// forfeits the escrow.
    pub cancellation_window: u64,
}

impl ContractConfig {
    /// Configuration with the default cancellation window.
    #[must_use]
    pub const fn new(admin: Principal, escrow: Principal) -> Self {
        Self {
            admin,
            escrow,
            cancellation_window: DEFAULT_CANCELLATION_WINDOW,
        }
    }

    /// Overrides the cancellation window.
    #[must_use]
    pub const fn with_cancellation_window(mut self, ticks: u64) -> Self {
        self.cancellation_window = ticks;
        self
    }
}

/// The City Tours marketplace contract.
///
/// All state lives here; the host supplies identity, time, and transfers
/// through the injected [`HostEnvironment`]. Operations run to completion
/// one at a time and are all-or-nothing.
#[derive(Clone, Debug)]
pub struct CityTours {
    config: ContractConfig,
    env: HostEnvironment,
    guides: GuideRegistry,
    tours: TourCatalog,
    bookings: BookingLedger,
}

impl CityTours {
    /// Deploys a fresh contract instance.
    #[must_use]
    pub fn new(config: ContractConfig, env: HostEnvironment) -> Self {
        Self {
            config,
            env,
            guides: GuideRegistry::new(),
            tours: TourCatalog::new(),
            bookings: BookingLedger::new(),
        }
    }

    /// The deployment configuration.
    #[must_use]
    pub const fn config(&self) -> &ContractConfig {
        &self.config
    }

    fn now(&self) -> Tick {
        self.env.clock().current_tick()
    }

    /// Registers the caller as a new, unverified guide.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::AlreadyRegistered`] if the caller already
    /// holds a guide record.
    pub fn register(&mut self, caller: &Principal) -> Result<(), ContractError> {
        let now = self.now();
        self.guides.register(caller, now)?;
        info!(guide = %caller, %now, "guide registered");
        Ok(())
    }

    /// Verifies a guide. Administrator only; re-verifying is a no-op
    /// success.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Unauthorized`] unless the caller is the
    /// administrator, or [`ContractError::NotFound`] if the guide has no
    /// record.
    pub fn verify(&mut self, caller: &Principal, guide: &Principal) -> Result<(), ContractError> {
        if caller != &self.config.admin {
            warn!(caller = %caller, "verify rejected: not the administrator");
            return Err(ContractError::Unauthorized);
        }
        self.guides.verify(guide)?;
        info!(guide = %guide, "guide verified");
        Ok(())
    }

    /// Creates a tour owned by the caller and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Unauthorized`] unless the caller is a
    /// verified guide, or [`ContractError::InvalidInput`] for a zero price,
    /// a non-future start tick, or over-long text fields.
    pub fn create_tour(
        &mut self,
        caller: &Principal,
        tour: NewTour,
    ) -> Result<TourId, ContractError> {
        if !self.guides.is_verified(caller) {
            warn!(caller = %caller, "create_tour rejected: caller is not a verified guide");
            return Err(ContractError::Unauthorized);
        }
        let now = self.now();
        let id = self.tours.create(caller, tour, now)?;
        info!(%id, guide = %caller, "tour created");
        Ok(id)
    }

    /// Books a tour for the caller, capturing the price into escrow, and
    /// returns the booking id.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::NotFound`] for an unknown tour, or
    /// [`ContractError::TransferFailed`] if the escrow capture does not
    /// complete — in which case no booking record is created.
    pub fn book_tour(
        &mut self,
        caller: &Principal,
        tour_id: TourId,
    ) -> Result<BookingId, ContractError> {
        let price = self
            .tours
            .get(tour_id)
            .map(|tour| tour.price)
            .ok_or(ContractError::NotFound(EntityKind::Tour))?;

        // Escrow capture comes first; only a successful transfer may be
        // followed by a record.
        self.env.ledger().transfer(caller, &self.config.escrow, price)?;

        let now = self.now();
        let id = self.bookings.apply_booking(tour_id, caller.clone(), now);
        info!(%id, %tour_id, traveler = %caller, %price, "tour booked, escrow captured");
        Ok(id)
    }

    /// Cancels a booking. The caller must be the booking's traveler or the
    /// tour's owning guide.
    ///
    /// Guide cancellations refund in full and count against the guide.
    /// Traveler cancellations refund in full outside the cancellation
    /// window and forfeit the escrow inside it.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::NotFound`] for an unknown booking,
    /// [`ContractError::InvalidState`] unless the booking is still booked
    /// and the tour has not started, [`ContractError::Unauthorized`] for
    /// any other caller, or [`ContractError::TransferFailed`] if the refund
    /// does not complete — in which case nothing changes.
    pub fn cancel_booking(
        &mut self,
        caller: &Principal,
        booking_id: BookingId,
    ) -> Result<(), ContractError> {
        let tour = self
            .bookings
            .get(booking_id)
            .and_then(|booking| self.tours.get(booking.tour_id))
            .cloned()
            .ok_or(ContractError::NotFound(EntityKind::Booking))?;

        let now = self.now();
        let plan = self.bookings.validate_cancellation(
            booking_id,
            caller,
            &tour,
            now,
            self.config.cancellation_window,
        )?;

        // Refund before committing: a failed transfer aborts the whole
        // cancellation with no state change.
        if let Some(refund) = plan.refund {
            self.env
                .ledger()
                .transfer(&self.config.escrow, &plan.traveler, refund)?;
        }

        self.bookings.apply_cancellation(booking_id, &plan);
        if plan.guide_initiated {
            self.guides.record_cancellation(&tour.guide)?;
        }
        info!(
            %booking_id,
            status = %plan.new_status,
            refunded = plan.refund.is_some(),
            "booking cancelled"
        );
        Ok(())
    }

    /// Submits a review for a completed booking and folds the score into
    /// the guide's running average.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::NotFound`] for an unknown booking,
    /// [`ContractError::Unauthorized`] unless the caller is the booking's
    /// traveler, [`ContractError::AlreadyReviewed`] for a second review,
    /// [`ContractError::InvalidState`] unless the tour has completed, or
    /// [`ContractError::InvalidInput`] for a score outside 1..=5.
    pub fn submit_review(
        &mut self,
        caller: &Principal,
        booking_id: BookingId,
        score: u8,
    ) -> Result<(), ContractError> {
        let tour = self
            .bookings
            .get(booking_id)
            .and_then(|booking| self.tours.get(booking.tour_id))
            .cloned()
            .ok_or(ContractError::NotFound(EntityKind::Booking))?;

        let now = self.now();
        self.bookings
            .validate_review(booking_id, caller, tour.start_tick, now, score)?;

        self.bookings.apply_review(booking_id, score);
        self.guides.record_review(&tour.guide, score)?;
        info!(%booking_id, guide = %tour.guide, score, "review recorded");
        Ok(())
    }

    /// Read-only lookup of a guide record.
    #[must_use]
    pub fn get_guide_info(&self, guide: &Principal) -> Option<Guide> {
        self.guides.get(guide).cloned()
    }

    /// Read-only lookup of a booking, with the lazy `Booked` → `Completed`
    /// transition derived from the current tick.
    #[must_use]
    pub fn get_booking_details(&self, booking_id: BookingId) -> Option<Booking> {
        let booking = self.bookings.get(booking_id)?;
        let mut details = booking.clone();
        if let Some(tour) = self.tours.get(booking.tour_id) {
            details.status = booking.effective_status(tour.start_tick, self.now());
        }
        Some(details)
    }

    /// Read-only lookup of a tour.
    #[must_use]
    pub fn get_tour(&self, tour_id: TourId) -> Option<Tour> {
        self.tours.get(tour_id).cloned()
    }
}
