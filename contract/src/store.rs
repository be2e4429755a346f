//! Async shared-state shell around the contract.
//!
//! The contract itself is synchronous; the host's serialization guarantee
//! (each operation runs to completion with no partial commits) is provided
//! here by taking the write lock for the duration of every mutating call.

use crate::contract::CityTours;
use crate::error::ContractError;
use crate::types::{Booking, BookingId, Guide, NewTour, Tour, TourId};
use city_tours_core::Principal;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to a deployed [`CityTours`] contract.
#[derive(Clone)]
pub struct CityToursStore {
    inner: Arc<RwLock<CityTours>>,
}

impl CityToursStore {
    /// Wraps a deployed contract for shared access.
    #[must_use]
    pub fn new(contract: CityTours) -> Self {
        Self {
            inner: Arc::new(RwLock::new(contract)),
        }
    }

    /// See [`CityTours::register`].
    ///
    /// # Errors
    ///
    /// Propagates the contract's [`ContractError`].
    pub async fn register(&self, caller: &Principal) -> Result<(), ContractError> {
        self.inner.write().await.register(caller)
    }

    /// See [`CityTours::verify`].
    ///
    /// # Errors
    ///
    /// Propagates the contract's [`ContractError`].
    pub async fn verify(&self, caller: &Principal, guide: &Principal) -> Result<(), ContractError> {
        self.inner.write().await.verify(caller, guide)
    }

    /// See [`CityTours::create_tour`].
    ///
    /// # Errors
    ///
    /// Propagates the contract's [`ContractError`].
    pub async fn create_tour(
        &self,
        caller: &Principal,
        tour: NewTour,
    ) -> Result<TourId, ContractError> {
        self.inner.write().await.create_tour(caller, tour)
    }

    /// See [`CityTours::book_tour`].
    ///
    /// # Errors
    ///
    /// Propagates the contract's [`ContractError`].
    pub async fn book_tour(
        &self,
        caller: &Principal,
        tour_id: TourId,
    ) -> Result<BookingId, ContractError> {
        self.inner.write().await.book_tour(caller, tour_id)
    }

    /// See [`CityTours::cancel_booking`].
    ///
    /// # Errors
    ///
    /// Propagates the contract's [`ContractError`].
    pub async fn cancel_booking(
        &self,
        caller: &Principal,
        booking_id: BookingId,
    ) -> Result<(), ContractError> {
        self.inner.write().await.cancel_booking(caller, booking_id)
    }

    /// See [`CityTours::submit_review`].
    ///
    /// # Errors
    ///
    /// Propagates the contract's [`ContractError`].
    pub async fn submit_review(
        &self,
        caller: &Principal,
        booking_id: BookingId,
        score: u8,
    ) -> Result<(), ContractError> {
        self.inner
            .write()
            .await
            .submit_review(caller, booking_id, score)
    }

    /// See [`CityTours::get_guide_info`].
    pub async fn get_guide_info(&self, guide: &Principal) -> Option<Guide> {
        self.inner.read().await.get_guide_info(guide)
    }

    /// See [`CityTours::get_booking_details`].
    pub async fn get_booking_details(&self, booking_id: BookingId) -> Option<Booking> {
        self.inner.read().await.get_booking_details(booking_id)
    }

    /// See [`CityTours::get_tour`].
    pub async fn get_tour(&self, tour_id: TourId) -> Option<Tour> {
        self.inner.read().await.get_tour(tour_id)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;
    use crate::contract::ContractConfig;
    use crate::environment::HostEnvironment;
    use city_tours_core::{Amount, InMemoryLedger, ManualClock, Tick};

    fn deployed_store() -> (CityToursStore, Arc<ManualClock>, Arc<InMemoryLedger>) {
        let clock = Arc::new(ManualClock::new(Tick::new(1)));
        let ledger = Arc::new(InMemoryLedger::new());
        let config = ContractConfig::new(
            Principal::new("deployer"),
            Principal::new("city-tours.escrow"),
        );
        let env = HostEnvironment::new(clock.clone(), ledger.clone());
        (
            CityToursStore::new(CityTours::new(config, env)),
            clock,
            ledger,
        )
    }

    #[tokio::test]
    async fn store_serializes_a_full_booking_flow() {
        let (store, clock, ledger) = deployed_store();
        let deployer = Principal::new("deployer");
        let guide = Principal::new("wallet_1");
        let traveler = Principal::new("wallet_2");
        ledger.credit(&traveler, Amount::new(1_000));

        store.register(&guide).await.unwrap();
        store.verify(&deployer, &guide).await.unwrap();

        let tour_id = store
            .create_tour(
                &guide,
                NewTour {
                    title: "Paris Walking Tour".to_string(),
                    description: "Explore the heart of Paris".to_string(),
                    price: Amount::new(100),
                    duration_minutes: 180,
                    location: "Paris".to_string(),
                    start_tick: Tick::new(200),
                },
            )
            .await
            .unwrap();

        let booking_id = store.book_tour(&traveler, tour_id).await.unwrap();
        let booking = store.get_booking_details(booking_id).await.unwrap();
        assert!(booking.payment_status);

        clock.set(Tick::new(201));
        store.submit_review(&traveler, booking_id, 5).await.unwrap();

        let info = store.get_guide_info(&guide).await.unwrap();
        assert_eq!(info.rating, 5);
        assert_eq!(info.total_reviews, 1);
    }

    #[tokio::test]
    async fn clones_share_the_same_contract_state() {
        let (store, _clock, _ledger) = deployed_store();
        let guide = Principal::new("wallet_1");

        let handle = store.clone();
        handle.register(&guide).await.unwrap();

        assert!(store.get_guide_info(&guide).await.is_some());
    }
}
