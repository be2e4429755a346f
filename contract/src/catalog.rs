//! Tour catalog: creation by verified guides, immutable thereafter.

use crate::error::ContractError;
use crate::types::{
    MAX_DESCRIPTION_LEN, MAX_LOCATION_LEN, MAX_TITLE_LEN, NewTour, Tour, TourId,
};
use city_tours_core::{Principal, Tick};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Catalog of all tours, keyed by sequential id.
///
/// Guide-verification checks live in the contract facade; the catalog
/// validates inputs and allocates ids. There is deliberately no update or
/// delete: a published tour cannot shift under already-booked travelers.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TourCatalog {
    tours: HashMap<TourId, Tour>,
    next_id: u64,
}

impl TourCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `tour` against the current tick and text bounds.
    fn validate(tour: &NewTour, now: Tick) -> Result<(), ContractError> {
        if tour.price.is_zero() {
            return Err(ContractError::InvalidInput(
                "price must be greater than zero".to_string(),
            ));
        }
        if tour.start_tick.has_passed(now) {
            return Err(ContractError::InvalidInput(format!(
                "start tick {} is not after the current {now}",
                tour.start_tick.value()
            )));
        }
        if tour.title.len() > MAX_TITLE_LEN {
            return Err(ContractError::InvalidInput(format!(
                "title exceeds {MAX_TITLE_LEN} bytes"
            )));
        }
        if tour.description.len() > MAX_DESCRIPTION_LEN {
            return Err(ContractError::InvalidInput(format!(
                "description exceeds {MAX_DESCRIPTION_LEN} bytes"
            )));
        }
        if tour.location.len() > MAX_LOCATION_LEN {
            return Err(ContractError::InvalidInput(format!(
                "location exceeds {MAX_LOCATION_LEN} bytes"
            )));
        }
        Ok(())
    }

    /// Stores a new tour owned by `guide` and returns its id.
    ///
    /// Ids are allocated only on success; a rejected tour never consumes
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::InvalidInput`] for a zero price, a start
    /// tick that is not strictly in the future, or over-long text fields.
    pub fn create(
        &mut self,
        guide: &Principal,
        tour: NewTour,
        now: Tick,
    ) -> Result<TourId, ContractError> {
        Self::validate(&tour, now)?;

        self.next_id += 1;
        let id = TourId::new(self.next_id);
        self.tours.insert(
            id,
            Tour {
                id,
                guide: guide.clone(),
                title: tour.title,
                description: tour.description,
                price: tour.price,
                duration_minutes: tour.duration_minutes,
                location: tour.location,
                start_tick: tour.start_tick,
            },
        );
        Ok(id)
    }

    /// Read-only lookup of a tour.
    #[must_use]
    pub fn get(&self, id: TourId) -> Option<&Tour> {
        self.tours.get(&id)
    }

    /// Number of tours ever created.
    #[must_use]
    pub fn count(&self) -> usize {
        self.tours.len()
    }
}
